//! PDE coefficient definitions.
//!
//! The assembler discretizes the scalar elliptic operator
//!
//! ```text
//! -∇·(κ ∇u) + c u = f
//! ```
//!
//! with a constant diffusion coefficient κ and reaction coefficient c.
//! The default (κ = 1, c = 0) is the Poisson equation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Constant coefficients of the elliptic operator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coefficients {
    /// Diffusion coefficient κ (must be positive).
    pub diffusion: f64,
    /// Reaction coefficient c (must be non-negative).
    pub reaction: f64,
}

impl Coefficients {
    /// Create validated coefficients.
    ///
    /// # Errors
    ///
    /// Returns error if κ ≤ 0 or c < 0, or either is non-finite. Those values
    /// would make the discrete operator indefinite.
    pub fn new(diffusion: f64, reaction: f64) -> Result<Self> {
        let coefficients = Self {
            diffusion,
            reaction,
        };
        coefficients.validate()?;
        Ok(coefficients)
    }

    /// Pure Poisson operator `-Δu`.
    pub fn poisson() -> Self {
        Self {
            diffusion: 1.0,
            reaction: 0.0,
        }
    }

    /// Check the operator stays symmetric positive definite.
    pub fn validate(&self) -> Result<()> {
        if !self.diffusion.is_finite() || self.diffusion <= 0.0 {
            return Err(Error::InvalidCoefficient(format!(
                "diffusion must be positive, got {}",
                self.diffusion
            )));
        }
        if !self.reaction.is_finite() || self.reaction < 0.0 {
            return Err(Error::InvalidCoefficient(format!(
                "reaction must be non-negative, got {}",
                self.reaction
            )));
        }
        Ok(())
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::poisson()
    }
}
