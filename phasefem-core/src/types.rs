//! Core data types for the FEM kernel.
//!
//! This module defines the geometric primitives shared by the mesh builder
//! and the assembler:
//! - Points in the plane
//! - The rectangular problem domain

use crate::error::{Error, Result};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// A point in the plane.
pub type Point2 = Vector2<f64>;

/// Axis-aligned rectangle `[x1, x2] × [y1, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

impl Domain {
    /// Create a validated domain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDomain`] if any bound is non-finite or the
    /// rectangle has zero or negative width or height.
    pub fn new(x1: f64, x2: f64, y1: f64, y2: f64) -> Result<Self> {
        let domain = Self { x1, x2, y1, y2 };
        domain.validate()?;
        Ok(domain)
    }

    /// The unit square `[0, 1] × [0, 1]`.
    pub fn unit_square() -> Self {
        Self {
            x1: 0.0,
            x2: 1.0,
            y1: 0.0,
            y2: 1.0,
        }
    }

    /// Check that the rectangle is non-degenerate.
    pub fn validate(&self) -> Result<()> {
        let bounds = [self.x1, self.x2, self.y1, self.y2];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(Error::InvalidDomain(format!(
                "bounds must be finite, got ({}, {}, {}, {})",
                self.x1, self.x2, self.y1, self.y2
            )));
        }
        if self.width() <= 0.0 {
            return Err(Error::InvalidDomain(format!(
                "width must be positive (x1 = {}, x2 = {})",
                self.x1, self.x2
            )));
        }
        if self.height() <= 0.0 {
            return Err(Error::InvalidDomain(format!(
                "height must be positive (y1 = {}, y2 = {})",
                self.y1, self.y2
            )));
        }
        Ok(())
    }

    /// Extent along x.
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Extent along y.
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Whether `p` lies inside the closed rectangle.
    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.x1 && p.x <= self.x2 && p.y >= self.y1 && p.y <= self.y2
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::unit_square()
    }
}
