//! Named families of planar systems.
//!
//! A family name and a positional parameter vector `(A, B, C, D, ...)` resolve
//! to a concrete [`PlanarSystem`]. Dispatch is case-sensitive:
//!
//! | Name                  | Family          | Parameters      |
//! |-----------------------|-----------------|-----------------|
//! | contains `"olterr"`   | predator-prey   | A, B, C, D, [K] |
//! | `"Duffing"`           | Duffing         | A, B, C, D      |
//! | `"Van der Pol"`       | Van der Pol     | A, B, C         |
//! | `"Pendulum"`          | pendulum        | A, B, C         |
//! | anything else         | Duffing         | A, B, C, D      |

use crate::error::{Error, Result};
use crate::ode::system::OdeSystem;

/// Supported system families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemFamily {
    /// `x' = A x − B x y` (logistic `A x (1 − x/K)` with a 5th parameter),
    /// `y' = C x y − D y`.
    PredatorPrey,
    /// `x' = y`, `y' = A cos(ωt) − C y − D x − B x³`.
    Duffing,
    /// `x' = y`, `y' = A (1 − x²) y − B x + C cos(ωt)`.
    VanDerPol,
    /// `x' = y`, `y' = A cos(ωt) − C y − B sin(x)`.
    Pendulum,
}

impl SystemFamily {
    /// Family for a display name. Unrecognized names map to Duffing.
    pub fn from_name(name: &str) -> Self {
        if name.contains("olterr") {
            Self::PredatorPrey
        } else {
            match name {
                "Duffing" => Self::Duffing,
                "Van der Pol" => Self::VanDerPol,
                "Pendulum" => Self::Pendulum,
                _ => {
                    log::debug!("no system family named {:?}, using Duffing", name);
                    Self::Duffing
                }
            }
        }
    }

    /// Number of required parameters.
    pub fn arity(&self) -> usize {
        match self {
            Self::PredatorPrey | Self::Duffing => 4,
            Self::VanDerPol | Self::Pendulum => 3,
        }
    }

    /// Offset added to uniform `[0, 1)` draws for random initial conditions.
    ///
    /// Populations start strictly positive.
    pub fn initial_offset(&self) -> f64 {
        match self {
            Self::PredatorPrey => 1.0,
            _ => 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::PredatorPrey => "predator-prey",
            Self::Duffing => "Duffing",
            Self::VanDerPol => "Van der Pol",
            Self::Pendulum => "Pendulum",
        }
    }
}

/// A resolved two-dimensional system.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarSystem {
    family: SystemFamily,
    params: [f64; 4],
    carrying_capacity: Option<f64>,
    omega: f64,
}

impl PlanarSystem {
    pub fn family(&self) -> SystemFamily {
        self.family
    }

    /// `(A, B, C, D)`; unused trailing entries are zero.
    pub fn params(&self) -> [f64; 4] {
        self.params
    }

    pub fn driving_frequency(&self) -> f64 {
        self.omega
    }

    pub fn carrying_capacity(&self) -> Option<f64> {
        self.carrying_capacity
    }

    fn rates(&self, t: f64, x: f64, y: f64) -> (f64, f64) {
        let [a, b, c, d] = self.params;
        match self.family {
            SystemFamily::PredatorPrey => {
                let growth = match self.carrying_capacity {
                    Some(k) => a * x * (1.0 - x / k),
                    None => a * x,
                };
                (growth - b * x * y, c * x * y - d * y)
            }
            SystemFamily::Duffing => (
                y,
                a * (self.omega * t).cos() - c * y - d * x - b * x * x * x,
            ),
            SystemFamily::VanDerPol => (
                y,
                a * (1.0 - x * x) * y - b * x + c * (self.omega * t).cos(),
            ),
            SystemFamily::Pendulum => (y, a * (self.omega * t).cos() - c * y - b * x.sin()),
        }
    }
}

impl OdeSystem for PlanarSystem {
    fn dimension(&self) -> usize {
        2
    }

    fn derivative(&self, t: f64, state: &[f64], out: &mut [f64]) {
        let (dx, dy) = self.rates(t, state[0], state[1]);
        out[0] = dx;
        out[1] = dy;
    }
}

/// Resolve a family name and parameters to a system.
///
/// Extra parameters are ignored, except that a positive 5th predator-prey
/// parameter is taken as the carrying capacity K.
///
/// # Errors
///
/// [`Error::UnknownSystem`] if fewer parameters are given than the resolved
/// family needs.
///
/// ```
/// use phasefem_core::ode::{resolve, SystemFamily};
///
/// let system = resolve("Lotka-Volterra", &[1.0, 0.5, 0.5, 1.0], 1.0).unwrap();
/// assert_eq!(system.family(), SystemFamily::PredatorPrey);
/// ```
pub fn resolve(name: &str, params: &[f64], driving_frequency: f64) -> Result<PlanarSystem> {
    let family = SystemFamily::from_name(name);
    let arity = family.arity();

    if params.len() < arity {
        return Err(Error::UnknownSystem(format!(
            "{:?} resolves to {} which needs {} parameters, got {}",
            name,
            family.name(),
            arity,
            params.len()
        )));
    }

    let mut packed = [0.0; 4];
    packed[..arity].copy_from_slice(&params[..arity]);

    let carrying_capacity = match family {
        SystemFamily::PredatorPrey => params.get(4).copied().filter(|k| *k > 0.0),
        _ => None,
    };

    Ok(PlanarSystem {
        family,
        params: packed,
        carrying_capacity,
        omega: driving_frequency,
    })
}
