//! Kernel configuration.
//!
//! Every field has a default matching the front end's behaviour, and every
//! struct deserializes from partial JSON (missing fields take their defaults).

use crate::assembly::AssemblyOptions;
use crate::coefficients::Coefficients;
use crate::encode::DEFAULT_PRECISION;
use crate::solver::SolverConfig;
use serde::{Deserialize, Serialize};

/// Default mesh spacing.
pub const DEFAULT_SPACING: f64 = 0.125;

/// Default RK4 step size.
pub const DEFAULT_STEP_SIZE: f64 = 0.05;

/// Default phase-plane integration time.
pub const DEFAULT_TOTAL_TIME: f64 = 30.0;

/// Configuration of the FEM facade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FemConfig {
    /// Mesh spacing used when the caller gives none.
    pub spacing: f64,
    /// Operator coefficients.
    pub coefficients: Coefficients,
    /// Assembly options.
    pub assembly: AssemblyOptions,
    /// Linear solver selection.
    pub solver: SolverConfig,
    /// Decimals in encoded output.
    pub precision: usize,
}

impl Default for FemConfig {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            coefficients: Coefficients::default(),
            assembly: AssemblyOptions::default(),
            solver: SolverConfig::default(),
            precision: DEFAULT_PRECISION,
        }
    }
}

/// Configuration of the phase-plane facade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhasePlaneConfig {
    /// RK4 step size.
    pub step_size: f64,
    /// Integration time span.
    pub total_time: f64,
    /// Angular frequency ω of periodic forcing terms.
    pub driving_frequency: f64,
    /// Decimals in encoded output.
    pub precision: usize,
}

impl Default for PhasePlaneConfig {
    fn default() -> Self {
        Self {
            step_size: DEFAULT_STEP_SIZE,
            total_time: DEFAULT_TOTAL_TIME,
            driving_frequency: 1.0,
            precision: DEFAULT_PRECISION,
        }
    }
}
