//! Error types for phasefem operations.

use thiserror::Error;

/// Result type alias using the phasefem Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the FEM and phase-plane kernels.
///
/// Every variant is terminal for the call that produced it. Inputs are fully
/// caller-controlled, so retrying with the same inputs fails the same way.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Degenerate rectangle or unusable mesh spacing.
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    /// Mesh connectivity errors.
    #[error("mesh error: {0}")]
    Mesh(String),

    /// Assembly errors (degenerate elements, mismatched sizes).
    #[error("assembly error: {0}")]
    Assembly(String),

    /// Invalid PDE coefficients.
    #[error("invalid coefficient: {0}")]
    InvalidCoefficient(String),

    /// Solver errors.
    #[error("solver error: {0}")]
    Solver(String),

    /// Factorization hit a non-positive pivot.
    #[error("singular system: {0}")]
    SingularSystem(String),

    /// The ODE family needs parameters that were not supplied.
    #[error("unknown system: {0}")]
    UnknownSystem(String),

    /// Invalid step size, duration or initial state for integration.
    #[error("invalid integration: {0}")]
    InvalidIntegration(String),

    /// A value is NaN or infinite where a finite number is required.
    #[error("non-finite result: {0}")]
    NonFiniteResult(String),
}
