//! Caller-supplied scalar fields.
//!
//! Source terms and Dirichlet data are opaque evaluators over the plane.
//! Any `Fn(f64, f64) -> f64` closure is a field.

/// A pure function of position.
///
/// Implementations must be free of interior mutability; assembly evaluates
/// fields from several threads at once.
pub trait ScalarField: Send + Sync {
    /// Value of the field at `(x, y)`.
    fn value(&self, x: f64, y: f64) -> f64;
}

impl<F> ScalarField for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    #[inline]
    fn value(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// Field with the same value everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub f64);

impl ScalarField for Constant {
    #[inline]
    fn value(&self, _x: f64, _y: f64) -> f64 {
        self.0
    }
}

/// The zero field.
pub const ZERO: Constant = Constant(0.0);
