//! Right-hand sides of first-order systems `x' = F(t, x)`.

/// A first-order ODE system.
pub trait OdeSystem: Send + Sync {
    /// Number of state components.
    fn dimension(&self) -> usize;

    /// Write `F(t, state)` into `out`.
    ///
    /// Both slices have length [`dimension`](Self::dimension).
    fn derivative(&self, t: f64, state: &[f64], out: &mut [f64]);
}

/// Adapts a closure `(t, state, out)` into an [`OdeSystem`].
///
/// ```
/// use phasefem_core::ode::{FnSystem, OdeSystem};
///
/// let decay = FnSystem::new(1, |_t, x: &[f64], out: &mut [f64]| out[0] = -x[0]);
/// let mut dx = [0.0];
/// decay.derivative(0.0, &[2.0], &mut dx);
/// assert_eq!(dx[0], -2.0);
/// ```
pub struct FnSystem<F> {
    dimension: usize,
    f: F,
}

impl<F> FnSystem<F>
where
    F: Fn(f64, &[f64], &mut [f64]) + Send + Sync,
{
    pub fn new(dimension: usize, f: F) -> Self {
        Self { dimension, f }
    }
}

impl<F> OdeSystem for FnSystem<F>
where
    F: Fn(f64, &[f64], &mut [f64]) + Send + Sync,
{
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn derivative(&self, t: f64, state: &[f64], out: &mut [f64]) {
        (self.f)(t, state, out)
    }
}

impl<F> std::fmt::Debug for FnSystem<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSystem")
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}
