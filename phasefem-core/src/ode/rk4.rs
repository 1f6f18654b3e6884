//! Classical fourth-order Runge-Kutta with a fixed step.
//!
//! ```text
//! k₁ = F(tₙ, xₙ)
//! k₂ = F(tₙ + d/2, xₙ + d/2·k₁)
//! k₃ = F(tₙ + d/2, xₙ + d/2·k₂)
//! k₄ = F(tₙ + d,   xₙ + d·k₃)
//! xₙ₊₁ = xₙ + d/6·(k₁ + 2k₂ + 2k₃ + k₄)
//! ```
//!
//! The step count is `round(T / d)`. There is no adaptivity and no blow-up
//! detection: diverging states are recorded as they are.

use crate::error::{Error, Result};
use crate::ode::system::OdeSystem;
use crate::ode::trajectory::Trajectory;
use nalgebra::DMatrix;

/// Upper bound on stored state values (samples × dimension), 2 GiB of `f64`.
pub const MAX_STORED_VALUES: usize = 1 << 28;

/// Fixed-step RK4 integrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rk4Integrator;

impl Rk4Integrator {
    pub fn new() -> Self {
        Self
    }

    /// Integrate from `t0` over `total` time units with step `step`.
    ///
    /// Returns the states after each of the `round(total / step)` steps.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIntegration`] if `step` or `total` is not a positive
    /// finite number, if they give zero steps or more samples than
    /// [`MAX_STORED_VALUES`] allows, or if `initial` does not match the system
    /// dimension.
    ///
    /// ```
    /// use phasefem_core::ode::{FnSystem, Rk4Integrator};
    ///
    /// let decay = FnSystem::new(1, |_t, x: &[f64], out: &mut [f64]| out[0] = -x[0]);
    /// let traj = Rk4Integrator::new().integrate(&decay, 0.0, &[1.0], 0.1, 1.0).unwrap();
    /// assert_eq!(traj.len(), 10);
    /// assert!((traj.final_state()[0] - (-1.0f64).exp()).abs() < 1e-6);
    /// ```
    pub fn integrate<S: OdeSystem + ?Sized>(
        &self,
        system: &S,
        t0: f64,
        initial: &[f64],
        step: f64,
        total: f64,
    ) -> Result<Trajectory> {
        let dim = system.dimension();
        let n_steps = validate(dim, t0, initial, step, total)?;

        let mut times = Vec::with_capacity(n_steps);
        let mut states = DMatrix::zeros(n_steps, dim);

        let mut x = initial.to_vec();
        let mut k1 = vec![0.0; dim];
        let mut k2 = vec![0.0; dim];
        let mut k3 = vec![0.0; dim];
        let mut k4 = vec![0.0; dim];
        let mut stage = vec![0.0; dim];

        let half = 0.5 * step;
        let sixth = step / 6.0;

        for n in 0..n_steps {
            // Index-based time avoids drift from repeated addition
            let t = t0 + n as f64 * step;

            system.derivative(t, &x, &mut k1);

            axpy(&mut stage, &x, half, &k1);
            system.derivative(t + half, &stage, &mut k2);

            axpy(&mut stage, &x, half, &k2);
            system.derivative(t + half, &stage, &mut k3);

            axpy(&mut stage, &x, step, &k3);
            system.derivative(t + step, &stage, &mut k4);

            for i in 0..dim {
                x[i] += sixth * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
                states[(n, i)] = x[i];
            }
            times.push(t0 + (n + 1) as f64 * step);
        }

        Ok(Trajectory::new(times, states, initial.to_vec()))
    }
}

/// `out = x + a·k`
fn axpy(out: &mut [f64], x: &[f64], a: f64, k: &[f64]) {
    for ((o, xi), ki) in out.iter_mut().zip(x).zip(k) {
        *o = xi + a * ki;
    }
}

fn validate(dim: usize, t0: f64, initial: &[f64], step: f64, total: f64) -> Result<usize> {
    if !t0.is_finite() {
        return Err(Error::InvalidIntegration(format!(
            "start time must be finite, got {}",
            t0
        )));
    }
    if !step.is_finite() || step <= 0.0 {
        return Err(Error::InvalidIntegration(format!(
            "step size must be positive, got {}",
            step
        )));
    }
    if !total.is_finite() || total <= 0.0 {
        return Err(Error::InvalidIntegration(format!(
            "total time must be positive, got {}",
            total
        )));
    }
    if initial.len() != dim {
        return Err(Error::InvalidIntegration(format!(
            "initial state has {} components, system has {}",
            initial.len(),
            dim
        )));
    }

    let n_steps = (total / step).round();
    if n_steps < 1.0 {
        return Err(Error::InvalidIntegration(format!(
            "total time {} is shorter than half a step of {}",
            total, step
        )));
    }
    let too_many = || {
        Error::InvalidIntegration(format!(
            "{} steps of dimension {} exceed the {} stored values limit",
            n_steps, dim, MAX_STORED_VALUES
        ))
    };
    if n_steps > MAX_STORED_VALUES as f64 {
        return Err(too_many());
    }
    let n_steps = n_steps as usize;
    match n_steps.checked_mul(dim.max(1)) {
        Some(values) if values <= MAX_STORED_VALUES => Ok(n_steps),
        _ => Err(too_many()),
    }
}
