//! Phase-plane portraits of named planar systems.
//!
//! A [`PhasePlaneRequest`] names a family, its parameters and the integration
//! settings. [`compute`] resolves the family, runs RK4 and returns the
//! trajectory, which encodes to the `x`/`y` arrays the plotting front end
//! draws.

use crate::config::PhasePlaneConfig;
use crate::encode::ResultEncoder;
use crate::error::{Error, Result};
use crate::ode::registry::{resolve, SystemFamily};
use crate::ode::rk4::Rk4Integrator;
use crate::ode::trajectory::Trajectory;
use nalgebra::DMatrix;
use rand::Rng;
use std::time::Instant;

/// Length of the packed request layout
/// `[step, A, B, C, D, total_time, x0, y0]`.
pub const PACKED_LEN: usize = 8;

/// Everything needed to draw one portrait.
#[derive(Debug, Clone, PartialEq)]
pub struct PhasePlaneRequest {
    /// Family name, see [`SystemFamily::from_name`].
    pub name: String,
    /// Positional parameters `(A, B, C, D, ...)`.
    pub params: Vec<f64>,
    pub step_size: f64,
    pub total_time: f64,
    /// ω for periodically forced families.
    pub driving_frequency: f64,
    /// Starting point `(x0, y0)`.
    pub initial: [f64; 2],
    /// Decimals used by [`PhasePortrait::encode`].
    pub precision: usize,
}

impl PhasePlaneRequest {
    /// Request with default step size, total time, ω and precision.
    pub fn new(name: impl Into<String>, params: Vec<f64>, initial: [f64; 2]) -> Self {
        let defaults = PhasePlaneConfig::default();
        Self {
            name: name.into(),
            params,
            step_size: defaults.step_size,
            total_time: defaults.total_time,
            driving_frequency: defaults.driving_frequency,
            initial,
            precision: defaults.precision,
        }
    }

    /// The forced Duffing oscillator shown on start-up.
    pub fn duffing_default() -> Self {
        Self {
            total_time: 20.0,
            ..Self::new("Duffing", vec![0.8, 1.0, 0.3, -1.0], [0.7, 0.6])
        }
    }

    /// Request starting from a random point.
    ///
    /// Each coordinate is uniform on `[0, 1)` plus the family's
    /// [`initial_offset`](SystemFamily::initial_offset).
    pub fn with_random_initial<R: Rng + ?Sized>(
        name: impl Into<String>,
        params: Vec<f64>,
        rng: &mut R,
    ) -> Self {
        let name = name.into();
        let offset = SystemFamily::from_name(&name).initial_offset();
        let initial = [offset + rng.gen::<f64>(), offset + rng.gen::<f64>()];
        Self::new(name, params, initial)
    }

    /// Override step size, total time, ω and precision from a configuration.
    pub fn with_config(mut self, config: &PhasePlaneConfig) -> Self {
        self.step_size = config.step_size;
        self.total_time = config.total_time;
        self.driving_frequency = config.driving_frequency;
        self.precision = config.precision;
        self
    }

    /// Parse the packed layout `[step, A, B, C, D, total_time, x0, y0]`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIntegration`] if `packed` does not hold exactly
    /// [`PACKED_LEN`] values.
    pub fn from_packed(name: impl Into<String>, packed: &[f64]) -> Result<Self> {
        if packed.len() != PACKED_LEN {
            return Err(Error::InvalidIntegration(format!(
                "packed request needs {} values, got {}",
                PACKED_LEN,
                packed.len()
            )));
        }
        let mut request = Self::new(name, packed[1..5].to_vec(), [packed[6], packed[7]]);
        request.step_size = packed[0];
        request.total_time = packed[5];
        Ok(request)
    }

    /// Packed layout. Missing parameters are written as zero and parameters
    /// past D are dropped.
    pub fn to_packed(&self) -> [f64; PACKED_LEN] {
        let param = |i: usize| self.params.get(i).copied().unwrap_or(0.0);
        [
            self.step_size,
            param(0),
            param(1),
            param(2),
            param(3),
            self.total_time,
            self.initial[0],
            self.initial[1],
        ]
    }
}

impl Default for PhasePlaneRequest {
    fn default() -> Self {
        Self::duffing_default()
    }
}

/// Computed trajectory of a request.
#[derive(Debug, Clone, PartialEq)]
pub struct PhasePortrait {
    pub trajectory: Trajectory,
    pub family: SystemFamily,
    /// Decimals used by [`encode`](Self::encode).
    pub precision: usize,
}

/// Encoded phase coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPortrait {
    pub x: String,
    pub y: String,
}

impl PhasePortrait {
    pub fn x(&self) -> Vec<f64> {
        self.trajectory.column(0)
    }

    pub fn y(&self) -> Vec<f64> {
        self.trajectory.column(1)
    }

    /// Rows × 3 table `[x, y, t]`.
    pub fn table(&self) -> DMatrix<f64> {
        self.trajectory.to_table()
    }

    /// Encode both phase coordinates with the request's precision.
    pub fn encode(&self) -> Result<EncodedPortrait> {
        self.encode_with(&ResultEncoder::with_precision(self.precision))
    }

    /// Encode both phase coordinates with a given encoder.
    ///
    /// # Errors
    ///
    /// [`Error::NonFiniteResult`] if the trajectory diverged.
    pub fn encode_with(&self, encoder: &ResultEncoder) -> Result<EncodedPortrait> {
        Ok(EncodedPortrait {
            x: encoder.encode(&self.x())?,
            y: encoder.encode(&self.y())?,
        })
    }
}

/// Resolve the request's system and integrate it from `t = 0`.
///
/// # Errors
///
/// - [`Error::UnknownSystem`] if the family needs more parameters
/// - [`Error::InvalidIntegration`] for a bad step size or total time
///
/// A diverging trajectory is not an error here; it is logged and left for
/// the encoder to reject.
pub fn compute(request: &PhasePlaneRequest) -> Result<PhasePortrait> {
    let start = Instant::now();

    let system = resolve(&request.name, &request.params, request.driving_frequency)?;
    let trajectory = Rk4Integrator::new().integrate(
        &system,
        0.0,
        &request.initial,
        request.step_size,
        request.total_time,
    )?;

    if let Some((k, j)) = trajectory.first_non_finite() {
        log::warn!(
            "{} trajectory is non-finite from step {} (component {})",
            system.family().name(),
            k + 1,
            j
        );
    }

    log::info!(
        "{} portrait: {} steps of {} in {:.6} s",
        system.family().name(),
        trajectory.len(),
        request.step_size,
        start.elapsed().as_secs_f64()
    );

    Ok(PhasePortrait {
        trajectory,
        family: system.family(),
        precision: request.precision,
    })
}
