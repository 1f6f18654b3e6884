//! Planar ODE systems and their phase-plane trajectories.
//!
//! - [`system`]: the [`OdeSystem`] trait and a closure adapter
//! - [`registry`]: named families with parameter mapping
//! - [`rk4`]: fixed-step classical Runge-Kutta
//! - [`trajectory`]: sampled solution storage
//! - [`phase_plane`]: request/compute/encode facade

pub mod phase_plane;
pub mod registry;
pub mod rk4;
pub mod system;
pub mod trajectory;

pub use phase_plane::{compute, EncodedPortrait, PhasePlaneRequest, PhasePortrait};
pub use registry::{resolve, PlanarSystem, SystemFamily};
pub use rk4::Rk4Integrator;
pub use system::{FnSystem, OdeSystem};
pub use trajectory::Trajectory;
