//! PhaseFEM Core - numerical kernels for a teaching visualizer
//!
//! Two independent pipelines:
//! - Finite elements: uniform triangular mesh of a rectangle, parallel
//!   assembly of `-∇·(κ∇u) + c u = f` with Dirichlet data, sparse Cholesky
//!   solve
//! - Phase plane: named planar ODE families integrated with fixed-step RK4
//!
//! Both feed a fixed-precision text encoder consumed by plotting front ends.
//!
//! # Architecture
//!
//! - [`Mesh`]: node coordinates, triangle connectivity, boundary flags
//! - [`Element`] trait: local stiffness and load of a linear triangle
//! - [`assembly::assemble`]: global [`LinearSystem`] with constraints applied
//! - [`Solver`] trait: dense and sparse Cholesky strategies
//! - [`FemSolver`]: mesh, assemble, solve in one call
//! - [`ode::OdeSystem`] trait, [`ode::Rk4Integrator`], [`ode::compute`]
//! - [`ResultEncoder`]: `[v0,v1,...]` text arrays

pub mod types;
pub mod element;
pub mod mesh;
pub mod coefficients;
pub mod field;
pub mod sparse;
pub mod assembly;
pub mod solver;
pub mod fem;
pub mod ode;
pub mod encode;
pub mod config;
pub mod error;

pub use types::{Domain, Point2};
pub use element::{Element, Tri3};
pub use mesh::{build_mesh, Mesh};
pub use coefficients::Coefficients;
pub use field::{Constant, ScalarField};
pub use sparse::CsrMatrix;
pub use assembly::{assemble, AssemblyOptions, LinearSystem};
pub use solver::{solve_system, Solver, SolverConfig, SolverType};
pub use fem::{solve_fem, EncodedField, FemSolution, FemSolver};
pub use encode::{encode, encode_table, ResultEncoder};
pub use config::{FemConfig, PhasePlaneConfig};
pub use error::{Error, Result};
