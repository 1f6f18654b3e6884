//! Element trait and implementations.
//!
//! The Element trait defines the interface for finite elements, enabling
//! the assembly process to work with any element type uniformly.
//!
//! # Submodules
//!
//! - [`gauss`] - Quadrature rules on the reference triangle
//! - [`tri3`] - Linear (P1) triangle

use crate::coefficients::Coefficients;
use crate::error::Result;
use crate::field::ScalarField;
use crate::types::Point2;
use nalgebra::{DMatrix, DVector};

pub mod gauss;
pub mod tri3;

pub use gauss::{gauss_tri, GaussPoint};
pub use tri3::Tri3;

/// Finite element interface.
///
/// All element types implement this trait, providing:
/// - Element stiffness matrix computation
/// - Element load vector computation
///
/// Elements must be thread-safe (Send + Sync) to enable parallel assembly.
pub trait Element: Send + Sync {
    /// Number of nodes in this element.
    fn n_nodes(&self) -> usize;

    /// Compute the element matrix of the bilinear form.
    ///
    /// # Arguments
    ///
    /// * `coords` - Nodal coordinates, length `n_nodes`
    /// * `coefficients` - Operator coefficients
    ///
    /// # Returns
    ///
    /// Dense symmetric matrix of shape (n_nodes, n_nodes)
    fn stiffness(&self, coords: &[Point2], coefficients: &Coefficients) -> Result<DMatrix<f64>>;

    /// Compute the element load vector `∫ f φ_i`.
    fn load(&self, coords: &[Point2], source: &dyn ScalarField) -> Result<DVector<f64>>;

    /// Compute element area.
    fn area(&self, coords: &[Point2]) -> f64;
}
