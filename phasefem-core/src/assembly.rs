//! Parallel finite element assembly.
//!
//! Assembles the global stiffness matrix and load vector from element
//! contributions, using Rayon to compute the element matrices and applying
//! Dirichlet conditions on every perimeter node of the mesh.

use crate::coefficients::Coefficients;
use crate::element::{Element, Tri3};
use crate::error::{Error, Result};
use crate::field::ScalarField;
use crate::mesh::{Mesh, Triangle};
use crate::sparse::{ConstrainedBuilder, CsrMatrix};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Assembled system ready for solving.
#[derive(Debug, Clone)]
pub struct LinearSystem {
    /// Global stiffness matrix with Dirichlet rows and columns eliminated.
    pub matrix: CsrMatrix,
    /// Right-hand side (load) vector.
    pub rhs: Vec<f64>,
    /// Number of DOFs in the system (one per node).
    pub n_dofs: usize,
    /// Constrained node indices and their prescribed values.
    pub constraints: HashMap<usize, f64>,
}

/// Assembly options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyOptions {
    /// Compute element matrices on the Rayon thread pool.
    pub parallel: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// One element's contribution before scattering.
struct ElementContribution {
    nodes: Triangle,
    stiffness: DMatrix<f64>,
    load: DVector<f64>,
}

/// Assemble global stiffness matrix and load vector.
///
/// This is the main entry point for FEM assembly. It:
/// 1. Evaluates the boundary function on every boundary node
/// 2. Computes element stiffness matrices and load vectors in parallel
/// 3. Scatters them in element order, so the result does not depend on
///    thread scheduling
/// 4. Replaces each boundary row by the identity with `rhs = g(node)`
///
/// The boundary columns are eliminated as well (their contribution moves to
/// the right-hand side of the interior rows), which keeps the matrix
/// symmetric for the Cholesky solvers.
///
/// # Arguments
///
/// * `mesh` - Triangle mesh with boundary flags
/// * `coefficients` - Operator coefficients κ and c
/// * `source` - Source term f
/// * `boundary` - Dirichlet data g
/// * `options` - Assembly configuration
///
/// # Example
///
/// ```
/// use phasefem_core::assembly::{assemble, AssemblyOptions};
/// use phasefem_core::coefficients::Coefficients;
/// use phasefem_core::field::{Constant, ZERO};
/// use phasefem_core::mesh::build_mesh;
/// use phasefem_core::types::Domain;
///
/// let mesh = build_mesh(&Domain::unit_square(), 0.25).unwrap();
/// let system = assemble(
///     &mesh,
///     &Coefficients::poisson(),
///     &ZERO,
///     &Constant(1.0),
///     &AssemblyOptions::default(),
/// )
/// .unwrap();
///
/// assert_eq!(system.n_dofs, 25);
/// assert_eq!(system.constraints.len(), 16);
/// ```
pub fn assemble<S, G>(
    mesh: &Mesh,
    coefficients: &Coefficients,
    source: &S,
    boundary: &G,
    options: &AssemblyOptions,
) -> Result<LinearSystem>
where
    S: ScalarField,
    G: ScalarField,
{
    coefficients.validate()?;

    let n_dofs = mesh.n_nodes();

    // Prescribed values, indexed by node
    let mut prescribed: Vec<Option<f64>> = vec![None; n_dofs];
    let mut constraints = HashMap::new();
    for node in mesh.boundary_nodes() {
        let p = mesh.nodes()[node];
        let value = boundary.value(p.x, p.y);
        if !value.is_finite() {
            return Err(Error::NonFiniteResult(format!(
                "boundary value is {} at node {} ({}, {})",
                value, node, p.x, p.y
            )));
        }
        prescribed[node] = Some(value);
        constraints.insert(node, value);
    }

    let element = Tri3::new();
    let source: &dyn ScalarField = source;
    let contribution = |elem_idx: usize| -> Result<ElementContribution> {
        let coords = mesh
            .element_coords(elem_idx)
            .ok_or_else(|| Error::Assembly(format!("element {} out of range", elem_idx)))?;
        Ok(ElementContribution {
            nodes: mesh.elements()[elem_idx],
            stiffness: element.stiffness(&coords, coefficients)?,
            load: element.load(&coords, source)?,
        })
    };

    let contributions: Vec<ElementContribution> = if options.parallel {
        (0..mesh.n_elements())
            .into_par_iter()
            .map(contribution)
            .collect::<Result<_>>()?
    } else {
        (0..mesh.n_elements())
            .map(contribution)
            .collect::<Result<_>>()?
    };

    let mut builder = ConstrainedBuilder::new(prescribed);
    for c in &contributions {
        builder.scatter(&c.nodes, &c.stiffness, c.load.as_slice());
    }
    let (matrix, rhs) = builder.finish();

    log::debug!(
        "assembled {} dofs ({} constrained), {} non-zeros",
        n_dofs,
        constraints.len(),
        matrix.nnz()
    );

    Ok(LinearSystem {
        matrix,
        rhs,
        n_dofs,
        constraints,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Constant, ZERO};
    use crate::mesh::build_mesh;
    use crate::types::{Domain, Point2};

    fn assert_symmetric(dense: &DMatrix<f64>) {
        let n = dense.nrows();
        for i in 0..n {
            for j in 0..n {
                assert!(
                    (dense[(i, j)] - dense[(j, i)]).abs() < 1e-12,
                    "Stiffness not symmetric at ({}, {})",
                    i,
                    j
                );
            }
        }
    }

    #[test]
    fn test_assembly_empty_mesh() {
        let mesh = Mesh::new();
        let result = assemble(
            &mesh,
            &Coefficients::poisson(),
            &ZERO,
            &ZERO,
            &AssemblyOptions::default(),
        );
        assert!(result.is_ok());
        assert_eq!(result.unwrap().n_dofs, 0);
    }

    #[test]
    fn test_all_boundary_mesh_is_identity() {
        // One cell: every node is on the perimeter
        let domain = Domain::new(0.0, 1.0, 0.0, 1.0).unwrap();
        let mesh = build_mesh(&domain, 1.0).unwrap();
        let boundary = |x: f64, y: f64| 1.0 + x + 2.0 * y;

        let system = assemble(
            &mesh,
            &Coefficients::poisson(),
            &Constant(5.0),
            &boundary,
            &AssemblyOptions::default(),
        )
        .unwrap();

        let dense = DMatrix::from(&system.matrix);
        assert_eq!(dense, DMatrix::identity(4, 4));
        assert_eq!(system.rhs, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(system.constraints.len(), 4);
    }

    #[test]
    fn test_interior_block_symmetric_positive() {
        let mesh = build_mesh(&Domain::unit_square(), 0.25).unwrap();
        let system = assemble(
            &mesh,
            &Coefficients::poisson(),
            &Constant(1.0),
            &Constant(2.0),
            &AssemblyOptions::default(),
        )
        .unwrap();

        let dense = DMatrix::from(&system.matrix);
        assert_symmetric(&dense);

        for i in 0..system.n_dofs {
            assert!(dense[(i, i)] > 0.0, "Diagonal {} is not positive", i);
        }

        // Dense Cholesky succeeds only for SPD matrices
        assert!(dense.cholesky().is_some());
    }

    #[test]
    fn test_five_point_stencil_on_structured_mesh() {
        // The P1 Laplacian on this triangulation reduces to the 5-point stencil
        let mesh = build_mesh(&Domain::unit_square(), 0.25).unwrap();
        let system = assemble(
            &mesh,
            &Coefficients::poisson(),
            &ZERO,
            &ZERO,
            &AssemblyOptions::default(),
        )
        .unwrap();

        let dense = DMatrix::from(&system.matrix);
        let center = 2 * 5 + 2;
        assert!((dense[(center, center)] - 4.0).abs() < 1e-12);
        for neighbor in [center - 1, center + 1, center - 5, center + 5] {
            assert!((dense[(center, neighbor)] + 1.0).abs() < 1e-12);
        }
        // Diagonal neighbours decouple
        assert!(dense[(center, center + 6)].abs() < 1e-12);
        assert!(dense[(center, center - 6)].abs() < 1e-12);
    }

    #[test]
    fn test_boundary_rows_replaced() {
        let mesh = build_mesh(&Domain::unit_square(), 0.5).unwrap();
        let boundary = |x: f64, y: f64| x - y;
        let system = assemble(
            &mesh,
            &Coefficients::poisson(),
            &ZERO,
            &boundary,
            &AssemblyOptions::default(),
        )
        .unwrap();

        let dense = DMatrix::from(&system.matrix);
        for node in mesh.boundary_nodes() {
            let p: Point2 = mesh.nodes()[node];
            assert_eq!(system.rhs[node], p.x - p.y);
            for j in 0..system.n_dofs {
                let expected = if j == node { 1.0 } else { 0.0 };
                assert_eq!(dense[(node, j)], expected);
                assert_eq!(dense[(j, node)], expected);
            }
        }

        // Centre node picks up the eliminated boundary couplings:
        // rhs = Σ g(neighbour) = (0.5 - 0) + (1 - 0.5) + (0.5 - 1) + (0 - 0.5)
        assert!(system.rhs[4].abs() < 1e-14);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let mesh = build_mesh(&Domain::new(-1.0, 2.0, 0.0, 1.5).unwrap(), 0.1).unwrap();
        let source = |x: f64, y: f64| (x * y).sin();
        let boundary = |x: f64, y: f64| x * x - y;

        let parallel = assemble(
            &mesh,
            &Coefficients::new(2.0, 0.5).unwrap(),
            &source,
            &boundary,
            &AssemblyOptions { parallel: true },
        )
        .unwrap();
        let serial = assemble(
            &mesh,
            &Coefficients::new(2.0, 0.5).unwrap(),
            &source,
            &boundary,
            &AssemblyOptions { parallel: false },
        )
        .unwrap();

        assert_eq!(parallel.rhs, serial.rhs);
        assert_eq!(parallel.matrix.values(), serial.matrix.values());
        assert_eq!(parallel.matrix.col_indices(), serial.matrix.col_indices());
    }

    #[test]
    fn test_non_finite_boundary_rejected() {
        let mesh = build_mesh(&Domain::unit_square(), 0.5).unwrap();
        let boundary = |x: f64, _y: f64| 1.0 / x;
        let result = assemble(
            &mesh,
            &Coefficients::poisson(),
            &ZERO,
            &boundary,
            &AssemblyOptions::default(),
        );
        assert!(matches!(result, Err(Error::NonFiniteResult(_))));
    }

    #[test]
    fn test_invalid_coefficients_rejected() {
        let mesh = build_mesh(&Domain::unit_square(), 0.5).unwrap();
        let bad = Coefficients {
            diffusion: -1.0,
            reaction: 0.0,
        };
        let result = assemble(&mesh, &bad, &ZERO, &ZERO, &AssemblyOptions::default());
        assert!(matches!(result, Err(Error::InvalidCoefficient(_))));
    }
}
