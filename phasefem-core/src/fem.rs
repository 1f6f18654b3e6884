//! FEM facade: mesh, assemble, solve.
//!
//! Each call builds its own mesh and linear system and returns them with the
//! nodal solution. Nothing is cached between calls.

use crate::assembly::assemble;
use crate::config::FemConfig;
use crate::encode::ResultEncoder;
use crate::error::Result;
use crate::field::ScalarField;
use crate::mesh::{build_mesh, Mesh};
use crate::solver::{solve_system, SolveStats};
use crate::types::Domain;
use std::time::Instant;

/// Nodal solution on the mesh that produced it.
#[derive(Debug, Clone)]
pub struct FemSolution {
    mesh: Mesh,
    solution: Vec<f64>,
    stats: SolveStats,
    precision: usize,
}

/// Text arrays for the plotting front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedField {
    /// Node x coordinates.
    pub x: String,
    /// Node y coordinates.
    pub y: String,
    /// Solution values.
    pub u: String,
}

impl FemSolution {
    /// The mesh, nodes in row-major lattice order.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// One value per mesh node.
    pub fn solution(&self) -> &[f64] {
        &self.solution
    }

    /// Solver diagnostics.
    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }

    /// Solution at a node.
    pub fn value_at(&self, node: usize) -> Option<f64> {
        self.solution.get(node).copied()
    }

    /// x coordinate column of the node table.
    pub fn x(&self) -> Vec<f64> {
        self.mesh.x_coords()
    }

    /// y coordinate column of the node table.
    pub fn y(&self) -> Vec<f64> {
        self.mesh.y_coords()
    }

    /// Encode coordinates and solution as fixed-precision arrays.
    pub fn encode(&self) -> Result<EncodedField> {
        let encoder = ResultEncoder::with_precision(self.precision);
        Ok(EncodedField {
            x: encoder.encode(&self.x())?,
            y: encoder.encode(&self.y())?,
            u: encoder.encode(&self.solution)?,
        })
    }

    /// Split into mesh and solution.
    pub fn into_parts(self) -> (Mesh, Vec<f64>) {
        (self.mesh, self.solution)
    }
}

/// Solver for `-∇·(κ∇u) + c u = f` on a rectangle with Dirichlet data on the
/// whole perimeter.
#[derive(Debug, Clone, Default)]
pub struct FemSolver {
    config: FemConfig,
}

impl FemSolver {
    pub fn new(config: FemConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FemConfig {
        &self.config
    }

    /// Solve with an explicit mesh spacing.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDomain`](crate::Error::InvalidDomain) for a
    ///   degenerate domain or spacing
    /// - [`Error::NonFiniteResult`](crate::Error::NonFiniteResult) if the
    ///   source or boundary function returns NaN/∞
    /// - [`Error::SingularSystem`](crate::Error::SingularSystem) if the
    ///   factorization fails
    pub fn solve<S, G>(&self, domain: &Domain, h: f64, source: &S, boundary: &G) -> Result<FemSolution>
    where
        S: ScalarField,
        G: ScalarField,
    {
        let start = Instant::now();

        let mesh = build_mesh(domain, h)?;
        let system = assemble(
            &mesh,
            &self.config.coefficients,
            source,
            boundary,
            &self.config.assembly,
        )?;
        let (solution, stats) = solve_system(&system, &self.config.solver)?;

        log::info!(
            "FEM solve: {} nodes, {} elements, {} in {:.6} s (elapsed {:.6} s, residual {:.2e})",
            mesh.n_nodes(),
            mesh.n_elements(),
            stats.solver,
            stats.time_seconds,
            start.elapsed().as_secs_f64(),
            stats.residual
        );

        Ok(FemSolution {
            mesh,
            solution,
            stats,
            precision: self.config.precision,
        })
    }

    /// Solve with the configured default spacing.
    pub fn solve_default<S, G>(&self, domain: &Domain, source: &S, boundary: &G) -> Result<FemSolution>
    where
        S: ScalarField,
        G: ScalarField,
    {
        self.solve(domain, self.config.spacing, source, boundary)
    }
}

/// Solve with default configuration.
///
/// ```
/// use phasefem_core::fem::solve_fem;
/// use phasefem_core::field::{Constant, ZERO};
/// use phasefem_core::types::Domain;
///
/// let result = solve_fem(&Domain::unit_square(), 0.25, &ZERO, &Constant(2.0)).unwrap();
/// assert!(result.solution().iter().all(|u| (u - 2.0).abs() < 1e-12));
/// ```
pub fn solve_fem<S, G>(domain: &Domain, h: f64, source: &S, boundary: &G) -> Result<FemSolution>
where
    S: ScalarField,
    G: ScalarField,
{
    FemSolver::default().solve(domain, h, source, boundary)
}
