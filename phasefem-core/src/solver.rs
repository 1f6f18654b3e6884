//! Linear system solvers.
//!
//! Provides direct solvers for the assembled system `K u = f`. After
//! Dirichlet elimination K is symmetric positive definite, so both backends
//! are Cholesky factorizations:
//!
//! - [`FaerCholeskySolver`]: Sparse LLᵀ using the faer library. The default
//!   for anything beyond toy meshes.
//! - [`DenseCholeskySolver`]: nalgebra dense LLᵀ, used for small systems
//!   where the sparse symbolic analysis costs more than it saves.
//!
//! A non-positive pivot means the assembly or boundary treatment produced an
//! indefinite operator. It is reported as [`Error::SingularSystem`] and never
//! retried.

use crate::assembly::LinearSystem;
use crate::error::{Error, Result};
use crate::sparse::CsrMatrix;
use faer::linalg::cholesky::llt::factor::LltError;
use faer::prelude::*;
use faer::sparse::linalg::solvers::{Llt, SymbolicLlt};
use faer::sparse::linalg::LltError as SparseLltError;
use faer::sparse::{SparseColMat, SymbolicSparseColMat};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A backend for `K u = f` with symmetric positive definite K.
///
/// Both backends factor one triangle only, so K must be stored with both
/// triangles and be symmetric.
pub trait Solver: Send + Sync {
    /// Nodal values `u`.
    ///
    /// # Errors
    ///
    /// [`Error::Solver`] for shape mismatches or a non-symmetric K,
    /// [`Error::SingularSystem`] when K is not positive definite.
    fn solve(&self, matrix: &CsrMatrix, rhs: &[f64]) -> Result<Vec<f64>>;

    /// Backend label recorded in [`SolveStats`].
    fn name(&self) -> &str;
}

/// Solver selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverType {
    /// Sparse Cholesky via faer.
    Sparse,
    /// Dense Cholesky via nalgebra.
    Dense,
    /// Dense below `dense_threshold` unknowns, sparse above.
    #[default]
    Auto,
}

/// Backend choice for [`solve_system`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub solver_type: SolverType,
    /// `Auto` uses the dense backend below this many unknowns.
    pub dense_threshold: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            solver_type: SolverType::Auto,
            dense_threshold: 256,
        }
    }
}

/// Solution statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveStats {
    /// Solver name used.
    pub solver: String,
    /// Number of unknowns.
    pub n_dofs: usize,
    /// Max-norm of `K u - f`.
    pub residual: f64,
    /// Wall-clock time in seconds.
    pub time_seconds: f64,
}

fn check_shapes(matrix: &CsrMatrix, rhs: &[f64]) -> Result<()> {
    let (rows, cols) = (matrix.nrows(), matrix.ncols());
    if rows != cols {
        return Err(Error::Solver(format!("{}x{} matrix is not square", rows, cols)));
    }
    if rows != rhs.len() {
        return Err(Error::Solver(format!(
            "{} unknowns but {} right-hand side entries",
            rows,
            rhs.len()
        )));
    }
    Ok(())
}

/// Relative tolerance for `K[i][j] == K[j][i]`.
const SYMMETRY_TOLERANCE: f64 = 1e-12;

fn check_symmetric(matrix: &CsrMatrix) -> Result<()> {
    for (i, j, &v) in matrix.triplet_iter() {
        if i == j {
            continue;
        }
        let mirror = matrix
            .get_entry(j, i)
            .map(|entry| entry.into_value())
            .unwrap_or(0.0);
        if (v - mirror).abs() > SYMMETRY_TOLERANCE * v.abs().max(mirror.abs()).max(1.0) {
            return Err(Error::Solver(format!(
                "matrix is not symmetric: K[{}][{}] = {}, K[{}][{}] = {}",
                i, j, v, j, i, mirror
            )));
        }
    }
    Ok(())
}

/// Dense Cholesky solver using nalgebra.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseCholeskySolver;

impl DenseCholeskySolver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for DenseCholeskySolver {
    fn solve(&self, matrix: &CsrMatrix, rhs: &[f64]) -> Result<Vec<f64>> {
        use nalgebra::{DMatrix, DVector};

        check_shapes(matrix, rhs)?;
        check_symmetric(matrix)?;
        if rhs.is_empty() {
            return Ok(vec![]);
        }

        let dense = DMatrix::from(matrix);
        let b = DVector::from_column_slice(rhs);

        let llt = dense.cholesky().ok_or_else(|| {
            Error::SingularSystem("dense Cholesky found a non-positive pivot".into())
        })?;

        Ok(llt.solve(&b).as_slice().to_vec())
    }

    fn name(&self) -> &str {
        "nalgebra Dense Cholesky (LLᵀ)"
    }
}

/// View a symmetric CSR matrix as faer CSC.
///
/// The CSR arrays of K are the CSC arrays of Kᵀ, and Kᵀ = K, so the index
/// arrays are reused as-is.
fn symmetric_csr_to_faer(csr: &CsrMatrix) -> SparseColMat<usize, f64> {
    let n = csr.nrows();
    let symbolic = SymbolicSparseColMat::new_checked(
        n,
        n,
        csr.row_offsets().to_vec(),
        None,
        csr.col_indices().to_vec(),
    );
    SparseColMat::new(symbolic, csr.values().to_vec())
}

fn map_llt_error(e: SparseLltError) -> Error {
    match e {
        SparseLltError::Generic(err) => Error::Solver(format!("sparse factorization: {:?}", err)),
        SparseLltError::Numeric(LltError::NonPositivePivot { index }) => {
            Error::SingularSystem(format!("non-positive pivot at unknown {}", index))
        }
    }
}

/// faer sparse LLᵀ on the lower triangle.
///
/// Lattice meshes give banded matrices with at most 7 entries per row, so
/// fill-in stays small.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaerCholeskySolver;

impl FaerCholeskySolver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for FaerCholeskySolver {
    fn solve(&self, matrix: &CsrMatrix, rhs: &[f64]) -> Result<Vec<f64>> {
        check_shapes(matrix, rhs)?;
        check_symmetric(matrix)?;
        let n = rhs.len();
        if n == 0 {
            return Ok(vec![]);
        }

        let csc = symmetric_csr_to_faer(matrix);
        let csc_ref = csc.as_ref();

        let symbolic = SymbolicLlt::try_new(csc_ref.symbolic(), faer::Side::Lower)
            .map_err(|e| Error::Solver(format!("symbolic analysis: {:?}", e)))?;

        let llt = Llt::try_new_with_symbolic(symbolic, csc_ref, faer::Side::Lower)
            .map_err(map_llt_error)?;

        let mut x = faer::Mat::from_fn(n, 1, |i, _| rhs[i]);
        llt.solve_in_place(x.as_mut());

        Ok((0..n).map(|i| x[(i, 0)]).collect())
    }

    fn name(&self) -> &str {
        "faer Sparse Cholesky (LLᵀ)"
    }
}

/// Backend for a system of `n_dofs` unknowns.
pub fn select_solver(config: &SolverConfig, n_dofs: usize) -> Box<dyn Solver> {
    match config.solver_type {
        SolverType::Sparse => Box::new(FaerCholeskySolver::new()),
        SolverType::Dense => Box::new(DenseCholeskySolver::new()),
        SolverType::Auto => {
            if n_dofs < config.dense_threshold {
                Box::new(DenseCholeskySolver::new())
            } else {
                Box::new(FaerCholeskySolver::new())
            }
        }
    }
}

/// Max-norm of `A x - b`.
///
/// # Errors
///
/// [`Error::Solver`] if `A` is not square or `x`, `b` do not match its size.
pub fn residual_norm(matrix: &CsrMatrix, x: &[f64], b: &[f64]) -> Result<f64> {
    check_shapes(matrix, b)?;
    if x.len() != b.len() {
        return Err(Error::Solver(format!(
            "{} unknowns but {} solution entries",
            b.len(),
            x.len()
        )));
    }

    let mut ax = vec![0.0; b.len()];
    for (i, j, v) in matrix.triplet_iter() {
        ax[i] += v * x[j];
    }
    Ok(ax
        .iter()
        .zip(b)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max))
}

/// Solve an assembled system with the configured backend.
pub fn solve_system(system: &LinearSystem, config: &SolverConfig) -> Result<(Vec<f64>, SolveStats)> {
    let solver = select_solver(config, system.n_dofs);
    log::debug!("solving {} dofs with {}", system.n_dofs, solver.name());

    let start = Instant::now();
    let solution = solver.solve(&system.matrix, &system.rhs)?;
    let time_seconds = start.elapsed().as_secs_f64();

    let residual = residual_norm(&system.matrix, &solution, &system.rhs)?;

    let stats = SolveStats {
        solver: solver.name().to_string(),
        n_dofs: system.n_dofs,
        residual,
        time_seconds,
    };
    Ok((solution, stats))
}
