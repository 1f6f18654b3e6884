//! Global system storage.
//!
//! Element blocks are scattered into a COO accumulator and compressed to CSR
//! once at the end. Nodes with a prescribed value never get an off-diagonal
//! entry: their column contribution is moved to the right-hand side and their
//! row becomes the identity. The result stays symmetric.

use nalgebra::DMatrix;
use nalgebra_sparse::coo::CooMatrix;
use nalgebra_sparse::csr::CsrMatrix as NalgebraCsr;

/// Compressed Sparse Row matrix.
pub type CsrMatrix = NalgebraCsr<f64>;

/// Accumulates element blocks into a Dirichlet-reduced system.
#[derive(Debug, Clone)]
pub struct ConstrainedBuilder {
    prescribed: Vec<Option<f64>>,
    coo: CooMatrix<f64>,
    rhs: Vec<f64>,
}

impl ConstrainedBuilder {
    /// One entry per unknown; `Some(g)` pins it to `g`.
    pub fn new(prescribed: Vec<Option<f64>>) -> Self {
        let n = prescribed.len();
        Self {
            coo: CooMatrix::new(n, n),
            rhs: vec![0.0; n],
            prescribed,
        }
    }

    pub fn n_dofs(&self) -> usize {
        self.rhs.len()
    }

    /// Entries pushed so far, duplicates counted separately.
    pub fn n_pushed(&self) -> usize {
        self.coo.nnz()
    }

    /// Scatter a local stiffness block and load vector.
    ///
    /// Rows of pinned nodes are skipped. Columns of pinned nodes become
    /// `-k·g` on the right-hand side. Exact zeros are not stored.
    pub fn scatter(&mut self, nodes: &[usize], stiffness: &DMatrix<f64>, load: &[f64]) {
        debug_assert_eq!(stiffness.shape(), (nodes.len(), nodes.len()));
        debug_assert_eq!(load.len(), nodes.len());

        for (a, &i) in nodes.iter().enumerate() {
            if self.prescribed[i].is_some() {
                continue;
            }
            self.rhs[i] += load[a];
            for (b, &j) in nodes.iter().enumerate() {
                let k = stiffness[(a, b)];
                match self.prescribed[j] {
                    Some(g) => self.rhs[i] -= k * g,
                    None if k != 0.0 => self.coo.push(i, j, k),
                    None => {}
                }
            }
        }
    }

    /// Add identity rows for pinned nodes and compress.
    pub fn finish(mut self) -> (CsrMatrix, Vec<f64>) {
        for (node, value) in self.prescribed.iter().enumerate() {
            if let Some(g) = value {
                self.coo.push(node, node, 1.0);
                self.rhs[node] = *g;
            }
        }
        (CsrMatrix::from(&self.coo), self.rhs)
    }
}

/// Dense to CSR, dropping zeros.
pub fn csr_from_dense(dense: &DMatrix<f64>) -> CsrMatrix {
    CsrMatrix::from(dense)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spring() -> DMatrix<f64> {
        DMatrix::from_row_slice(2, 2, &[1.0, -1.0, -1.0, 1.0])
    }

    #[test]
    fn test_overlapping_blocks_are_summed() {
        let mut builder = ConstrainedBuilder::new(vec![None; 3]);
        builder.scatter(&[0, 1], &spring(), &[0.5, 0.5]);
        builder.scatter(&[1, 2], &spring(), &[0.5, 0.5]);
        assert_eq!(builder.n_pushed(), 8);

        let (matrix, rhs) = builder.finish();
        let dense = DMatrix::from(&matrix);
        assert_eq!(
            dense,
            DMatrix::from_row_slice(3, 3, &[1.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 1.0])
        );
        assert_eq!(rhs, vec![0.5, 1.0, 0.5]);
    }

    #[test]
    fn test_pinned_node_moves_to_rhs() {
        let mut builder = ConstrainedBuilder::new(vec![Some(3.0), None, Some(-1.0)]);
        builder.scatter(&[0, 1], &spring(), &[0.0, 0.25]);
        builder.scatter(&[1, 2], &spring(), &[0.25, 0.0]);

        let (matrix, rhs) = builder.finish();
        let dense = DMatrix::from(&matrix);
        assert_eq!(
            dense,
            DMatrix::from_row_slice(3, 3, &[1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 1.0])
        );
        // 0.5 load, +3 from node 0, -1 from node 2
        assert_eq!(rhs, vec![3.0, 2.5, -1.0]);
    }

    #[test]
    fn test_zero_entries_skipped() {
        let mut builder = ConstrainedBuilder::new(vec![None; 2]);
        builder.scatter(&[0, 1], &DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 2.0]), &[0.0, 0.0]);
        let (matrix, _) = builder.finish();
        assert_eq!(matrix.nnz(), 2);
    }

    #[test]
    fn test_empty_builder() {
        let (matrix, rhs) = ConstrainedBuilder::new(Vec::new()).finish();
        assert_eq!(matrix.nrows(), 0);
        assert!(rhs.is_empty());
    }

    #[test]
    fn test_csr_from_dense() {
        let csr = csr_from_dense(&DMatrix::from_row_slice(2, 2, &[4.0, 0.0, 0.0, 1.0]));
        assert_eq!(csr.nnz(), 2);
    }
}
