//! Sampled ODE solutions.

use nalgebra::DMatrix;

/// States sampled after each integration step.
///
/// Row `k` of [`states`](Self::states) is the state at `times[k]`. The
/// starting state is kept separately and is not a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    states: DMatrix<f64>,
    initial: Vec<f64>,
}

impl Trajectory {
    pub(crate) fn new(times: Vec<f64>, states: DMatrix<f64>, initial: Vec<f64>) -> Self {
        debug_assert_eq!(times.len(), states.nrows());
        debug_assert_eq!(initial.len(), states.ncols());
        Self {
            times,
            states,
            initial,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// State dimension.
    pub fn dimension(&self) -> usize {
        self.states.ncols()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Samples × dimension matrix.
    pub fn states(&self) -> &DMatrix<f64> {
        &self.states
    }

    pub fn initial(&self) -> &[f64] {
        &self.initial
    }

    /// Component `j` over all samples.
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.states.column(j).iter().copied().collect()
    }

    /// State at sample `k`.
    pub fn state(&self, k: usize) -> Option<Vec<f64>> {
        (k < self.len()).then(|| self.states.row(k).iter().copied().collect())
    }

    /// Last sample, or the initial state if there are none.
    pub fn final_state(&self) -> Vec<f64> {
        match self.len() {
            0 => self.initial.clone(),
            n => self.states.row(n - 1).iter().copied().collect(),
        }
    }

    /// Samples × (dimension + 1) table: state components, then time.
    pub fn to_table(&self) -> DMatrix<f64> {
        let dim = self.dimension();
        let mut table = DMatrix::zeros(self.len(), dim + 1);
        table.columns_mut(0, dim).copy_from(&self.states);
        for (k, &t) in self.times.iter().enumerate() {
            table[(k, dim)] = t;
        }
        table
    }

    /// First index holding NaN or ±∞, as (sample, component).
    pub fn first_non_finite(&self) -> Option<(usize, usize)> {
        (0..self.len()).find_map(|k| {
            self.states
                .row(k)
                .iter()
                .position(|v| !v.is_finite())
                .map(|j| (k, j))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trajectory {
        Trajectory::new(
            vec![0.5, 1.0],
            DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]),
            vec![0.0, 0.0],
        )
    }

    #[test]
    fn test_columns_and_states() {
        let traj = sample();
        assert_eq!(traj.len(), 2);
        assert_eq!(traj.column(0), vec![1.0, 3.0]);
        assert_eq!(traj.column(1), vec![2.0, 4.0]);
        assert_eq!(traj.state(1), Some(vec![3.0, 4.0]));
        assert_eq!(traj.state(2), None);
        assert_eq!(traj.final_state(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_table_layout() {
        let table = sample().to_table();
        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table.row(0).iter().copied().collect::<Vec<_>>(), vec![1.0, 2.0, 0.5]);
        assert_eq!(table.row(1).iter().copied().collect::<Vec<_>>(), vec![3.0, 4.0, 1.0]);
    }

    #[test]
    fn test_first_non_finite() {
        assert_eq!(sample().first_non_finite(), None);
        let traj = Trajectory::new(
            vec![1.0, 2.0],
            DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, f64::NAN]),
            vec![0.0, 0.0],
        );
        assert_eq!(traj.first_non_finite(), Some((1, 1)));
    }
}
