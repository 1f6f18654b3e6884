//! Quadrature rules on the reference triangle.
//!
//! Points are given in barycentric coordinates `(L1, L2, L3)`; weights are
//! normalized to sum to 1, so a physical integral is `area * Σ w f(x(L))`.
//!
//! # Usage
//!
//! ```
//! use phasefem_core::element::gauss::gauss_tri;
//!
//! // 3-point rule, exact for quadratics
//! let area = 0.5;
//! let integral: f64 = gauss_tri(3).iter().map(|gp| area * gp.weight * 1.0).sum();
//! assert!((integral - 0.5).abs() < 1e-14);
//! ```

/// A quadrature point with barycentric coordinates and weight.
#[derive(Debug, Clone, Copy)]
pub struct GaussPoint {
    /// Barycentric coordinates (L1, L2, L3), summing to 1.
    pub coords: [f64; 3],
    /// Integration weight (fraction of the element area).
    pub weight: f64,
}

impl GaussPoint {
    /// Create a new quadrature point.
    pub fn new(coords: [f64; 3], weight: f64) -> Self {
        Self { coords, weight }
    }

    /// Map the point onto a physical triangle.
    #[inline]
    pub fn physical(&self, vertices: &[[f64; 2]; 3]) -> [f64; 2] {
        let [l1, l2, l3] = self.coords;
        [
            l1 * vertices[0][0] + l2 * vertices[1][0] + l3 * vertices[2][0],
            l1 * vertices[0][1] + l2 * vertices[1][1] + l3 * vertices[2][1],
        ]
    }
}

/// Triangle quadrature rule with `n` points.
///
/// # Arguments
///
/// * `n` - Number of points: 1 (centroid, degree 1), 3 (edge midpoints,
///   degree 2) or 4 (degree 3)
///
/// # Panics
///
/// Panics if `n` is not 1, 3, or 4.
pub fn gauss_tri(n: usize) -> Vec<GaussPoint> {
    match n {
        1 => vec![GaussPoint::new([1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0], 1.0)],
        3 => {
            let w = 1.0 / 3.0;
            vec![
                GaussPoint::new([0.5, 0.5, 0.0], w),
                GaussPoint::new([0.0, 0.5, 0.5], w),
                GaussPoint::new([0.5, 0.0, 0.5], w),
            ]
        }
        4 => {
            let w_center = -27.0 / 48.0;
            let w_corner = 25.0 / 48.0;
            vec![
                GaussPoint::new([1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0], w_center),
                GaussPoint::new([0.6, 0.2, 0.2], w_corner),
                GaussPoint::new([0.2, 0.6, 0.2], w_corner),
                GaussPoint::new([0.2, 0.2, 0.6], w_corner),
            ]
        }
        _ => panic!("gauss_tri: n must be 1, 3, or 4, got {}", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const UNIT: [[f64; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];

    fn integrate(n: usize, f: impl Fn(f64, f64) -> f64) -> f64 {
        gauss_tri(n)
            .iter()
            .map(|gp| {
                let [x, y] = gp.physical(&UNIT);
                0.5 * gp.weight * f(x, y)
            })
            .sum()
    }

    #[test]
    fn test_weights_sum_to_one() {
        for &n in &[1, 3, 4] {
            let sum: f64 = gauss_tri(n).iter().map(|gp| gp.weight).sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_barycentric_sum() {
        for &n in &[1, 3, 4] {
            for gp in gauss_tri(n) {
                let sum: f64 = gp.coords.iter().sum();
                assert_relative_eq!(sum, 1.0, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_centroid_rule_integrates_linear() {
        // ∫ x dA over the unit triangle = 1/6
        assert_relative_eq!(integrate(1, |x, _| x), 1.0 / 6.0, epsilon = 1e-14);
    }

    #[test]
    fn test_midpoint_rule_integrates_quadratic() {
        // ∫ x² dA = 1/12, ∫ xy dA = 1/24
        assert_relative_eq!(integrate(3, |x, _| x * x), 1.0 / 12.0, epsilon = 1e-14);
        assert_relative_eq!(integrate(3, |x, y| x * y), 1.0 / 24.0, epsilon = 1e-14);
    }

    #[test]
    fn test_four_point_rule_integrates_cubic() {
        // ∫ x³ dA = 1/20
        assert_relative_eq!(integrate(4, |x, _| x.powi(3)), 1.0 / 20.0, epsilon = 1e-14);
    }

    #[test]
    #[should_panic(expected = "gauss_tri")]
    fn test_unsupported_rule_panics() {
        gauss_tri(2);
    }
}
