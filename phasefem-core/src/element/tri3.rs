//! 3-node linear triangle (Tri3 / P1) element.
//!
//! The Tri3 is the simplest 2D scalar element with:
//! - 3 nodes at vertices
//! - 1 DOF per node
//! - Constant gradient within element
//!
//! # Shape Functions
//!
//! With vertices `(x_i, y_i)` and cyclic indices `(i, j, k)`:
//!
//! ```text
//! N_i = (a_i + b_i x + c_i y) / (2A)
//! b_i = y_j - y_k
//! c_i = x_k - x_j
//! ```
//!
//! so the stiffness matrix has the closed form
//! `K_ij = κ (b_i b_j + c_i c_j) / (4A)` and the consistent mass matrix is
//! `M_ij = A (1 + δ_ij) / 12`.

use crate::coefficients::Coefficients;
use crate::element::gauss::gauss_tri;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::field::ScalarField;
use crate::types::Point2;
use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

/// Relative area below which a triangle counts as degenerate.
const DEGENERATE_TOL: f64 = 1e-14;

/// 3-node linear triangle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tri3;

impl Tri3 {
    /// Create a new Tri3 element.
    pub fn new() -> Self {
        Self
    }

    /// Signed area, positive for counter-clockwise vertices.
    pub fn signed_area(coords: &[Point2; 3]) -> f64 {
        let [a, b, c] = coords;
        0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y))
    }

    /// Shape function gradient coefficients `(b, c)` and the area.
    fn gradients(coords: &[Point2; 3]) -> Result<(Vector3<f64>, Vector3<f64>, f64)> {
        let area = Self::signed_area(coords).abs();
        let scale = (0..3)
            .map(|i| (coords[(i + 1) % 3] - coords[i]).norm_squared())
            .fold(0.0, f64::max);
        if !area.is_finite() || area <= DEGENERATE_TOL * scale {
            return Err(Error::Assembly(format!(
                "degenerate triangle {:?}",
                coords.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>()
            )));
        }

        let mut b = Vector3::zeros();
        let mut c = Vector3::zeros();
        for i in 0..3 {
            let j = (i + 1) % 3;
            let k = (i + 2) % 3;
            b[i] = coords[j].y - coords[k].y;
            c[i] = coords[k].x - coords[j].x;
        }
        // Clockwise input flips the sign of b and c together; K is unaffected.
        Ok((b, c, area))
    }

    /// Stiffness matrix `κ ∫ ∇N_i · ∇N_j` plus reaction term `c ∫ N_i N_j`.
    pub fn local_stiffness(coords: &[Point2; 3], coefficients: &Coefficients) -> Result<Matrix3<f64>> {
        let (b, c, area) = Self::gradients(coords)?;

        let scale = coefficients.diffusion / (4.0 * area);
        let mut k = (b * b.transpose() + c * c.transpose()) * scale;

        if coefficients.reaction != 0.0 {
            let m = coefficients.reaction * area / 12.0;
            for i in 0..3 {
                for j in 0..3 {
                    k[(i, j)] += if i == j { 2.0 * m } else { m };
                }
            }
        }

        Ok(k)
    }

    /// Load vector `∫ f N_i` with the 3-point edge-midpoint rule.
    ///
    /// Exact when `f` is linear (the integrand is then quadratic).
    pub fn local_load(coords: &[Point2; 3], source: &dyn ScalarField) -> Result<Vector3<f64>> {
        let area = Self::signed_area(coords).abs();
        let vertices = [
            [coords[0].x, coords[0].y],
            [coords[1].x, coords[1].y],
            [coords[2].x, coords[2].y],
        ];

        let mut f = Vector3::zeros();
        for gp in gauss_tri(3) {
            let [x, y] = gp.physical(&vertices);
            let value = source.value(x, y);
            if !value.is_finite() {
                return Err(Error::NonFiniteResult(format!(
                    "source term is {} at ({}, {})",
                    value, x, y
                )));
            }
            for i in 0..3 {
                // N_i equals the barycentric coordinate L_i
                f[i] += area * gp.weight * value * gp.coords[i];
            }
        }

        Ok(f)
    }

    fn as_triangle(coords: &[Point2]) -> Result<[Point2; 3]> {
        match coords {
            [a, b, c] => Ok([*a, *b, *c]),
            _ => Err(Error::Assembly(format!(
                "Tri3 requires exactly 3 nodal coordinates, got {}",
                coords.len()
            ))),
        }
    }
}

impl Element for Tri3 {
    fn n_nodes(&self) -> usize {
        3
    }

    fn stiffness(&self, coords: &[Point2], coefficients: &Coefficients) -> Result<DMatrix<f64>> {
        let tri = Self::as_triangle(coords)?;
        let k = Self::local_stiffness(&tri, coefficients)?;
        Ok(DMatrix::from_iterator(3, 3, k.iter().copied()))
    }

    fn load(&self, coords: &[Point2], source: &dyn ScalarField) -> Result<DVector<f64>> {
        let tri = Self::as_triangle(coords)?;
        let f = Self::local_load(&tri, source)?;
        Ok(DVector::from_column_slice(f.as_slice()))
    }

    fn area(&self, coords: &[Point2]) -> f64 {
        Self::as_triangle(coords)
            .map(|tri| Self::signed_area(&tri).abs())
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Constant;
    use approx::assert_relative_eq;

    fn unit_right_triangle() -> [Point2; 3] {
        [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_tri3_area() {
        let tri = Tri3::new();
        assert_relative_eq!(tri.area(&unit_right_triangle()), 0.5, epsilon = 1e-14);
    }

    #[test]
    fn test_tri3_stiffness_reference_values() {
        // Standard result for the unit right triangle:
        // K = 1/2 * [[2, -1, -1], [-1, 1, 0], [-1, 0, 1]]
        let k = Tri3::local_stiffness(&unit_right_triangle(), &Coefficients::poisson()).unwrap();
        let expected = Matrix3::new(1.0, -0.5, -0.5, -0.5, 0.5, 0.0, -0.5, 0.0, 0.5);
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(k[(i, j)], expected[(i, j)], epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_tri3_stiffness_symmetric_zero_row_sum() {
        let coords = [
            Point2::new(0.3, -0.2),
            Point2::new(2.1, 0.4),
            Point2::new(0.9, 1.7),
        ];
        let k = Tri3::local_stiffness(&coords, &Coefficients::new(3.0, 0.0).unwrap()).unwrap();

        for i in 0..3 {
            // Constants lie in the kernel of the Laplacian
            let row_sum: f64 = (0..3).map(|j| k[(i, j)]).sum();
            assert_relative_eq!(row_sum, 0.0, epsilon = 1e-12);
            for j in 0..3 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], epsilon = 1e-14);
            }
            assert!(k[(i, i)] > 0.0);
        }
    }

    #[test]
    fn test_tri3_clockwise_matches_counter_clockwise() {
        let ccw = unit_right_triangle();
        let cw = [ccw[0], ccw[2], ccw[1]];
        let k_ccw = Tri3::local_stiffness(&ccw, &Coefficients::poisson()).unwrap();
        let k_cw = Tri3::local_stiffness(&cw, &Coefficients::poisson()).unwrap();
        // Swapping nodes 1 and 2 permutes rows/columns
        assert_relative_eq!(k_cw[(0, 0)], k_ccw[(0, 0)], epsilon = 1e-14);
        assert_relative_eq!(k_cw[(1, 1)], k_ccw[(2, 2)], epsilon = 1e-14);
        assert_relative_eq!(k_cw[(1, 2)], k_ccw[(2, 1)], epsilon = 1e-14);
    }

    #[test]
    fn test_tri3_reaction_term_adds_mass() {
        let coords = unit_right_triangle();
        let poisson = Tri3::local_stiffness(&coords, &Coefficients::poisson()).unwrap();
        let with_reaction = Tri3::local_stiffness(&coords, &Coefficients::new(1.0, 12.0).unwrap()).unwrap();

        // c * A / 12 * (1 + δ_ij) with c = 12, A = 1/2
        assert_relative_eq!(with_reaction[(0, 0)] - poisson[(0, 0)], 1.0, epsilon = 1e-14);
        assert_relative_eq!(with_reaction[(0, 1)] - poisson[(0, 1)], 0.5, epsilon = 1e-14);

        // The mass matrix sums to c * A
        let total: f64 = (with_reaction - poisson).iter().sum();
        assert_relative_eq!(total, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tri3_constant_load() {
        // ∫ f N_i = f * A / 3 for constant f
        let f = Tri3::local_load(&unit_right_triangle(), &Constant(6.0)).unwrap();
        for i in 0..3 {
            assert_relative_eq!(f[i], 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_tri3_linear_load_exact() {
        // ∫ x N_1 over the unit triangle: N_1 = x, ∫ x² dA = 1/12
        let source = |x: f64, _y: f64| x;
        let f = Tri3::local_load(&unit_right_triangle(), &source).unwrap();
        assert_relative_eq!(f[1], 1.0 / 12.0, epsilon = 1e-14);
        // ∫ x dA = 1/6 split among the three nodes
        assert_relative_eq!(f.sum(), 1.0 / 6.0, epsilon = 1e-14);
    }

    #[test]
    fn test_tri3_nan_source_rejected() {
        let source = |_x: f64, _y: f64| f64::NAN;
        let result = Tri3::local_load(&unit_right_triangle(), &source);
        assert!(matches!(result, Err(Error::NonFiniteResult(_))));
    }

    #[test]
    fn test_tri3_degenerate_rejected() {
        let collinear = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
        ];
        let result = Tri3::local_stiffness(&collinear, &Coefficients::poisson());
        assert!(matches!(result, Err(Error::Assembly(_))));
    }

    #[test]
    fn test_tri3_trait_dispatch() {
        let element: &dyn Element = &Tri3::new();
        let coords = unit_right_triangle();
        let k = element.stiffness(&coords, &Coefficients::poisson()).unwrap();
        assert_eq!(k.shape(), (3, 3));
        assert_relative_eq!(k[(0, 0)], 1.0, epsilon = 1e-14);

        let too_few = &coords[..2];
        assert!(element.stiffness(too_few, &Coefficients::poisson()).is_err());
    }
}
