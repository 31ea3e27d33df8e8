//! Linear algebra operations.
//!
//! Everything works on dense [`Matrix`] values and writes results into
//! caller-supplied outputs, so repeated calls do not allocate:
//!
//! | Module          | Operations                                              |
//! |-----------------|---------------------------------------------------------|
//! | [`blas`]        | `dot`, `norm`, `outer`, `project_accumulate`, `multiply` |
//! | [`decomp`]      | Gram-Schmidt and Householder QR, LU, PLU                |
//! | [`elimination`] | Gaussian, Gauss-Jordan, back/forward substitution       |
//! | [`estimation`]  | least squares, linear regression                        |
//!
//! [`solve`] and [`inverse`] are allocating conveniences on top of these.

pub mod blas;
pub mod decomp;
pub mod elimination;
pub mod estimation;

pub use blas::{
    Orientation, dot, multiply, outer, project_accumulate, simple_multiply, simple_project,
};
pub use decomp::{
    HouseholderScratch, gram_schmidt_qr, gram_schmidt_qr_with, householder_qr,
    householder_qr_with, lu, lu_with, plu, plu_with,
};
pub use elimination::{
    back_substitution, forward_substitution, gauss_jordan, gauss_jordan_with,
    gaussian_elimination, gaussian_elimination_with,
};
pub use estimation::{least_squares, least_squares_with, linear_regression, linear_regression_with};

use crate::PIVOT_TOLERANCE;
use crate::error::{LinalgError, Result};
use crate::matrix::Matrix;

/// Solve the square system `Ax = b` for a single column `b`.
///
/// Uses PLU decomposition followed by forward and back substitution.
///
/// ```
/// # use densela_core::Matrix;
/// # use densela_core::linalg;
/// let a = Matrix::from_rows(&[&[2.0, 1.0], &[1.0, 4.0]]).unwrap();
/// let b = Matrix::from_rows(&[&[5.0], &[6.0]]).unwrap();
/// let x = linalg::solve(&a, &b).unwrap();
/// assert!((x[(0, 0)] - 2.0).abs() < 1e-10);
/// assert!((x[(1, 0)] - 1.0).abs() < 1e-10);
/// ```
pub fn solve(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let n = decomp::lu::check_square(a)?;
    b.expect_shape("solve", n, 1)?;

    let (mut p, mut l, mut u) = (Matrix::zeros(n, n), Matrix::zeros(n, n), Matrix::zeros(n, n));
    plu(a, &mut p, &mut l, &mut u)?;

    let pb = p.matmul(b)?;
    let mut y = Matrix::zeros(n, 1);
    forward_substitution(&l, &pb, &mut y)?;
    let mut x = Matrix::zeros(n, 1);
    back_substitution(&u, &y, &mut x)?;
    Ok(x)
}

/// Inverse of a square matrix by Gauss-Jordan elimination on `[A | I]`.
///
/// Returns [`LinalgError::SingularSystem`] if `a` is singular.
///
/// ```
/// # use densela_core::Matrix;
/// # use densela_core::linalg;
/// let a = Matrix::from_rows(&[&[4.0, 7.0], &[2.0, 6.0]]).unwrap();
/// let inv = linalg::inverse(&a).unwrap();
/// let eye = a.matmul(&inv).unwrap();
/// assert!((eye[(0, 0)] - 1.0).abs() < 1e-12);
/// assert!(eye[(0, 1)].abs() < 1e-12);
/// ```
pub fn inverse(a: &Matrix) -> Result<Matrix> {
    let n = decomp::lu::check_square(a)?;
    let mut reduced = Matrix::zeros(n, n);
    let mut inv = Matrix::zeros(n, n);
    gauss_jordan(a, &Matrix::identity(n), &mut reduced, &mut inv)?;

    // a skipped pivot leaves a non-unit diagonal behind
    for i in 0..n {
        let pivot = reduced[(i, i)];
        if (pivot - 1.0).abs() >= PIVOT_TOLERANCE {
            return Err(LinalgError::SingularSystem {
                row: i,
                col: i,
                pivot,
                residual: inv.row(i)?.iter().fold(0.0, |acc: f64, v| acc.max(v.abs())),
            });
        }
    }
    Ok(inv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precision::identity_deviation;
    use approx::assert_relative_eq;

    #[test]
    fn test_solve_3x3() {
        let a = Matrix::from_rows(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 10.0]]).unwrap();
        let b = Matrix::from_rows(&[&[14.0], &[32.0], &[53.0]]).unwrap();
        let x = solve(&a, &b).unwrap();
        // x = (1, 2, 3)
        for (i, expected) in [1.0, 2.0, 3.0].into_iter().enumerate() {
            assert_relative_eq!(x[(i, 0)], expected, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_solve_needs_pivoting() {
        let a = Matrix::from_rows(&[&[0.0, 1.0], &[1.0, 0.0]]).unwrap();
        let b = Matrix::from_rows(&[&[3.0], &[4.0]]).unwrap();
        let x = solve(&a, &b).unwrap();
        assert_relative_eq!(x[(0, 0)], 4.0);
        assert_relative_eq!(x[(1, 0)], 3.0);
    }

    #[test]
    fn test_solve_inconsistent() {
        let a = Matrix::from_rows(&[&[1.0, 2.0], &[2.0, 4.0]]).unwrap();
        let b = Matrix::from_rows(&[&[1.0], &[3.0]]).unwrap();
        assert!(matches!(
            solve(&a, &b),
            Err(LinalgError::SingularSystem { .. })
        ));
    }

    #[test]
    fn test_solve_shapes() {
        let a = Matrix::identity(2);
        assert!(solve(&a, &Matrix::zeros(3, 1)).is_err());
        assert!(solve(&Matrix::zeros(2, 3), &Matrix::zeros(2, 1)).is_err());
    }

    #[test]
    fn test_inverse_reconstructs_identity() {
        let a = Matrix::from_rows(&[
            &[4.0, 12.0, -16.0],
            &[12.0, 37.0, -43.0],
            &[-16.0, -43.0, 98.0],
        ])
        .unwrap();
        let inv = inverse(&a).unwrap();
        assert!(identity_deviation(&a.matmul(&inv).unwrap()).within(1e-9));
        assert!(identity_deviation(&inv.matmul(&a).unwrap()).within(1e-9));
    }

    #[test]
    fn test_inverse_singular() {
        let a = Matrix::from_rows(&[&[1.0, 2.0], &[2.0, 4.0]]).unwrap();
        assert!(matches!(
            inverse(&a),
            Err(LinalgError::SingularSystem { .. })
        ));
    }

    #[test]
    fn test_inverse_non_square() {
        assert!(matches!(
            inverse(&Matrix::zeros(2, 3)),
            Err(LinalgError::InvalidShape { .. })
        ));
    }
}
