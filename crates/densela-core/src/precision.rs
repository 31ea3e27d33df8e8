//! Accuracy diagnostics for reconstructed matrices.
//!
//! Floating-point factorizations only reproduce their input approximately.
//! These helpers summarize the elementwise error as a mean and a maximum
//! absolute deviation, e.g. of `QR` against `A` or of `A·A⁻¹` against the
//! identity.

use crate::error::{LinalgError, Result};
use crate::matrix::Matrix;

/// Mean and maximum absolute elementwise deviation.
///
/// A NaN entry in either input makes both fields NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deviation {
    pub mean: f64,
    pub max: f64,
}

impl Deviation {
    fn from_errors(errors: impl Iterator<Item = f64>, count: usize) -> Self {
        // `f64::max` drops NaN, so it is carried through by hand.
        let (sum, max) = errors.fold((0.0, 0.0_f64), |(s, m), e| {
            (s + e, if e.is_nan() || e > m { e } else { m })
        });
        Self {
            mean: sum / count as f64,
            max,
        }
    }

    /// `true` when every entry deviates by less than `tol`.
    ///
    /// Never holds for a NaN or infinite deviation.
    pub fn within(&self, tol: f64) -> bool {
        self.max < tol
    }
}

/// Deviation of `matrix` from the identity of the same shape.
///
/// Non-square matrices are compared against ones on the main diagonal and
/// zeros elsewhere.
///
/// ```
/// # use densela_core::Matrix;
/// # use densela_core::precision::identity_deviation;
/// let m = Matrix::from_rows(&[&[1.0, 0.1], &[0.0, 0.9]]).unwrap();
/// let d = identity_deviation(&m);
/// assert!((d.max - 0.1).abs() < 1e-15);
/// assert!((d.mean - 0.05).abs() < 1e-15);
/// ```
pub fn identity_deviation(matrix: &Matrix) -> Deviation {
    let cols = matrix.cols();
    let errors = matrix.iter().enumerate().map(|(k, &v)| {
        let expected = if k / cols == k % cols { 1.0 } else { 0.0 };
        (v - expected).abs()
    });
    Deviation::from_errors(errors, matrix.len())
}

/// Deviation between two matrices of equal shape.
pub fn pairwise_deviation(matrix1: &Matrix, matrix2: &Matrix) -> Result<Deviation> {
    if matrix1.shape() != matrix2.shape() {
        return Err(LinalgError::ShapeMismatch {
            op: "pairwise_deviation",
            expected: matrix1.shape(),
            got: matrix2.shape(),
        });
    }
    let errors = matrix1.iter().zip(matrix2.iter()).map(|(a, b)| (a - b).abs());
    Ok(Deviation::from_errors(errors, matrix1.len()))
}
