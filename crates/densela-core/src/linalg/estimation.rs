//! Least-squares estimation built on Householder QR.
//!
//! For `A = QR`, the normal equations `AᵗA x = Aᵗb` reduce to
//! `R x = Qᵗb`, which is solved by back substitution without ever forming
//! `AᵗA`.

use tracing::debug;

use crate::error::Result;
use crate::linalg::blas::multiply;
use crate::linalg::decomp::qr::{HouseholderScratch, householder_qr_with};
use crate::linalg::elimination::back_substitution;
use crate::matrix::{Matrix, NoRender, Render};

/// Ordinary least squares: the `x` minimizing `‖Ax - b‖₂`.
///
/// `a` is `n x m` with `n >= m`, `b` is `n x 1` and `x` is `m x 1`.
///
/// ```
/// # use densela_core::Matrix;
/// # use densela_core::linalg::least_squares;
/// // fit y = c0 * t + c1 * t^2
/// let a = Matrix::from_rows(&[&[1.0, 1.0], &[2.0, 4.0], &[3.0, 9.0]]).unwrap();
/// let b = Matrix::from_rows(&[&[3.0], &[10.0], &[21.0]]).unwrap();
/// let mut x = Matrix::zeros(2, 1);
/// least_squares(&a, &b, &mut x).unwrap();
/// assert!((x[(0, 0)] - 1.0).abs() < 1e-10);
/// assert!((x[(1, 0)] - 2.0).abs() < 1e-10);
/// ```
pub fn least_squares(a: &Matrix, b: &Matrix, x: &mut Matrix) -> Result<()> {
    least_squares_with(a, b, x, &mut NoRender)
}

/// [`least_squares`] reporting the factorization steps and `Qᵗb`.
pub fn least_squares_with(
    a: &Matrix,
    b: &Matrix,
    x: &mut Matrix,
    render: &mut dyn Render,
) -> Result<()> {
    let (n, m) = a.shape();
    b.expect_shape("least_squares", n, 1)?;
    x.expect_shape("least_squares", m, 1)?;
    debug!(observations = n, parameters = m, "least squares");

    // one extra square slot for Q and one extra column for Q^T b
    let scratch = HouseholderScratch::with_extra(n, 1, 1)?;
    let mut q = scratch.square.take()?;
    let mut qtb = scratch.column.take()?;
    let mut r = Matrix::zeros(n, m);

    householder_qr_with(a, &mut q, &mut r, &scratch, render)?;
    multiply(&q, true, b, false, &mut qtb, 0.0)?;
    render.render("Q^T b", &qtb);
    back_substitution(&r, &qtb, x)
}

/// Linear regression with an intercept.
///
/// A column of ones is appended to the `n x p` design matrix `a`, so `x`
/// must be `(p + 1) x 1`: the first `p` entries are the slopes and the last
/// is the intercept.
///
/// ```
/// # use densela_core::Matrix;
/// # use densela_core::linalg::linear_regression;
/// let a = Matrix::from_rows(&[&[0.0], &[1.0], &[2.0]]).unwrap();
/// let b = Matrix::from_rows(&[&[1.0], &[3.0], &[5.0]]).unwrap();
/// let mut x = Matrix::zeros(2, 1);
/// linear_regression(&a, &b, &mut x).unwrap();
/// assert!((x[(0, 0)] - 2.0).abs() < 1e-10); // slope
/// assert!((x[(1, 0)] - 1.0).abs() < 1e-10); // intercept
/// ```
pub fn linear_regression(a: &Matrix, b: &Matrix, x: &mut Matrix) -> Result<()> {
    linear_regression_with(a, b, x, &mut NoRender)
}

/// [`linear_regression`] reporting the design matrix and the least-squares
/// steps.
pub fn linear_regression_with(
    a: &Matrix,
    b: &Matrix,
    x: &mut Matrix,
    render: &mut dyn Render,
) -> Result<()> {
    let (n, p) = a.shape();
    let mut design = Matrix::full(n, p + 1, 1.0);
    for j in 0..p {
        a.copy_column(j, &mut design, j)?;
    }
    render.render("design", &design);
    least_squares_with(&design, b, x, render)
}
