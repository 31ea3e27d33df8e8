//! QR decomposition.
//!
//! Two interchangeable algorithms write `A = QR` into caller-supplied output
//! matrices:
//!
//! - [`gram_schmidt_qr`] orthonormalizes the columns of `A` with modified
//!   Gram-Schmidt. `Q` has the shape of `A` and `R` is square. Cheap, but
//!   loses orthogonality when columns are close to linearly dependent.
//! - [`householder_qr`] applies a sequence of Householder reflections. `Q`
//!   is square and `R` has the shape of `A`. Its temporaries come from a
//!   [`HouseholderScratch`], which can be reused across calls.
//!
//! Both require `rows >= cols`.

use tracing::{debug, trace, warn};

use crate::error::{LinalgError, Result};
use crate::linalg::blas::{Orientation, dot, multiply, outer};
use crate::matrix::{Matrix, NoRender, Pattern, Render};
use crate::pool::ScratchPool;

fn check_tall(a: &Matrix) -> Result<(usize, usize)> {
    let (n, m) = a.shape();
    if n < m {
        return Err(LinalgError::InvalidShape {
            rows: n,
            cols: m,
            reason: "QR decomposition requires rows >= cols",
        });
    }
    Ok((n, m))
}

// ======================================================================
// Gram-Schmidt
// ======================================================================

/// QR decomposition by modified Gram-Schmidt.
///
/// `a` is `n x m` with `n >= m`; `q` must be `n x m` and `r` must be `m x m`.
///
/// ```
/// # use densela_core::Matrix;
/// # use densela_core::linalg::decomp::gram_schmidt_qr;
/// let a = Matrix::from_rows(&[&[3.0, 1.0], &[4.0, 2.0]]).unwrap();
/// let mut q = Matrix::zeros(2, 2);
/// let mut r = Matrix::zeros(2, 2);
/// gram_schmidt_qr(&a, &mut q, &mut r).unwrap();
/// assert!((r[(0, 0)] - 5.0).abs() < 1e-12);
/// assert!(r[(1, 0)].abs() < 1e-12);
/// ```
pub fn gram_schmidt_qr(a: &Matrix, q: &mut Matrix, r: &mut Matrix) -> Result<()> {
    gram_schmidt_qr_with(a, q, r, &mut NoRender)
}

/// [`gram_schmidt_qr`] reporting `Q` and `R` to `render`.
pub fn gram_schmidt_qr_with(
    a: &Matrix,
    q: &mut Matrix,
    r: &mut Matrix,
    render: &mut dyn Render,
) -> Result<()> {
    let (n, m) = check_tall(a)?;
    q.expect_shape("gram_schmidt_qr", n, m)?;
    r.expect_shape("gram_schmidt_qr", m, m)?;
    debug!(rows = n, cols = m, "gram-schmidt QR");

    a.copy_into(q)?;
    for i in 0..m {
        // Each projection is taken against the column as already updated.
        for j in 0..i {
            q.project_accumulate_within(i, j, -1.0, i, 1.0)?;
        }
        q.normalize_column(i)?;
        trace!(column = i, "orthonormalized");
    }
    render.render("Q", q);

    multiply(q, true, a, false, r, 0.0)?;
    render.render("R", r);
    Ok(())
}

// ======================================================================
// Householder
// ======================================================================

/// Pre-allocated temporaries for [`householder_qr_with`].
///
/// Holds an `n x n` pool for the accumulated product, the identity, the
/// reflector and a product target, and an `n x 1` pool for the reflection
/// vector and its correction. One bundle serves any number of sequential
/// decompositions of matrices with `n` rows.
#[derive(Debug)]
pub struct HouseholderScratch {
    rows: usize,
    pub(crate) square: ScratchPool,
    pub(crate) column: ScratchPool,
}

impl HouseholderScratch {
    const SQUARE_DEPTH: usize = 4;
    const COLUMN_DEPTH: usize = 2;

    /// Scratch for matrices with `rows` rows.
    pub fn new(rows: usize) -> Result<Self> {
        Self::with_extra(rows, 0, 0)
    }

    /// Scratch with room for `square` more `n x n` and `column` more `n x 1`
    /// matrices beyond what the decomposition itself needs.
    pub(crate) fn with_extra(rows: usize, square: usize, column: usize) -> Result<Self> {
        Ok(Self {
            rows,
            square: ScratchPool::new(rows, rows, Self::SQUARE_DEPTH + square)?,
            column: ScratchPool::new(rows, 1, Self::COLUMN_DEPTH + column)?,
        })
    }

    /// Row count this scratch was sized for.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }
}

/// QR decomposition by Householder reflections.
///
/// `a` is `n x m` with `n >= m`; `q` must be `n x n` and `r` must be `n x m`.
///
/// ```
/// # use densela_core::Matrix;
/// # use densela_core::linalg::decomp::householder_qr;
/// let a = Matrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]).unwrap();
/// let mut q = Matrix::zeros(3, 3);
/// let mut r = Matrix::zeros(3, 2);
/// householder_qr(&a, &mut q, &mut r).unwrap();
/// let qr = q.matmul(&r).unwrap();
/// assert!(qr.iter().zip(a.iter()).all(|(x, y)| (x - y).abs() < 1e-10));
/// ```
pub fn householder_qr(a: &Matrix, q: &mut Matrix, r: &mut Matrix) -> Result<()> {
    let scratch = HouseholderScratch::new(a.rows())?;
    householder_qr_with(a, q, r, &scratch, &mut NoRender)
}

/// [`householder_qr`] with caller-owned scratch, reporting every reflection
/// vector, reflector and intermediate `R` to `render`.
///
/// Every scratch matrix is back in its pool when this returns, including
/// on error.
#[allow(clippy::many_single_char_names)]
pub fn householder_qr_with(
    a: &Matrix,
    q: &mut Matrix,
    r: &mut Matrix,
    scratch: &HouseholderScratch,
    render: &mut dyn Render,
) -> Result<()> {
    let (n, m) = check_tall(a)?;
    q.expect_shape("householder_qr", n, n)?;
    r.expect_shape("householder_qr", n, m)?;
    if scratch.rows() != n {
        return Err(LinalgError::ShapeMismatch {
            op: "householder_qr",
            expected: (n, n),
            got: (scratch.rows(), scratch.rows()),
        });
    }
    debug!(rows = n, cols = m, "householder QR");

    let mut acc = scratch.square.take()?;
    let mut eye = scratch.square.take()?;
    let mut h = scratch.square.take()?;
    let mut prod = scratch.square.take()?;
    let mut x = scratch.column.take()?;
    let mut v = scratch.column.take()?;
    acc.fill_pattern(1.0, Pattern::Identity);
    eye.fill_pattern(1.0, Pattern::Identity);

    a.copy_into(r)?;
    for i in 0..(n - 1).min(m) {
        // x: column i of R with the entries above the pivot zeroed
        for row in 0..n {
            x[(row, 0)] = if row < i { 0.0 } else { r[(row, i)] };
        }
        let norm = x.norm(Orientation::Column, 0)?;
        v.fill_pattern(0.0, Pattern::Uniform);
        v[(i, 0)] = if x[(i, 0)] > 0.0 { -norm } else { norm };
        x.subtract(&v)?;
        render.render("householder vector", &x);

        let xtx = dot(Orientation::Column, &x, 0, &x, 0)?;
        if xtx == 0.0 {
            warn!(pivot = i, "zero householder vector, reflection skipped");
            continue;
        }

        // H = I - (2 / x^T x) x x^T
        outer(&x, 0, &mut h)?;
        h.scale(-2.0 / xtx);
        h.add(&eye)?;
        render.render("householder reflector", &h);

        multiply(&h, false, &acc, false, &mut prod, 0.0)?;
        std::mem::swap(&mut *acc, &mut *prod);
        multiply(&acc, false, a, false, r, 0.0)?;
        trace!(pivot = i, norm, "reflection applied");
        render.render("R", r);
    }

    acc.transpose_into(q)?;
    render.render("Q", q);
    Ok(())
}
