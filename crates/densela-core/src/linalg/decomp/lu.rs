//! LU decomposition, without and with partial pivoting.
//!
//! - [`lu`] factors `A = LU` directly. It fails on a zero pivot that has
//!   nonzero entries below it, since only a row exchange could clear them.
//! - [`plu`] selects the largest-magnitude pivot at every step and records
//!   the exchanges in a permutation matrix, so that `PA = LU`.
//!
//! `L` is unit lower triangular and `U` is upper triangular in both cases.

use tracing::{debug, trace, warn};

use crate::PIVOT_TOLERANCE;
use crate::error::{LinalgError, Result};
use crate::matrix::{Matrix, NoRender, Pattern, Render};

pub(crate) fn check_square(a: &Matrix) -> Result<usize> {
    if !a.is_square() {
        return Err(LinalgError::InvalidShape {
            rows: a.rows(),
            cols: a.cols(),
            reason: "matrix must be square",
        });
    }
    Ok(a.rows())
}

/// Row index in `start..rows` holding the largest `|m[row, col]|`.
///
/// Ties keep the earliest row.
pub(crate) fn pivot_row(m: &Matrix, col: usize, start: usize) -> (usize, f64) {
    let mut best = (start, m[(start, col)].abs());
    for row in (start + 1)..m.rows() {
        let v = m[(row, col)].abs();
        if v > best.1 {
            best = (row, v);
        }
    }
    best
}

/// Eliminate column `i` below the pivot `u[i, i]`, storing each multiplier
/// in `l[j, i]`.
fn eliminate_below(u: &mut Matrix, l: &mut Matrix, i: usize) -> Result<()> {
    let pivot = u[(i, i)];
    for j in (i + 1)..u.rows() {
        let factor = u[(j, i)] / pivot;
        if factor != 0.0 {
            u.add_row_scalar_multiple(j, -factor, i)?;
        }
        l[(j, i)] = factor;
        u[(j, i)] = 0.0;
    }
    Ok(())
}

/// LU decomposition without pivoting.
///
/// `a`, `l` and `u` must all be `n x n`. A pivot below
/// [`PIVOT_TOLERANCE`](crate::PIVOT_TOLERANCE) is skipped when the entries
/// below it are negligible too, and is a
/// [`SingularSystem`](LinalgError::SingularSystem) otherwise.
///
/// ```
/// # use densela_core::Matrix;
/// # use densela_core::linalg::decomp::lu;
/// let a = Matrix::from_rows(&[&[2.0, 1.0], &[4.0, 5.0]]).unwrap();
/// let mut l = Matrix::zeros(2, 2);
/// let mut u = Matrix::zeros(2, 2);
/// lu(&a, &mut l, &mut u).unwrap();
/// assert_eq!(l.as_slice(), &[1.0, 0.0, 2.0, 1.0]);
/// assert_eq!(u.as_slice(), &[2.0, 1.0, 0.0, 3.0]);
/// ```
pub fn lu(a: &Matrix, l: &mut Matrix, u: &mut Matrix) -> Result<()> {
    lu_with(a, l, u, &mut NoRender)
}

/// [`lu`] reporting `U` after every elimination step and the final `L`.
pub fn lu_with(a: &Matrix, l: &mut Matrix, u: &mut Matrix, render: &mut dyn Render) -> Result<()> {
    let n = check_square(a)?;
    l.expect_shape("lu", n, n)?;
    u.expect_shape("lu", n, n)?;
    debug!(n, "LU decomposition");

    a.copy_into(u)?;
    l.fill_pattern(1.0, Pattern::Identity);
    for i in 0..n.saturating_sub(1) {
        let pivot = u[(i, i)];
        if pivot.abs() < PIVOT_TOLERANCE {
            let residual = ((i + 1)..n).map(|j| u[(j, i)].abs()).fold(0.0, f64::max);
            if residual >= PIVOT_TOLERANCE {
                return Err(LinalgError::SingularSystem {
                    row: i,
                    col: i,
                    pivot,
                    residual,
                });
            }
            warn!(pivot = i, "zero pivot column skipped");
            continue;
        }
        eliminate_below(u, l, i)?;
        trace!(pivot = i, value = pivot, "column eliminated");
        render.render("U", u);
    }
    render.render("L", l);
    Ok(())
}

/// LU decomposition with partial pivoting, `PA = LU`.
///
/// `a`, `p`, `l` and `u` must all be `n x n`. Singular inputs do not fail:
/// a column with no usable pivot is left as is.
///
/// ```
/// # use densela_core::Matrix;
/// # use densela_core::linalg::decomp::plu;
/// let a = Matrix::from_rows(&[&[0.0, 1.0], &[2.0, 3.0]]).unwrap();
/// let (mut p, mut l, mut u) = (Matrix::zeros(2, 2), Matrix::zeros(2, 2), Matrix::zeros(2, 2));
/// plu(&a, &mut p, &mut l, &mut u).unwrap();
/// assert_eq!(p.as_slice(), &[0.0, 1.0, 1.0, 0.0]);
/// assert_eq!(p.matmul(&a).unwrap(), l.matmul(&u).unwrap());
/// ```
pub fn plu(a: &Matrix, p: &mut Matrix, l: &mut Matrix, u: &mut Matrix) -> Result<()> {
    plu_with(a, p, l, u, &mut NoRender)
}

/// [`plu`] reporting `U` after every step and the final `P` and `L`.
pub fn plu_with(
    a: &Matrix,
    p: &mut Matrix,
    l: &mut Matrix,
    u: &mut Matrix,
    render: &mut dyn Render,
) -> Result<()> {
    let n = check_square(a)?;
    p.expect_shape("plu", n, n)?;
    l.expect_shape("plu", n, n)?;
    u.expect_shape("plu", n, n)?;
    debug!(n, "PLU decomposition");

    a.copy_into(u)?;
    p.fill_pattern(1.0, Pattern::Identity);
    // the unit diagonal is added at the end so row swaps only move multipliers
    l.fill_pattern(0.0, Pattern::Uniform);

    for i in 0..n.saturating_sub(1) {
        let (row, value) = pivot_row(u, i, i);
        if row != i {
            u.swap_rows(i, row)?;
            p.swap_rows(i, row)?;
            l.swap_rows(i, row)?;
            trace!(from = row, to = i, "pivot rows swapped");
        }
        if value < PIVOT_TOLERANCE {
            warn!(pivot = i, "zero pivot column skipped");
            continue;
        }
        eliminate_below(u, l, i)?;
        render.render("U", u);
    }
    for i in 0..n {
        l[(i, i)] = 1.0;
    }
    render.render("P", p);
    render.render("L", l);
    Ok(())
}
