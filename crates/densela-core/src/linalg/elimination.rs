//! Row reduction and triangular solves.
//!
//! [`gaussian_elimination`] reduces an augmented system `[A | B]` to row
//! echelon form; [`gauss_jordan`] continues to reduced row echelon form.
//! Both use partial pivoting and write into separate output matrices,
//! leaving the inputs untouched.
//!
//! [`back_substitution`] and [`forward_substitution`] solve triangular
//! systems with a single right-hand-side column.
//!
//! A column whose candidate pivots are all below
//! [`PIVOT_TOLERANCE`](crate::PIVOT_TOLERANCE) is skipped and the next
//! column is tried on the same row.
//! If elimination leaves a row whose coefficients are all negligible while
//! its right-hand side is not, the system is inconsistent and the call
//! fails with [`LinalgError::SingularSystem`].

use tracing::{debug, trace, warn};

use crate::PIVOT_TOLERANCE;
use crate::error::{LinalgError, Result};
use crate::linalg::decomp::lu::pivot_row;
use crate::matrix::{Matrix, NoRender, Render};

fn check_augmented(op: &'static str, a: &Matrix, b: &Matrix, ra: &Matrix, rb: &Matrix) -> Result<()> {
    if a.rows() != b.rows() {
        return Err(LinalgError::ShapeMismatch {
            op,
            expected: (a.rows(), b.cols()),
            got: b.shape(),
        });
    }
    ra.expect_shape(op, a.rows(), a.cols())?;
    rb.expect_shape(op, b.rows(), b.cols())
}

fn row_max_abs(m: &Matrix, row: usize) -> Result<f64> {
    Ok(m.row(row)?.iter().fold(0.0, |acc: f64, v| acc.max(v.abs())))
}

/// Fail on the first row of `ra` that is numerically zero while the same
/// row of `rb` is not.
fn check_consistent(ra: &Matrix, rb: &Matrix) -> Result<()> {
    for row in 0..ra.rows() {
        let pivot = row_max_abs(ra, row)?;
        if pivot >= PIVOT_TOLERANCE {
            continue;
        }
        let residual = row_max_abs(rb, row)?;
        if residual >= PIVOT_TOLERANCE {
            return Err(LinalgError::SingularSystem {
                row,
                col: row.min(ra.cols() - 1),
                pivot,
                residual,
            });
        }
    }
    Ok(())
}

/// Reduce `ra` to row echelon form, applying every row operation to `rb`.
///
/// Returns the `(row, col)` position of each pivot. A column without a
/// usable pivot keeps the current row for the next column, so the leading
/// entries form a staircase.
fn forward_eliminate(
    ra: &mut Matrix,
    rb: &mut Matrix,
    render: &mut dyn Render,
) -> Result<Vec<(usize, usize)>> {
    let (n, m) = ra.shape();
    let mut pivots = Vec::with_capacity(n.min(m));
    let mut row = 0;
    for col in 0..m {
        if row == n {
            break;
        }
        let (best, value) = pivot_row(ra, col, row);
        if value < PIVOT_TOLERANCE {
            warn!(row, col, "no usable pivot in column, skipped");
            continue;
        }
        if best != row {
            ra.swap_rows(row, best)?;
            rb.swap_rows(row, best)?;
            trace!(from = best, to = row, "pivot rows swapped");
        }
        let pivot = ra[(row, col)];
        for j in (row + 1)..n {
            let entry = ra[(j, col)];
            if entry != 0.0 {
                let scalar = -entry / pivot;
                ra.add_row_scalar_multiple(j, scalar, row)?;
                rb.add_row_scalar_multiple(j, scalar, row)?;
                ra[(j, col)] = 0.0;
            }
        }
        pivots.push((row, col));
        render.render("A", ra);
        render.render("B", rb);
        row += 1;
    }
    Ok(pivots)
}

/// Gaussian elimination with partial pivoting on `[a | b]`.
///
/// `b` must have as many rows as `a`; `ra` and `rb` receive the reduced
/// `a` and the correspondingly transformed `b` and must match their shapes.
///
/// ```
/// # use densela_core::Matrix;
/// # use densela_core::linalg::gaussian_elimination;
/// let a = Matrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]).unwrap();
/// let b = Matrix::from_rows(&[&[5.0], &[6.0]]).unwrap();
/// let (mut ra, mut rb) = (Matrix::zeros(2, 2), Matrix::zeros(2, 1));
/// gaussian_elimination(&a, &b, &mut ra, &mut rb).unwrap();
/// // pivot on 3, then eliminate below
/// assert_eq!(ra.row(0).unwrap(), &[3.0, 4.0]);
/// assert_eq!(ra[(1, 0)], 0.0);
/// ```
pub fn gaussian_elimination(a: &Matrix, b: &Matrix, ra: &mut Matrix, rb: &mut Matrix) -> Result<()> {
    gaussian_elimination_with(a, b, ra, rb, &mut NoRender)
}

/// [`gaussian_elimination`] reporting both halves after every pivot.
pub fn gaussian_elimination_with(
    a: &Matrix,
    b: &Matrix,
    ra: &mut Matrix,
    rb: &mut Matrix,
    render: &mut dyn Render,
) -> Result<()> {
    check_augmented("gaussian_elimination", a, b, ra, rb)?;
    debug!(rows = a.rows(), cols = a.cols(), rhs = b.cols(), "gaussian elimination");
    a.copy_into(ra)?;
    b.copy_into(rb)?;
    forward_eliminate(ra, rb, render)?;
    check_consistent(ra, rb)
}

/// Gauss-Jordan elimination: reduced row echelon form of `[a | b]`.
///
/// With `b` the identity, `rb` receives the inverse of `a`.
///
/// ```
/// # use densela_core::Matrix;
/// # use densela_core::linalg::gauss_jordan;
/// let a = Matrix::from_rows(&[&[2.0, 0.0], &[0.0, 4.0]]).unwrap();
/// let (mut ra, mut rb) = (Matrix::zeros(2, 2), Matrix::zeros(2, 2));
/// gauss_jordan(&a, &Matrix::identity(2), &mut ra, &mut rb).unwrap();
/// assert_eq!(ra, Matrix::identity(2));
/// assert_eq!(rb.as_slice(), &[0.5, 0.0, 0.0, 0.25]);
/// ```
pub fn gauss_jordan(a: &Matrix, b: &Matrix, ra: &mut Matrix, rb: &mut Matrix) -> Result<()> {
    gauss_jordan_with(a, b, ra, rb, &mut NoRender)
}

/// [`gauss_jordan`] reporting both halves after every pivot.
pub fn gauss_jordan_with(
    a: &Matrix,
    b: &Matrix,
    ra: &mut Matrix,
    rb: &mut Matrix,
    render: &mut dyn Render,
) -> Result<()> {
    check_augmented("gauss_jordan", a, b, ra, rb)?;
    debug!(rows = a.rows(), cols = a.cols(), rhs = b.cols(), "gauss-jordan elimination");
    a.copy_into(ra)?;
    b.copy_into(rb)?;
    let pivots = forward_eliminate(ra, rb, render)?;
    check_consistent(ra, rb)?;

    for &(row, col) in pivots.iter().rev() {
        let pivot = ra[(row, col)];
        for j in 0..row {
            let entry = ra[(j, col)];
            if entry != 0.0 {
                let scalar = -entry / pivot;
                ra.add_row_scalar_multiple(j, scalar, row)?;
                rb.add_row_scalar_multiple(j, scalar, row)?;
                ra[(j, col)] = 0.0;
            }
        }
        render.render("A", ra);
        render.render("B", rb);
    }

    for &(row, col) in &pivots {
        let pivot = ra[(row, col)];
        ra.scale_row(row, 1.0 / pivot)?;
        rb.scale_row(row, 1.0 / pivot)?;
        ra[(row, col)] = 1.0;
    }
    render.render("A", ra);
    render.render("B", rb);
    check_consistent(ra, rb)
}

fn check_rhs(op: &'static str, t: &Matrix, b: &Matrix, x: &Matrix) -> Result<()> {
    b.expect_shape(op, t.rows(), 1)?;
    x.expect_shape(op, t.cols(), 1)
}

/// Resolve the unknown at `(row, row)` from `residual`.
fn solve_pivot(t: &Matrix, row: usize, residual: f64) -> Result<f64> {
    let diag = t[(row, row)];
    if diag.abs() >= PIVOT_TOLERANCE {
        return Ok(residual / diag);
    }
    if residual.abs() >= PIVOT_TOLERANCE {
        return Err(LinalgError::SingularSystem {
            row,
            col: row,
            pivot: diag,
            residual,
        });
    }
    warn!(row, "zero diagonal with zero residual, free variable set to 0");
    Ok(0.0)
}

/// Solve `Rx = b` for upper-triangular `r`.
///
/// `r` is `n x m` with `n >= m`, `b` is `n x 1` and `x` is `m x 1`. Rows of
/// `b` below `m` are not used, which is what least squares needs after a
/// QR factorization.
///
/// ```
/// # use densela_core::Matrix;
/// # use densela_core::linalg::back_substitution;
/// let r = Matrix::from_rows(&[&[2.0, 1.0], &[0.0, 4.0]]).unwrap();
/// let b = Matrix::from_rows(&[&[4.0], &[8.0]]).unwrap();
/// let mut x = Matrix::zeros(2, 1);
/// back_substitution(&r, &b, &mut x).unwrap();
/// assert_eq!(x.as_slice(), &[1.0, 2.0]);
/// ```
pub fn back_substitution(r: &Matrix, b: &Matrix, x: &mut Matrix) -> Result<()> {
    let (n, m) = r.shape();
    if n < m {
        return Err(LinalgError::InvalidShape {
            rows: n,
            cols: m,
            reason: "back substitution requires rows >= cols",
        });
    }
    check_rhs("back_substitution", r, b, x)?;

    for i in (0..m).rev() {
        let mut residual = b[(i, 0)];
        for j in (i + 1)..m {
            residual -= r[(i, j)] * x[(j, 0)];
        }
        x[(i, 0)] = solve_pivot(r, i, residual)?;
    }
    Ok(())
}

/// Solve `Ly = b` for square lower-triangular `l`.
pub fn forward_substitution(l: &Matrix, b: &Matrix, y: &mut Matrix) -> Result<()> {
    if !l.is_square() {
        return Err(LinalgError::InvalidShape {
            rows: l.rows(),
            cols: l.cols(),
            reason: "forward substitution requires a square matrix",
        });
    }
    check_rhs("forward_substitution", l, b, y)?;

    for i in 0..l.rows() {
        let mut residual = b[(i, 0)];
        for j in 0..i {
            residual -= l[(i, j)] * y[(j, 0)];
        }
        y[(i, 0)] = solve_pivot(l, i, residual)?;
    }
    Ok(())
}
