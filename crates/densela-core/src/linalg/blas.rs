//! Vector and matrix kernels on [`Matrix`] rows and columns.
//!
//! Level-1 style operations address a single row or column of a matrix by
//! index, selected with an explicit [`Orientation`]. [`multiply`] is the
//! generalized multiply-accumulate every higher algorithm uses for matrix
//! products.

use crate::error::{LinalgError, Result};
use crate::matrix::Matrix;

/// Whether a vector operand is a row or a column of its matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Row,
    Column,
}

// ======================================================================
// Level 1: single row / column
// ======================================================================

/// Inner product of `a[idx_a]` and `b[idx_b]` along `orient`.
///
/// Rows require equal column counts; columns require equal row counts.
///
/// ```
/// # use densela_core::Matrix;
/// # use densela_core::linalg::{dot, Orientation};
/// let a = Matrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]).unwrap();
/// assert_eq!(dot(Orientation::Row, &a, 0, &a, 1).unwrap(), 11.0);
/// assert_eq!(dot(Orientation::Column, &a, 0, &a, 1).unwrap(), 14.0);
/// ```
pub fn dot(orient: Orientation, a: &Matrix, idx_a: usize, b: &Matrix, idx_b: usize) -> Result<f64> {
    match orient {
        Orientation::Row => {
            if a.cols() != b.cols() {
                return Err(LinalgError::ShapeMismatch {
                    op: "dot",
                    expected: (b.rows(), a.cols()),
                    got: b.shape(),
                });
            }
            let x = a.row(idx_a)?;
            let y = b.row(idx_b)?;
            Ok(x.iter().zip(y).map(|(&p, &q)| p * q).sum())
        }
        Orientation::Column => {
            if a.rows() != b.rows() {
                return Err(LinalgError::ShapeMismatch {
                    op: "dot",
                    expected: (a.rows(), b.cols()),
                    got: b.shape(),
                });
            }
            Ok(a.column(idx_a)?.zip(b.column(idx_b)?).map(|(p, q)| p * q).sum())
        }
    }
}

/// Projection coefficient `<u, w> / <w, w>` of `u = s1[:, i1]` onto
/// `w = s2[:, i2]`; zero when `w` is the zero vector.
fn projection_coefficient(s1: &Matrix, i1: usize, s2: &Matrix, i2: usize) -> Result<f64> {
    let num = dot(Orientation::Column, s1, i1, s2, i2)?;
    let den = dot(Orientation::Column, s2, i2, s2, i2)?;
    if den == 0.0 { Ok(0.0) } else { Ok(num / den) }
}

/// Overwrite `target[:, idx_t]` with the projection of `source1[:, idx1]`
/// onto `source2[:, idx2]`.
///
/// Projecting onto a zero column yields the zero vector.
pub fn simple_project(
    source1: &Matrix,
    idx1: usize,
    source2: &Matrix,
    idx2: usize,
    target: &mut Matrix,
    idx_t: usize,
) -> Result<()> {
    project_accumulate(source1, idx1, source2, idx2, 1.0, target, idx_t, 0.0)
}

/// Fused scaled projection:
/// `target[:, idx_t] = proj_scalar * c * source2[:, idx2] + target_scalar * target[:, idx_t]`
/// where `c` is the projection coefficient of `source1[:, idx1]` onto
/// `source2[:, idx2]` (0 when that column is zero).
///
/// For in-place updates where all three columns live in one matrix use
/// [`Matrix::project_accumulate_within`].
#[allow(clippy::too_many_arguments)]
pub fn project_accumulate(
    source1: &Matrix,
    idx1: usize,
    source2: &Matrix,
    idx2: usize,
    proj_scalar: f64,
    target: &mut Matrix,
    idx_t: usize,
    target_scalar: f64,
) -> Result<()> {
    if source2.rows() != target.rows() {
        return Err(LinalgError::ShapeMismatch {
            op: "project",
            expected: (source2.rows(), target.cols()),
            got: target.shape(),
        });
    }
    target.check_col(idx_t)?;
    let c = projection_coefficient(source1, idx1, source2, idx2)?;
    for i in 0..target.rows() {
        let t = target[(i, idx_t)];
        target[(i, idx_t)] = proj_scalar * c * source2[(i, idx2)] + target_scalar * t;
    }
    Ok(())
}

/// `target = u u^T` for `u = source[:, idx]`.
///
/// `target` must be square with as many rows as `source`.
pub fn outer(source: &Matrix, idx: usize, target: &mut Matrix) -> Result<()> {
    let n = source.rows();
    target.expect_shape("outer", n, n)?;
    source.check_col(idx)?;
    for i in 0..n {
        let ui = source[(i, idx)];
        for j in 0..n {
            target[(i, j)] = ui * source[(j, idx)];
        }
    }
    Ok(())
}

impl Matrix {
    /// Euclidean norm of row or column `idx`.
    pub fn norm(&self, orient: Orientation, idx: usize) -> Result<f64> {
        Ok(dot(orient, self, idx, self, idx)?.sqrt())
    }

    /// Scale column `idx` to unit length.
    ///
    /// A zero column has no direction and is left unchanged.
    ///
    /// ```
    /// # use densela_core::Matrix;
    /// let mut m = Matrix::from_rows(&[&[3.0, 0.0], &[4.0, 0.0]]).unwrap();
    /// m.normalize_column(0).unwrap();
    /// m.normalize_column(1).unwrap();
    /// assert_eq!(m.as_slice(), &[0.6, 0.0, 0.8, 0.0]);
    /// ```
    pub fn normalize_column(&mut self, idx: usize) -> Result<()> {
        let norm = self.norm(Orientation::Column, idx)?;
        if norm != 0.0 {
            self.scale_column(idx, 1.0 / norm)?;
        }
        Ok(())
    }

    /// [`project_accumulate`] with all three columns taken from `self`.
    ///
    /// `self[:, idx_t] = proj_scalar * c * self[:, idx2] + target_scalar * self[:, idx_t]`
    /// with `c` the projection coefficient of `self[:, idx1]` onto
    /// `self[:, idx2]`. The coefficient is computed before any entry is
    /// written, so `idx_t` may equal `idx1`.
    pub fn project_accumulate_within(
        &mut self,
        idx1: usize,
        idx2: usize,
        proj_scalar: f64,
        idx_t: usize,
        target_scalar: f64,
    ) -> Result<()> {
        self.check_col(idx_t)?;
        let c = projection_coefficient(self, idx1, self, idx2)?;
        for i in 0..self.rows() {
            let w = self[(i, idx2)];
            let t = self[(i, idx_t)];
            self[(i, idx_t)] = proj_scalar * c * w + target_scalar * t;
        }
        Ok(())
    }

    /// Matrix product `self * other` as a new matrix.
    ///
    /// ```
    /// # use densela_core::Matrix;
    /// let a = Matrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]).unwrap();
    /// let b = Matrix::from_rows(&[&[5.0, 6.0], &[7.0, 8.0]]).unwrap();
    /// assert_eq!(a.matmul(&b).unwrap().as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    /// ```
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix> {
        let mut c = Matrix::zeros(self.rows(), other.cols());
        multiply(self, false, other, false, &mut c, 0.0)?;
        Ok(c)
    }
}

// ======================================================================
// Level 3: matrix-matrix
// ======================================================================

/// Generalized multiply-accumulate:
/// `target = op1(source1) * op2(source2) + target_scalar * target`,
/// where `op(X, true) = X^T`.
///
/// With `target_scalar == 0.0` the previous contents of `target` are
/// ignored, so uninitialized scratch matrices are fine as targets.
///
/// ```
/// # use densela_core::Matrix;
/// # use densela_core::linalg::multiply;
/// // Q^T Q for an orthogonal Q is the identity
/// let s = std::f64::consts::FRAC_1_SQRT_2;
/// let q = Matrix::from_rows(&[&[s, -s], &[s, s]]).unwrap();
/// let mut qtq = Matrix::zeros(2, 2);
/// multiply(&q, true, &q, false, &mut qtq, 0.0).unwrap();
/// assert!((qtq[(0, 0)] - 1.0).abs() < 1e-15);
/// assert!(qtq[(0, 1)].abs() < 1e-15);
/// ```
pub fn multiply(
    source1: &Matrix,
    transpose1: bool,
    source2: &Matrix,
    transpose2: bool,
    target: &mut Matrix,
    target_scalar: f64,
) -> Result<()> {
    let (m, k) = op_shape(source1, transpose1);
    let (k2, n) = op_shape(source2, transpose2);
    if k != k2 {
        return Err(LinalgError::ShapeMismatch {
            op: "multiply",
            expected: op_shape_for(k, n, transpose2),
            got: source2.shape(),
        });
    }
    target.expect_shape("multiply", m, n)?;

    let a = source1.as_slice();
    let b = source2.as_slice();
    let (ac, bc) = (source1.cols(), source2.cols());
    let at = |i: usize, p: usize| if transpose1 { a[p * ac + i] } else { a[i * ac + p] };
    let bt = |p: usize, j: usize| if transpose2 { b[j * bc + p] } else { b[p * bc + j] };

    for i in 0..m {
        for j in 0..n {
            let mut sum = 0.0;
            for p in 0..k {
                sum += at(i, p) * bt(p, j);
            }
            let t = &mut target[(i, j)];
            *t = if target_scalar == 0.0 {
                sum
            } else {
                sum + target_scalar * *t
            };
        }
    }
    Ok(())
}

/// `target = source1 * source2`.
pub fn simple_multiply(source1: &Matrix, source2: &Matrix, target: &mut Matrix) -> Result<()> {
    multiply(source1, false, source2, false, target, 0.0)
}

fn op_shape(m: &Matrix, transpose: bool) -> (usize, usize) {
    if transpose {
        (m.cols(), m.rows())
    } else {
        m.shape()
    }
}

fn op_shape_for(rows: usize, cols: usize, transpose: bool) -> (usize, usize) {
    if transpose { (cols, rows) } else { (rows, cols) }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn mat(rows: usize, cols: usize, data: &[f64]) -> Matrix {
        Matrix::from_slice(rows, cols, data).unwrap()
    }

    fn approx_eq(a: &[f64], b: &[f64], tol: f64) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| (x - y).abs() < tol)
    }

    // ------------------------------------------------------------------
    // Level 1
    // ------------------------------------------------------------------

    #[test]
    fn test_dot_orientations() {
        let a = mat(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = mat(3, 3, &[1.0, 0.0, 2.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0]);
        // row 1 of a . row 0 of b = 4 + 0 + 12
        assert_eq!(dot(Orientation::Row, &a, 1, &b, 0).unwrap(), 16.0);
        // column 2 of a . column 0 of a = 3 + 24
        assert_eq!(dot(Orientation::Column, &a, 2, &a, 0).unwrap(), 27.0);
    }

    #[test]
    fn test_dot_shape_mismatch() {
        let a = mat(2, 3, &[0.0; 6]);
        let b = mat(3, 2, &[0.0; 6]);
        assert!(matches!(
            dot(Orientation::Row, &a, 0, &b, 0),
            Err(LinalgError::ShapeMismatch { op: "dot", .. })
        ));
        assert!(dot(Orientation::Column, &a, 0, &b, 0).is_err());
    }

    #[test]
    fn test_dot_index_out_of_range() {
        let a = mat(2, 2, &[0.0; 4]);
        assert!(matches!(
            dot(Orientation::Row, &a, 2, &a, 0),
            Err(LinalgError::IndexOutOfRange { .. })
        ));
        assert!(dot(Orientation::Column, &a, 0, &a, 9).is_err());
    }

    #[test]
    fn test_norm() {
        let a = mat(2, 2, &[3.0, 1.0, 4.0, 1.0]);
        assert_eq!(a.norm(Orientation::Column, 0).unwrap(), 5.0);
        assert!((a.norm(Orientation::Row, 1).unwrap() - 17.0_f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn test_normalize_zero_column_stays_zero() {
        let mut a = mat(3, 1, &[0.0, 0.0, 0.0]);
        a.normalize_column(0).unwrap();
        assert!(a.iter().all(|&x| x == 0.0 && !x.is_nan()));
    }

    #[test]
    fn test_outer() {
        let u = mat(3, 2, &[1.0, 9.0, 2.0, 9.0, 3.0, 9.0]);
        let mut t = Matrix::zeros(3, 3);
        outer(&u, 0, &mut t).unwrap();
        assert_eq!(
            t.as_slice(),
            &[1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 3.0, 6.0, 9.0]
        );
        let mut wrong = Matrix::zeros(3, 2);
        assert!(outer(&u, 0, &mut wrong).is_err());
    }

    #[test]
    fn test_simple_project() {
        let u = mat(2, 1, &[2.0, 3.0]);
        let w = mat(2, 1, &[1.0, 0.0]);
        let mut t = mat(2, 1, &[7.0, 7.0]);
        simple_project(&u, 0, &w, 0, &mut t, 0).unwrap();
        assert_eq!(t.as_slice(), &[2.0, 0.0]);
    }

    #[test]
    fn test_project_onto_zero_vector() {
        let u = mat(2, 1, &[2.0, 3.0]);
        let w = mat(2, 1, &[0.0, 0.0]);
        let mut t = mat(2, 1, &[1.0, 1.0]);
        project_accumulate(&u, 0, &w, 0, -1.0, &mut t, 0, 1.0).unwrap();
        assert_eq!(t.as_slice(), &[1.0, 1.0]);
    }

    #[test]
    fn test_project_accumulate_subtracts() {
        // t = u - proj_w(u) is orthogonal to w
        let u = mat(3, 1, &[1.0, 2.0, 3.0]);
        let w = mat(3, 1, &[1.0, 1.0, 0.0]);
        let mut t = u.clone();
        project_accumulate(&u, 0, &w, 0, -1.0, &mut t, 0, 1.0).unwrap();
        assert!(approx_eq(t.as_slice(), &[-0.5, 0.5, 3.0], 1e-15));
        assert!(dot(Orientation::Column, &t, 0, &w, 0).unwrap().abs() < 1e-15);
    }

    #[test]
    fn test_project_accumulate_within() {
        let mut q = mat(3, 2, &[1.0, 1.0, 1.0, 2.0, 0.0, 3.0]);
        q.project_accumulate_within(1, 0, -1.0, 1, 1.0).unwrap();
        assert!(dot(Orientation::Column, &q, 0, &q, 1).unwrap().abs() < 1e-14);
        // first column untouched
        let col0: Vec<f64> = q.column(0).unwrap().collect();
        assert_eq!(col0, vec![1.0, 1.0, 0.0]);
    }

    // ------------------------------------------------------------------
    // Level 3
    // ------------------------------------------------------------------

    #[test]
    fn test_multiply_plain() {
        let a = mat(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = mat(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let mut c = Matrix::zeros(2, 2);
        multiply(&a, false, &b, false, &mut c, 0.0).unwrap();
        assert_eq!(c.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_multiply_transposes_use_both_operands() {
        let a = mat(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = mat(2, 3, &[1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);

        // a^T b : 3x3
        let mut atb = Matrix::zeros(3, 3);
        multiply(&a, true, &b, false, &mut atb, 0.0).unwrap();
        let expected = a.transposed().matmul(&b).unwrap();
        assert_eq!(atb, expected);

        // a b^T : 2x2
        let mut abt = Matrix::zeros(2, 2);
        multiply(&a, false, &b, true, &mut abt, 0.0).unwrap();
        assert_eq!(abt.as_slice(), &[4.0, 2.0, 10.0, 5.0]);

        // a^T b^T needs (3x2)(3x2): mismatch
        let mut bad = Matrix::zeros(3, 3);
        assert!(multiply(&a, true, &b, true, &mut bad, 0.0).is_err());

        // both transposed
        let s = mat(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let r = mat(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        let mut st_rt = Matrix::zeros(2, 2);
        multiply(&s, true, &r, true, &mut st_rt, 0.0).unwrap();
        let expected = s.transposed().matmul(&r.transposed()).unwrap();
        assert_eq!(st_rt, expected);
    }

    #[test]
    fn test_multiply_accumulates_target() {
        let a = Matrix::identity(2);
        let b = mat(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let mut c = mat(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        multiply(&a, false, &b, false, &mut c, 2.0).unwrap();
        assert_eq!(c.as_slice(), &[3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_multiply_ignores_stale_target_when_scalar_zero() {
        let a = Matrix::identity(2);
        let b = mat(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let mut c = Matrix::full(2, 2, f64::NAN);
        multiply(&a, false, &b, false, &mut c, 0.0).unwrap();
        assert_eq!(c, b);
    }

    #[test]
    fn test_multiply_target_shape() {
        let a = mat(2, 3, &[0.0; 6]);
        let b = mat(3, 4, &[0.0; 12]);
        let mut c = Matrix::zeros(2, 3);
        assert!(matches!(
            multiply(&a, false, &b, false, &mut c, 0.0),
            Err(LinalgError::ShapeMismatch { op: "multiply", .. })
        ));
    }

    #[test]
    fn test_simple_multiply_and_matmul() {
        let a = mat(1, 2, &[1.0, 2.0]);
        let b = mat(2, 1, &[3.0, 4.0]);
        let mut c = Matrix::zeros(1, 1);
        simple_multiply(&a, &b, &mut c).unwrap();
        assert_eq!(c[(0, 0)], 11.0);
        assert_eq!(b.matmul(&a).unwrap().shape(), (2, 2));
        assert!(a.matmul(&a).is_err());
    }
}
