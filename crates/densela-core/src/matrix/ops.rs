//! In-place elementary algebra on [`Matrix`].
//!
//! Row and column kernels used by the factorization algorithms: copies,
//! transposition, scaling, column/row addition and subtraction, row swaps,
//! the elimination primitive [`Matrix::add_row_scalar_multiple`], and the
//! sum/mean/max reductions used by diagnostics.

use crate::error::{LinalgError, Result};

use super::Matrix;

impl Matrix {
    // ------------------------------------------------------------------
    // Copies and transposition
    // ------------------------------------------------------------------

    /// Copy every entry into `target`, which must have the same shape.
    pub fn copy_into(&self, target: &mut Matrix) -> Result<()> {
        target.expect_shape("copy", self.rows, self.cols)?;
        target.data.copy_from_slice(&self.data);
        Ok(())
    }

    /// Copy row `idx_s` of `self` into row `idx_t` of `target`.
    pub fn copy_row(&self, idx_s: usize, target: &mut Matrix, idx_t: usize) -> Result<()> {
        check_same_cols("copy_row", self, target)?;
        let src = self.row(idx_s)?;
        target.row_mut(idx_t)?.copy_from_slice(src);
        Ok(())
    }

    /// Copy column `idx_s` of `self` into column `idx_t` of `target`.
    pub fn copy_column(&self, idx_s: usize, target: &mut Matrix, idx_t: usize) -> Result<()> {
        check_same_rows("copy_column", self, target)?;
        self.check_col(idx_s)?;
        target.check_col(idx_t)?;
        for i in 0..self.rows {
            target[(i, idx_t)] = self[(i, idx_s)];
        }
        Ok(())
    }

    /// Write the transpose of `self` into `target`.
    ///
    /// `target` must be `cols x rows`.
    pub fn transpose_into(&self, target: &mut Matrix) -> Result<()> {
        target.expect_shape("transpose", self.cols, self.rows)?;
        for i in 0..self.rows {
            for j in 0..self.cols {
                target.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Ok(())
    }

    /// Return the transpose as a new matrix.
    ///
    /// ```
    /// # use densela_core::Matrix;
    /// let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    /// let t = m.transposed();
    /// assert_eq!(t.shape(), (3, 2));
    /// assert_eq!(t.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    /// ```
    pub fn transposed(&self) -> Matrix {
        let mut t = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                t.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        t
    }

    /// Exchange two full rows.
    pub fn swap_rows(&mut self, r1: usize, r2: usize) -> Result<()> {
        self.check_row(r1)?;
        self.check_row(r2)?;
        if r1 != r2 {
            for j in 0..self.cols {
                self.data.swap(r1 * self.cols + j, r2 * self.cols + j);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Scaling
    // ------------------------------------------------------------------

    /// Multiply row `idx` by `scalar`.
    pub fn scale_row(&mut self, idx: usize, scalar: f64) -> Result<()> {
        for v in self.row_mut(idx)? {
            *v *= scalar;
        }
        Ok(())
    }

    /// Multiply column `idx` by `scalar`.
    pub fn scale_column(&mut self, idx: usize, scalar: f64) -> Result<()> {
        self.check_col(idx)?;
        for i in 0..self.rows {
            self[(i, idx)] *= scalar;
        }
        Ok(())
    }

    /// Multiply every entry by `scalar`.
    pub fn scale(&mut self, scalar: f64) {
        for v in &mut self.data {
            *v *= scalar;
        }
    }

    /// Replace every entry by its absolute value.
    pub fn abs(&mut self) {
        self.apply(f64::abs);
    }

    // ------------------------------------------------------------------
    // Addition and subtraction
    // ------------------------------------------------------------------

    /// `self[:, idx_t] += source[:, idx_s]`.
    pub fn add_column(&mut self, idx_t: usize, source: &Matrix, idx_s: usize) -> Result<()> {
        self.combine_column("add_column", idx_t, source, idx_s, 1.0)
    }

    /// `self[:, idx_t] -= source[:, idx_s]`.
    pub fn subtract_column(&mut self, idx_t: usize, source: &Matrix, idx_s: usize) -> Result<()> {
        self.combine_column("subtract_column", idx_t, source, idx_s, -1.0)
    }

    /// `self[idx_t, :] += source[idx_s, :]`.
    pub fn add_row(&mut self, idx_t: usize, source: &Matrix, idx_s: usize) -> Result<()> {
        self.combine_row("add_row", idx_t, source, idx_s, 1.0)
    }

    /// `self[idx_t, :] -= source[idx_s, :]`.
    pub fn subtract_row(&mut self, idx_t: usize, source: &Matrix, idx_s: usize) -> Result<()> {
        self.combine_row("subtract_row", idx_t, source, idx_s, -1.0)
    }

    /// `self += source`, column by column. Shapes must match.
    pub fn add(&mut self, source: &Matrix) -> Result<()> {
        self.expect_shape("add", source.rows, source.cols)?;
        for j in 0..self.cols {
            self.add_column(j, source, j)?;
        }
        Ok(())
    }

    /// `self -= source`, column by column. Shapes must match.
    pub fn subtract(&mut self, source: &Matrix) -> Result<()> {
        self.expect_shape("subtract", source.rows, source.cols)?;
        for j in 0..self.cols {
            self.subtract_column(j, source, j)?;
        }
        Ok(())
    }

    /// `self[target_row, :] += scalar * self[source_row, :]`.
    ///
    /// The core elimination primitive.
    ///
    /// ```
    /// # use densela_core::Matrix;
    /// let mut m = Matrix::from_rows(&[&[2.0, 1.0], &[4.0, 5.0]]).unwrap();
    /// m.add_row_scalar_multiple(1, -2.0, 0).unwrap();
    /// assert_eq!(m.row(1).unwrap(), &[0.0, 3.0]);
    /// ```
    pub fn add_row_scalar_multiple(
        &mut self,
        target_row: usize,
        scalar: f64,
        source_row: usize,
    ) -> Result<()> {
        self.check_row(target_row)?;
        self.check_row(source_row)?;
        let cols = self.cols;
        for j in 0..cols {
            let s = self.data[source_row * cols + j];
            self.data[target_row * cols + j] += scalar * s;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reductions
    // ------------------------------------------------------------------

    /// Sum of all entries, or of their absolute values when `abs` is set.
    pub fn sum(&self, abs: bool) -> f64 {
        self.data
            .iter()
            .map(|&v| if abs { v.abs() } else { v })
            .sum()
    }

    /// Mean of all entries, or of their absolute values when `abs` is set.
    pub fn mean(&self, abs: bool) -> f64 {
        self.sum(abs) / self.data.len() as f64
    }

    /// Largest entry, or largest absolute value when `abs` is set.
    pub fn max(&self, abs: bool) -> f64 {
        self.data
            .iter()
            .map(|&v| if abs { v.abs() } else { v })
            .fold(f64::NEG_INFINITY, f64::max)
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    fn combine_column(
        &mut self,
        op: &'static str,
        idx_t: usize,
        source: &Matrix,
        idx_s: usize,
        sign: f64,
    ) -> Result<()> {
        check_same_rows(op, source, self)?;
        self.check_col(idx_t)?;
        source.check_col(idx_s)?;
        for i in 0..self.rows {
            self[(i, idx_t)] += sign * source[(i, idx_s)];
        }
        Ok(())
    }

    fn combine_row(
        &mut self,
        op: &'static str,
        idx_t: usize,
        source: &Matrix,
        idx_s: usize,
        sign: f64,
    ) -> Result<()> {
        check_same_cols(op, source, self)?;
        let src = source.row(idx_s)?;
        for (t, &s) in self.row_mut(idx_t)?.iter_mut().zip(src) {
            *t += sign * s;
        }
        Ok(())
    }
}

fn check_same_rows(op: &'static str, source: &Matrix, target: &Matrix) -> Result<()> {
    if source.rows != target.rows {
        return Err(LinalgError::ShapeMismatch {
            op,
            expected: (source.rows, target.cols),
            got: target.shape(),
        });
    }
    Ok(())
}

fn check_same_cols(op: &'static str, source: &Matrix, target: &Matrix) -> Result<()> {
    if source.cols != target.cols {
        return Err(LinalgError::ShapeMismatch {
            op,
            expected: (target.rows, source.cols),
            got: target.shape(),
        });
    }
    Ok(())
}
