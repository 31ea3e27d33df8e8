//! Dense 2-D matrix with contiguous row-major storage.
//!
//! [`Matrix`] is the buffer every algorithm in this crate reads and writes.
//! It owns a single `Vec<f64>` of `rows * cols` entries and exposes
//! bounds-checked `(row, col)` access. Elementary algebra lives in the
//! `ops` submodule, constructors and pattern fills in `create`, and table
//! formatting in `display`.

mod create;
mod display;
mod ops;

use std::ops::{Index, IndexMut};

use crate::error::{LinalgError, Result};

pub use create::Pattern;
pub use display::{NoRender, Render, RenderConfig, TableDisplay, TracingRender};

/// A dense matrix of `f64` values.
///
/// Data is stored contiguously in row-major order. The matrix owns its
/// buffer and cloning performs a deep copy. Both dimensions are at least 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    // ------------------------------------------------------------------
    // Construction from raw parts
    // ------------------------------------------------------------------

    /// Create a matrix from a flat row-major vector.
    ///
    /// Returns an error if either dimension is zero or if
    /// `data.len() != rows * cols`.
    ///
    /// ```
    /// # use densela_core::Matrix;
    /// let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    /// assert_eq!(m.shape(), (2, 3));
    /// assert_eq!(m[(1, 0)], 4.0);
    /// ```
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        check_shape(rows, cols)?;
        if data.len() != rows * cols {
            return Err(LinalgError::LengthMismatch {
                expected: rows * cols,
                got: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Create a matrix from a flat slice (copies the data).
    pub fn from_slice(rows: usize, cols: usize, data: &[f64]) -> Result<Self> {
        Self::from_vec(rows, cols, data.to_vec())
    }

    /// Create a matrix from a list of equally long rows.
    ///
    /// ```
    /// # use densela_core::Matrix;
    /// let m = Matrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]).unwrap();
    /// assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    /// ```
    pub fn from_rows(rows: &[&[f64]]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.len());
        check_shape(rows.len(), cols)?;
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(LinalgError::LengthMismatch {
                    expected: cols,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: a matrix has at least one entry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether `rows == cols`.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// A flat slice of all entries in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// A mutable flat slice of all entries in row-major order.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the matrix and return the underlying buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    // ------------------------------------------------------------------
    // Element access
    // ------------------------------------------------------------------

    fn flat_index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(LinalgError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    /// The entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        let flat = self.flat_index(row, col)?;
        Ok(self.data[flat])
    }

    /// A mutable reference to the entry at `(row, col)`.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut f64> {
        let flat = self.flat_index(row, col)?;
        Ok(&mut self.data[flat])
    }

    /// Overwrite the entry at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let flat = self.flat_index(row, col)?;
        self.data[flat] = value;
        Ok(())
    }

    /// Row `idx` as a slice.
    pub fn row(&self, idx: usize) -> Result<&[f64]> {
        self.check_row(idx)?;
        let start = idx * self.cols;
        Ok(&self.data[start..start + self.cols])
    }

    /// Row `idx` as a mutable slice.
    pub fn row_mut(&mut self, idx: usize) -> Result<&mut [f64]> {
        self.check_row(idx)?;
        let start = idx * self.cols;
        Ok(&mut self.data[start..start + self.cols])
    }

    /// Column `idx`, top to bottom.
    pub fn column(&self, idx: usize) -> Result<impl Iterator<Item = f64> + '_> {
        self.check_col(idx)?;
        Ok(self.data.iter().skip(idx).step_by(self.cols).copied())
    }

    /// Overwrite every entry with a flat row-major sequence.
    ///
    /// Fails if `values.len() != rows * cols`.
    pub fn fill(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.data.len() {
            return Err(LinalgError::LengthMismatch {
                expected: self.data.len(),
                got: values.len(),
            });
        }
        self.data.copy_from_slice(values);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Iterators / map
    // ------------------------------------------------------------------

    /// Iterate over all entries in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.data.iter()
    }

    /// Iterate mutably over all entries in row-major order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut f64> {
        self.data.iter_mut()
    }

    /// Apply a function to every entry, returning a new matrix.
    pub fn map<F>(&self, f: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            data: self.data.iter().map(|&x| f(x)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Apply a function to every entry in place.
    pub fn apply<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64,
    {
        for x in &mut self.data {
            *x = f(*x);
        }
    }

    // ------------------------------------------------------------------
    // Validation helpers shared by the algebra kernels
    // ------------------------------------------------------------------

    pub(crate) fn check_row(&self, idx: usize) -> Result<()> {
        if idx >= self.rows {
            return Err(LinalgError::IndexOutOfRange {
                row: idx,
                col: 0,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    pub(crate) fn check_col(&self, idx: usize) -> Result<()> {
        if idx >= self.cols {
            return Err(LinalgError::IndexOutOfRange {
                row: 0,
                col: idx,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    pub(crate) fn expect_shape(&self, op: &'static str, rows: usize, cols: usize) -> Result<()> {
        if self.shape() != (rows, cols) {
            return Err(LinalgError::ShapeMismatch {
                op,
                expected: (rows, cols),
                got: self.shape(),
            });
        }
        Ok(())
    }
}

/// Unchecked-by-`Result` access: panics when `(row, col)` is out of range.
impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of range for {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of range for {}x{} matrix",
            self.rows,
            self.cols
        );
        &mut self.data[row * self.cols + col]
    }
}

// ======================================================================
// Utility functions
// ======================================================================

pub(crate) fn check_shape(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(LinalgError::InvalidShape {
            rows,
            cols,
            reason: "matrices need at least one row and one column",
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec() {
        let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.len(), 6);
        assert!(!m.is_square());
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        let r = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0]);
        assert_eq!(
            r.unwrap_err(),
            LinalgError::LengthMismatch {
                expected: 6,
                got: 3
            }
        );
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            Matrix::from_vec(0, 3, vec![]),
            Err(LinalgError::InvalidShape { .. })
        ));
        assert!(Matrix::from_rows(&[]).is_err());
    }

    #[test]
    fn test_from_rows_ragged() {
        let r = Matrix::from_rows(&[&[1.0, 2.0], &[3.0]]);
        assert!(matches!(r, Err(LinalgError::LengthMismatch { .. })));
    }

    #[test]
    fn test_get_set() {
        let mut m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.get(0, 0).unwrap(), 1.0);
        assert_eq!(m.get(1, 2).unwrap(), 6.0);
        m.set(0, 1, 99.0).unwrap();
        assert_eq!(m[(0, 1)], 99.0);
        *m.get_mut(1, 1).unwrap() = -1.0;
        assert_eq!(m.get(1, 1).unwrap(), -1.0);
    }

    #[test]
    fn test_get_out_of_range() {
        let m = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(
            m.get(2, 0).unwrap_err(),
            LinalgError::IndexOutOfRange {
                row: 2,
                col: 0,
                rows: 2,
                cols: 2
            }
        );
        assert!(m.get(0, 2).is_err());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_out_of_range_panics() {
        let m = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let _ = m[(0, 5)];
    }

    #[test]
    fn test_row_and_column() {
        let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.row(1).unwrap(), &[4.0, 5.0, 6.0]);
        let col: Vec<f64> = m.column(2).unwrap().collect();
        assert_eq!(col, vec![3.0, 6.0]);
        assert!(m.row(2).is_err());
        assert!(m.column(3).is_err());
    }

    #[test]
    fn test_fill() {
        let mut m = Matrix::zeros(2, 2);
        m.fill(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m[(1, 0)], 3.0);
        assert!(m.fill(&[1.0]).is_err());
    }

    #[test]
    fn test_map_apply() {
        let mut m = Matrix::from_vec(1, 3, vec![1.0, -2.0, 3.0]).unwrap();
        let doubled = m.map(|x| x * 2.0);
        assert_eq!(doubled.as_slice(), &[2.0, -4.0, 6.0]);
        m.apply(f64::abs);
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0]);
    }
}
