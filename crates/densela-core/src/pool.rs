//! Fixed-depth pools of pre-allocated scratch matrices.
//!
//! Iterative algorithms such as Householder QR need a handful of temporary
//! matrices per step. A [`ScratchPool`] allocates them once, up front, and
//! hands them out in LIFO order:
//!
//! - [`ScratchPool::acquire`] / [`ScratchPool::release`] move ownership of a
//!   [`Matrix`] out of and back into the pool explicitly.
//! - [`ScratchPool::take`] returns a [`Scratch`] guard that puts the matrix
//!   back when dropped, so early returns on `?` cannot leak it.
//!
//! Matrices come out of the pool with whatever contents they had when they
//! were returned. Callers initialize them before reading.
//!
//! A pool is `!Sync`: it serves one algorithm invocation at a time.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};

use crate::error::{LinalgError, Result};
use crate::matrix::{Matrix, check_shape};

/// A LIFO stack of same-shaped scratch matrices.
#[derive(Debug)]
pub struct ScratchPool {
    rows: usize,
    cols: usize,
    depth: usize,
    free: RefCell<Vec<Matrix>>,
}

impl ScratchPool {
    /// Allocate `depth` zeroed matrices of shape `rows x cols`.
    ///
    /// ```
    /// # use densela_core::ScratchPool;
    /// let pool = ScratchPool::new(3, 3, 2).unwrap();
    /// let a = pool.acquire().unwrap();
    /// assert_eq!(a.shape(), (3, 3));
    /// assert_eq!(pool.cur_depth(), 1);
    /// pool.release(a).unwrap();
    /// assert_eq!(pool.cur_depth(), 2);
    /// ```
    pub fn new(rows: usize, cols: usize, depth: usize) -> Result<Self> {
        check_shape(rows, cols)?;
        if depth == 0 {
            return Err(LinalgError::InvalidShape {
                rows,
                cols,
                reason: "scratch pool depth must be at least 1",
            });
        }
        let free = (0..depth).map(|_| Matrix::zeros(rows, cols)).collect();
        Ok(Self {
            rows,
            cols,
            depth,
            free: RefCell::new(free),
        })
    }

    /// Shape shared by every matrix in the pool.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Capacity of the pool.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of matrices currently available.
    pub fn cur_depth(&self) -> usize {
        self.free.borrow().len()
    }

    /// Number of matrices currently borrowed.
    pub fn in_use(&self) -> usize {
        self.depth - self.cur_depth()
    }

    /// Pop the most recently returned matrix.
    ///
    /// Fails with [`LinalgError::StackUnderflow`] when every matrix is
    /// already borrowed.
    pub fn acquire(&self) -> Result<Matrix> {
        self.free
            .borrow_mut()
            .pop()
            .ok_or(LinalgError::StackUnderflow {
                rows: self.rows,
                cols: self.cols,
                depth: self.depth,
            })
    }

    /// Push a matrix back onto the pool.
    ///
    /// Release order need not mirror acquire order. Fails with
    /// [`LinalgError::StackOverflow`] when the pool is already full and with
    /// [`LinalgError::ShapeMismatch`] when `matrix` has a different shape.
    pub fn release(&self, matrix: Matrix) -> Result<()> {
        matrix.expect_shape("release", self.rows, self.cols)?;
        let mut free = self.free.borrow_mut();
        if free.len() == self.depth {
            return Err(LinalgError::StackOverflow {
                rows: self.rows,
                cols: self.cols,
                depth: self.depth,
            });
        }
        free.push(matrix);
        Ok(())
    }

    /// Borrow a matrix for the lifetime of the returned guard.
    ///
    /// ```
    /// # use densela_core::ScratchPool;
    /// let pool = ScratchPool::new(2, 1, 1).unwrap();
    /// {
    ///     let mut v = pool.take().unwrap();
    ///     v[(0, 0)] = 1.0;
    ///     assert!(pool.take().is_err());
    /// }
    /// assert_eq!(pool.cur_depth(), 1);
    /// ```
    pub fn take(&self) -> Result<Scratch<'_>> {
        let matrix = self.acquire()?;
        Ok(Scratch {
            pool: self,
            matrix: Some(matrix),
        })
    }
}

/// A matrix on loan from a [`ScratchPool`], returned on drop.
#[derive(Debug)]
pub struct Scratch<'a> {
    pool: &'a ScratchPool,
    matrix: Option<Matrix>,
}

impl Scratch<'_> {
    /// Detach the matrix from the guard.
    ///
    /// The pool no longer gets it back automatically; hand it to
    /// [`ScratchPool::release`] when done.
    pub fn into_inner(mut self) -> Matrix {
        self.matrix
            .take()
            .unwrap_or_else(|| unreachable!("scratch guard already emptied"))
    }
}

impl Deref for Scratch<'_> {
    type Target = Matrix;

    fn deref(&self) -> &Matrix {
        self.matrix
            .as_ref()
            .unwrap_or_else(|| unreachable!("scratch guard already emptied"))
    }
}

impl DerefMut for Scratch<'_> {
    fn deref_mut(&mut self) -> &mut Matrix {
        self.matrix
            .as_mut()
            .unwrap_or_else(|| unreachable!("scratch guard already emptied"))
    }
}

impl Drop for Scratch<'_> {
    fn drop(&mut self) {
        if let Some(matrix) = self.matrix.take() {
            if let Err(err) = self.pool.release(matrix) {
                tracing::warn!(%err, "scratch matrix could not be returned to its pool");
            }
        }
    }
}
