//! Matrix creation and pattern initialization.

use rand::Rng;

use crate::error::Result;

use super::{Matrix, check_shape};

/// Fill patterns accepted by [`Matrix::fill_pattern`].
///
/// Every pattern writes every cell; cells outside the pattern are set to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Every cell is `value`.
    Uniform,
    /// `value` on the main diagonal.
    Identity,
    /// `value` on and above the main diagonal.
    UpperTriangular,
    /// `value` on and below the main diagonal.
    LowerTriangular,
    /// Independent uniform draws in `[0, value)`.
    Random,
}

impl Matrix {
    /// Create a matrix filled with zeros.
    ///
    /// # Panics
    ///
    /// Panics if `rows` or `cols` is zero.
    ///
    /// ```
    /// # use densela_core::Matrix;
    /// let m = Matrix::zeros(2, 3);
    /// assert_eq!(m.shape(), (2, 3));
    /// assert!(m.iter().all(|&x| x == 0.0));
    /// ```
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::full(rows, cols, 0.0)
    }

    /// Create a matrix with every entry set to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `rows` or `cols` is zero.
    pub fn full(rows: usize, cols: usize, value: f64) -> Self {
        assert!(
            rows > 0 && cols > 0,
            "matrix dimensions must be non-zero, got {rows}x{cols}"
        );
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Create an `n x n` identity matrix.
    ///
    /// ```
    /// # use densela_core::Matrix;
    /// let eye = Matrix::identity(3);
    /// assert_eq!(eye[(0, 0)], 1.0);
    /// assert_eq!(eye[(0, 1)], 0.0);
    /// ```
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Create a matrix initialized with a deterministic pattern.
    ///
    /// [`Pattern::Random`] draws from the thread-local generator; use
    /// [`Matrix::random`] for reproducible fills.
    pub fn with_pattern(rows: usize, cols: usize, value: f64, pattern: Pattern) -> Result<Self> {
        check_shape(rows, cols)?;
        let mut m = Self::zeros(rows, cols);
        m.fill_pattern(value, pattern);
        Ok(m)
    }

    /// Create a matrix of uniform draws in `[0, scale)` from `rng`.
    ///
    /// ```
    /// # use densela_core::Matrix;
    /// use rand::SeedableRng;
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    /// let m = Matrix::random(3, 2, 10.0, &mut rng).unwrap();
    /// assert!(m.iter().all(|&x| (0.0..10.0).contains(&x)));
    /// ```
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        scale: f64,
        rng: &mut R,
    ) -> Result<Self> {
        check_shape(rows, cols)?;
        let mut m = Self::zeros(rows, cols);
        m.fill_pattern_with(scale, Pattern::Random, rng);
        Ok(m)
    }

    /// Overwrite every cell according to `pattern`.
    ///
    /// Only [`Pattern::Random`] touches the thread-local generator.
    pub fn fill_pattern(&mut self, value: f64, pattern: Pattern) {
        match pattern {
            Pattern::Random => self.fill_random(value, &mut rand::rng()),
            _ => self.fill_cells(value, pattern),
        }
    }

    /// Overwrite every cell according to `pattern`, drawing random values
    /// from `rng`.
    ///
    /// `rng` is left untouched unless `pattern` is [`Pattern::Random`].
    pub fn fill_pattern_with<R: Rng + ?Sized>(&mut self, value: f64, pattern: Pattern, rng: &mut R) {
        match pattern {
            Pattern::Random => self.fill_random(value, rng),
            _ => self.fill_cells(value, pattern),
        }
    }

    fn fill_random<R: Rng + ?Sized>(&mut self, value: f64, rng: &mut R) {
        for cell in &mut self.data {
            *cell = rng.random::<f64>() * value;
        }
    }

    fn fill_cells(&mut self, value: f64, pattern: Pattern) {
        let cols = self.cols;
        for (flat, cell) in self.data.iter_mut().enumerate() {
            let (i, j) = (flat / cols, flat % cols);
            *cell = match pattern {
                Pattern::Uniform => value,
                Pattern::Identity if i == j => value,
                Pattern::UpperTriangular if i <= j => value,
                Pattern::LowerTriangular if i >= j => value,
                _ => 0.0,
            };
        }
    }
}
