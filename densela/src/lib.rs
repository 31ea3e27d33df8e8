//! # Densela
//!
//! Dense-matrix linear algebra: QR and LU factorizations, Gaussian and
//! Gauss-Jordan elimination, triangular solves, least squares and linear
//! regression, built on a row-major `f64` [`Matrix`](densela_core::Matrix)
//! and pooled scratch storage.
//!
//! One `use densela::prelude::*;` brings the matrix type, the error type,
//! the render hooks and the `linalg` module into scope.
//!
//! ```
//! # #[cfg(feature = "core")] {
//! use densela::prelude::*;
//!
//! let a = Matrix::from_rows(&[&[4.0, 7.0], &[2.0, 6.0]])?;
//! let inv = linalg::inverse(&a)?;
//! assert!(identity_deviation(&a.matmul(&inv)?).within(1e-12));
//! # }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Enables |
//! |---------|---------|
//! | `core` *(default)* | Matrix store, scratch pools, factorizations, solvers |
//!
//! With `core` disabled the crate compiles empty.

#[cfg(feature = "core")]
pub use densela_core as core;

/// Glob-import convenience: `use densela::prelude::*;`
#[cfg(feature = "core")]
pub mod prelude {
    pub use densela_core::prelude::*;
}
