//! `densela-core`: dense-matrix linear algebra.
//!
//! Provides the [`Matrix`] store and its elementary algebra, fixed-depth
//! [`ScratchPool`]s of reusable temporaries, QR/LU factorizations,
//! elimination and substitution solvers, least-squares estimation, and
//! accuracy diagnostics.
//!
//! # Design
//!
//! - Entries are `f64`, stored row-major in one owned buffer.
//! - Algorithms write into caller-supplied outputs and return
//!   [`Result`]; contract violations surface as [`LinalgError`] at once.
//! - Nothing prints. Each algorithm has a `*_with` variant that hands
//!   intermediate matrices to a [`Render`] hook, and emits `tracing`
//!   events for the caller's subscriber.

pub mod error;
pub mod linalg;
pub mod matrix;
pub mod pool;
pub mod precision;

#[cfg(test)]
mod proptests;

// Re-export key types at crate root for convenience.
pub use error::{LinalgError, Result};
pub use matrix::{Matrix, NoRender, Pattern, Render, RenderConfig, TracingRender};
pub use pool::{Scratch, ScratchPool};
pub use precision::Deviation;

/// Pivots and diagonal entries with a smaller magnitude are treated as zero.
pub const PIVOT_TOLERANCE: f64 = 1e-14;

/// Items intended for glob-import: `use densela_core::prelude::*;`
pub mod prelude {
    pub use crate::PIVOT_TOLERANCE;
    pub use crate::error::{LinalgError, Result};
    pub use crate::linalg::{self, HouseholderScratch, Orientation};
    pub use crate::matrix::{Matrix, NoRender, Pattern, Render, RenderConfig, TracingRender};
    pub use crate::pool::{Scratch, ScratchPool};
    pub use crate::precision::{Deviation, identity_deviation, pairwise_deviation};
}
