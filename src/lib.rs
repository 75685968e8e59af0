//! A dimension-checked linear algebra library for real-time rendering.
//!
//! # Motivation
//!
//! Rendering code needs a small, predictable set of linear algebra operations:
//! view and projection matrices, rotation composition, and per-frame orientation
//! updates. This library provides exactly that set, with every operation checking
//! its operands' shapes at runtime and reporting incompatibilities as values
//! instead of panicking.
//!
//! # Goals & Non-Goals
//!
//! - Vector and matrix shapes are chosen at construction time, not in the type
//!   system. The shapes used in rendering are small (4-vectors, 4×4 matrices), so
//!   storage is kept inline on the stack for those sizes and only spills to the
//!   heap for larger shapes.
//! - All elements are [`f64`]. Buffers for GPU upload are produced by
//!   [`Vector::flatten`], which converts to the representation the graphics API
//!   expects.
//! - Every fallible operation returns a [`Result`] carrying a structured
//!   [`Error`]; nothing is caught or retried internally.
//! - No global state. In-place operations use function-local scratch buffers, so
//!   every operation is re-entrant and all types are `Send + Sync`.
//! - No sparse matrices, no arbitrary precision, and no GPU resource management.

mod attitude;
mod error;
mod matrix;
mod quat;
mod shape;
mod traits;
mod vector;

pub use attitude::*;
pub use error::*;
pub use matrix::*;
pub use quat::*;
pub use shape::*;
pub use traits::*;
pub use vector::*;
