//! Numeric primitives: arbitrary-precision integers, decimal floats and
//! binary floats, plus the shared precision context.
//!
//! The engine crate builds every value kind on top of these types; this
//! crate knows nothing about the value lattice.

pub mod ctx;
pub mod dec;
pub mod flt;
pub mod int;

pub use ctx::NumCtx;
pub use dec::Dec;
pub use flt::Flt;
