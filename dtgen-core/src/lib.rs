//! Data-type generation library.
//!
//! This crate provides the generation side of two data types used for
//! bulk fake-data production:
//! - `WeightedList`: weighted random subsets of user supplied values
//! - `Names`: person names expanded from format placeholders
//! - Export metadata (SQL column descriptors) for both
//!
//! Generation is best-effort: malformed ranges or exhausted pools produce
//! short or empty values instead of errors. Only contract violations
//! (negative weights, inverted ranges) are reported, at the boundary.

/// Data types, weighted sampling and selection policies.
pub mod model;

/// Errors raised when validating generation input.
pub mod error;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use error::GenerationError;
