use rand::Rng;
use serde::{Deserialize, Serialize};

use super::metadata::DataTypeMetadata;
use crate::error::GenerationError;

/// Value produced for one row.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateResult {
	/// Text shown in the generated row (may be empty).
	pub display: String,
}

impl GenerateResult {
	pub fn new<S: Into<String>>(display: S) -> Self {
		Self { display: display.into() }
	}
}

/// A generator plugged into the data generation pipeline.
///
/// `generate` receives the row state saved by the options editor and a
/// random source owned by the caller. It must not keep state between calls.
pub trait DataType {
	/// Row state consumed by `generate`.
	type Options;

	/// Stable identifier of the data type.
	fn name(&self) -> &'static str;

	fn metadata(&self) -> DataTypeMetadata;

	/// Produces one row.
	///
	/// # Errors
	/// Only for options the caller must fix (see `GenerationError`).
	/// Degenerate but valid input yields an empty display instead.
	fn generate<R: Rng + ?Sized>(&self, options: &Self::Options, rng: &mut R) -> Result<GenerateResult, GenerationError>;
}
