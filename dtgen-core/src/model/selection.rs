use std::fmt;

use rand::Rng;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::GenerationError;

/// Largest count a single row may select.
///
/// Bounds above it are rejected by `SelectionSpec::validate` and larger
/// counts are clamped when drawing.
pub const MAX_SELECTION_COUNT: usize = 10_000;

/// Policy deciding how many items a generation should select.
///
/// Resolved once from the raw row state (see `SelectionBounds::to_spec`)
/// so that the sampler never deals with half-set optional bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionSpec {
	/// Select exactly `n` items.
	Exactly(usize),
	/// Select a count drawn uniformly from `[low, high]`.
	Between(usize, usize),
	/// Select a count drawn uniformly from `[low, pool_size]`.
	AtLeast(usize),
	/// Select a count drawn uniformly from `[0, high]`.
	AtMost(usize),
	/// No bound supplied: nothing is selected.
	Unconstrained,
}

impl SelectionSpec {
	/// Checks the selection for contradictions the caller must fix.
	///
	/// # Errors
	/// - `InvertedRange` for `Between(low, high)` with `low > high`
	/// - `CountTooLarge` if a bound exceeds `MAX_SELECTION_COUNT`
	pub fn validate(&self) -> Result<(), GenerationError> {
		let largest = match *self {
			SelectionSpec::Between(low, high) if low > high => {
				return Err(GenerationError::InvertedRange { low, high });
			}
			SelectionSpec::Exactly(n) | SelectionSpec::AtLeast(n) | SelectionSpec::AtMost(n) => n,
			SelectionSpec::Between(_, high) => high,
			SelectionSpec::Unconstrained => 0,
		};
		if largest > MAX_SELECTION_COUNT {
			return Err(GenerationError::CountTooLarge { count: largest, max: MAX_SELECTION_COUNT });
		}
		Ok(())
	}

	/// Resolves a concrete sample size.
	///
	/// `0` means "no selection". This never fails: an inverted range that
	/// slipped past `validate`, or a pool smaller than `AtLeast` asks for,
	/// both resolve to `0`.
	///
	/// `Exactly(n)` is returned as-is; clamping to the pool happens when drawing.
	pub fn resolve_count<R: Rng + ?Sized>(&self, pool_size: usize, rng: &mut R) -> usize {
		match *self {
			SelectionSpec::Exactly(n) => n,
			SelectionSpec::Between(low, high) if low <= high => rng.random_range(low..=high),
			SelectionSpec::Between(_, _) => 0,
			SelectionSpec::AtLeast(low) if low <= pool_size => rng.random_range(low..=pool_size),
			SelectionSpec::AtLeast(_) => 0,
			SelectionSpec::AtMost(high) => rng.random_range(0..=high),
			SelectionSpec::Unconstrained => 0,
		}
	}
}

/// How the list size is configured in the row state.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
	#[default]
	Exactly,
	Between,
}

/// Raw count configuration as persisted by the options editor.
///
/// Bounds may arrive as numbers, numeric strings or empty strings (unset).
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SelectionBounds {
	#[serde(default)]
	pub list_type: ListType,
	#[serde(default, deserialize_with = "deserialize_bound")]
	pub exactly: Option<usize>,
	#[serde(default, deserialize_with = "deserialize_bound")]
	pub between_low: Option<usize>,
	#[serde(default, deserialize_with = "deserialize_bound")]
	pub between_high: Option<usize>,
}

impl SelectionBounds {
	/// Converts the raw bounds into a validated `SelectionSpec`.
	///
	/// A low bound of `0` counts as unset. A high bound of `0` is still set
	/// and yields `AtMost(0)`, i.e. an empty selection.
	///
	/// # Errors
	/// - `InvertedRange` when both bounds are set and `low > high`
	/// - `CountTooLarge` when a bound exceeds `MAX_SELECTION_COUNT`
	pub fn to_spec(&self) -> Result<SelectionSpec, GenerationError> {
		let low = self.between_low.filter(|low| *low > 0);
		let spec = match (self.list_type, low, self.between_high) {
			(ListType::Exactly, _, _) => SelectionSpec::Exactly(self.exactly.unwrap_or(0)),
			(ListType::Between, Some(low), Some(high)) if high > 0 => SelectionSpec::Between(low, high),
			(ListType::Between, Some(low), _) => SelectionSpec::AtLeast(low),
			(ListType::Between, None, Some(high)) => SelectionSpec::AtMost(high),
			(ListType::Between, None, None) => SelectionSpec::Unconstrained,
		};
		spec.validate()?;
		Ok(spec)
	}
}

struct BoundVisitor;

impl<'de> Visitor<'de> for BoundVisitor {
	type Value = Option<usize>;

	fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		formatter.write_str("a non-negative integer, a numeric string, an empty string or null")
	}

	fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
		usize::try_from(v).map(Some).map_err(E::custom)
	}

	fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
		usize::try_from(v)
			.map(Some)
			.map_err(|_| E::custom(format!("bound must be non-negative, got {v}")))
	}

	fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
		if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= usize::MAX as f64 {
			Ok(Some(v as usize))
		} else {
			Err(E::custom(format!("bound must be a non-negative integer, got {v}")))
		}
	}

	fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
		let v = v.trim();
		if v.is_empty() {
			return Ok(None);
		}
		v.parse::<usize>()
			.map(Some)
			.map_err(|_| E::custom(format!("bound must be an integer, got '{v}'")))
	}

	fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
		Ok(None)
	}

	fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
		Ok(None)
	}

	fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
		deserializer.deserialize_any(BoundVisitor)
	}
}

/// Accepts the loosely typed bounds of the legacy row state.
fn deserialize_bound<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
	deserializer.deserialize_option(BoundVisitor)
}
