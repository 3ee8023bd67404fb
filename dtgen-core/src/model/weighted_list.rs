use rand::Rng;
use serde::{Deserialize, Serialize};

use super::candidates::WeightedCandidateSet;
use super::data_type::{DataType, GenerateResult};
use super::metadata::{DataTypeMetadata, SqlMetadata};
use super::sampler::draw_weighted_subset;
use super::selection::{SelectionBounds, SelectionSpec};
use crate::error::GenerationError;

fn default_delimiter() -> String {
	", ".to_owned()
}

/// Row state of the WeightedList data type.
///
/// Mirrors the JSON saved by the options editor:
/// `{ listType, values, exactly, betweenLow, betweenHigh, delimiter, allowDuplicates }`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeightedListOptions {
	#[serde(flatten)]
	pub bounds: SelectionBounds,
	#[serde(default)]
	pub values: WeightedCandidateSet,
	#[serde(default = "default_delimiter")]
	pub delimiter: String,
	#[serde(default)]
	pub allow_duplicates: bool,
}

impl Default for WeightedListOptions {
	fn default() -> Self {
		Self {
			bounds: SelectionBounds::default(),
			values: WeightedCandidateSet::new(),
			delimiter: default_delimiter(),
			allow_duplicates: false,
		}
	}
}

impl WeightedListOptions {
	/// Resolved selection policy.
	///
	/// # Errors
	/// `InvertedRange` if both bounds are set and inverted, `CountTooLarge`
	/// if a bound exceeds `MAX_SELECTION_COUNT`.
	pub fn selection(&self) -> Result<SelectionSpec, GenerationError> {
		self.bounds.to_spec()
	}
}

/// Weighted random subsets joined into a single string.
#[derive(Clone, Copy, Debug, Default)]
pub struct WeightedList;

impl DataType for WeightedList {
	type Options = WeightedListOptions;

	fn name(&self) -> &'static str {
		"WeightedList"
	}

	fn metadata(&self) -> DataTypeMetadata {
		DataTypeMetadata { sql: SqlMetadata::nullable_varchar(255) }
	}

	fn generate<R: Rng + ?Sized>(&self, options: &WeightedListOptions, rng: &mut R) -> Result<GenerateResult, GenerationError> {
		let spec = options.selection()?;
		let count = spec.resolve_count(options.values.len(), rng);
		let items = draw_weighted_subset(&options.values, count, options.allow_duplicates, rng);
		Ok(GenerateResult::new(items.join(options.delimiter.as_str())))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn options(json: &str) -> WeightedListOptions {
		serde_json::from_str(json).unwrap()
	}

	#[test]
	fn exactly_two_of_three_with_a_zero_weight() {
		let options = options(
			r#"{"listType": "exactly", "exactly": 2, "values": {"A": 1, "B": 1, "C": 0}, "delimiter": ",", "allowDuplicates": false}"#,
		);
		let mut rng = StdRng::seed_from_u64(11);
		for _ in 0..100 {
			let display = WeightedList.generate(&options, &mut rng).unwrap().display;
			assert!(display == "A,B" || display == "B,A", "{display}");
		}
	}

	#[test]
	fn empty_values_give_empty_display() {
		let mut rng = StdRng::seed_from_u64(12);
		for json in [
			r#"{"listType": "exactly", "exactly": 3}"#,
			r#"{"listType": "between", "betweenLow": 1, "betweenHigh": 3}"#,
			r#"{"listType": "between", "betweenLow": 1}"#,
			r#"{"listType": "between", "betweenHigh": 3}"#,
			r#"{"listType": "between"}"#,
		] {
			let result = WeightedList.generate(&options(json), &mut rng).unwrap();
			assert_eq!(result.display, "", "{json}");
		}
	}

	#[test]
	fn defaults_apply_to_missing_fields() {
		let options = options(r#"{"exactly": 1, "values": {"only": 2}}"#);
		assert_eq!(options.delimiter, ", ");
		assert!(!options.allow_duplicates);
		let mut rng = StdRng::seed_from_u64(13);
		assert_eq!(WeightedList.generate(&options, &mut rng).unwrap().display, "only");
	}

	#[test]
	fn duplicates_repeat_with_delimiter() {
		let options = options(
			r#"{"listType": "exactly", "exactly": 3, "values": {"x": 1}, "delimiter": "|", "allowDuplicates": true}"#,
		);
		let mut rng = StdRng::seed_from_u64(14);
		assert_eq!(WeightedList.generate(&options, &mut rng).unwrap().display, "x|x|x");
	}

	#[test]
	fn inverted_range_is_reported() {
		let options = options(r#"{"listType": "between", "betweenLow": 4, "betweenHigh": 2, "values": {"a": 1}}"#);
		let mut rng = StdRng::seed_from_u64(15);
		assert!(matches!(
			WeightedList.generate(&options, &mut rng),
			Err(GenerationError::InvertedRange { low: 4, high: 2 })
		));
	}

	#[test]
	fn oversized_count_with_duplicates_is_reported() {
		let options = options(
			r#"{"listType": "exactly", "exactly": 1000000000000000000, "values": {"a": 1}, "allowDuplicates": true}"#,
		);
		let mut rng = StdRng::seed_from_u64(16);
		assert!(matches!(
			WeightedList.generate(&options, &mut rng),
			Err(GenerationError::CountTooLarge { .. })
		));
	}

	#[test]
	fn metadata_is_a_nullable_string_column() {
		assert_eq!(WeightedList.metadata().sql.field, "varchar(255) default NULL");
		assert_eq!(WeightedList.name(), "WeightedList");
	}
}
