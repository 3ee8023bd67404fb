use std::collections::HashSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::GenerationError;

/// A single labeled item eligible for selection.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
	label: String,
	weight: f64,
}

impl Candidate {
	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn weight(&self) -> f64 {
		self.weight
	}
}

/// Mapping from candidate label to selection weight.
///
/// Labels are unique and kept in insertion order. Order carries no meaning
/// for selection, it only makes seeded runs reproducible.
///
/// # Invariants
/// - Every weight is finite and `>= 0.0`
/// - A weight of `0.0` is legal and marks a candidate that is never selected
/// - The sum of all weights is finite
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeightedCandidateSet {
	candidates: Vec<Candidate>,
	labels: HashSet<String>,
	total: f64,
}

impl WeightedCandidateSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a candidate.
	///
	/// # Errors
	/// - `NegativeWeight` / `NonFiniteWeight` if the weight is out of domain
	/// - `DuplicateLabel` if the label is already present
	/// - `WeightOverflow` if the running total stops being finite
	pub fn insert<S: Into<String>>(&mut self, label: S, weight: f64) -> Result<(), GenerationError> {
		let label = label.into();
		if !weight.is_finite() {
			return Err(GenerationError::NonFiniteWeight { label, weight });
		}
		if weight < 0.0 {
			return Err(GenerationError::NegativeWeight { label, weight });
		}
		if self.labels.contains(&label) {
			return Err(GenerationError::DuplicateLabel(label));
		}
		let total = self.total + weight;
		if !total.is_finite() {
			return Err(GenerationError::WeightOverflow);
		}

		self.total = total;
		self.labels.insert(label.clone());
		self.candidates.push(Candidate { label, weight });
		Ok(())
	}

	pub fn len(&self) -> usize {
		self.candidates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.candidates.is_empty()
	}

	/// Number of candidates that can actually be drawn (weight > 0).
	pub fn positive_len(&self) -> usize {
		self.candidates.iter().filter(|c| c.weight > 0.0).count()
	}

	pub fn total_weight(&self) -> f64 {
		self.total
	}

	pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
		self.candidates.iter()
	}

	pub(crate) fn as_slice(&self) -> &[Candidate] {
		&self.candidates
	}
}

impl<S: Into<String>> TryFrom<Vec<(S, f64)>> for WeightedCandidateSet {
	type Error = GenerationError;

	fn try_from(values: Vec<(S, f64)>) -> Result<Self, Self::Error> {
		let mut set = Self::new();
		for (label, weight) in values {
			set.insert(label, weight)?;
		}
		Ok(set)
	}
}

impl Serialize for WeightedCandidateSet {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.candidates.len()))?;
		for candidate in &self.candidates {
			map.serialize_entry(&candidate.label, &candidate.weight)?;
		}
		map.end()
	}
}

struct CandidateSetVisitor;

impl<'de> Visitor<'de> for CandidateSetVisitor {
	type Value = WeightedCandidateSet;

	fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		formatter.write_str("a map of label to non-negative weight")
	}

	fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
		let mut set = WeightedCandidateSet::new();
		while let Some((label, weight)) = access.next_entry::<String, f64>()? {
			set.insert(label, weight).map_err(serde::de::Error::custom)?;
		}
		Ok(set)
	}
}

impl<'de> Deserialize<'de> for WeightedCandidateSet {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_map(CandidateSetVisitor)
	}
}
