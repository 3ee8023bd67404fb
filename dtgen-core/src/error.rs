use thiserror::Error;

/// Errors reported at the input boundary.
///
/// Sampling itself never fails: these only cover configurations the caller
/// controls directly and must fix (bad weights, inverted ranges, unreadable
/// name banks).
#[derive(Debug, Error)]
pub enum GenerationError {
	#[error("weight for '{label}' must be non-negative, got {weight}")]
	NegativeWeight { label: String, weight: f64 },

	#[error("weight for '{label}' must be finite, got {weight}")]
	NonFiniteWeight { label: String, weight: f64 },

	#[error("duplicate candidate label: '{0}'")]
	DuplicateLabel(String),

	#[error("total weight overflows")]
	WeightOverflow,

	#[error("inverted range: low ({low}) is greater than high ({high})")]
	InvertedRange { low: usize, high: usize },

	#[error("selection count {count} exceeds the maximum of {max}")]
	CountTooLarge { count: usize, max: usize },

	#[error("unknown country: '{0}'")]
	UnknownCountry(String),

	#[error("name bank '{0}' has an empty name list")]
	EmptyNameBank(String),

	#[error("expected a directory, got: {0}")]
	NotADirectory(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("invalid JSON: {0}")]
	Json(#[from] serde_json::Error),
}
