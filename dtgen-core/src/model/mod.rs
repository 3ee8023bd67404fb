//! Top-level module for data-type generation.
//!
//! This module provides:
//! - Weighted candidate sets and selection policies (`WeightedCandidateSet`, `SelectionSpec`)
//! - Weighted subset sampling with and without replacement (`WeightedSampler`)
//! - The `WeightedList` and `Names` data types behind a common `DataType` seam
//! - Export metadata (`DataTypeMetadata`)

/// Label to weight mapping with validated, insertion-ordered entries.
pub mod candidates;

/// Selection policies and the loosely typed row-state bounds they are built from.
pub mod selection;

/// Weighted random subset selection.
///
/// Chooses between cumulative search, linear scan with removal and
/// exponential keys depending on pool size and duplicate mode.
pub mod sampler;

/// Common interface of data types and the per-row result.
pub mod data_type;

/// SQL column descriptors used for export.
pub mod metadata;

/// WeightedList data type: weighted subsets joined by a delimiter.
pub mod weighted_list;

/// Names data type: options, presets and placeholder expansion.
pub mod names;

/// First-name and surname banks, built-in and per country.
pub mod name_bank;

pub use candidates::{Candidate, WeightedCandidateSet};
pub use data_type::{DataType, GenerateResult};
pub use metadata::{DataTypeMetadata, SqlMetadata};
pub use name_bank::{BankChoice, NameBank, NameKind, NameRegistry};
pub use names::{Names, NamesExample, NamesOptions, NamesSource, EXAMPLES};
pub use sampler::{draw_weighted_subset, WeightedSampler};
pub use selection::{ListType, SelectionBounds, SelectionSpec, MAX_SELECTION_COUNT};
pub use weighted_list::{WeightedList, WeightedListOptions};
