use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::data_type::{DataType, GenerateResult};
use super::metadata::{DataTypeMetadata, SqlMetadata};
use super::name_bank::{BankChoice, NameKind, NameRegistry};
use crate::error::GenerationError;

/// Where first names and surnames are taken from.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NamesSource {
	/// Mostly western names (built-in bank).
	#[default]
	Any,
	/// Names of the selected countries.
	Countries,
}

/// A format preset offered by the options editor.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct NamesExample {
	pub value: &'static str,
	pub label: &'static str,
}

/// Format presets. A value may hold several formats separated by `|`.
pub const EXAMPLES: [NamesExample; 11] = [
	NamesExample { value: "Name Surname", label: "Full name" },
	NamesExample { value: "Name", label: "First name" },
	NamesExample { value: "MaleName", label: "Male first name" },
	NamesExample { value: "FemaleName", label: "Female first name" },
	NamesExample { value: "MaleName Surname", label: "Male full name" },
	NamesExample { value: "FemaleName Surname", label: "Female full name" },
	NamesExample { value: "Name Initial. Surname", label: "Full name with initial" },
	NamesExample { value: "Surname", label: "Surname" },
	NamesExample { value: "Surname, Name Initial.", label: "Surname first, with initial" },
	NamesExample { value: "Name, Name, Name, Name", label: "Four first names" },
	NamesExample { value: "Name Surname|Name Initial. Surname", label: "Mixed full names" },
];

const DEFAULT_EXAMPLE: &str = "Name Surname";

/// Row state of the Names data type.
///
/// Missing fields take the initial state values, so partially saved
/// configurations from older editors still load.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct NamesOptions {
	/// Selected preset, kept for the editor.
	pub example: String,
	/// Formats to pick from, one per generated row.
	pub options: Vec<String>,
	pub source: NamesSource,
	/// Country codes used when `source` is `Countries`.
	pub selected_countries: BTreeSet<String>,
}

impl Default for NamesOptions {
	fn default() -> Self {
		Self {
			example: DEFAULT_EXAMPLE.to_owned(),
			options: vec![DEFAULT_EXAMPLE.to_owned()],
			source: NamesSource::Any,
			selected_countries: BTreeSet::new(),
		}
	}
}

impl NamesOptions {
	/// Initial state with the formats of a preset value.
	pub fn from_example(value: &str) -> Self {
		let mut options = Self::default();
		options.set_example(value);
		options
	}

	/// Switches to a preset; source and countries are kept.
	pub fn set_example(&mut self, value: &str) {
		self.example = value.to_owned();
		self.options = value.split('|').map(str::to_owned).collect();
	}

	/// The formats the generator consumes.
	pub fn row_state(&self) -> &[String] {
		&self.options
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Placeholder {
	Name,
	MaleName,
	FemaleName,
	Initial,
	Surname,
}

impl Placeholder {
	fn from_word(word: &str) -> Option<Self> {
		match word {
			"Name" => Some(Placeholder::Name),
			"MaleName" => Some(Placeholder::MaleName),
			"FemaleName" => Some(Placeholder::FemaleName),
			"Initial" => Some(Placeholder::Initial),
			"Surname" => Some(Placeholder::Surname),
			_ => None,
		}
	}

	fn push_value<R: Rng + ?Sized>(self, bank: BankChoice<'_>, rng: &mut R, out: &mut String) {
		match self {
			Placeholder::Name => out.push_str(bank.pick(NameKind::First, rng)),
			Placeholder::MaleName => out.push_str(bank.pick(NameKind::Male, rng)),
			Placeholder::FemaleName => out.push_str(bank.pick(NameKind::Female, rng)),
			Placeholder::Initial => out.push(rng.random_range(b'A'..=b'Z') as char),
			Placeholder::Surname => out.push_str(bank.pick(NameKind::Surname, rng)),
		}
	}
}

fn flush_word<R: Rng + ?Sized>(word: &mut String, bank: BankChoice<'_>, rng: &mut R, out: &mut String) {
	if word.is_empty() {
		return;
	}
	match Placeholder::from_word(word) {
		Some(placeholder) => placeholder.push_value(bank, rng, out),
		None => out.push_str(word),
	}
	word.clear();
}

/// Expands the placeholders of `format`.
///
/// Placeholders are whole alphabetic words (`Name`, `MaleName`,
/// `FemaleName`, `Initial`, `Surname`); any other text is copied as-is,
/// so `"Surname, Name Initial."` keeps its comma and dot.
pub fn expand<R: Rng + ?Sized>(format: &str, bank: BankChoice<'_>, rng: &mut R) -> String {
	let mut out = String::with_capacity(format.len() * 2);
	let mut word = String::new();

	for c in format.chars() {
		if c.is_alphabetic() {
			word.push(c);
		} else {
			flush_word(&mut word, bank, rng, &mut out);
			out.push(c);
		}
	}
	flush_word(&mut word, bank, rng, &mut out);

	out
}

/// Person names built from format placeholders.
#[derive(Clone, Debug, Default)]
pub struct Names {
	registry: NameRegistry,
}

impl Names {
	pub fn new(registry: NameRegistry) -> Self {
		Self { registry }
	}

	pub fn registry(&self) -> &NameRegistry {
		&self.registry
	}
}

impl DataType for Names {
	type Options = NamesOptions;

	fn name(&self) -> &'static str {
		"Names"
	}

	fn metadata(&self) -> DataTypeMetadata {
		DataTypeMetadata { sql: SqlMetadata::nullable_varchar(255) }
	}

	/// Picks one format uniformly and expands it. No format gives an empty row.
	fn generate<R: Rng + ?Sized>(&self, options: &NamesOptions, rng: &mut R) -> Result<GenerateResult, GenerationError> {
		let format = match options.row_state().choose(rng) {
			Some(format) => format,
			None => return Ok(GenerateResult::default()),
		};
		let bank = self.registry.bank_for(options);
		Ok(GenerateResult::new(expand(format, bank, rng)))
	}
}
