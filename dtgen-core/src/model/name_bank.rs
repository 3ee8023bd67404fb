use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::names::{NamesOptions, NamesSource};
use crate::error::GenerationError;
use crate::io;

const WESTERN_MALE: &[&str] = &[
	"Aaron", "Adam", "Alan", "Albert", "Alexander", "Andrew", "Anthony", "Arthur", "Benjamin", "Brian",
	"Caleb", "Charles", "Christopher", "Daniel", "David", "Dennis", "Edward", "Eric", "Ethan", "Frank",
	"Gabriel", "George", "Gregory", "Harry", "Henry", "Isaac", "Jack", "Jacob", "James", "Jason",
	"John", "Jonathan", "Joseph", "Kevin", "Lawrence", "Leo", "Liam", "Lucas", "Mark", "Matthew",
	"Michael", "Nathan", "Nicholas", "Noah", "Oliver", "Oscar", "Patrick", "Paul", "Peter", "Philip",
	"Raymond", "Richard", "Robert", "Ryan", "Samuel", "Scott", "Simon", "Stephen", "Thomas", "Timothy",
	"Victor", "Walter", "William", "Zachary",
];

const WESTERN_FEMALE: &[&str] = &[
	"Abigail", "Alice", "Amanda", "Amelia", "Angela", "Anna", "Audrey", "Barbara", "Bella", "Brenda",
	"Caroline", "Catherine", "Charlotte", "Chloe", "Claire", "Deborah", "Diana", "Dorothy", "Eleanor", "Elizabeth",
	"Ella", "Emily", "Emma", "Evelyn", "Fiona", "Grace", "Hannah", "Helen", "Isabella", "Jane",
	"Jennifer", "Jessica", "Julia", "Karen", "Katherine", "Laura", "Lily", "Linda", "Lucy", "Margaret",
	"Maria", "Mary", "Megan", "Mia", "Natalie", "Nicole", "Olivia", "Patricia", "Rachel", "Rebecca",
	"Rose", "Ruth", "Sarah", "Sophia", "Stephanie", "Susan", "Teresa", "Victoria", "Violet", "Zoe",
];

const WESTERN_SURNAMES: &[&str] = &[
	"Adams", "Allen", "Anderson", "Baker", "Bell", "Brooks", "Brown", "Campbell", "Carter", "Clark",
	"Collins", "Cook", "Cooper", "Davis", "Edwards", "Evans", "Fisher", "Foster", "Garcia", "Gray",
	"Green", "Hall", "Harris", "Hill", "Hughes", "Jackson", "James", "Johnson", "Jones", "Kelly",
	"King", "Lee", "Lewis", "Martin", "Miller", "Mitchell", "Moore", "Morgan", "Morris", "Murphy",
	"Nelson", "Parker", "Phillips", "Price", "Reed", "Roberts", "Robinson", "Rogers", "Scott", "Smith",
	"Stewart", "Taylor", "Thomas", "Thompson", "Turner", "Walker", "Ward", "Watson", "White", "Wilson",
	"Wood", "Wright", "Young",
];

fn to_owned_list(names: &[&str]) -> Vec<String> {
	names.iter().map(|name| (*name).to_owned()).collect()
}

/// Country codes are two or three ASCII letters (`fr`, `deu`).
pub fn is_country_code(code: &str) -> bool {
	(2..=3).contains(&code.len()) && code.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Which list of a bank a placeholder draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameKind {
	/// Male and female first names together.
	First,
	Male,
	Female,
	Surname,
}

/// First names (by gender) and surnames for one region.
///
/// # Invariants
/// Once validated, none of the three lists is empty.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NameBank {
	pub male: Vec<String>,
	pub female: Vec<String>,
	pub surnames: Vec<String>,
}

impl NameBank {
	/// The built-in "mostly western names" bank.
	pub fn western() -> Self {
		Self {
			male: to_owned_list(WESTERN_MALE),
			female: to_owned_list(WESTERN_FEMALE),
			surnames: to_owned_list(WESTERN_SURNAMES),
		}
	}

	/// # Errors
	/// `EmptyNameBank` if any list is empty.
	pub fn validate(&self, code: &str) -> Result<(), GenerationError> {
		if self.male.is_empty() || self.female.is_empty() || self.surnames.is_empty() {
			return Err(GenerationError::EmptyNameBank(code.to_owned()));
		}
		Ok(())
	}

	/// Number of names available for `kind`.
	pub fn count(&self, kind: NameKind) -> usize {
		match kind {
			NameKind::First => self.male.len() + self.female.len(),
			NameKind::Male => self.male.len(),
			NameKind::Female => self.female.len(),
			NameKind::Surname => self.surnames.len(),
		}
	}

	/// The `i`-th name of `kind`; `First` lists male names before female ones.
	fn get(&self, kind: NameKind, i: usize) -> Option<&str> {
		let name = match kind {
			NameKind::First => self.male.get(i).or_else(|| self.female.get(i.checked_sub(self.male.len())?)),
			NameKind::Male => self.male.get(i),
			NameKind::Female => self.female.get(i),
			NameKind::Surname => self.surnames.get(i),
		};
		name.map(String::as_str)
	}

	/// A name of `kind`, each name equally likely. Empty if the list is empty.
	pub fn pick<R: Rng + ?Sized>(&self, kind: NameKind, rng: &mut R) -> &str {
		let total = self.count(kind);
		if total == 0 {
			return "";
		}
		self.get(kind, rng.random_range(0..total)).unwrap_or("")
	}
}

/// Banks a row draws its names from.
///
/// Several countries are never merged: a name is drawn by index across the
/// selected banks, so every name of the union is equally likely and nothing
/// is copied per row.
#[derive(Clone, Copy, Debug)]
pub enum BankChoice<'a> {
	Single(&'a NameBank),
	Countries {
		registry: &'a NameRegistry,
		codes: &'a BTreeSet<String>,
	},
}

impl<'a> From<&'a NameBank> for BankChoice<'a> {
	fn from(bank: &'a NameBank) -> Self {
		BankChoice::Single(bank)
	}
}

impl<'a> BankChoice<'a> {
	pub fn pick<R: Rng + ?Sized>(&self, kind: NameKind, rng: &mut R) -> &'a str {
		match *self {
			BankChoice::Single(bank) => bank.pick(kind, rng),
			BankChoice::Countries { registry, codes } => {
				let banks = move || codes.iter().filter_map(move |code| registry.countries.get(code));
				let total: usize = banks().map(|bank| bank.count(kind)).sum();
				if total == 0 {
					return registry.western.pick(kind, rng);
				}

				let mut i = rng.random_range(0..total);
				for bank in banks() {
					let count = bank.count(kind);
					if i < count {
						return bank.get(kind, i).unwrap_or("");
					}
					i -= count;
				}
				""
			}
		}
	}
}

/// Western bank plus per-country banks keyed by country code.
///
/// Country banks are JSON files named `<code>.json`:
/// `{ "male": [...], "female": [...], "surnames": [...] }`.
#[derive(Clone, Debug, PartialEq)]
pub struct NameRegistry {
	western: NameBank,
	countries: BTreeMap<String, NameBank>,
}

impl Default for NameRegistry {
	fn default() -> Self {
		Self { western: NameBank::western(), countries: BTreeMap::new() }
	}
}

impl NameRegistry {
	/// Loads every `.json` bank found directly in `dir`.
	///
	/// Files whose stem is not a country code are skipped.
	///
	/// # Errors
	/// - `NotADirectory` if `dir` is not a directory
	/// - `Io` / `Json` / `EmptyNameBank` if a bank fails to load
	pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, GenerationError> {
		let folder = io::normalize_folder(dir);
		if !folder.is_dir() {
			return Err(GenerationError::NotADirectory(folder.display().to_string()));
		}

		let mut registry = Self::default();
		for file in io::list_files(&folder, "json")? {
			let code = io::get_filename(&file)?;
			if !is_country_code(&code) {
				warn!("Skipping {}: not a country code", file);
				continue;
			}
			let bank = Self::read_bank(folder.join(&file), &code)?;
			registry.countries.insert(code, bank);
		}

		debug!("Loaded {} country name banks from {}", registry.countries.len(), folder.display());
		Ok(registry)
	}

	/// Loads only the given country codes from `dir`.
	///
	/// # Errors
	/// `UnknownCountry` if a code is not two or three letters or
	/// `<dir>/<code>.json` does not exist, otherwise as `load_dir`.
	pub fn load<P: AsRef<Path>>(dir: P, codes: &[&str]) -> Result<Self, GenerationError> {
		let folder = io::normalize_folder(dir);
		let mut registry = Self::default();
		for code in codes {
			if !is_country_code(code) {
				return Err(GenerationError::UnknownCountry((*code).to_owned()));
			}
			let path = folder.join(format!("{code}.json"));
			if !path.is_file() {
				return Err(GenerationError::UnknownCountry((*code).to_owned()));
			}
			let bank = Self::read_bank(path, code)?;
			registry.countries.insert((*code).to_owned(), bank);
		}
		Ok(registry)
	}

	fn read_bank<P: AsRef<Path>>(path: P, code: &str) -> Result<NameBank, GenerationError> {
		let bank: NameBank = serde_json::from_str(&io::read_file(path)?)?;
		bank.validate(code)?;
		Ok(bank)
	}

	/// Registers or replaces a country bank.
	pub fn insert<S: Into<String>>(&mut self, code: S, bank: NameBank) -> Result<(), GenerationError> {
		let code = code.into();
		bank.validate(&code)?;
		self.countries.insert(code, bank);
		Ok(())
	}

	/// Sorted codes of the loaded country banks.
	pub fn country_codes(&self) -> Vec<String> {
		self.countries.keys().cloned().collect()
	}

	pub fn western(&self) -> &NameBank {
		&self.western
	}

	/// Banks matching the names source of `options`.
	///
	/// Selected countries that are not loaded are skipped. If none is left,
	/// the western bank is used.
	pub fn bank_for<'a>(&'a self, options: &'a NamesOptions) -> BankChoice<'a> {
		if options.source == NamesSource::Any {
			return BankChoice::Single(&self.western);
		}

		let mut loaded = options.selected_countries.iter().filter(|code| self.countries.contains_key(*code));
		match (loaded.next(), loaded.next()) {
			(None, _) => {
				debug!("No name bank for {:?}, using western names", options.selected_countries);
				BankChoice::Single(&self.western)
			}
			(Some(code), None) => BankChoice::Single(&self.countries[code]),
			(Some(_), Some(_)) => BankChoice::Countries { registry: self, codes: &options.selected_countries },
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn bank(prefix: &str) -> NameBank {
		NameBank {
			male: vec![format!("{prefix}M")],
			female: vec![format!("{prefix}F")],
			surnames: vec![format!("{prefix}S")],
		}
	}

	fn countries(codes: &[&str]) -> NamesOptions {
		NamesOptions {
			source: NamesSource::Countries,
			selected_countries: codes.iter().map(|c| (*c).to_owned()).collect::<BTreeSet<_>>(),
			..NamesOptions::default()
		}
	}

	#[test]
	fn western_bank_is_valid() {
		assert!(NameBank::western().validate("western").is_ok());
	}

	#[test]
	fn empty_lists_are_rejected() {
		let mut registry = NameRegistry::default();
		let empty = NameBank { male: vec![], female: vec!["A".into()], surnames: vec!["B".into()] };
		assert!(matches!(registry.insert("xx", empty), Err(GenerationError::EmptyNameBank(code)) if code == "xx"));
	}

	#[test]
	fn first_name_covers_both_genders() {
		let bank = bank("a");
		let mut rng = StdRng::seed_from_u64(21);
		let seen: BTreeSet<&str> = (0..100).map(|_| bank.pick(NameKind::First, &mut rng)).collect();
		assert_eq!(seen, BTreeSet::from(["aF", "aM"]));
	}

	#[test]
	fn any_source_uses_western_bank() {
		let mut registry = NameRegistry::default();
		registry.insert("fr", bank("fr")).unwrap();
		let options = NamesOptions::default();
		assert!(matches!(registry.bank_for(&options), BankChoice::Single(b) if b == registry.western()));
	}

	#[test]
	fn countries_are_combined_and_unknown_skipped() {
		let mut registry = NameRegistry::default();
		registry.insert("fr", bank("fr")).unwrap();
		registry.insert("jp", bank("jp")).unwrap();
		let mut rng = StdRng::seed_from_u64(22);

		let single = countries(&["fr", "zz"]);
		assert_eq!(registry.bank_for(&single).pick(NameKind::Surname, &mut rng), "frS");

		let both = countries(&["fr", "jp"]);
		let choice = registry.bank_for(&both);
		assert!(matches!(choice, BankChoice::Countries { .. }));
		let seen: BTreeSet<&str> = (0..100).map(|_| choice.pick(NameKind::Surname, &mut rng)).collect();
		assert_eq!(seen, BTreeSet::from(["frS", "jpS"]));
		let first: BTreeSet<&str> = (0..200).map(|_| choice.pick(NameKind::First, &mut rng)).collect();
		assert_eq!(first, BTreeSet::from(["frF", "frM", "jpF", "jpM"]));

		let unknown = countries(&["zz"]);
		assert!(matches!(registry.bank_for(&unknown), BankChoice::Single(b) if b == registry.western()));
	}

	#[test]
	fn country_codes_are_letters_only() {
		assert!(is_country_code("fr"));
		assert!(is_country_code("DEU"));
		assert!(!is_country_code("f"));
		assert!(!is_country_code("../x"));
		assert!(!is_country_code("a/b"));
		assert!(!is_country_code("fr.json"));
	}

	#[test]
	fn load_rejects_paths_outside_the_folder() {
		for code in ["../x", "../../tmp/evil", "/etc/passwd", "..", ""] {
			assert!(matches!(
				NameRegistry::load("./data/names", &[code]),
				Err(GenerationError::UnknownCountry(c)) if c == code
			));
		}
	}

	#[test]
	fn missing_directory_is_reported() {
		let result = NameRegistry::load_dir("./definitely/not/here");
		assert!(matches!(result, Err(GenerationError::NotADirectory(_))));
	}
}
