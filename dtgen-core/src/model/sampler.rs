use log::debug;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

use super::candidates::{Candidate, WeightedCandidateSet};
use super::selection::{SelectionSpec, MAX_SELECTION_COUNT};

/// Pools up to this size are drawn without replacement by a plain
/// cumulative scan. Larger pools switch to exponential keys.
pub const LINEAR_SCAN_LIMIT: usize = 64;

/// Weighted random subset selection.
///
/// # Responsibilities
/// - Resolve a concrete sample size from a `SelectionSpec`
/// - Draw that many candidates with weight-proportional probability
/// - Honor the duplicate flag (with or without replacement)
///
/// The sampler owns its random source, so every request can build its own
/// and nothing is shared between concurrent generations. Use `seeded` for
/// reproducible output.
#[derive(Debug)]
pub struct WeightedSampler<R = ThreadRng> {
	rng: R,
}

impl WeightedSampler<ThreadRng> {
	/// Sampler backed by the thread-local entropy source.
	pub fn new() -> Self {
		Self { rng: rand::rng() }
	}
}

impl Default for WeightedSampler<ThreadRng> {
	fn default() -> Self {
		Self::new()
	}
}

impl WeightedSampler<StdRng> {
	/// Deterministic sampler: the same seed and input give the same output.
	pub fn seeded(seed: u64) -> Self {
		Self { rng: StdRng::seed_from_u64(seed) }
	}
}

impl<R: Rng> WeightedSampler<R> {
	pub fn with_rng(rng: R) -> Self {
		Self { rng }
	}

	/// Returns the underlying random source.
	pub fn rng(&mut self) -> &mut R {
		&mut self.rng
	}

	/// See `SelectionSpec::resolve_count`.
	pub fn resolve_count(&mut self, spec: &SelectionSpec, pool_size: usize) -> usize {
		spec.resolve_count(pool_size, &mut self.rng)
	}

	/// See `draw_weighted_subset`.
	pub fn draw_weighted_subset<'a>(
		&mut self,
		candidates: &'a WeightedCandidateSet,
		count: usize,
		allow_duplicates: bool,
	) -> Vec<&'a str> {
		draw_weighted_subset(candidates, count, allow_duplicates, &mut self.rng)
	}

	/// Resolves the count against the candidate set size, then draws.
	pub fn sample<'a>(
		&mut self,
		candidates: &'a WeightedCandidateSet,
		spec: &SelectionSpec,
		allow_duplicates: bool,
	) -> Vec<&'a str> {
		let count = self.resolve_count(spec, candidates.len());
		self.draw_weighted_subset(candidates, count, allow_duplicates)
	}
}

/// Draws `count` labels with probability proportional to their weight.
///
/// Labels are returned in draw order.
///
/// # Behavior
/// - `allow_duplicates == false`: a drawn candidate leaves the pool, so the
///   result holds at most as many labels as there are positive weights.
/// - `allow_duplicates == true`: candidates stay in the pool with their
///   original weight and the result has exactly `count` labels, unless no
///   candidate has a positive weight.
/// - Zero-weight candidates are never drawn.
/// - Empty set or `count == 0` gives an empty result.
/// - `count` is clamped to `MAX_SELECTION_COUNT`.
pub fn draw_weighted_subset<'a, R: Rng + ?Sized>(
	candidates: &'a WeightedCandidateSet,
	count: usize,
	allow_duplicates: bool,
	rng: &mut R,
) -> Vec<&'a str> {
	if count == 0 || candidates.is_empty() {
		return Vec::new();
	}
	let count = if count > MAX_SELECTION_COUNT {
		debug!("Clamping selection count {} to {}", count, MAX_SELECTION_COUNT);
		MAX_SELECTION_COUNT
	} else {
		count
	};

	let candidates = candidates.as_slice();
	if allow_duplicates {
		draw_with_replacement(candidates, count, rng)
	} else if candidates.len() <= LINEAR_SCAN_LIMIT {
		draw_linear(candidates, count, rng)
	} else {
		draw_keyed(candidates, count, rng)
	}
}

/// Cumulative weights with binary search, built once for all draws.
fn draw_with_replacement<'a, R: Rng + ?Sized>(
	candidates: &'a [Candidate],
	count: usize,
	rng: &mut R,
) -> Vec<&'a str> {
	let index = match WeightedIndex::new(candidates.iter().map(Candidate::weight)) {
		Ok(index) => index,
		Err(e) => {
			debug!("Nothing to draw from {} candidates: {}", candidates.len(), e);
			return Vec::new();
		}
	};

	(0..count).map(|_| candidates[index.sample(rng)].label()).collect()
}

/// Sequential draws without replacement over a small pool.
///
/// Each round is an O(n) scan with cumulative subtraction, then the drawn
/// candidate is removed.
fn draw_linear<'a, R: Rng + ?Sized>(
	candidates: &'a [Candidate],
	count: usize,
	rng: &mut R,
) -> Vec<&'a str> {
	let mut pool: Vec<&Candidate> = candidates.iter().filter(|c| c.weight() > 0.0).collect();
	let mut drawn = Vec::with_capacity(count.min(pool.len()));

	while drawn.len() < count && !pool.is_empty() {
		// Recomputed each round: subtracting removed weights accumulates rounding error
		let total: f64 = pool.iter().map(|c| c.weight()).sum();
		let mut r = rng.random::<f64>() * total;

		let mut position = pool.len() - 1;
		for (i, candidate) in pool.iter().enumerate() {
			if r < candidate.weight() {
				position = i;
				break;
			}
			r -= candidate.weight();
		}

		drawn.push(pool.remove(position).label());
	}

	drawn
}

/// Draws without replacement over a large pool using exponential keys.
///
/// Each positive candidate gets the key `ln(u) / w` with `u` uniform in
/// `(0, 1]`. Sorting keys in descending order yields the same distribution
/// (order included) as drawing one candidate at a time and removing it.
fn draw_keyed<'a, R: Rng + ?Sized>(
	candidates: &'a [Candidate],
	count: usize,
	rng: &mut R,
) -> Vec<&'a str> {
	let mut scored: Vec<(&str, f64)> = candidates
		.iter()
		.filter(|c| c.weight() > 0.0)
		.map(|c| {
			let u = 1.0 - rng.random::<f64>();
			(c.label(), u.ln() / c.weight())
		})
		.collect();

	scored.sort_by(|a, b| b.1.total_cmp(&a.1));
	scored.truncate(count);

	scored.into_iter().map(|(label, _)| label).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	fn set(values: &[(&str, f64)]) -> WeightedCandidateSet {
		WeightedCandidateSet::try_from(values.to_vec()).unwrap()
	}

	fn large_set(size: usize) -> WeightedCandidateSet {
		let values: Vec<(String, f64)> = (0..size).map(|i| (format!("v{i}"), (i % 7) as f64)).collect();
		WeightedCandidateSet::try_from(values).unwrap()
	}

	#[test]
	fn empty_set_or_zero_count_is_empty() {
		let mut sampler = WeightedSampler::seeded(1);
		let empty = WeightedCandidateSet::new();
		assert!(sampler.draw_weighted_subset(&empty, 5, false).is_empty());
		assert!(sampler.draw_weighted_subset(&empty, 5, true).is_empty());

		let values = set(&[("A", 1.0)]);
		assert!(sampler.draw_weighted_subset(&values, 0, false).is_empty());
		assert!(sampler.draw_weighted_subset(&values, 0, true).is_empty());
	}

	#[test]
	fn without_duplicates_returns_distinct_labels() {
		let values = set(&[("A", 1.0), ("B", 2.0), ("C", 3.0), ("D", 4.0)]);
		let mut sampler = WeightedSampler::seeded(2);
		for _ in 0..200 {
			let drawn = sampler.draw_weighted_subset(&values, 3, false);
			assert_eq!(drawn.len(), 3);
			let unique: HashSet<&str> = drawn.iter().copied().collect();
			assert_eq!(unique.len(), 3);
		}
	}

	#[test]
	fn count_is_capped_by_pool_without_duplicates() {
		let values = set(&[("A", 1.0), ("B", 1.0)]);
		let mut sampler = WeightedSampler::seeded(3);
		let drawn = sampler.draw_weighted_subset(&values, 10, false);
		assert_eq!(drawn.len(), 2);
	}

	#[test]
	fn zero_weights_stop_the_draw_early() {
		let values = set(&[("A", 0.0), ("B", 5.0), ("C", 0.0)]);
		let mut sampler = WeightedSampler::seeded(4);
		assert_eq!(sampler.draw_weighted_subset(&values, 3, false), vec!["B"]);

		let zeros = set(&[("A", 0.0), ("B", 0.0)]);
		assert!(sampler.draw_weighted_subset(&zeros, 3, false).is_empty());
		assert!(sampler.draw_weighted_subset(&zeros, 3, true).is_empty());
	}

	#[test]
	fn duplicates_fill_the_requested_count() {
		let values = set(&[("A", 1.0), ("B", 0.0)]);
		let mut sampler = WeightedSampler::seeded(5);
		assert_eq!(sampler.draw_weighted_subset(&values, 4, true), vec!["A"; 4]);
	}

	#[test]
	fn huge_counts_are_clamped() {
		let values = set(&[("a", 1.0), ("b", 1.0)]);
		let mut sampler = WeightedSampler::seeded(10);
		let drawn = sampler.draw_weighted_subset(&values, 1_000_000_000_000_000_000, true);
		assert_eq!(drawn.len(), MAX_SELECTION_COUNT);
		assert_eq!(sampler.draw_weighted_subset(&values, usize::MAX, true).len(), MAX_SELECTION_COUNT);
		assert_eq!(sampler.draw_weighted_subset(&values, usize::MAX, false).len(), 2);
	}

	#[test]
	fn large_pools_never_draw_zero_weights() {
		let values = large_set(500);
		let zero: HashSet<String> = values.iter().filter(|c| c.weight() == 0.0).map(|c| c.label().to_owned()).collect();
		let mut sampler = WeightedSampler::seeded(6);
		for _ in 0..50 {
			let drawn = sampler.draw_weighted_subset(&values, 500, false);
			assert_eq!(drawn.len(), values.positive_len());
			assert!(drawn.iter().all(|label| !zero.contains(*label)));
			let unique: HashSet<&str> = drawn.iter().copied().collect();
			assert_eq!(unique.len(), drawn.len());
		}
	}

	#[test]
	fn single_draw_frequency_follows_weights() {
		let values = set(&[("A", 3.0), ("B", 1.0)]);
		let mut sampler = WeightedSampler::seeded(7);
		let trials = 20_000;
		let hits = (0..trials)
			.filter(|_| sampler.draw_weighted_subset(&values, 1, false) == vec!["A"])
			.count();
		let frequency = hits as f64 / trials as f64;
		assert!((frequency - 0.75).abs() < 0.02, "frequency = {frequency}");
	}

	#[test]
	fn keyed_first_draw_frequency_follows_weights() {
		let mut values = vec![("heavy".to_owned(), 100.0)];
		values.extend((0..99).map(|i| (format!("light{i}"), 1.0)));
		let values = WeightedCandidateSet::try_from(values).unwrap();
		assert!(values.len() > LINEAR_SCAN_LIMIT);

		let mut sampler = WeightedSampler::seeded(8);
		let trials = 5_000;
		let hits = (0..trials)
			.filter(|_| sampler.draw_weighted_subset(&values, 3, false)[0] == "heavy")
			.count();
		let frequency = hits as f64 / trials as f64;
		assert!((frequency - 100.0 / 199.0).abs() < 0.04, "frequency = {frequency}");
	}

	#[test]
	fn with_replacement_frequency_follows_weights() {
		let values = set(&[("A", 1.0), ("B", 4.0)]);
		let mut sampler = WeightedSampler::seeded(9);
		let drawn = sampler.draw_weighted_subset(&values, 20_000, true);
		let frequency = drawn.iter().filter(|label| **label == "B").count() as f64 / drawn.len() as f64;
		assert!((frequency - 0.8).abs() < 0.02, "frequency = {frequency}");
	}

	#[test]
	fn same_seed_same_output() {
		let values = set(&[("A", 1.0), ("B", 2.0), ("C", 3.0)]);
		let spec = SelectionSpec::Between(1, 3);
		let first = WeightedSampler::seeded(42).sample(&values, &spec, false);
		let second = WeightedSampler::seeded(42).sample(&values, &spec, false);
		assert_eq!(first, second);
	}

	#[test]
	fn sample_respects_at_least_pool_policy() {
		let values = set(&[("A", 1.0), ("B", 1.0), ("C", 1.0)]);
		let mut sampler = WeightedSampler::new();
		assert!(sampler.sample(&values, &SelectionSpec::AtLeast(10), false).is_empty());
		assert!(sampler.sample(&values, &SelectionSpec::AtMost(0), true).is_empty());
	}
}
