use std::collections::BTreeMap;

use rand::Rng;

/// Continuations observed after one context of a frequency table.
///
/// A `State` corresponds to a fixed (n-1)-token context and stores every
/// observed next token with its number of occurrences. Conceptually this is
/// a node of a Markov chain whose outgoing edges are weighted by counts.
///
/// Continuations are kept in a `BTreeMap` so iteration order (and thus
/// sampling for a fixed random source) is deterministic.
///
/// ## Invariants
/// - Each occurrence count is strictly positive
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
	/// Next token => occurrences.
	/// Example: { "run" => 42, "." => 3 }
	transitions: BTreeMap<String, u64>,
}

impl State {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records `count` more occurrences of `next_token`.
	pub fn add_transition(&mut self, next_token: &str, count: u64) {
		if count == 0 {
			return;
		}
		match self.transitions.get_mut(next_token) {
			Some(occurrence) => *occurrence += count,
			None => {
				self.transitions.insert(next_token.to_owned(), count);
			}
		}
	}

	/// Occurrences of `next_token` after this context (0 if never seen).
	pub fn count(&self, next_token: &str) -> u64 {
		self.transitions.get(next_token).copied().unwrap_or(0)
	}

	/// Number of distinct continuations.
	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Sum of all occurrence counts.
	pub fn total(&self) -> u64 {
		self.transitions.values().sum()
	}

	/// Iterates `(next_token, count)` pairs in token order.
	pub fn transitions(&self) -> impl Iterator<Item = (&str, u64)> {
		self.transitions.iter().map(|(token, count)| (token.as_str(), *count))
	}

	/// Picks the next token by weighted random sampling.
	///
	/// Draws `r` uniformly in `[0, total)` and walks the continuations,
	/// subtracting each weight until one bucket holds `r`. The first
	/// candidate whose cumulative weight exceeds the draw wins.
	///
	/// Returns `None` if the state has no transitions.
	pub fn predict<R: Rng>(&self, rng: &mut R) -> Option<&str> {
		let total = self.total();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);
		for (next_token, occurrence) in &self.transitions {
			if r < *occurrence {
				return Some(next_token);
			}
			r -= occurrence;
		}

		// Unreachable while counts sum to `total`
		None
	}

	/// Picks a continuation uniformly, ignoring the counts.
	pub fn pick_uniform<R: Rng>(&self, rng: &mut R) -> Option<&str> {
		if self.transitions.is_empty() {
			return None;
		}
		let index = rng.random_range(0..self.transitions.len());
		self.transitions.keys().nth(index).map(String::as_str)
	}

	/// Merges another state of the same context into this one.
	///
	/// Occurrence counts are summed.
	pub fn merge(&mut self, other: &Self) {
		for (next_token, occurrence) in &other.transitions {
			self.add_transition(next_token, *occurrence);
		}
	}
}
