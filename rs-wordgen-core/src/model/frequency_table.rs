use std::collections::HashMap;

use log::debug;

use super::ngram::{NGram, check_order};
use super::state::State;
use super::tokenizer::{BOUNDARY, is_word};
use crate::error::{Result, WordGenError};

/// Occurrence counts of every n-gram seen during training.
///
/// The table is stored as an index from context (the leading `n-1` tokens)
/// to the [`State`] holding its continuations, so generation never scans
/// the whole table.
///
/// # Responsibilities
/// - Count n-grams from scratch (`build`) or on top of existing counts (`merge`)
/// - Answer "what follows this context" lookups
/// - Merge with another table of the same order
///
/// # Invariants
/// - `n` is always >= 2
/// - Every context key has exactly `n-1` tokens (the table is homogeneous)
/// - All counts are >= 1 and only ever grow
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
	/// The order of the table (number of tokens in each n-gram)
	n: usize,

	/// Mapping from a context (length n-1) to its continuations
	states: HashMap<Vec<String>, State>,
}

impl FrequencyTable {
	/// Creates an empty table of order `n`.
	///
	/// # Errors
	/// Returns an error if `n` is outside `2..=MAX_ORDER`.
	pub fn new(n: usize) -> Result<Self> {
		check_order(n)?;
		Ok(Self { n, states: HashMap::new() })
	}

	/// Counts every n-gram of `ngrams` into a fresh table of order `n`.
	pub fn build<I>(n: usize, ngrams: I) -> Result<Self>
	where
		I: IntoIterator<Item = NGram>,
	{
		let mut table = Self::new(n)?;
		for ngram in ngrams {
			table.add(&ngram, 1)?;
		}
		debug!("Built {}-gram table: {} distinct n-grams, {} contexts", n, table.len(), table.states.len());
		Ok(table)
	}

	/// Adds the occurrences of `ngrams` to the existing counts.
	///
	/// The input is counted on the side first, so on error the table is
	/// left untouched.
	///
	/// # Errors
	/// Returns an error if an n-gram length differs from the table order.
	pub fn merge<I>(&mut self, ngrams: I) -> Result<()>
	where
		I: IntoIterator<Item = NGram>,
	{
		let update = Self::build(self.n, ngrams)?;
		self.absorb(&update)
	}

	/// Merges another table into this one, summing counts.
	///
	/// # Errors
	/// Returns an error if the table orders do not match.
	pub fn absorb(&mut self, other: &Self) -> Result<()> {
		if self.n != other.n {
			return Err(WordGenError::OrderMismatch { expected: self.n, found: other.n });
		}

		for (context, state) in &other.states {
			if let Some(existing) = self.states.get_mut(context) {
				existing.merge(state);
			} else {
				self.states.insert(context.clone(), state.clone());
			}
		}

		Ok(())
	}

	/// Records `count` occurrences of `ngram`.
	///
	/// # Errors
	/// Returns an error if `ngram` does not have exactly `n` tokens.
	pub fn add(&mut self, ngram: &NGram, count: u64) -> Result<()> {
		if ngram.len() != self.n {
			return Err(WordGenError::OrderMismatch { expected: self.n, found: ngram.len() });
		}
		// Length checked above, `last` is always present
		let Some(next_token) = ngram.last() else {
			return Ok(());
		};

		let context = ngram.context();
		match self.states.get_mut(context) {
			Some(state) => state.add_transition(next_token, count),
			None => {
				let mut state = State::new();
				state.add_transition(next_token, count);
				self.states.insert(context.to_vec(), state);
			}
		}
		Ok(())
	}

	/// The order `n` of the table.
	pub fn order(&self) -> usize {
		self.n
	}

	/// Number of distinct n-grams.
	pub fn len(&self) -> usize {
		self.states.values().map(State::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Sum of all counts.
	pub fn total(&self) -> u64 {
		self.states.values().map(State::total).sum()
	}

	/// Count of `ngram` (0 if never seen).
	pub fn count(&self, ngram: &NGram) -> u64 {
		if ngram.len() != self.n {
			return 0;
		}
		match (self.states.get(ngram.context()), ngram.last()) {
			(Some(state), Some(next_token)) => state.count(next_token),
			_ => 0,
		}
	}

	/// Continuations observed after `context`, if any.
	pub fn continuations(&self, context: &[String]) -> Option<&State> {
		self.states.get(context)
	}

	/// Continuations of the all-boundary context (sentence starts).
	pub fn start_state(&self) -> Option<&State> {
		self.states
			.iter()
			.find(|(context, _)| context.iter().all(|token| token == BOUNDARY))
			.map(|(_, state)| state)
	}

	/// Returns `true` if some n-gram ends with a word token.
	///
	/// Without one, a walk counting words could never finish.
	pub fn has_word_continuation(&self) -> bool {
		self.states.values().any(|state| state.transitions().any(|(token, _)| is_word(token)))
	}

	/// Returns `true` if some n-gram of the table begins with `token`.
	pub fn has_first_token(&self, token: &str) -> bool {
		self.states.keys().any(|context| context.first().is_some_and(|first| first == token))
	}

	/// Every `(n-gram, count)` pair, sorted by n-gram.
	pub fn entries(&self) -> Vec<(NGram, u64)> {
		let mut entries: Vec<(NGram, u64)> = self
			.states
			.iter()
			.flat_map(|(context, state)| {
				state.transitions().map(move |(next_token, count)| {
					let mut tokens = context.clone();
					tokens.push(next_token.to_owned());
					(NGram::new(tokens), count)
				})
			})
			.collect();
		entries.sort();
		entries
	}
}
