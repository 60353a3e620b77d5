use log::{debug, warn};
use rand::Rng;

use super::frequency_table::FrequencyTable;
use super::ngram::boundary_context;
use super::state::State;
use super::tokenizer::{BOUNDARY, is_word};
use crate::error::{Result, WordGenError};

/// Weighted random walk over the contexts of a [`FrequencyTable`].
///
/// The generator is an iterator of tokens. It first yields the seed word,
/// then keeps sampling continuations until `length` words have been
/// produced after the seed. Punctuation and boundary tokens are yielded too
/// but never count toward the length.
///
/// # Responsibilities
/// - Pick (or validate) the starting seed
/// - Sample each next token proportionally to its count
/// - Recover from unseen contexts by restarting from a sentence start
///
/// The table is only read. Consuming the iterator advances `rng`, so the
/// sequence cannot be replayed except by building a new generator with an
/// identically seeded random source.
pub struct Generator<'a, R> {
	table: &'a FrequencyTable,
	/// Continuations of the all-boundary context, used for seeding and fallback.
	start: &'a State,
	rng: R,
	/// The last `n-1` tokens of the walk.
	context: Vec<String>,
	/// Seed word not yet handed out.
	seed: Option<String>,
	/// Words still to produce.
	remaining: usize,
	/// Number of steps that hit an unseen context.
	fallbacks: usize,
}

impl<'a, R: Rng> Generator<'a, R> {
	/// Creates a generator producing `length` words after the seed.
	///
	/// # Parameters
	/// - `table`: the trained frequency table
	/// - `length`: number of words (punctuation excluded) to generate
	/// - `seed`: optional first word; when `None`, one is drawn uniformly
	///   among the sentence-start continuations
	/// - `rng`: random source driving every choice of the walk
	///
	/// # Errors
	/// - `EmptyModel` if the table has no sentence-start n-gram
	/// - `UnknownSeed` if `seed` never starts an n-gram of the table
	/// - `NoWords` if `length > 0` and the table holds no word to produce
	pub fn new(table: &'a FrequencyTable, length: usize, seed: Option<&str>, mut rng: R) -> Result<Self> {
		let start = table.start_state().filter(|state| !state.is_empty()).ok_or(WordGenError::EmptyModel)?;
		// Only words count toward `length`, the walk would never end
		if length > 0 && !table.has_word_continuation() {
			return Err(WordGenError::NoWords);
		}

		let seed = match seed {
			Some(word) => {
				if !table.has_first_token(word) {
					return Err(WordGenError::UnknownSeed(word.to_owned()));
				}
				word.to_owned()
			}
			// Non-empty state, a token is always returned
			None => start.pick_uniform(&mut rng).ok_or(WordGenError::EmptyModel)?.to_owned(),
		};
		debug!("Generating {} words from seed {:?}", length, seed);

		// Seed sits at the end of a sentence-start context
		let mut context = boundary_context(table.order());
		context.remove(0);
		context.push(seed.clone());

		Ok(Self { table, start, rng, context, seed: Some(seed), remaining: length, fallbacks: 0 })
	}

	/// Number of steps so far that met an unseen context.
	pub fn fallbacks(&self) -> usize {
		self.fallbacks
	}

	/// Samples the token following the current context.
	///
	/// Falls back to a uniform pick among sentence starts when the context
	/// has never been observed.
	fn next_token(&mut self) -> String {
		if let Some(token) = self.table.continuations(&self.context).and_then(|state| state.predict(&mut self.rng)) {
			return token.to_owned();
		}

		self.fallbacks += 1;
		debug!("Unseen context {:?}, restarting from a sentence start", self.context);
		// `start` was checked non-empty on construction
		self.start.pick_uniform(&mut self.rng).unwrap_or(BOUNDARY).to_owned()
	}
}

impl<R: Rng> Iterator for Generator<'_, R> {
	type Item = String;

	fn next(&mut self) -> Option<String> {
		if let Some(seed) = self.seed.take() {
			return Some(seed);
		}
		if self.remaining == 0 {
			return None;
		}

		let token = self.next_token();
		self.context.remove(0);
		self.context.push(token.clone());

		if is_word(&token) {
			self.remaining -= 1;
			if self.remaining == 0 && self.fallbacks > 0 {
				warn!("Generation recovered from {} unseen contexts", self.fallbacks);
			}
		}

		Some(token)
	}
}
