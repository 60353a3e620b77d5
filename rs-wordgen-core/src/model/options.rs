use super::ngram::check_order;
use super::tokenizer::Tokenizer;
use crate::error::Result;

/// Strategy used to select the first word of a generated text.
///
/// # Variants
/// - `Random`: draw the first word among observed sentence starts.
/// - `Custom(String)`: start from the given word; it must begin some n-gram.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StartSeed {
	#[default]
	Random,
	Custom(String),
}

impl StartSeed {
	/// Builds a seed from an optional user-supplied word.
	pub fn from_word(word: Option<String>) -> Self {
		match word {
			Some(word) => StartSeed::Custom(word),
			None => StartSeed::Random,
		}
	}

	/// The custom word, if any.
	pub fn word(&self) -> Option<&str> {
		match self {
			StartSeed::Random => None,
			StartSeed::Custom(word) => Some(word),
		}
	}
}

/// Parameters of a training run.
///
/// # Invariants
/// - `n` is always >= 2
#[derive(Clone, Debug)]
pub struct TrainOptions {
	/// Number of tokens per n-gram.
	n: usize,

	/// Case-fold the input text.
	pub lowercase: bool,

	/// Keep punctuation marks as tokens.
	pub include_punctuation: bool,

	/// Add to an existing model instead of replacing it.
	pub update: bool,
}

impl TrainOptions {
	/// Creates options for `n`-grams with punctuation kept and no lower-casing.
	///
	/// # Errors
	/// Returns an error if `n` is outside `2..=MAX_ORDER`.
	pub fn new(n: usize) -> Result<Self> {
		check_order(n)?;
		Ok(Self { n, lowercase: false, include_punctuation: true, update: false })
	}

	/// Returns the n-gram size.
	pub fn n(&self) -> usize {
		self.n
	}

	/// Tokenizer configured for these options.
	pub fn tokenizer(&self) -> Tokenizer {
		Tokenizer::new(self.lowercase, self.include_punctuation)
	}
}

/// Parameters of a generation run.
#[derive(Clone, Debug, Default)]
pub struct GenerateOptions {
	/// Number of words to produce after the seed.
	pub length: usize,

	/// How the first word is chosen.
	pub start_seed: StartSeed,
}

impl GenerateOptions {
	pub fn new(length: usize, start_seed: StartSeed) -> Self {
		Self { length, start_seed }
	}
}
