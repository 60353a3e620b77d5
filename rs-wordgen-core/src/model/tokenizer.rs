use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Sentinel token marking a sentence start or end.
pub const BOUNDARY: &str = "$";

/// Punctuation marks recognized as standalone tokens.
pub const PUNCTUATION: [&str; 7] = [",", ".", "!", "?", ";", ":", "-"];

/// Punctuation marks that close a sentence.
pub const TERMINATORS: [&str; 3] = [".", "!", "?"];

/// A run of letters/digits, or exactly one recognized punctuation mark.
static TOKEN_PATTERN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+|[-,.!?;:]").expect("Failed to build token regex"));

/// Returns `true` if `token` is one of the recognized punctuation marks.
pub fn is_punctuation(token: &str) -> bool {
	PUNCTUATION.contains(&token)
}

/// Returns `true` if `token` ends a sentence (`.`, `!` or `?`).
pub fn is_terminator(token: &str) -> bool {
	TERMINATORS.contains(&token)
}

/// Returns `true` if `token` counts as a word: neither punctuation nor the boundary.
pub fn is_word(token: &str) -> bool {
	token != BOUNDARY && !is_punctuation(token)
}

/// Splits raw text lines into normalized tokens.
///
/// Whitespace and unrecognized characters (including a literal `$`) are
/// dropped silently, so the boundary token can never come from the text.
#[derive(Clone, Copy, Debug)]
pub struct Tokenizer {
	/// Case-fold every line before matching.
	lowercase: bool,
	/// Keep punctuation marks in the stream.
	include_punctuation: bool,
}

impl Default for Tokenizer {
	fn default() -> Self {
		Self { lowercase: false, include_punctuation: true }
	}
}

impl Tokenizer {
	pub fn new(lowercase: bool, include_punctuation: bool) -> Self {
		Self { lowercase, include_punctuation }
	}

	/// Tokenizes a single line.
	pub fn tokenize_line(&self, line: &str) -> Vec<String> {
		let line: Cow<'_, str> = if self.lowercase {
			Cow::Owned(line.to_lowercase())
		} else {
			Cow::Borrowed(line)
		};

		TOKEN_PATTERN
			.find_iter(&line)
			.map(|m| m.as_str())
			.filter(|token| self.include_punctuation || !is_punctuation(token))
			.map(str::to_owned)
			.collect()
	}

	/// Lazily tokenizes a sequence of lines, one line at a time.
	///
	/// Each call starts a fresh stream over `lines`.
	pub fn tokens<I, S>(&self, lines: I) -> impl Iterator<Item = String>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		lines.into_iter().flat_map(move |line| self.tokenize_line(line.as_ref()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_words_and_punctuation() {
		let tokenizer = Tokenizer::default();
		let tokens = tokenizer.tokenize_line("Hello, world! It's 42 degrees -- hot?");

		assert_eq!(
			tokens,
			vec!["Hello", ",", "world", "!", "It", "s", "42", "degrees", "-", "-", "hot", "?"]
		);
	}

	#[test]
	fn test_unrecognized_characters_are_dropped() {
		let tokenizer = Tokenizer::default();
		let tokens = tokenizer.tokenize_line("  costs $5 (approx) ...  ");

		assert_eq!(tokens, vec!["costs", "5", "approx", ".", ".", "."]);
	}

	#[test]
	fn test_lowercase_folds_every_line() {
		let tokenizer = Tokenizer::new(true, true);
		let tokens: Vec<String> = tokenizer.tokens(["Cats RUN.", "Привет Мир"]).collect();

		assert_eq!(tokens, vec!["cats", "run", ".", "привет", "мир"]);
	}

	#[test]
	fn test_without_punctuation() {
		let tokenizer = Tokenizer::new(false, false);
		let tokens: Vec<String> = tokenizer.tokens(["Yes; no: maybe."]).collect();

		assert_eq!(tokens, vec!["Yes", "no", "maybe"]);
	}

	#[test]
	fn test_empty_input() {
		let tokenizer = Tokenizer::default();
		let lines: Vec<String> = Vec::new();

		assert_eq!(tokenizer.tokens(&lines).count(), 0);
		assert!(tokenizer.tokenize_line("   \t ").is_empty());
	}

	#[test]
	fn test_token_classes() {
		assert!(is_terminator("?"));
		assert!(!is_terminator(","));
		assert!(is_punctuation("-"));
		assert!(is_word("run"));
		assert!(!is_word(BOUNDARY));
		assert!(!is_word(";"));
	}
}
