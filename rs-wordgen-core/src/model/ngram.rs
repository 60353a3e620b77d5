use std::collections::VecDeque;
use std::fmt;
use std::iter;

use serde::{Deserialize, Serialize};

use super::tokenizer::{BOUNDARY, is_terminator};
use crate::error::{Result, WordGenError};

/// An ordered, fixed-length sequence of tokens.
///
/// Two n-grams are equal (and hash equally) iff every position matches.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NGram(Vec<String>);

impl NGram {
	pub fn new(tokens: Vec<String>) -> Self {
		Self(tokens)
	}

	/// Number of tokens (the order `n`).
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn tokens(&self) -> &[String] {
		&self.0
	}

	/// The leading `n-1` tokens.
	pub fn context(&self) -> &[String] {
		&self.0[..self.0.len().saturating_sub(1)]
	}

	/// The final token, the one predicted by the context.
	pub fn last(&self) -> Option<&str> {
		self.0.last().map(String::as_str)
	}

	pub fn into_tokens(self) -> Vec<String> {
		self.0
	}
}

impl<const K: usize> From<[&str; K]> for NGram {
	fn from(tokens: [&str; K]) -> Self {
		Self(tokens.iter().map(|t| (*t).to_owned()).collect())
	}
}

impl From<Vec<String>> for NGram {
	fn from(tokens: Vec<String>) -> Self {
		Self(tokens)
	}
}

impl fmt::Display for NGram {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({})", self.0.join(" "))
	}
}

/// Largest n-gram size accepted for training or loading.
pub const MAX_ORDER: usize = 32;

/// Checks that `n` is a usable n-gram size (`2..=MAX_ORDER`).
pub fn check_order(n: usize) -> Result<()> {
	if !(2..=MAX_ORDER).contains(&n) {
		return Err(WordGenError::InvalidOrder(n));
	}
	Ok(())
}

/// Returns the context made only of boundary tokens, `n-1` long.
pub fn boundary_context(n: usize) -> Vec<String> {
	vec![BOUNDARY.to_owned(); n.saturating_sub(1)]
}

/// Lazy sliding-window extractor turning a token stream into n-grams.
///
/// The window holds the last `n-1` tokens and starts as boundary padding.
/// After a sentence terminator the window is reset, so no context ever
/// spans two sentences. The closing windows of a sentence are queued in
/// `pending` and handed out before the next token is pulled.
///
/// ## Invariants
/// - `window.len() == n - 1`
/// - Every produced n-gram has exactly `n` tokens
pub struct NGrams<I> {
	tokens: I,
	n: usize,
	window: Vec<String>,
	pending: VecDeque<NGram>,
}

impl<I> NGrams<I>
where
	I: Iterator<Item = String>,
{
	/// Creates an extractor of order `n` over `tokens`.
	///
	/// # Errors
	/// Returns an error if `n` is outside `2..=MAX_ORDER`.
	pub fn new(tokens: I, n: usize) -> Result<Self> {
		check_order(n)?;
		Ok(Self { tokens, n, window: boundary_context(n), pending: VecDeque::new() })
	}

	pub fn order(&self) -> usize {
		self.n
	}

	/// Queues the windows closing a sentence ended by `terminator`.
	///
	/// For each tail length `i` in `1..n`, the window drops its `i` oldest
	/// tokens and is padded with `i` boundary tokens. The last one
	/// (`i == n-1`) is the `terminator -> boundary` window, the only tail
	/// produced for bigrams.
	fn queue_tails(&mut self, terminator: &str) {
		for i in 1..self.n {
			let tail: Vec<String> = self.window[i..]
				.iter()
				.cloned()
				.chain(iter::once(terminator.to_owned()))
				.chain(iter::repeat_n(BOUNDARY.to_owned(), i))
				.collect();
			self.pending.push_back(NGram(tail));
		}
	}
}

impl<I> Iterator for NGrams<I>
where
	I: Iterator<Item = String>,
{
	type Item = NGram;

	fn next(&mut self) -> Option<NGram> {
		if let Some(ngram) = self.pending.pop_front() {
			return Some(ngram);
		}

		let token = self.tokens.next()?;
		let mut tokens = Vec::with_capacity(self.n);
		tokens.extend(self.window.iter().cloned());
		tokens.push(token.clone());

		if is_terminator(&token) {
			self.queue_tails(&token);
			self.window = boundary_context(self.n);
		} else {
			self.window.remove(0);
			self.window.push(token);
		}

		Some(NGram(tokens))
	}
}
