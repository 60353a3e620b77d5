//! Error types for the word n-gram engine.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for training, persistence and generation.
///
/// Sparse contexts met during generation are not errors: the generator
/// recovers from them locally and never surfaces them here.
#[derive(Error, Debug)]
pub enum WordGenError {
	/// No persisted table exists for the requested model id
	#[error("Model not found: {0}")]
	ModelNotFound(String),

	/// Stored bytes do not decode into a valid, homogeneous table
	#[error("Corrupt model {id}: {reason}")]
	CorruptModel { id: String, reason: String },

	/// Caller-supplied seed never starts an n-gram of the table
	#[error("Unknown seed word: {0}")]
	UnknownSeed(String),

	/// An n-gram of the wrong length was offered to a table
	#[error("N mismatch: table has order {expected}, got {found}")]
	OrderMismatch { expected: usize, found: usize },

	/// Requested n-gram size is below 2 or above the supported maximum
	#[error("n must be between 2 and 32, got {0}")]
	InvalidOrder(usize),

	/// The table has no sentence-start context to begin or recover a walk
	#[error("Model has no sentence-start n-grams")]
	EmptyModel,

	/// The table holds no word token, so no word can ever be generated
	#[error("Model contains no words to generate")]
	NoWords,

	/// I/O error with file context
	#[error("I/O error for {path}: {err}")]
	Io {
		path: PathBuf,
		#[source]
		err: std::io::Error,
	},
}

impl WordGenError {
	/// Wraps an I/O error with the path it happened on.
	pub fn io<P: Into<PathBuf>>(path: P, err: std::io::Error) -> Self {
		Self::Io { path: path.into(), err }
	}
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, WordGenError>;
