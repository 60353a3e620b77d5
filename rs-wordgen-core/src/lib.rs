//! Word-level n-gram text generation library.
//!
//! This crate provides a statistical n-gram language model including:
//! - Tokenization of raw text into words and punctuation
//! - Sliding-window n-gram extraction with sentence-boundary padding
//! - Frequency tables, built from scratch or updated incrementally
//! - Weighted random generation with recovery on unseen contexts
//! - Persistence of trained tables through a pluggable store
//!
//! The [`train`] and [`generate`] entry points wire these together.

/// Core n-gram model: tokens, tables, persistence and generation.
pub mod model;

/// Line sources (stdin, directories of text files) and path helpers.
pub mod io;

/// Error type shared by every operation.
pub mod error;

/// Train and generate entry points.
pub mod pipeline;

pub use error::{Result, WordGenError};
pub use pipeline::{generate, generate_text, train};
