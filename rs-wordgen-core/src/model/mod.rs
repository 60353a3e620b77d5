//! Top-level module for the word n-gram engine.
//!
//! Components, from leaf to root:
//! - Token normalization (`Tokenizer`)
//! - Sliding-window n-gram extraction (`NGrams`)
//! - Occurrence counting (`FrequencyTable`, `State`)
//! - Persistence (`ModelStore`, `load`, `save`)
//! - Random walk generation (`Generator`) and text rendering (`render`)

/// Splits raw lines into words and punctuation marks.
pub mod tokenizer;

/// N-gram value type and the sliding-window extractor.
pub mod ngram;

/// Continuations of a single context, with weighted sampling.
pub mod state;

/// N-gram occurrence counts indexed by context.
///
/// Supports building, incremental merging and context lookups.
pub mod frequency_table;

/// Model store abstraction and the table encoding.
pub mod store;

/// Weighted random walk over a frequency table.
pub mod generator;

/// Turns generated tokens back into text.
pub mod renderer;

/// Training and generation parameters.
pub mod options;
