//! Train and generate entry points tying the engine together.

use log::info;
use rand::Rng;

use crate::error::Result;
use crate::model::frequency_table::FrequencyTable;
use crate::model::generator::Generator;
use crate::model::ngram::NGrams;
use crate::model::options::{GenerateOptions, TrainOptions};
use crate::model::renderer::render;
use crate::model::store::{ModelStore, load, save};

/// Trains a model from raw text lines and persists it under `id`.
///
/// Lines are tokenized and cut into n-grams lazily, one pass over the input.
/// With `options.update`, the counts are added to the model already stored
/// under `id`; otherwise the stored model is replaced.
///
/// Nothing is written unless the whole run succeeds.
///
/// # Errors
/// - `ModelNotFound` if an update is requested and no model is stored
/// - `CorruptModel` if the stored model cannot be decoded
/// - `OrderMismatch` if the stored model has another n-gram size
pub fn train<I, S, M>(lines: I, options: &TrainOptions, store: &mut M, id: &str) -> Result<FrequencyTable>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
	M: ModelStore + ?Sized,
{
	let tokenizer = options.tokenizer();
	let ngrams = NGrams::new(tokenizer.tokens(lines), options.n())?;

	let table = if options.update {
		let mut table = load(&*store, id)?;
		let before = table.total();
		table.merge(ngrams)?;
		info!("Updated model {} with {} n-gram occurrences", id, table.total() - before);
		table
	} else {
		let table = FrequencyTable::build(options.n(), ngrams)?;
		info!("Trained model {} on {} n-gram occurrences", id, table.total());
		table
	};

	save(&table, store, id)?;
	Ok(table)
}

/// Loads the model stored under `id` and generates text from it.
///
/// # Errors
/// - `ModelNotFound` / `CorruptModel` from loading
/// - `UnknownSeed` if the custom seed never starts an n-gram
/// - `NoWords` if the model holds no word token
pub fn generate<M, R>(store: &M, id: &str, options: &GenerateOptions, rng: R) -> Result<String>
where
	M: ModelStore + ?Sized,
	R: Rng,
{
	let table = load(store, id)?;
	generate_text(&table, options, rng)
}

/// Generates rendered text from an already loaded table.
pub fn generate_text<R: Rng>(table: &FrequencyTable, options: &GenerateOptions, rng: R) -> Result<String> {
	let mut generator = Generator::new(table, options.length, options.start_seed.word(), rng)?;
	let tokens: Vec<String> = generator.by_ref().collect();
	info!("Generated {} tokens ({} unseen contexts)", tokens.len(), generator.fallbacks());
	Ok(render(&tokens))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::WordGenError;
	use crate::model::ngram::NGram;
	use crate::model::options::StartSeed;
	use crate::model::store::MemoryStore;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn test_train_then_generate() {
		let mut store = MemoryStore::new();
		let options = TrainOptions::new(2).unwrap();
		train(["Cats run. Dogs run!"], &options, &mut store, "animals").unwrap();

		let generate_options = GenerateOptions::new(1, StartSeed::Custom("Cats".to_owned()));
		let text = generate(&store, "animals", &generate_options, StdRng::seed_from_u64(1)).unwrap();
		assert_eq!(text, " Cats run.");
	}

	#[test]
	fn test_update_adds_counts() {
		let mut store = MemoryStore::new();
		let mut options = TrainOptions::new(2).unwrap();
		train(["Cats run."], &options, &mut store, "m").unwrap();

		options.update = true;
		let table = train(["Cats sleep."], &options, &mut store, "m").unwrap();

		assert_eq!(table.count(&NGram::from(["$", "Cats"])), 2);
		assert_eq!(table.count(&NGram::from(["Cats", "sleep"])), 1);
		assert_eq!(load(&store, "m").unwrap(), table);
	}

	#[test]
	fn test_update_without_model_writes_nothing() {
		let mut store = MemoryStore::new();
		let mut options = TrainOptions::new(2).unwrap();
		options.update = true;

		let err = train(["Cats run."], &options, &mut store, "m").unwrap_err();
		assert!(matches!(err, WordGenError::ModelNotFound(_)));
		assert!(store.is_empty());
	}

	#[test]
	fn test_update_with_other_order_fails() {
		let mut store = MemoryStore::new();
		let options = TrainOptions::new(2).unwrap();
		train(["Cats run."], &options, &mut store, "m").unwrap();
		let before = load(&store, "m").unwrap();

		let mut trigram = TrainOptions::new(3).unwrap();
		trigram.update = true;
		assert!(matches!(
			train(["Dogs run."], &trigram, &mut store, "m"),
			Err(WordGenError::OrderMismatch { expected: 2, found: 3 })
		));
		assert_eq!(load(&store, "m").unwrap(), before);
	}

	#[test]
	fn test_lowercase_training() {
		let mut store = MemoryStore::new();
		let mut options = TrainOptions::new(2).unwrap();
		options.lowercase = true;
		let table = train(["CATS Run."], &options, &mut store, "m").unwrap();

		assert_eq!(table.count(&NGram::from(["cats", "run"])), 1);
		assert_eq!(table.count(&NGram::from(["CATS", "Run"])), 0);
	}

	#[test]
	fn test_generate_from_punctuation_only_model() {
		let mut store = MemoryStore::new();
		let table = train(["... !?"], &TrainOptions::new(2).unwrap(), &mut store, "marks").unwrap();
		assert_eq!(table.len(), 6);

		let options = GenerateOptions::new(1, StartSeed::Random);
		assert!(matches!(
			generate(&store, "marks", &options, StdRng::seed_from_u64(0)),
			Err(WordGenError::NoWords)
		));
	}

	#[test]
	fn test_generate_missing_model() {
		let store = MemoryStore::new();
		let options = GenerateOptions::new(3, StartSeed::Random);

		assert!(matches!(
			generate(&store, "ghost", &options, StdRng::seed_from_u64(0)),
			Err(WordGenError::ModelNotFound(_))
		));
	}
}
