use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::frequency_table::FrequencyTable;
use super::ngram::NGram;
use crate::error::{Result, WordGenError};

/// Version of the persisted envelope. Bumped on any layout change.
const FORMAT_VERSION: u32 = 1;

/// Persistence backend for serialized frequency tables.
///
/// A store maps a model id to an opaque byte blob. It knows nothing about
/// the encoding; see [`load`] and [`save`].
pub trait ModelStore {
	/// Reads the bytes stored under `id`.
	///
	/// # Errors
	/// Returns `ModelNotFound` if nothing is stored under `id`.
	fn read(&self, id: &str) -> Result<Vec<u8>>;

	/// Replaces whatever is stored under `id` with `bytes`.
	fn write(&mut self, id: &str, bytes: &[u8]) -> Result<()>;
}

/// Store keeping each model in its own file.
///
/// The id is a path, resolved against `root` when relative.
#[derive(Clone, Debug)]
pub struct FileStore {
	root: PathBuf,
}

impl FileStore {
	pub fn new<P: AsRef<Path>>(root: P) -> Self {
		Self { root: root.as_ref().to_path_buf() }
	}

	/// Store resolving ids against the current directory.
	pub fn current_dir() -> Self {
		Self::new(".")
	}

	/// Location of the model `id`.
	pub fn path(&self, id: &str) -> PathBuf {
		self.root.join(id)
	}
}

impl ModelStore for FileStore {
	fn read(&self, id: &str) -> Result<Vec<u8>> {
		let path = self.path(id);
		match fs::read(&path) {
			Ok(bytes) => Ok(bytes),
			Err(err) if err.kind() == io::ErrorKind::NotFound => Err(WordGenError::ModelNotFound(id.to_owned())),
			Err(err) => Err(WordGenError::io(path, err)),
		}
	}

	/// Writes next to the target then renames, so a reader never sees a
	/// half-written model.
	fn write(&mut self, id: &str, bytes: &[u8]) -> Result<()> {
		let path = self.path(id);
		let mut tmp_name = path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
		tmp_name.push(".tmp");
		let tmp_path = path.with_file_name(tmp_name);

		fs::write(&tmp_path, bytes).map_err(|err| WordGenError::io(&tmp_path, err))?;
		if let Err(err) = fs::rename(&tmp_path, &path) {
			let _ = fs::remove_file(&tmp_path);
			return Err(WordGenError::io(path, err));
		}
		debug!("Wrote {} bytes to {}", bytes.len(), path.display());
		Ok(())
	}
}

/// In-memory store, for tests and callers embedding the engine.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
	models: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.models.contains_key(id)
	}

	pub fn is_empty(&self) -> bool {
		self.models.is_empty()
	}
}

impl ModelStore for MemoryStore {
	fn read(&self, id: &str) -> Result<Vec<u8>> {
		self.models.get(id).cloned().ok_or_else(|| WordGenError::ModelNotFound(id.to_owned()))
	}

	fn write(&mut self, id: &str, bytes: &[u8]) -> Result<()> {
		self.models.insert(id.to_owned(), bytes.to_vec());
		Ok(())
	}
}

/// On-disk layout of a frequency table.
#[derive(Serialize, Deserialize, Debug)]
struct StoredTable {
	version: u32,
	order: usize,
	entries: Vec<(NGram, u64)>,
}

/// Serializes `table` and writes it under `id`.
pub fn save<S: ModelStore + ?Sized>(table: &FrequencyTable, store: &mut S, id: &str) -> Result<()> {
	let stored = StoredTable { version: FORMAT_VERSION, order: table.order(), entries: table.entries() };
	let bytes = postcard::to_stdvec(&stored).map_err(|err| corrupt(id, err))?;
	store.write(id, &bytes)?;
	info!("Saved model {}: {} n-grams of order {}", id, stored.entries.len(), stored.order);
	Ok(())
}

/// Reads and decodes the table stored under `id`.
///
/// The context index is rebuilt here, once per load.
///
/// # Errors
/// - `ModelNotFound` if nothing is stored under `id`
/// - `CorruptModel` if the bytes do not decode into a homogeneous table
pub fn load<S: ModelStore + ?Sized>(store: &S, id: &str) -> Result<FrequencyTable> {
	let bytes = store.read(id)?;
	let table = decode(&bytes).map_err(|reason| WordGenError::CorruptModel { id: id.to_owned(), reason })?;
	info!("Loaded model {}: {} n-grams of order {}", id, table.len(), table.order());
	Ok(table)
}

/// Decodes a stored table, checking every invariant of the format.
fn decode(bytes: &[u8]) -> std::result::Result<FrequencyTable, String> {
	let (stored, rest): (StoredTable, &[u8]) = postcard::take_from_bytes(bytes).map_err(|err| err.to_string())?;
	if !rest.is_empty() {
		return Err(format!("{} trailing bytes", rest.len()));
	}
	if stored.version != FORMAT_VERSION {
		return Err(format!("unsupported format version {}", stored.version));
	}

	let mut table = FrequencyTable::new(stored.order).map_err(|err| err.to_string())?;
	for (ngram, count) in &stored.entries {
		if *count == 0 {
			return Err(format!("zero count for {}", ngram));
		}
		if table.count(ngram) != 0 {
			return Err(format!("duplicate entry {}", ngram));
		}
		table.add(ngram, *count).map_err(|err| err.to_string())?;
	}
	Ok(table)
}

fn corrupt(id: &str, err: postcard::Error) -> WordGenError {
	WordGenError::CorruptModel { id: id.to_owned(), reason: err.to_string() }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::ngram::NGrams;
	use crate::model::tokenizer::Tokenizer;
	use tempfile::tempdir;

	fn sample_table() -> FrequencyTable {
		let tokenizer = Tokenizer::default();
		let ngrams = NGrams::new(tokenizer.tokens(["Cats run. Dogs run!"]), 2).unwrap();
		FrequencyTable::build(2, ngrams).unwrap()
	}

	fn encode(stored: &StoredTable) -> Vec<u8> {
		postcard::to_stdvec(stored).unwrap()
	}

	#[test]
	fn test_memory_round_trip() {
		let table = sample_table();
		let mut store = MemoryStore::new();

		save(&table, &mut store, "cats").unwrap();
		assert!(store.contains("cats"));
		assert!(!store.contains("dogs"));
		assert_eq!(load(&store, "cats").unwrap(), table);
	}

	#[test]
	fn test_file_round_trip() {
		let dir = tempdir().unwrap();
		let mut store = FileStore::new(dir.path());
		let table = sample_table();

		save(&table, &mut store, "model.bin").unwrap();
		assert!(dir.path().join("model.bin").exists());
		assert!(!dir.path().join("model.bin.tmp").exists());
		assert_eq!(load(&store, "model.bin").unwrap(), table);
	}

	#[test]
	fn test_missing_model() {
		let dir = tempdir().unwrap();
		let store = FileStore::new(dir.path());

		assert!(matches!(load(&store, "nope.bin"), Err(WordGenError::ModelNotFound(_))));
		assert!(matches!(load(&MemoryStore::new(), "nope"), Err(WordGenError::ModelNotFound(_))));
	}

	#[test]
	fn test_garbage_is_corrupt() {
		let mut store = MemoryStore::new();
		store.write("bad", b"\xff\xff\xff\xff\xff\xff\xff\xff\xff\xff\xff").unwrap();

		assert!(matches!(load(&store, "bad"), Err(WordGenError::CorruptModel { .. })));
	}

	#[test]
	fn test_mixed_lengths_are_corrupt() {
		let stored = StoredTable {
			version: FORMAT_VERSION,
			order: 2,
			entries: vec![(NGram::from(["$", "a"]), 1), (NGram::from(["a", "b", "c"]), 1)],
		};
		let mut store = MemoryStore::new();
		store.write("mixed", &encode(&stored)).unwrap();

		assert!(matches!(load(&store, "mixed"), Err(WordGenError::CorruptModel { .. })));
	}

	#[test]
	fn test_bad_header_is_corrupt() {
		let mut store = MemoryStore::new();
		let future = StoredTable { version: FORMAT_VERSION + 1, order: 2, entries: Vec::new() };
		let unary = StoredTable { version: FORMAT_VERSION, order: 1, entries: Vec::new() };
		let huge = StoredTable { version: FORMAT_VERSION, order: 1 << 40, entries: Vec::new() };
		let zero = StoredTable { version: FORMAT_VERSION, order: 2, entries: vec![(NGram::from(["a", "b"]), 0)] };
		store.write("future", &encode(&future)).unwrap();
		store.write("unary", &encode(&unary)).unwrap();
		store.write("zero", &encode(&zero)).unwrap();
		store.write("huge", &encode(&huge)).unwrap();

		for id in ["future", "unary", "zero", "huge"] {
			assert!(matches!(load(&store, id), Err(WordGenError::CorruptModel { .. })), "{id}");
		}
	}

	#[test]
	fn test_trailing_bytes_are_corrupt() {
		let mut bytes = encode(&StoredTable { version: FORMAT_VERSION, order: 2, entries: Vec::new() });
		bytes.push(0);
		let mut store = MemoryStore::new();
		store.write("long", &bytes).unwrap();

		assert!(matches!(load(&store, "long"), Err(WordGenError::CorruptModel { .. })));
	}
}
