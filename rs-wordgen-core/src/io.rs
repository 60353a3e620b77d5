use std::fs::File;
use std::io::{self, BufRead, Read};
use std::path::{Path, PathBuf};
use std::{env, fs};

use log::debug;

use crate::error::{Result, WordGenError};

/// Extension of the text files picked up for training.
pub const TEXT_EXTENSION: &str = "txt";

/// Where training text comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineSource {
	/// A single line typed on standard input.
	Stdin,
	/// Every `.txt` file under a directory.
	Directory { path: PathBuf, recursive: bool },
}

impl LineSource {
	/// Reads every line of the source.
	///
	/// Directory files are read in sorted path order so a training run is
	/// reproducible.
	pub fn lines(&self) -> Result<Vec<String>> {
		match self {
			LineSource::Stdin => {
				let mut line = String::new();
				io::stdin().lock().read_line(&mut line).map_err(|err| WordGenError::io("<stdin>", err))?;
				Ok(vec![line])
			}
			LineSource::Directory { path, recursive } => {
				let folder = normalize_folder(path);
				let files = list_files(&folder, TEXT_EXTENSION, *recursive).map_err(|err| WordGenError::io(&folder, err))?;
				debug!("Found {} text files under {}", files.len(), folder.display());

				let mut lines = Vec::new();
				for file in files {
					lines.extend(read_file(&file).map_err(|err| WordGenError::io(&file, err))?);
				}
				Ok(lines)
			}
		}
	}
}

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder<P: AsRef<Path>>(input: P) -> PathBuf {
	let input = input.as_ref();
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists all files with a given extension in a directory, sorted.
///
/// Returns full paths. Subdirectories are walked only if `recursive`.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str, recursive: bool) -> io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();
	let mut pending = vec![dir.as_ref().to_path_buf()];

	while let Some(dir) = pending.pop() {
		for entry in fs::read_dir(&dir)? {
			let path = entry?.path();

			if path.is_dir() {
				if recursive {
					pending.push(path);
				}
			} else if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
				files.push(path);
			}
		}
	}

	files.sort();
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	#[test]
	fn test_list_files_filters_and_sorts() {
		let dir = tempdir().unwrap();
		fs::write(dir.path().join("b.txt"), "b").unwrap();
		fs::write(dir.path().join("a.txt"), "a").unwrap();
		fs::write(dir.path().join("notes.md"), "skip").unwrap();
		fs::create_dir(dir.path().join("nested")).unwrap();
		fs::write(dir.path().join("nested").join("c.txt"), "c").unwrap();

		let flat = list_files(dir.path(), "txt", false).unwrap();
		assert_eq!(flat, vec![dir.path().join("a.txt"), dir.path().join("b.txt")]);

		let deep = list_files(dir.path(), "txt", true).unwrap();
		assert_eq!(deep.len(), 3);
		assert!(deep.contains(&dir.path().join("nested").join("c.txt")));
	}

	#[test]
	fn test_directory_source_reads_all_lines() {
		let dir = tempdir().unwrap();
		fs::write(dir.path().join("one.txt"), "First line.\r\nSecond line!\n").unwrap();
		fs::write(dir.path().join("two.txt"), "Third line?").unwrap();

		let source = LineSource::Directory { path: dir.path().to_path_buf(), recursive: true };
		let lines = source.lines().unwrap();

		assert_eq!(lines, vec!["First line.", "Second line!", "Third line?"]);
	}

	#[test]
	fn test_missing_directory() {
		let dir = tempdir().unwrap();
		let source = LineSource::Directory { path: dir.path().join("absent"), recursive: false };

		assert!(matches!(source.lines(), Err(WordGenError::Io { .. })));
	}

	#[test]
	fn test_normalize_folder() {
		assert_eq!(normalize_folder("data/texts"), PathBuf::from("data/texts"));
		assert!(normalize_folder(".").is_absolute() || normalize_folder(".") == PathBuf::from("."));
	}
}
