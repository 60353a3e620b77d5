//! wordgen - train word n-gram models and generate text from them.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_wordgen_core::io::LineSource;
use rs_wordgen_core::model::options::{GenerateOptions, StartSeed, TrainOptions};
use rs_wordgen_core::model::store::FileStore;
use rs_wordgen_core::{generate, train};

#[derive(Parser)]
#[command(name = "wordgen")]
#[command(about = "Word n-gram text generator", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Train (or update) a model from text
	Train(TrainCommand),
	/// Generate text from a trained model
	Generate(GenerateCommand),
}

#[derive(Args)]
struct TrainCommand {
	/// Lower-case the texts before tokenizing
	#[arg(long)]
	lc: bool,

	/// Directory of .txt files; reads a single line from stdin if absent
	#[arg(long)]
	input_dir: Option<PathBuf>,

	/// Only read .txt files directly inside --input-dir
	#[arg(long, requires = "input_dir")]
	flat: bool,

	/// Model file to write
	#[arg(long)]
	model: Option<String>,

	/// Number of words in one n-gram
	#[arg(long, default_value_t = 2)]
	ngrams: usize,

	/// Drop punctuation marks from the texts
	#[arg(long)]
	no_punctuation: bool,

	/// Add to the existing model instead of replacing it
	#[arg(long)]
	update: bool,
}

#[derive(Args)]
struct GenerateCommand {
	/// Model file to read
	model: String,

	/// Number of words to generate
	length: usize,

	/// Starting word
	#[arg(long)]
	seed: Option<String>,

	/// Output file; prints to stdout if absent
	#[arg(long)]
	output: Option<PathBuf>,

	/// Seed of the random generator, for reproducible output
	#[arg(long)]
	rng_seed: Option<u64>,
}

fn run_train(cmd: TrainCommand) -> anyhow::Result<()> {
	let Some(model) = cmd.model else {
		bail!("No model destination given, use --model <path>");
	};

	let mut options = TrainOptions::new(cmd.ngrams)?;
	options.lowercase = cmd.lc;
	options.include_punctuation = !cmd.no_punctuation;
	options.update = cmd.update;

	let source = match cmd.input_dir {
		Some(path) => LineSource::Directory { path, recursive: !cmd.flat },
		None => LineSource::Stdin,
	};
	let lines = source.lines().context("Failed to read training text")?;

	let mut store = FileStore::current_dir();
	let table = train(lines, &options, &mut store, &model)
		.with_context(|| format!("Failed to train model {}", model))?;
	info!("Model {} holds {} distinct {}-grams", model, table.len(), table.order());
	Ok(())
}

fn run_generate(cmd: GenerateCommand) -> anyhow::Result<()> {
	let store = FileStore::current_dir();
	let options = GenerateOptions::new(cmd.length, StartSeed::from_word(cmd.seed));
	let rng = match cmd.rng_seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};

	let text = generate(&store, &cmd.model, &options, rng)
		.with_context(|| format!("Failed to generate from model {}", cmd.model))?;

	match cmd.output {
		Some(path) => {
			fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
		}
		None => println!("{}", text),
	}
	Ok(())
}

fn main() -> anyhow::Result<()> {
	env_logger::init();
	let cli = Cli::parse();

	match cli.command {
		Commands::Train(cmd) => run_train(cmd)?,
		Commands::Generate(cmd) => run_generate(cmd)?,
	}

	Ok(())
}
