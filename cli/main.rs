//! This module contains the main entrypoint to the pelorus cli.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use pelorus_core::{Progress, TrainOutput};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(
	name = "pelorus",
	about = "Train and tune a survival classifier from a csv file."
)]
enum Options {
	#[clap(name = "train", about = "train and tune a classifier")]
	Train(TrainOptions),
}

#[derive(Parser, Debug)]
struct TrainOptions {
	#[clap(short, long, help = "the path to your .csv file")]
	file: PathBuf,
	#[clap(short, long, help = "the name of the column to predict")]
	target: String,
	#[clap(short, long, help = "the path to a config file")]
	config: Option<PathBuf>,
	#[clap(long = "no-progress", help = "disable progress reporting", parse(from_flag = std::ops::Not::not))]
	progress: bool,
}

fn main() {
	env_logger::init();
	let options = Options::parse();
	let result = match options {
		Options::Train(options) => cli_train(options),
	};
	if let Err(error) = result {
		eprintln!("{}: {}", "error".red().bold(), error);
		std::process::exit(1);
	}
}

fn cli_train(options: TrainOptions) -> Result<()> {
	log::info!(
		"training on {} with target column \"{}\"",
		options.file.display(),
		options.target
	);
	let start = std::time::Instant::now();
	let show_progress = options.progress;
	let output = pelorus_core::train(
		&options.file,
		&options.target,
		options.config.as_deref(),
		&mut |progress| {
			if show_progress {
				display_progress(&progress)
			}
		},
	)?;
	log::info!("training took {:?}", start.elapsed());
	print_report(&output);
	Ok(())
}

fn display_progress(progress: &Progress) {
	match progress {
		Progress::Loading(_) => eprintln!("{}", "loading data".dimmed()),
		Progress::ComputingFeatures(_) => eprintln!("{}", "computing features".dimmed()),
		Progress::GridSearch(counter) => eprintln!(
			"{} {} {}",
			"evaluating".dimmed(),
			counter.total(),
			"configurations".dimmed()
		),
		Progress::Testing => eprintln!("{}", "testing".dimmed()),
	}
}

fn print_report(output: &TrainOutput) {
	println!(
		"target column {} with classes {}",
		output.target_column_name.bold(),
		output.classes.join(", ")
	);
	println!(
		"{} train rows, {} test rows, {} features",
		output.n_rows_train,
		output.n_rows_test,
		output.feature_names.len()
	);
	println!();
	for (index, result) in output.grid_results.iter().enumerate() {
		let line = format!(
			"{:>2}. accuracy {:.4} {}",
			index + 1,
			result.score,
			result.options
		);
		if index == output.best_index {
			println!("{}", line.green().bold());
		} else {
			println!("{}", line);
		}
	}
	println!();
	println!(
		"best configuration: {}",
		output.grid_results[output.best_index].options
	);
	println!("train accuracy    {:.4}", output.train_accuracy);
	println!("test accuracy     {:.4}", output.test_accuracy);
	println!("baseline accuracy {:.4}", output.baseline_accuracy);
}
