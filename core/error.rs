/*!
This module defines the error taxonomy for the training pipeline. Every error surfaces immediately to the caller of the failing operation; nothing is retried or swallowed.
*/

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Ingestion(#[from] pelorus_dataframe::IngestionError),
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error(transparent)]
	Shape(#[from] ShapeError),
	#[error(transparent)]
	Fit(#[from] FitError),
	#[error("did not find target column \"{name}\" among column names \"{}\"", .columns.join(", "))]
	TargetColumnNotFound { name: String, columns: Vec<String> },
	#[error("target column \"{0}\" must be a binary column")]
	TargetColumnNotBinary(String),
	#[error("target column \"{0}\" contains missing or invalid values")]
	TargetColumnInvalidValues(String),
	#[error("no feature columns remain after removing the target column")]
	NoFeatureColumns,
}

/// An invalid configuration value, whether it came from a config file or a function argument.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("test fraction must be in (0, 1), got {0}")]
	TestFraction(f32),
	#[error("comparison fraction must be in (0, 1), got {0}")]
	ComparisonFraction(f32),
	#[error("the hyperparameter grid is empty")]
	EmptyGrid,
	#[error("failed to read config file {}", .path.display())]
	Read {
		path: PathBuf,
		source: std::io::Error,
	},
	#[error("failed to parse config file {}", .path.display())]
	Parse {
		path: PathBuf,
		source: serde_yaml::Error,
	},
}

/// Two sequences that must be aligned row for row have different lengths.
#[derive(Debug, Error)]
#[error("expected sequences of equal length, got {left} and {right}")]
pub struct ShapeError {
	pub left: usize,
	pub right: usize,
}

/// The classifier collaborator failed to produce a fitted model.
#[derive(Debug, Error)]
pub enum FitError {
	#[error("cannot fit a classifier on an empty training set")]
	EmptyTrainSet,
	#[error("decision tree induction failed")]
	Induction(#[source] linfa::error::Error),
}
