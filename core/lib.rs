/*!
This crate implements the training pipeline: load a csv file of passenger records into a dataframe, encode it into a feature matrix, split it into train and test partitions with a seeded shuffle, tune a decision tree classifier over a hyperparameter grid, and report train and test accuracy. The decision tree induction itself is delegated to `linfa_trees` behind the [`Classifier`](model/trait.Classifier.html) boundary in the [`model`](model/index.html) module.
*/

#![allow(clippy::tabs_in_doc_comments)]

mod config;

pub mod error;
pub mod grid;
pub mod model;
pub mod progress;
pub mod split;
pub mod test;
pub mod train;

pub use self::error::{ConfigError, Error, FitError, Result, ShapeError};
pub use self::progress::{Progress, ProgressCounter};
pub use self::train::{train, TrainOutput};
