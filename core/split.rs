/*!
This module partitions an encoded feature matrix and its labels into train and test subsets. The partition is drawn from a seeded pseudo-random permutation of the row indices, so the same seed always reproduces the same split.
*/

use crate::error::{ConfigError, Error, ShapeError};
use ndarray::prelude::*;
use num_traits::ToPrimitive;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

#[derive(Debug)]
pub struct TrainTestSplit {
	pub features_train: Array2<f32>,
	pub labels_train: Array1<usize>,
	pub features_test: Array2<f32>,
	pub labels_test: Array1<usize>,
}

impl TrainTestSplit {
	pub fn n_rows_train(&self) -> usize {
		self.features_train.nrows()
	}

	pub fn n_rows_test(&self) -> usize {
		self.features_test.nrows()
	}
}

/// Partition `features` and `labels` into train and test subsets. Row `i`'s label stays paired with row `i`'s features, every row lands in exactly one subset, and the test subset holds `test_fraction` of the rows, rounded down in favor of the train subset.
pub fn train_test_split(
	features: ArrayView2<f32>,
	labels: ArrayView1<usize>,
	test_fraction: f32,
	seed: u64,
) -> Result<TrainTestSplit, Error> {
	if !(test_fraction > 0.0 && test_fraction < 1.0) {
		return Err(ConfigError::TestFraction(test_fraction).into());
	}
	if features.nrows() != labels.len() {
		return Err(ShapeError {
			left: features.nrows(),
			right: labels.len(),
		}
		.into());
	}
	let n_rows = features.nrows();
	let mut indices: Vec<usize> = (0..n_rows).collect();
	let mut rng = Xoshiro256Plus::seed_from_u64(seed);
	indices.shuffle(&mut rng);
	let n_rows_train = ((1.0 - test_fraction) * n_rows.to_f32().unwrap())
		.to_usize()
		.unwrap();
	let (train_indices, test_indices) = indices.split_at(n_rows_train);
	Ok(TrainTestSplit {
		features_train: features.select(Axis(0), train_indices),
		labels_train: labels.select(Axis(0), train_indices),
		features_test: features.select(Axis(0), test_indices),
		labels_test: labels.select(Axis(0), test_indices),
	})
}

#[cfg(test)]
fn test_data(n_rows: usize) -> (Array2<f32>, Array1<usize>) {
	let features = Array2::from_shape_fn((n_rows, 2), |(row, column)| {
		(row * 2 + column).to_f32().unwrap()
	});
	let labels = Array1::from_shape_fn(n_rows, |row| row % 2);
	(features, labels)
}

#[test]
fn test_split_is_deterministic() {
	let (features, labels) = test_data(100);
	let a = train_test_split(features.view(), labels.view(), 0.2, 42).unwrap();
	let b = train_test_split(features.view(), labels.view(), 0.2, 42).unwrap();
	assert_eq!(a.features_train, b.features_train);
	assert_eq!(a.labels_train, b.labels_train);
	assert_eq!(a.features_test, b.features_test);
	assert_eq!(a.labels_test, b.labels_test);
}

#[test]
fn test_different_seeds_give_different_splits() {
	let (features, labels) = test_data(100);
	let a = train_test_split(features.view(), labels.view(), 0.2, 42).unwrap();
	let b = train_test_split(features.view(), labels.view(), 0.2, 43).unwrap();
	assert_ne!(a.features_train, b.features_train);
}

#[test]
fn test_split_sizes() {
	let (features, labels) = test_data(100);
	let split = train_test_split(features.view(), labels.view(), 0.2, 42).unwrap();
	assert_eq!(split.n_rows_train(), 80);
	assert_eq!(split.n_rows_test(), 20);
}

#[test]
fn test_split_covers_every_row_exactly_once() {
	let (features, labels) = test_data(100);
	let split = train_test_split(features.view(), labels.view(), 0.2, 42).unwrap();
	// The first feature value doubles as a row identity, and each row's label must travel with it.
	let mut rows: Vec<usize> = split
		.features_train
		.axis_iter(Axis(0))
		.zip(split.labels_train.iter())
		.chain(
			split
				.features_test
				.axis_iter(Axis(0))
				.zip(split.labels_test.iter()),
		)
		.map(|(features, label)| {
			let row = (features[0] / 2.0).to_usize().unwrap();
			assert_eq!(*label, row % 2);
			row
		})
		.collect();
	rows.sort_unstable();
	assert_eq!(rows, (0..100).collect::<Vec<usize>>());
}

#[test]
fn test_invalid_test_fraction_fails() {
	let (features, labels) = test_data(10);
	for &test_fraction in [0.0, 1.0, -0.5, 1.5].iter() {
		let result = train_test_split(features.view(), labels.view(), test_fraction, 42);
		assert!(matches!(
			result,
			Err(Error::Config(ConfigError::TestFraction(_)))
		));
	}
}

#[test]
fn test_mismatched_lengths_fail() {
	let (features, _) = test_data(10);
	let labels = Array1::zeros(9);
	let result = train_test_split(features.view(), labels.view(), 0.2, 42);
	assert!(matches!(result, Err(Error::Shape(_))));
}
