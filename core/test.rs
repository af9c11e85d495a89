/*!
This module evaluates fitted models: plain accuracy between aligned label sequences, the majority-class baseline, and the predict-then-score convenience used on the train and test partitions.
*/

use crate::error::ShapeError;
use crate::model::FittedModel;
use itertools::izip;
use ndarray::prelude::*;
use pelorus_metrics::{Accuracy, Metric, Mode, StreamingMetric};

/// The fraction of positions where `labels` and `predictions` agree, in [0, 1]. Fails if the sequences have different lengths. An empty pair of sequences scores 0.0.
pub fn accuracy(
	labels: ArrayView1<usize>,
	predictions: ArrayView1<usize>,
) -> Result<f32, ShapeError> {
	if labels.len() != predictions.len() {
		return Err(ShapeError {
			left: labels.len(),
			right: predictions.len(),
		});
	}
	let mut metric = Accuracy::new();
	for (label, prediction) in izip!(labels.iter(), predictions.iter()) {
		metric.update((*prediction, *label));
	}
	Ok(metric.finalize().unwrap_or(0.0))
}

/// The accuracy of always predicting the most frequent class in `labels`. Reported next to test accuracy so a model has a floor to clear.
pub fn baseline_accuracy(labels: ArrayView1<usize>) -> f32 {
	let labels = labels.to_vec();
	match Mode::compute(&labels) {
		Some(mode) => {
			let n_matches = labels.iter().filter(|label| **label == mode).count();
			n_matches as f32 / labels.len() as f32
		}
		None => 0.0,
	}
}

/// Predict with `model` over `features` and score the predictions against `labels`.
pub fn test_model(
	model: &impl FittedModel,
	features: ArrayView2<f32>,
	labels: ArrayView1<usize>,
) -> Result<f32, ShapeError> {
	let predictions = model.predict(features);
	accuracy(labels, predictions.view())
}

#[test]
fn test_accuracy_of_identical_sequences() {
	let labels = ndarray::array![0, 1, 1, 0, 1];
	assert_eq!(accuracy(labels.view(), labels.view()).unwrap(), 1.0);
}

#[test]
fn test_accuracy_of_flipped_sequences() {
	let labels = ndarray::array![0, 1, 1, 0, 1];
	let flipped = labels.mapv(|label| 1 - label);
	assert_eq!(accuracy(labels.view(), flipped.view()).unwrap(), 0.0);
}

#[test]
fn test_accuracy_of_mismatched_lengths_fails() {
	let labels = ndarray::array![0, 1, 1];
	let predictions = ndarray::array![0, 1];
	let result = accuracy(labels.view(), predictions.view());
	assert!(matches!(result, Err(ShapeError { left: 3, right: 2 })));
}

#[test]
fn test_baseline_accuracy() {
	let labels = ndarray::array![0, 1, 1, 0, 1];
	assert_eq!(baseline_accuracy(labels.view()), 0.6);
}
