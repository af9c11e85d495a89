/*!
This module defines the classifier capability boundary. The pipeline only ever talks to `{fit, predict}`, so any supervised classifier over numeric feature matrices and class labels can be plugged in. The concrete implementation used throughout is [`TreeBinaryClassifier`](struct.TreeBinaryClassifier.html), an adapter over the decision tree induction in `linfa_trees`.
*/

use crate::error::FitError;
use crate::grid::{SplitCriterion, TreeTrainOptions};
use linfa::prelude::*;
use linfa::Dataset;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::prelude::*;
use num_traits::ToPrimitive;

/// A classifier that can be constructed from a hyperparameter configuration and fit to a feature matrix with one class label per row.
pub trait Classifier {
	type Options: Clone + Send + Sync;
	type Fitted: FittedModel;
	fn with_options(options: Self::Options) -> Self;
	/// Fit a model. The inputs are borrowed immutably; a fresh model is returned rather than mutating anything.
	fn fit(
		&self,
		features: ArrayView2<f32>,
		labels: ArrayView1<usize>,
	) -> Result<Self::Fitted, FitError>;
}

/// The opaque state produced by [`Classifier::fit`](trait.Classifier.html#tymethod.fit).
pub trait FittedModel {
	/// Predict one class label per row of `features`, aligned to the row order of `features`.
	fn predict(&self, features: ArrayView2<f32>) -> Array1<usize>;
}

/// A binary classifier backed by `linfa_trees::DecisionTree`. Options that are unset fall through to the collaborator's defaults. `random_state` is accepted for interface parity; the induction in `linfa_trees` is deterministic, so it has no effect.
pub struct TreeBinaryClassifier {
	options: TreeTrainOptions,
}

pub struct TreeFittedModel {
	tree: DecisionTree<f32, usize>,
}

impl Classifier for TreeBinaryClassifier {
	type Options = TreeTrainOptions;
	type Fitted = TreeFittedModel;

	fn with_options(options: TreeTrainOptions) -> Self {
		Self { options }
	}

	fn fit(
		&self,
		features: ArrayView2<f32>,
		labels: ArrayView1<usize>,
	) -> Result<TreeFittedModel, FitError> {
		if features.nrows() == 0 {
			return Err(FitError::EmptyTrainSet);
		}
		let dataset = Dataset::new(features.to_owned(), labels.to_owned());
		let mut params = DecisionTree::params()
			.max_depth(self.options.max_depth.map(|value| value.to_usize().unwrap()));
		if let Some(criterion) = self.options.criterion {
			params = params.split_quality(match criterion {
				SplitCriterion::Gini => SplitQuality::Gini,
				SplitCriterion::Entropy => SplitQuality::Entropy,
			});
		}
		if let Some(min_samples_split) = self.options.min_samples_split {
			params = params.min_weight_split(min_samples_split.to_f32().unwrap());
		}
		if let Some(min_samples_leaf) = self.options.min_samples_leaf {
			params = params.min_weight_leaf(min_samples_leaf.to_f32().unwrap());
		}
		let tree = params.fit(&dataset).map_err(FitError::Induction)?;
		Ok(TreeFittedModel { tree })
	}
}

impl FittedModel for TreeFittedModel {
	fn predict(&self, features: ArrayView2<f32>) -> Array1<usize> {
		let features = features.to_owned();
		self.tree.predict(&features)
	}
}

#[cfg(test)]
fn separable_data(n_rows: usize) -> (Array2<f32>, Array1<usize>) {
	// One feature whose sign determines the label, with no value at zero.
	let features = Array2::from_shape_fn((n_rows, 1), |(row, _)| {
		if row % 2 == 0 {
			-1.0 - row.to_f32().unwrap()
		} else {
			1.0 + row.to_f32().unwrap()
		}
	});
	let labels = Array1::from_shape_fn(n_rows, |row| row % 2);
	(features, labels)
}

#[test]
fn test_fit_and_predict_separable_data() {
	let (features, labels) = separable_data(20);
	let classifier = TreeBinaryClassifier::with_options(TreeTrainOptions::default());
	let model = classifier.fit(features.view(), labels.view()).unwrap();
	let predictions = model.predict(features.view());
	assert_eq!(predictions, labels);
}

#[test]
fn test_fit_respects_max_depth_options() {
	let (features, labels) = separable_data(20);
	let classifier = TreeBinaryClassifier::with_options(TreeTrainOptions {
		criterion: Some(SplitCriterion::Entropy),
		max_depth: Some(2),
		min_samples_leaf: Some(2),
		min_samples_split: Some(4),
		random_state: Some(42),
	});
	let model = classifier.fit(features.view(), labels.view()).unwrap();
	let predictions = model.predict(features.view());
	// A single threshold at zero separates the classes, so even a depth-two tree is exact.
	assert_eq!(predictions, labels);
}

#[test]
fn test_fit_empty_train_set_fails() {
	let features = Array2::zeros((0, 1));
	let labels = Array1::zeros(0);
	let classifier = TreeBinaryClassifier::with_options(TreeTrainOptions::default());
	let result = classifier.fit(features.view(), labels.view());
	assert!(matches!(result, Err(FitError::EmptyTrainSet)));
}
