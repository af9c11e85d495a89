/*!
This module wires the pipeline together: load the csv file, pull out the target column, encode the full dataset, split it, tune the classifier over the hyperparameter grid, refit the winner on the full training set, and score it on the train and test partitions.
*/

use crate::{
	config::{self, Config},
	error::{ConfigError, Error, Result, ShapeError},
	grid,
	model::{Classifier, FittedModel, TreeBinaryClassifier, TreeFittedModel},
	progress::{Progress, ProgressCounter},
	split::train_test_split,
	test,
};
use ndarray::prelude::*;
use num_traits::ToPrimitive;
use pelorus_dataframe::{Column, ColumnType, DataFrame, FromCsvOptions};
use pelorus_features::{choose_feature_groups, compute_features};
use rayon::prelude::*;
use std::{collections::BTreeMap, path::Path};

pub const DEFAULT_TEST_FRACTION: f32 = 0.2;
pub const DEFAULT_COMPARISON_FRACTION: f32 = 0.1;
pub const DEFAULT_SEED: u64 = 42;

/// The result of training: the tuned model plus everything the report prints.
pub struct TrainOutput {
	pub target_column_name: String,
	/// The two class names, taken from the target column's options. A label is an index into this list.
	pub classes: Vec<String>,
	/// The name of each column of the encoded feature matrix.
	pub feature_names: Vec<String>,
	pub n_rows_train: usize,
	pub n_rows_test: usize,
	/// Every evaluated candidate, in the order the grid generated them.
	pub grid_results: Vec<EvaluationResult<grid::TreeTrainOptions>>,
	/// The index into `grid_results` of the winning candidate.
	pub best_index: usize,
	pub train_accuracy: f32,
	pub test_accuracy: f32,
	pub baseline_accuracy: f32,
	pub model: TreeFittedModel,
}

/// One evaluated candidate configuration and the score it earned on the comparison holdout.
#[derive(Clone, Debug)]
pub struct EvaluationResult<Options> {
	pub options: Options,
	pub score: f32,
}

pub struct GridSearchOutput<C>
where
	C: Classifier,
{
	/// The winning configuration refit on the full training set.
	pub model: C::Fitted,
	pub best_index: usize,
	pub results: Vec<EvaluationResult<C::Options>>,
}

pub fn train(
	file_path: &Path,
	target_column_name: &str,
	config_path: Option<&Path>,
	update_progress: &mut dyn FnMut(Progress),
) -> Result<TrainOutput> {
	// Load the config from the config file, if provided.
	let config = load_config(config_path)?;

	// Load the dataframe from the csv file.
	let dataframe = load_dataframe(file_path, &config, update_progress)?;

	// Find the target column and pull it out of the dataframe. The labels stay aligned with the remaining columns by row index.
	let column_names: Vec<String> = dataframe
		.columns
		.iter()
		.map(|column| column.name().to_owned())
		.collect();
	let target_column_index = column_names
		.iter()
		.position(|column_name| column_name == target_column_name)
		.ok_or_else(|| Error::TargetColumnNotFound {
			name: target_column_name.to_owned(),
			columns: column_names.clone(),
		})?;
	let (dataframe, target_column) = dataframe.extract_column(target_column_index);
	let (classes, labels) = extract_labels(&target_column)?;

	// Encode the full dataset before splitting so the train and test partitions share the same feature columns.
	let feature_groups = choose_feature_groups(&dataframe);
	if feature_groups.is_empty() {
		return Err(Error::NoFeatureColumns);
	}
	let n_features = feature_groups
		.iter()
		.map(|feature_group| feature_group.n_features())
		.sum::<usize>();
	let progress_counter =
		ProgressCounter::new((dataframe.nrows() * n_features).to_u64().unwrap());
	update_progress(Progress::ComputingFeatures(progress_counter.clone()));
	let features = compute_features(&dataframe, &feature_groups, &|| progress_counter.inc(1));
	let feature_names: Vec<String> = feature_groups
		.iter()
		.flat_map(|feature_group| feature_group.feature_names())
		.collect();

	// Train/test split.
	let test_fraction = config.test_fraction.unwrap_or(DEFAULT_TEST_FRACTION);
	let comparison_fraction = config
		.comparison_fraction
		.unwrap_or(DEFAULT_COMPARISON_FRACTION);
	let seed = config.seed.unwrap_or(DEFAULT_SEED);
	let split = train_test_split(features.view(), labels.view(), test_fraction, seed)?;

	// Create the hyperparameter grid and run the search.
	let grid = match &config.grid {
		Some(grid) => grid::compute_hyperparameter_grid(grid),
		None => grid::default_hyperparameter_grid(),
	};
	let progress_counter = ProgressCounter::new(grid.len().to_u64().unwrap());
	update_progress(Progress::GridSearch(progress_counter.clone()));
	let search = grid_search::<TreeBinaryClassifier, _>(
		split.features_train.view(),
		split.labels_train.view(),
		grid,
		comparison_fraction,
		seed,
		test::accuracy,
		&progress_counter,
	)?;

	// Score the tuned model on both partitions.
	update_progress(Progress::Testing);
	let train_accuracy = test::test_model(
		&search.model,
		split.features_train.view(),
		split.labels_train.view(),
	)?;
	let test_accuracy = test::test_model(
		&search.model,
		split.features_test.view(),
		split.labels_test.view(),
	)?;
	let baseline_accuracy = test::baseline_accuracy(split.labels_test.view());

	Ok(TrainOutput {
		target_column_name: target_column_name.to_owned(),
		classes,
		feature_names,
		n_rows_train: split.n_rows_train(),
		n_rows_test: split.n_rows_test(),
		best_index: search.best_index,
		grid_results: search.results,
		train_accuracy,
		test_accuracy,
		baseline_accuracy,
		model: search.model,
	})
}

/**
Evaluate every candidate configuration in `grid` and return the winner refit on the full training set.

A comparison holdout is carved out of the training set with the same seeded splitter used for the train/test split, each candidate gets a freshly constructed classifier fit on the remainder and scored on the holdout, and the strictly highest score wins, ties breaking toward the earliest generated candidate. The evaluations share no mutable state, so they run in parallel; the collected results keep grid order.
*/
pub fn grid_search<C, S>(
	features: ArrayView2<f32>,
	labels: ArrayView1<usize>,
	grid: Vec<C::Options>,
	comparison_fraction: f32,
	seed: u64,
	score: S,
	progress: &ProgressCounter,
) -> Result<GridSearchOutput<C>>
where
	C: Classifier,
	S: Fn(ArrayView1<usize>, ArrayView1<usize>) -> std::result::Result<f32, ShapeError> + Sync,
{
	if grid.is_empty() {
		return Err(ConfigError::EmptyGrid.into());
	}
	if !(comparison_fraction > 0.0 && comparison_fraction < 1.0) {
		return Err(ConfigError::ComparisonFraction(comparison_fraction).into());
	}
	let comparison_split = train_test_split(features, labels, comparison_fraction, seed)?;
	let results: Vec<EvaluationResult<C::Options>> = grid
		.into_par_iter()
		.map(|options| {
			let classifier = C::with_options(options.clone());
			let model = classifier.fit(
				comparison_split.features_train.view(),
				comparison_split.labels_train.view(),
			)?;
			let predictions = model.predict(comparison_split.features_test.view());
			let score = score(comparison_split.labels_test.view(), predictions.view())?;
			progress.inc(1);
			Ok(EvaluationResult { options, score })
		})
		.collect::<Result<Vec<_>>>()?;
	let best_index = choose_best_index(&results);
	// Refit the winner on the full training set.
	let classifier = C::with_options(results[best_index].options.clone());
	let model = classifier.fit(features, labels)?;
	Ok(GridSearchOutput {
		model,
		best_index,
		results,
	})
}

/// The index of the best result. The comparison is strictly greater, so the earliest evaluated candidate wins ties.
fn choose_best_index<Options>(results: &[EvaluationResult<Options>]) -> usize {
	let mut best_index = 0;
	for (index, result) in results.iter().enumerate().skip(1) {
		if result.score > results[best_index].score {
			best_index = index;
		}
	}
	best_index
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
	if let Some(config_path) = config_path {
		let config =
			std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
				path: config_path.to_owned(),
				source,
			})?;
		let config = serde_yaml::from_str(&config).map_err(|source| ConfigError::Parse {
			path: config_path.to_owned(),
			source,
		})?;
		Ok(config)
	} else {
		Ok(Config::default())
	}
}

fn load_dataframe(
	file_path: &Path,
	config: &Config,
	update_progress: &mut dyn FnMut(Progress),
) -> Result<DataFrame> {
	let len = std::fs::metadata(file_path)
		.map(|metadata| metadata.len())
		.unwrap_or(0);
	let progress_counter = ProgressCounter::new(len);
	update_progress(Progress::Loading(progress_counter.clone()));
	let column_types: Option<BTreeMap<String, ColumnType>> =
		config.column_types.as_ref().map(|column_types| {
			column_types
				.iter()
				.map(|(column_name, column_type)| {
					let column_type = match column_type {
						config::ColumnType::Unknown => ColumnType::Unknown,
						config::ColumnType::Number => ColumnType::Number,
						config::ColumnType::Enum { options } => ColumnType::Enum {
							options: options.clone(),
						},
						config::ColumnType::Text => ColumnType::Text,
					};
					(column_name.clone(), column_type)
				})
				.collect()
		});
	let dataframe = DataFrame::from_path(
		file_path,
		FromCsvOptions {
			column_types,
			infer_options: Default::default(),
		},
		|byte| progress_counter.set(byte),
	)?;
	Ok(dataframe)
}

fn extract_labels(target_column: &Column) -> Result<(Vec<String>, Array1<usize>)> {
	let column = match target_column {
		Column::Enum(column) if column.options.len() == 2 => column,
		_ => {
			return Err(Error::TargetColumnNotBinary(
				target_column.name().to_owned(),
			))
		}
	};
	let labels = column
		.data
		.iter()
		.map(|value| {
			value
				.map(|value| value.get() - 1)
				.ok_or_else(|| Error::TargetColumnInvalidValues(column.name.clone()))
		})
		.collect::<Result<Vec<usize>>>()?;
	Ok((column.options.clone(), Array1::from(labels)))
}

#[cfg(test)]
fn separable_data(n_rows: usize) -> (Array2<f32>, Array1<usize>) {
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
fn test_choose_best_index_never_returns_a_dominated_candidate() {
	let results = vec![
		EvaluationResult {
			options: 0,
			score: 0.5,
		},
		EvaluationResult {
			options: 1,
			score: 0.75,
		},
		EvaluationResult {
			options: 2,
			score: 0.75,
		},
		EvaluationResult {
			options: 3,
			score: 0.25,
		},
	];
	let best_index = choose_best_index(&results);
	assert_eq!(best_index, 1);
	assert!(results
		.iter()
		.all(|result| result.score <= results[best_index].score));
}

#[test]
fn test_grid_search_breaks_ties_toward_the_earliest_candidate() {
	let (features, labels) = separable_data(40);
	let grid = vec![
		grid::TreeTrainOptions {
			max_depth: Some(3),
			..Default::default()
		},
		grid::TreeTrainOptions {
			max_depth: Some(5),
			..Default::default()
		},
	];
	let progress = ProgressCounter::new(grid.len().to_u64().unwrap());
	let output = grid_search::<TreeBinaryClassifier, _>(
		features.view(),
		labels.view(),
		grid,
		0.25,
		42,
		test::accuracy,
		&progress,
	)
	.unwrap();
	assert_eq!(output.results.len(), 2);
	assert_eq!(output.results[0].score, 1.0);
	assert_eq!(output.results[1].score, 1.0);
	assert_eq!(output.best_index, 0);
	assert_eq!(progress.get(), 2);
}

#[test]
fn test_grid_search_empty_grid_fails() {
	let (features, labels) = separable_data(10);
	let progress = ProgressCounter::new(0);
	let result = grid_search::<TreeBinaryClassifier, _>(
		features.view(),
		labels.view(),
		Vec::new(),
		0.25,
		42,
		test::accuracy,
		&progress,
	);
	assert!(matches!(
		result,
		Err(Error::Config(ConfigError::EmptyGrid))
	));
}

#[test]
fn test_train_end_to_end() {
	let csv_path = std::env::temp_dir().join("pelorus_train_end_to_end.csv");
	let mut csv = String::from("Survived,Pclass,Sex,Age\n");
	for row in 0..40 {
		let (survived, sex) = if row % 2 == 0 { (0, "male") } else { (1, "female") };
		let pclass = row % 3 + 1;
		let age = if row % 10 == 0 {
			String::new()
		} else {
			(18 + row).to_string()
		};
		csv.push_str(&format!("{},{},{},{}\n", survived, pclass, sex, age));
	}
	std::fs::write(&csv_path, csv).unwrap();
	let output = train(&csv_path, "Survived", None, &mut |_| {}).unwrap();
	std::fs::remove_file(&csv_path).unwrap();
	assert_eq!(output.classes, vec!["0", "1"]);
	assert_eq!(output.n_rows_train, 32);
	assert_eq!(output.n_rows_test, 8);
	assert_eq!(output.grid_results.len(), 15);
	let best_score = output.grid_results[output.best_index].score;
	assert!(output
		.grid_results
		.iter()
		.all(|result| result.score <= best_score));
	assert_eq!(
		output.feature_names,
		vec!["Pclass", "Sex_male", "Sex_female", "Age"]
	);
	// Sex separates the classes exactly, so the tuned tree is exact on both partitions.
	assert_eq!(output.train_accuracy, 1.0);
	assert_eq!(output.test_accuracy, 1.0);
	assert!(output.baseline_accuracy >= 0.5);
	assert!(output.baseline_accuracy <= 1.0);
}

#[test]
fn test_train_missing_target_column_fails() {
	let csv_path = std::env::temp_dir().join("pelorus_train_missing_target.csv");
	std::fs::write(&csv_path, "a,b\n1,2\n").unwrap();
	let result = train(&csv_path, "Survived", None, &mut |_| {});
	std::fs::remove_file(&csv_path).unwrap();
	assert!(matches!(result, Err(Error::TargetColumnNotFound { .. })));
}
