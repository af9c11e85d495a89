/*!
This crate implements the feature engineering that turns a loaded [`DataFrame`](../pelorus_dataframe/struct.DataFrame.html) into the dense `f32` matrix a classifier trains on. Encoding always runs over the full dataset before any train/test split, so both partitions share the same columns.
*/

#![allow(clippy::tabs_in_doc_comments)]

use itertools::izip;
use ndarray::{prelude::*, s};
use pelorus_dataframe::{Column, DataFrame, EnumColumn, NumberColumn};

/// This enum describes how to transform one column from the input dataframe to one or more columns in the output features.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGroup {
	Identity(IdentityFeatureGroup),
	OneHotEncoded(OneHotEncodedFeatureGroup),
}

/**
An `IdentityFeatureGroup` passes a number column through to the output features, substituting `0.0` for missing values so that every output cell is finite.

| dataframe value | feature value |
|-----------------|---------------|
| 0.2             | 0.2           |
| NaN             | 0.0           |
| 2.1             | 2.1           |
*/
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityFeatureGroup {
	pub source_column_name: String,
}

/**
A `OneHotEncodedFeatureGroup` creates one number feature for each option in an enum column, in the order the options were first seen during loading. For each example, all of the features will have the value 0.0, except the feature corresponding to the column's value, which will have the value 1.0. A missing value leaves the whole row of indicators at 0.0.

| dataframe value | feature values |
|-----------------|----------------|
| "S"             | [1, 0, 0]      |
| "C"             | [0, 1, 0]      |
| missing         | [0, 0, 0]      |
*/
#[derive(Debug, Clone, PartialEq)]
pub struct OneHotEncodedFeatureGroup {
	pub source_column_name: String,
	pub options: Vec<String>,
}

impl FeatureGroup {
	/// Return the number of features this feature group will produce.
	pub fn n_features(&self) -> usize {
		match self {
			FeatureGroup::Identity(_) => 1,
			FeatureGroup::OneHotEncoded(s) => s.options.len(),
		}
	}

	/// Return the name of each feature this feature group will produce.
	pub fn feature_names(&self) -> Vec<String> {
		match self {
			FeatureGroup::Identity(s) => vec![s.source_column_name.clone()],
			FeatureGroup::OneHotEncoded(s) => s
				.options
				.iter()
				.map(|option| format!("{}_{}", s.source_column_name, option))
				.collect(),
		}
	}
}

/// Choose feature groups for the columns of `dataframe`. Number columns pass through untouched, enum columns are one-hot encoded, and text and untyped columns produce no features.
pub fn choose_feature_groups(dataframe: &DataFrame) -> Vec<FeatureGroup> {
	let mut result = Vec::new();
	for column in dataframe.columns.iter() {
		match column {
			Column::Number(column) => {
				result.push(FeatureGroup::Identity(IdentityFeatureGroup {
					source_column_name: column.name.clone(),
				}));
			}
			Column::Enum(column) => {
				result.push(FeatureGroup::OneHotEncoded(OneHotEncodedFeatureGroup {
					source_column_name: column.name.clone(),
					options: column.options.clone(),
				}));
			}
			Column::Unknown(_) | Column::Text(_) => {}
		}
	}
	result
}

/// Compute the features for `dataframe` as a dense `f32` matrix with one row per example. Every cell of the output is finite.
pub fn compute_features(
	dataframe: &DataFrame,
	feature_groups: &[FeatureGroup],
	progress: &impl Fn(),
) -> Array2<f32> {
	let n_features = feature_groups
		.iter()
		.map(|feature_group| feature_group.n_features())
		.sum::<usize>();
	let mut features = Array2::zeros((dataframe.nrows(), n_features));
	let mut feature_index = 0;
	for feature_group in feature_groups.iter() {
		let n_features_in_group = feature_group.n_features();
		let slice = s![.., feature_index..feature_index + n_features_in_group];
		let features = features.slice_mut(slice);
		match feature_group {
			FeatureGroup::Identity(feature_group) => {
				compute_features_identity(dataframe, feature_group, features, progress)
			}
			FeatureGroup::OneHotEncoded(feature_group) => {
				compute_features_one_hot_encoded(dataframe, feature_group, features, progress)
			}
		}
		feature_index += n_features_in_group;
	}
	features
}

fn compute_features_identity(
	dataframe: &DataFrame,
	feature_group: &IdentityFeatureGroup,
	mut features: ArrayViewMut2<f32>,
	progress: &impl Fn(),
) {
	let source_column = source_column(dataframe, &feature_group.source_column_name);
	let source_column: &NumberColumn = source_column.as_number().unwrap();
	// Set the feature values to the source column values, substituting zero for missing values.
	for (feature, value) in izip!(features.iter_mut(), source_column.data.iter()) {
		*feature = if value.is_finite() { *value } else { 0.0 };
		progress()
	}
}

fn compute_features_one_hot_encoded(
	dataframe: &DataFrame,
	feature_group: &OneHotEncodedFeatureGroup,
	mut features: ArrayViewMut2<f32>,
	progress: &impl Fn(),
) {
	let source_column = source_column(dataframe, &feature_group.source_column_name);
	let source_column: &EnumColumn = source_column.as_enum().unwrap();
	// For each example, set the feature corresponding to the enum value to one. Missing values leave the row all zeros.
	for (mut features, value) in izip!(features.axis_iter_mut(Axis(0)), source_column.data.iter()) {
		if let Some(value) = value {
			features[value.get() - 1] = 1.0;
		}
		progress();
	}
}

fn source_column<'a>(dataframe: &'a DataFrame, source_column_name: &str) -> &'a Column {
	dataframe
		.columns
		.iter()
		.find(|column| column.name() == source_column_name)
		.unwrap()
}

#[cfg(test)]
fn test_dataframe() -> DataFrame {
	let csv = r#"survived,pclass,sex,age
0,3,male,22
1,1,female,38
1,3,female,
1,1,female,35
0,3,male,35
0,1,male,
0,3,male,2
1,2,female,27
1,3,female,14
0,2,male,20
"#;
	DataFrame::from_csv(
		&mut csv::Reader::from_reader(std::io::Cursor::new(csv)),
		pelorus_dataframe::FromCsvOptions {
			column_types: Some(
				vec![(
					"pclass".to_owned(),
					pelorus_dataframe::ColumnType::Enum {
						options: vec!["1".to_owned(), "2".to_owned(), "3".to_owned()],
					},
				)]
				.into_iter()
				.collect(),
			),
			infer_options: Default::default(),
		},
		|_| {},
	)
	.unwrap()
}

#[test]
fn test_encode_is_deterministic() {
	let dataframe = test_dataframe();
	let feature_groups = choose_feature_groups(&dataframe);
	let features_a = compute_features(&dataframe, &feature_groups, &|| {});
	let features_b = compute_features(&dataframe, &feature_groups, &|| {});
	assert_eq!(features_a, features_b);
	assert_eq!(feature_groups, choose_feature_groups(&dataframe));
}

#[test]
fn test_encode_fills_missing_and_one_hot_encodes() {
	let dataframe = test_dataframe();
	let (dataframe, _) = dataframe.extract_column(0);
	let feature_groups = choose_feature_groups(&dataframe);
	// One indicator per observed pclass and sex value, plus the age column.
	let feature_names: Vec<String> = feature_groups
		.iter()
		.flat_map(|feature_group| feature_group.feature_names())
		.collect();
	assert_eq!(
		feature_names,
		vec!["pclass_1", "pclass_2", "pclass_3", "sex_male", "sex_female", "age"]
	);
	let features = compute_features(&dataframe, &feature_groups, &|| {});
	assert_eq!(features.dim(), (10, 6));
	// Every cell is finite, including the two missing ages.
	assert!(features.iter().all(|value| value.is_finite()));
	assert_eq!(features[[2, 5]], 0.0);
	assert_eq!(features[[5, 5]], 0.0);
	// Each row has exactly one pclass indicator and one sex indicator set.
	for row in features.axis_iter(Axis(0)) {
		assert_eq!(row.slice(s![0..3]).sum(), 1.0);
		assert_eq!(row.slice(s![3..5]).sum(), 1.0);
	}
	assert_eq!(features[[0, 3]], 1.0);
	assert_eq!(features[[1, 4]], 1.0);
}
