/*!
This module defines the `Config` struct, which is used to configure training a model with [`train`](../train/fn.train.html).
*/

use std::collections::BTreeMap;

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	pub column_types: Option<BTreeMap<String, ColumnType>>,
	pub test_fraction: Option<f32>,
	pub comparison_fraction: Option<f32>,
	pub seed: Option<u64>,
	pub grid: Option<Vec<TreeGridItem>>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ColumnType {
	#[serde(rename = "unknown")]
	Unknown,
	#[serde(rename = "number")]
	Number,
	#[serde(rename = "enum")]
	Enum { options: Vec<String> },
	#[serde(rename = "text")]
	Text,
}

/// One entry in the hyperparameter grid. Candidates are the Cartesian product of the values listed in a single item, and items are searched one after another, so several single-parameter items vary each parameter on its own while one multi-parameter item spans a joint grid.
#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeGridItem {
	pub criterion: Option<Vec<Criterion>>,
	pub max_depth: Option<Vec<u64>>,
	pub min_samples_leaf: Option<Vec<u64>>,
	pub min_samples_split: Option<Vec<u64>>,
	pub random_state: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
pub enum Criterion {
	#[serde(rename = "gini")]
	Gini,
	#[serde(rename = "entropy")]
	Entropy,
}

#[test]
fn test_parse_config() {
	let config = r#"
test_fraction: 0.2
seed: 42
grid:
  - max_depth: [2, 4, 6, 8, 10]
  - min_samples_leaf: [2, 4, 6, 8, 10]
  - criterion: [gini, entropy]
    max_depth: [6]
"#;
	let config: Config = serde_yaml::from_str(config).unwrap();
	assert_eq!(config.test_fraction, Some(0.2));
	assert_eq!(config.seed, Some(42));
	let grid = config.grid.unwrap();
	assert_eq!(grid.len(), 3);
	assert_eq!(grid[0].max_depth, Some(vec![2, 4, 6, 8, 10]));
	assert_eq!(grid[0].min_samples_leaf, None);
	assert_eq!(
		grid[2].criterion,
		Some(vec![Criterion::Gini, Criterion::Entropy])
	);
}

#[test]
fn test_unknown_hyperparameter_is_rejected() {
	let config = r#"
grid:
  - max_leaf_nodes: [2, 4]
"#;
	let config: Result<Config, _> = serde_yaml::from_str(config);
	assert!(config.is_err());
}
