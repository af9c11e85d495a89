/*!
This module expands the configured hyperparameter grid into the list of candidate configurations the tuner evaluates. Expansion order is deterministic: it is the order candidates are generated in, and ties during selection break toward the earliest candidate.
*/

use crate::config;
use itertools::iproduct;

/// The hyperparameters for one decision tree training run. Every field is optional; an unset field falls through to the collaborator's default.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeTrainOptions {
	pub criterion: Option<SplitCriterion>,
	pub max_depth: Option<u64>,
	pub min_samples_leaf: Option<u64>,
	pub min_samples_split: Option<u64>,
	pub random_state: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SplitCriterion {
	Gini,
	Entropy,
}

impl std::fmt::Display for SplitCriterion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SplitCriterion::Gini => write!(f, "gini"),
			SplitCriterion::Entropy => write!(f, "entropy"),
		}
	}
}

impl std::fmt::Display for TreeTrainOptions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut parts = Vec::new();
		if let Some(criterion) = &self.criterion {
			parts.push(format!("criterion={}", criterion));
		}
		if let Some(max_depth) = self.max_depth {
			parts.push(format!("max_depth={}", max_depth));
		}
		if let Some(min_samples_leaf) = self.min_samples_leaf {
			parts.push(format!("min_samples_leaf={}", min_samples_leaf));
		}
		if let Some(min_samples_split) = self.min_samples_split {
			parts.push(format!("min_samples_split={}", min_samples_split));
		}
		if let Some(random_state) = self.random_state {
			parts.push(format!("random_state={}", random_state));
		}
		if parts.is_empty() {
			write!(f, "defaults")
		} else {
			write!(f, "{}", parts.join(" "))
		}
	}
}

/// Expand the configured grid items into candidate configurations: the Cartesian product of the values within each item, concatenated across items.
pub fn compute_hyperparameter_grid(grid: &[config::TreeGridItem]) -> Vec<TreeTrainOptions> {
	let mut result = Vec::new();
	for item in grid.iter() {
		let criterions: Vec<Option<SplitCriterion>> = match &item.criterion {
			Some(values) => values
				.iter()
				.map(|value| {
					Some(match value {
						config::Criterion::Gini => SplitCriterion::Gini,
						config::Criterion::Entropy => SplitCriterion::Entropy,
					})
				})
				.collect(),
			None => vec![None],
		};
		let max_depths = candidate_values(&item.max_depth);
		let min_samples_leafs = candidate_values(&item.min_samples_leaf);
		let min_samples_splits = candidate_values(&item.min_samples_split);
		let random_states = candidate_values(&item.random_state);
		for (criterion, max_depth, min_samples_leaf, min_samples_split, random_state) in iproduct!(
			criterions.iter(),
			max_depths.iter(),
			min_samples_leafs.iter(),
			min_samples_splits.iter(),
			random_states.iter()
		) {
			result.push(TreeTrainOptions {
				criterion: *criterion,
				max_depth: *max_depth,
				min_samples_leaf: *min_samples_leaf,
				min_samples_split: *min_samples_split,
				random_state: *random_state,
			});
		}
	}
	result
}

/// The values to try for one parameter within a grid item. An absent parameter contributes the single candidate `None`, which keeps the collaborator's default.
fn candidate_values(values: &Option<Vec<u64>>) -> Vec<Option<u64>> {
	match values {
		Some(values) => values.iter().map(|value| Some(*value)).collect(),
		None => vec![None],
	}
}

const DEFAULT_MAX_DEPTH_VALUES: [u64; 5] = [2, 4, 6, 8, 10];
const DEFAULT_MIN_SAMPLES_LEAF_VALUES: [u64; 5] = [2, 4, 6, 8, 10];
const DEFAULT_MIN_SAMPLES_SPLIT_VALUES: [u64; 5] = [2, 4, 6, 8, 10];

/// Compute the default hyperparameter grid: each parameter is varied on its own while the others keep their defaults.
pub fn default_hyperparameter_grid() -> Vec<TreeTrainOptions> {
	let mut grid = Vec::new();
	for &max_depth in DEFAULT_MAX_DEPTH_VALUES.iter() {
		grid.push(TreeTrainOptions {
			max_depth: Some(max_depth),
			..Default::default()
		});
	}
	for &min_samples_leaf in DEFAULT_MIN_SAMPLES_LEAF_VALUES.iter() {
		grid.push(TreeTrainOptions {
			min_samples_leaf: Some(min_samples_leaf),
			..Default::default()
		});
	}
	for &min_samples_split in DEFAULT_MIN_SAMPLES_SPLIT_VALUES.iter() {
		grid.push(TreeTrainOptions {
			min_samples_split: Some(min_samples_split),
			..Default::default()
		});
	}
	grid
}

#[test]
fn test_default_grid() {
	let grid = default_hyperparameter_grid();
	assert_eq!(grid.len(), 15);
	assert_eq!(
		grid[0],
		TreeTrainOptions {
			max_depth: Some(2),
			..Default::default()
		}
	);
	assert_eq!(
		grid[14],
		TreeTrainOptions {
			min_samples_split: Some(10),
			..Default::default()
		}
	);
}

#[test]
fn test_disjoint_items_concatenate() {
	let items = vec![
		config::TreeGridItem {
			criterion: None,
			max_depth: Some(vec![2, 4]),
			min_samples_leaf: None,
			min_samples_split: None,
			random_state: None,
		},
		config::TreeGridItem {
			criterion: None,
			max_depth: None,
			min_samples_leaf: Some(vec![6]),
			min_samples_split: None,
			random_state: None,
		},
	];
	let grid = compute_hyperparameter_grid(&items);
	assert_eq!(grid.len(), 3);
	assert_eq!(grid[0].max_depth, Some(2));
	assert_eq!(grid[1].max_depth, Some(4));
	assert_eq!(grid[2].min_samples_leaf, Some(6));
	assert_eq!(grid[2].max_depth, None);
}

#[test]
fn test_joint_item_is_a_cartesian_product() {
	let items = vec![config::TreeGridItem {
		criterion: Some(vec![config::Criterion::Gini, config::Criterion::Entropy]),
		max_depth: Some(vec![4, 6, 8]),
		min_samples_leaf: None,
		min_samples_split: None,
		random_state: None,
	}];
	let grid = compute_hyperparameter_grid(&items);
	assert_eq!(grid.len(), 6);
	assert_eq!(grid[0].criterion, Some(SplitCriterion::Gini));
	assert_eq!(grid[0].max_depth, Some(4));
	assert_eq!(grid[2].criterion, Some(SplitCriterion::Gini));
	assert_eq!(grid[2].max_depth, Some(8));
	assert_eq!(grid[3].criterion, Some(SplitCriterion::Entropy));
	assert_eq!(grid[3].max_depth, Some(4));
}

#[test]
fn test_display() {
	let options = TreeTrainOptions {
		criterion: Some(SplitCriterion::Gini),
		max_depth: Some(6),
		min_samples_leaf: Some(6),
		min_samples_split: Some(10),
		random_state: None,
	};
	assert_eq!(
		options.to_string(),
		"criterion=gini max_depth=6 min_samples_leaf=6 min_samples_split=10"
	);
	assert_eq!(TreeTrainOptions::default().to_string(), "defaults");
}
