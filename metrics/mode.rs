use super::Metric;
use std::collections::BTreeMap;

/// The mode is the most frequent value in the input. Ties break toward the largest value, matching the iteration order of the underlying histogram.
#[derive(Clone, Debug, Default)]
pub struct Mode;

impl<'a> Metric<'a> for Mode {
	type Input = &'a [usize];
	type Output = Option<usize>;

	fn compute(input: Self::Input) -> Self::Output {
		let mut histogram = BTreeMap::new();
		for value in input.iter() {
			*histogram.entry(value).or_insert(0) += 1;
		}
		histogram
			.into_iter()
			.max_by(|a, b| a.1.cmp(&b.1))
			.map(|label| *label.0)
	}
}

#[test]
fn test_mode() {
	assert_eq!(Mode::compute(&[]), None);
	assert_eq!(Mode::compute(&[0, 1, 1, 0, 1]), Some(1));
	assert_eq!(Mode::compute(&[0, 0, 0, 1]), Some(0));
}
