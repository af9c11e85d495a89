use super::{mean::Mean, StreamingMetric};

/// The accuracy is the proportion of examples where predicted == label.
#[derive(Clone, Debug, Default)]
pub struct Accuracy(Mean);

impl Accuracy {
	pub fn new() -> Self {
		Self::default()
	}
}

impl StreamingMetric<'_> for Accuracy {
	type Input = (usize, usize);
	type Output = Option<f32>;

	fn update(&mut self, value: Self::Input) {
		self.0.update(if value.0 == value.1 { 1.0 } else { 0.0 })
	}

	fn merge(&mut self, other: Self) {
		self.0.merge(other.0)
	}

	fn finalize(self) -> Option<f32> {
		self.0.finalize()
	}
}

#[test]
fn test_accuracy_of_identical_sequences_is_one() {
	let labels = [0, 1, 1, 0, 1];
	let mut metric = Accuracy::new();
	for label in labels.iter() {
		metric.update((*label, *label));
	}
	assert_eq!(metric.finalize(), Some(1.0));
}

#[test]
fn test_accuracy_of_flipped_sequences_is_zero() {
	let labels = [0, 1, 1, 0, 1];
	let mut metric = Accuracy::new();
	for label in labels.iter() {
		metric.update((1 - *label, *label));
	}
	assert_eq!(metric.finalize(), Some(0.0));
}

#[test]
fn test_accuracy_merge() {
	let mut a = Accuracy::new();
	a.update((1, 1));
	a.update((0, 1));
	let mut b = Accuracy::new();
	b.update((1, 1));
	b.update((1, 1));
	a.merge(b);
	assert_eq!(a.finalize(), Some(0.75));
}
