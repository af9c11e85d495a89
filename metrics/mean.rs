use super::StreamingMetric;
use num_traits::ToPrimitive;

/// The streaming mean of the values passed to `update`. `finalize` returns `None` if no values were observed.
#[derive(Clone, Debug, Default)]
pub struct Mean {
	n: u64,
	sum: f64,
}

impl Mean {
	pub fn new() -> Self {
		Self::default()
	}
}

impl StreamingMetric<'_> for Mean {
	type Input = f32;
	type Output = Option<f32>;

	fn update(&mut self, input: Self::Input) {
		self.n += 1;
		self.sum += input.to_f64().unwrap();
	}

	fn merge(&mut self, other: Self) {
		self.n += other.n;
		self.sum += other.sum;
	}

	fn finalize(self) -> Self::Output {
		if self.n == 0 {
			None
		} else {
			Some((self.sum / self.n.to_f64().unwrap()).to_f32().unwrap())
		}
	}
}

#[test]
fn test_mean() {
	let mut metric = Mean::new();
	assert_eq!(metric.clone().finalize(), None);
	metric.update(0.0);
	metric.update(1.0);
	metric.update(1.0);
	metric.update(1.0);
	assert_eq!(metric.finalize(), Some(0.75));
}
