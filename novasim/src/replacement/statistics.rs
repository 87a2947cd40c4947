//! Statistics

// Imports
use {super::AccessResult, novasim_util::RoundDecimals};

/// Hit/miss statistics
#[derive(PartialEq, Clone, Copy, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Statistics {
	/// Total hits
	pub total_hits: usize,

	/// Total misses
	pub total_misses: usize,

	/// Percentage of hits, rounded to 2 decimal places
	pub hit_ratio: f64,

	/// Percentage of misses, rounded to 2 decimal places
	pub miss_ratio: f64,
}

impl Statistics {
	/// Computes statistics from all access results
	pub fn from_results(results: impl IntoIterator<Item = AccessResult>) -> Self {
		let (total_hits, total_misses) = results
			.into_iter()
			.fold((0, 0), |(hits, misses), result| match result {
				AccessResult::Hit => (hits + 1, misses),
				AccessResult::Miss => (hits, misses + 1),
			});

		Self {
			total_hits,
			total_misses,
			hit_ratio: self::percentage(total_hits, total_hits + total_misses),
			miss_ratio: self::percentage(total_misses, total_hits + total_misses),
		}
	}
}

/// Returns `part / total` as a percentage with 2 decimal places, or 0 if `total` is 0
fn percentage(part: usize, total: usize) -> f64 {
	match total {
		0 => 0.0,
		_ => (100.0 * part as f64 / total as f64).round_to(2),
	}
}
