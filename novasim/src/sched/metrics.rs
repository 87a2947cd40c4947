//! Scheduling metrics

// Imports
use super::CompletedProcess;

/// Scheduling metrics
#[derive(PartialEq, Clone, Copy, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Metrics {
	/// Completed processes
	pub completed: usize,

	/// Elapsed time, up to the last completion
	pub elapsed_time: u64,

	/// Average waiting time
	pub avg_waiting_time: f64,

	/// Average turnaround time
	pub avg_turnaround_time: f64,

	/// Completed processes per time unit
	pub throughput: f64,
}

impl Metrics {
	/// Computes the metrics for all `completed` processes.
	///
	/// All metrics are zero if no process completed.
	pub fn from_completed(completed: &[CompletedProcess]) -> Self {
		let elapsed_time = completed
			.iter()
			.map(|process| process.completion_time)
			.max()
			.unwrap_or(0);

		// Note: Burst times are at least 1, so any completion implies `elapsed_time > 0`
		if completed.is_empty() || elapsed_time == 0 {
			return Self::default();
		}

		let avg_waiting_time = completed
			.iter()
			.map(|process| process.waiting_time as f64)
			.collect::<average::Mean>()
			.mean();
		let avg_turnaround_time = completed
			.iter()
			.map(|process| process.turnaround_time as f64)
			.collect::<average::Mean>()
			.mean();

		Self {
			completed: completed.len(),
			elapsed_time,
			avg_waiting_time,
			avg_turnaround_time,
			throughput: completed.len() as f64 / elapsed_time as f64,
		}
	}
}
