//! First-come, first-served

// Imports
use {
	super::{Policy, Task},
	itertools::Itertools,
	std::collections::VecDeque,
};

/// First-come, first-served.
///
/// Runs the earliest arrival to completion, never preempting.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fcfs;

impl Policy for Fcfs {
	fn name(&self) -> &'static str {
		"fcfs"
	}

	fn select(&self, ready: &VecDeque<Task>) -> Option<usize> {
		ready
			.iter()
			.position_min_by_key(|task| (task.process.arrival_time, task.seq))
	}
}
