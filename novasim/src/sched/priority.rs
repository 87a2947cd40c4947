//! Priority (non-preemptive)

// Imports
use {
	super::{Policy, Task},
	itertools::Itertools,
	std::collections::VecDeque,
};

/// Priority, non-preemptive.
///
/// The ready task with the lowest priority value runs to completion, ties
/// going to the earliest arrival. Higher priority arrivals wait.
#[derive(Clone, Copy, Debug, Default)]
pub struct Priority;

impl Policy for Priority {
	fn name(&self) -> &'static str {
		"priority"
	}

	fn select(&self, ready: &VecDeque<Task>) -> Option<usize> {
		ready
			.iter()
			.position_min_by_key(|task| (task.process.priority, task.process.arrival_time, task.seq))
	}
}
