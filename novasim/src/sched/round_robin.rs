//! Round robin

// Imports
use {
	super::{Policy, Running, SchedError, Task},
	std::collections::VecDeque,
};

/// Round robin.
///
/// Runs the head of the ready queue for at most `quantum` time units, then
/// sends it to the back of the queue.
#[derive(Clone, Copy, Debug)]
pub struct RoundRobin {
	/// Time quantum
	quantum: u64,
}

impl RoundRobin {
	/// Creates a round robin policy
	///
	/// # Errors
	/// Returns an error if `quantum` is zero.
	pub fn new(quantum: u64) -> Result<Self, SchedError> {
		match quantum {
			0 => Err(SchedError::ZeroQuantum),
			_ => Ok(Self { quantum }),
		}
	}

	/// Returns the time quantum
	pub fn quantum(&self) -> u64 {
		self.quantum
	}
}

impl Policy for RoundRobin {
	fn name(&self) -> &'static str {
		"round-robin"
	}

	fn select(&self, ready: &VecDeque<Task>) -> Option<usize> {
		match ready.is_empty() {
			true => None,
			false => Some(0),
		}
	}

	fn slice_expired(&self, running: &Running) -> bool {
		running.time_in_cpu >= self.quantum
	}
}

#[cfg(test)]
mod tests {
	use {
		super::*,
		crate::{
			process::ProcessDescriptor,
			sched::tests::{assert_intervals_sum_to_burst, completion_order, interval, simulate},
		},
		rand::{rngs::StdRng, Rng, SeedableRng},
		similar_asserts::assert_eq,
	};

	#[test]
	fn rotates_with_quantum() {
		let processes = [
			ProcessDescriptor::new(1, 0, 5),
			ProcessDescriptor::new(2, 1, 3),
			ProcessDescriptor::new(3, 2, 1),
		];
		let sim = simulate(&processes, RoundRobin::new(2).expect("Invalid quantum"));

		assert_eq!(sim.state().execution_history(), [
			interval(1, 0, 2),
			interval(2, 2, 4),
			interval(3, 4, 5),
			interval(1, 5, 7),
			interval(2, 7, 8),
			interval(1, 8, 9)
		]);
		assert_eq!(completion_order(&sim), [3, 2, 1]);

		let stats = sim
			.state()
			.completed()
			.iter()
			.map(|completed| (completed.completion_time, completed.turnaround_time, completed.waiting_time))
			.collect::<Vec<_>>();
		assert_eq!(stats, [(5, 3, 2), (8, 7, 4), (9, 9, 4)]);
	}

	#[test]
	fn arrival_enters_queue_before_preempted_task() {
		// P2 arrives exactly when P1's slice expires, so it goes first
		let processes = [ProcessDescriptor::new(1, 0, 4), ProcessDescriptor::new(2, 2, 2)];
		let sim = simulate(&processes, RoundRobin::new(2).expect("Invalid quantum"));

		assert_eq!(sim.state().execution_history(), [
			interval(1, 0, 2),
			interval(2, 2, 4),
			interval(1, 4, 6)
		]);
	}

	#[test]
	fn lone_process_keeps_being_rescheduled() {
		let sim = simulate(&[ProcessDescriptor::new(1, 0, 5)], RoundRobin::new(2).expect("Invalid quantum"));

		assert_eq!(sim.state().execution_history(), [
			interval(1, 0, 2),
			interval(1, 2, 4),
			interval(1, 4, 5)
		]);
		assert_eq!(sim.state().completed()[0].waiting_time, 0);
	}

	#[test]
	fn intervals_never_exceed_quantum() {
		let mut rng = StdRng::seed_from_u64(0xc0ffee);
		for _ in 0..200 {
			let quantum = rng.gen_range(1..5);
			let processes = (0..rng.gen_range(1..8))
				.map(|id| ProcessDescriptor::new(id, rng.gen_range(0..10), rng.gen_range(1..12)))
				.collect::<Vec<_>>();
			let sim = simulate(&processes, RoundRobin::new(quantum).expect("Invalid quantum"));

			assert!(sim
				.state()
				.execution_history()
				.iter()
				.all(|interval| interval.len() <= quantum));
			assert_eq!(sim.state().completed().len(), processes.len());
			assert_intervals_sum_to_burst(&sim);
		}
	}
}
