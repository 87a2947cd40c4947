//! Shortest job first (preemptive)

// Imports
use {
	super::{Policy, Running, Task},
	itertools::Itertools,
	std::collections::VecDeque,
};

/// Shortest job first, preemptive.
///
/// Also known as shortest-remaining-time-first. The ready task with the
/// least remaining time runs, ties going to the earliest arrival. A running
/// task is preempted as soon as a ready task needs strictly less time.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sjf;

impl Policy for Sjf {
	fn name(&self) -> &'static str {
		"sjf"
	}

	fn select(&self, ready: &VecDeque<Task>) -> Option<usize> {
		ready
			.iter()
			.position_min_by_key(|task| (task.remaining_time, task.process.arrival_time, task.seq))
	}

	fn preempts(&self, running: &Running, ready: &VecDeque<Task>) -> bool {
		ready
			.iter()
			.any(|task| task.remaining_time < running.task.remaining_time)
	}
}

#[cfg(test)]
mod tests {
	use {
		super::*,
		crate::{
			process::ProcessDescriptor,
			sched::{
				tests::{assert_intervals_sum_to_burst, completion_order, interval, simulate},
				Simulation,
				TickOutcome,
			},
		},
		rand::{rngs::StdRng, Rng, SeedableRng},
		similar_asserts::assert_eq,
	};

	#[test]
	fn textbook_example() {
		let processes = [
			ProcessDescriptor::new(1, 0, 8),
			ProcessDescriptor::new(2, 1, 4),
			ProcessDescriptor::new(3, 2, 9),
			ProcessDescriptor::new(4, 3, 5),
		];
		let sim = simulate(&processes, Sjf);

		assert_eq!(sim.state().execution_history(), [
			interval(1, 0, 1),
			interval(2, 1, 5),
			interval(4, 5, 10),
			interval(1, 10, 17),
			interval(3, 17, 26)
		]);
		assert_eq!(completion_order(&sim), [2, 4, 1, 3]);
		assert!((sim.metrics().avg_waiting_time - 6.5).abs() < 1e-9);

		// The first dispatch time survives the preemption
		let p1 = sim
			.state()
			.completed()
			.iter()
			.find(|completed| completed.process.process_id.to_u32() == 1)
			.expect("P1 never completed");
		assert_eq!(p1.start_time, 0);
		assert_eq!(p1.waiting_time, 9);
	}

	#[test]
	fn equal_remaining_time_does_not_preempt() {
		let processes = [ProcessDescriptor::new(1, 0, 3), ProcessDescriptor::new(2, 1, 2)];
		let sim = simulate(&processes, Sjf);

		// At t=1, P1 has 2 left, same as P2, so it keeps the CPU
		assert_eq!(sim.state().execution_history(), [interval(1, 0, 3), interval(2, 3, 5)]);
	}

	#[test]
	fn ties_go_to_earliest_arrival() {
		let processes = [
			ProcessDescriptor::new(1, 0, 1),
			ProcessDescriptor::new(2, 1, 3),
			ProcessDescriptor::new(3, 0, 3),
		];
		let sim = simulate(&processes, Sjf);

		assert_eq!(completion_order(&sim), [1, 3, 2]);
	}

	#[test]
	fn running_task_is_never_longer_than_a_ready_one() {
		let mut rng = StdRng::seed_from_u64(0x5eed);
		for _ in 0..200 {
			let processes = (0..rng.gen_range(1..8))
				.map(|id| ProcessDescriptor::new(id, rng.gen_range(0..10), rng.gen_range(1..10)))
				.collect::<Vec<_>>();

			let mut sim = Simulation::new(&processes, Sjf).expect("Unable to create simulation");
			loop {
				let outcome = sim.tick();
				if outcome == TickOutcome::Finished {
					break;
				}

				// Note: After a tick, `ready` already contains the arrivals for the
				//       next one, so we only check processes that were in it before.
				if let Some(running) = sim.state().running() {
					let now = sim.state().time();
					for task in sim.state().ready() {
						if task.process.arrival_time < now {
							assert!(
								running.task.remaining_time <= task.remaining_time,
								"Missed preemption at {now}: {running:?} vs {task:?}"
							);
						}
					}
				}
			}

			assert_eq!(sim.state().completed().len(), processes.len());
			assert_intervals_sum_to_burst(&sim);
		}
	}
}
