//! Simulator

// Imports
use {
	crate::sched::{self, Metrics, Policy, Simulation, TickOutcome},
	std::{
		fmt,
		thread,
		time::{Duration, Instant},
	},
};

/// Simulator.
///
/// Acts as the clock of a scheduling [`Simulation`], issuing ticks until it finishes.
#[derive(Debug)]
pub struct Simulator {
	/// Tick interval
	///
	/// Real time to wait between ticks. A zero interval runs the simulation
	/// as fast as possible.
	tick_interval: Duration,

	/// Debug output period
	///
	/// Interval in which to output debug output for the simulation
	debug_output_period: Duration,
}

impl Simulator {
	/// Creates a new simulator
	pub fn new(tick_interval: Duration, debug_output_period: Duration) -> Self {
		Self {
			tick_interval,
			debug_output_period,
		}
	}

	/// Runs `simulation` until it finishes
	pub fn run<P: Policy>(&mut self, simulation: &mut Simulation<P>) -> RunOutput {
		// Note: `None` so that we output right away at the start
		let mut last_debug_time = None::<Instant>;

		let mut ticks = 0;
		let mut idle_ticks = 0;
		loop {
			match simulation.tick() {
				TickOutcome::Finished => break,
				TickOutcome::Idle => idle_ticks += 1,
				TickOutcome::Ran { .. } => (),
			}
			ticks += 1;

			// Then show debug output, if it's been long enough
			let cur_time = Instant::now();
			if last_debug_time.map_or(true, |last| cur_time.duration_since(last) >= self.debug_output_period) {
				tracing::info!(
					"[t={}] Debug: {}",
					simulation.state().time(),
					novasim_util::DisplayWrapper::new(|f| self::fmt_debug(simulation, f))
				);
				last_debug_time = Some(cur_time);
			}

			if !self.tick_interval.is_zero() {
				thread::sleep(self.tick_interval);
			}
		}

		let state = simulation.state();
		RunOutput {
			ticks,
			idle_ticks,
			completed: state.completed().to_vec(),
			execution_history: state.execution_history().to_vec(),
			metrics: simulation.metrics(),
		}
	}
}

/// Formats debug output for `simulation` to `f`.
fn fmt_debug<P: Policy>(simulation: &Simulation<P>, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
	let state = simulation.state();
	match state.running() {
		Some(running) => write!(
			f,
			"running {} ({} left), ",
			running.task.process.process_id, running.task.remaining_time
		)?,
		None => f.pad("idle, ")?,
	}

	write!(
		f,
		"{} ready, {} not arrived, {} completed",
		state.ready().len(),
		state.not_yet_arrived().len(),
		state.completed().len()
	)
}

/// Output for [`Simulator::run`]
#[derive(Clone, Debug)]
pub struct RunOutput {
	/// Ticks issued, including idle ones
	pub ticks: u64,

	/// Ticks the CPU spent idle
	pub idle_ticks: u64,

	/// Completed processes, in completion order
	pub completed: Vec<sched::CompletedProcess>,

	/// Execution history
	pub execution_history: Vec<sched::ExecutionInterval>,

	/// Final metrics
	pub metrics: Metrics,
}

#[cfg(test)]
mod tests {
	use {
		super::*,
		crate::{process::ProcessDescriptor, sched::Fcfs},
	};

	#[test]
	fn runs_until_finished() {
		let processes = [ProcessDescriptor::new(1, 1, 2), ProcessDescriptor::new(2, 1, 1)];
		let mut simulation = Simulation::new(&processes, Fcfs).expect("Unable to create simulation");

		let output = Simulator::new(Duration::ZERO, Duration::from_secs(60)).run(&mut simulation);
		assert!(simulation.is_finished());
		assert_eq!(output.ticks, 4);
		assert_eq!(output.idle_ticks, 1);
		assert_eq!(output.completed.len(), 2);
		assert_eq!(output.execution_history.len(), 2);
		assert_eq!(output.metrics.elapsed_time, 4);
	}

	#[test]
	fn empty_simulation_issues_no_ticks() {
		let mut simulation = Simulation::new(&[], Fcfs).expect("Unable to create simulation");

		let output = Simulator::new(Duration::ZERO, Duration::ZERO).run(&mut simulation);
		assert_eq!(output.ticks, 0);
		assert!(output.completed.is_empty());
		assert_eq!(output.metrics, Metrics::default());
	}
}
