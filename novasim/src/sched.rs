//! Process scheduling
//!
//! A single-core, discrete-time scheduler. Each [`Simulation::tick`] simulates
//! exactly one time unit, and the policy ([`Policy`]) decides which ready
//! process gets the CPU and when the running process must give it up.
//!
//! Processes are admitted to the ready queue once `arrival_time <= now`,
//! so a process can never be stranded by a skipped tick.

// Modules
pub mod fcfs;
pub mod metrics;
pub mod priority;
pub mod round_robin;
pub mod sjf;

// Exports
pub use self::{
	fcfs::Fcfs,
	metrics::Metrics,
	priority::Priority,
	round_robin::RoundRobin,
	sjf::Sjf,
};

// Imports
use {
	crate::process::{ProcessDescriptor, ProcessId},
	std::{collections::VecDeque, fmt},
};

/// Scheduling policy
pub trait Policy: fmt::Debug {
	/// Returns the name of this policy
	fn name(&self) -> &'static str;

	/// Selects the next task to dispatch, returning its index in `ready`.
	///
	/// Returns `None` only if `ready` is empty.
	fn select(&self, ready: &VecDeque<Task>) -> Option<usize>;

	/// Returns if `running` should give up the CPU to a ready task before
	/// the next time unit starts.
	fn preempts(&self, _running: &Running, _ready: &VecDeque<Task>) -> bool {
		false
	}

	/// Returns if `running` used up its time slice.
	///
	/// Checked after each time unit, only if the task didn't complete.
	fn slice_expired(&self, _running: &Running) -> bool {
		false
	}
}

/// Simulation
#[derive(Clone, Debug)]
pub struct Simulation<P> {
	/// Policy
	policy: P,

	/// State before any tick, used for resetting
	initial: SimState,

	/// Current state
	state: SimState,
}

impl<P: Policy> Simulation<P> {
	/// Creates a new simulation over copies of `processes`.
	///
	/// # Errors
	/// Returns an error if any process has no burst time, or if two processes
	/// share the same id.
	pub fn new(processes: &[ProcessDescriptor], policy: P) -> Result<Self, SchedError> {
		let state = SimState::new(processes)?;
		tracing::debug!(policy = policy.name(), processes = processes.len(), "Created simulation");

		Ok(Self {
			policy,
			initial: state.clone(),
			state,
		})
	}

	/// Simulates a single time unit
	pub fn tick(&mut self) -> TickOutcome {
		self.state.tick(&self.policy)
	}

	/// Ticks until the simulation is finished, returning the number of ticks
	pub fn run_to_completion(&mut self) -> u64 {
		let mut ticks = 0;
		while self.tick() != TickOutcome::Finished {
			ticks += 1;
		}

		ticks
	}

	/// Resets the simulation to before the first tick
	pub fn reset(&mut self) {
		self.state = self.initial.clone();
	}

	/// Returns if the simulation is finished
	pub fn is_finished(&self) -> bool {
		self.state.is_finished()
	}

	/// Returns the current state
	pub fn state(&self) -> &SimState {
		&self.state
	}

	/// Returns the policy
	pub fn policy(&self) -> &P {
		&self.policy
	}

	/// Returns the metrics over all completed processes so far
	pub fn metrics(&self) -> Metrics {
		Metrics::from_completed(&self.state.completed)
	}
}

/// Simulation state.
///
/// Cloning it gives a full snapshot of the simulation.
#[derive(Clone, Debug)]
pub struct SimState {
	/// Current time
	time: u64,

	/// Processes that haven't arrived yet, ordered by arrival
	not_yet_arrived: VecDeque<Task>,

	/// Ready queue
	ready: VecDeque<Task>,

	/// Running task
	running: Option<Running>,

	/// Completed processes, in completion order
	completed: Vec<CompletedProcess>,

	/// Execution history
	execution_history: Vec<ExecutionInterval>,
}

impl SimState {
	/// Creates the initial state from the caller's processes
	fn new(processes: &[ProcessDescriptor]) -> Result<Self, SchedError> {
		let mut seen = std::collections::HashSet::new();
		for process in processes {
			if process.burst_time == 0 {
				return Err(SchedError::ZeroBurst {
					process_id: process.process_id,
				});
			}
			if !seen.insert(process.process_id) {
				return Err(SchedError::DuplicateProcess {
					process_id: process.process_id,
				});
			}
		}

		let mut not_yet_arrived = processes
			.iter()
			.enumerate()
			.map(|(seq, process)| Task {
				process: process.clone(),
				seq,
				remaining_time: process.burst_time,
				start_time: None,
			})
			.collect::<Vec<_>>();

		// Note: Stable, so processes arriving together keep their input order
		not_yet_arrived.sort_by_key(|task| task.process.arrival_time);

		Ok(Self {
			time: 0,
			not_yet_arrived: not_yet_arrived.into(),
			ready: VecDeque::new(),
			running: None,
			completed: vec![],
			execution_history: vec![],
		})
	}

	/// Simulates the time unit `[time, time + 1)`
	fn tick<P: Policy>(&mut self, policy: &P) -> TickOutcome {
		if self.is_finished() {
			return TickOutcome::Finished;
		}

		let now = self.time;
		self.admit_arrivals(now);

		// Let the policy take the CPU away before dispatching
		if self
			.running
			.as_ref()
			.is_some_and(|running| policy.preempts(running, &self.ready))
		{
			let running = self.running.take().expect("Running task vanished");
			tracing::trace!(process_id = ?running.task.process.process_id, now, "Preempting for a ready process");
			self.preempt(running, now);
		}

		if self.running.is_none() {
			if let Some(idx) = policy.select(&self.ready) {
				let mut task = self.ready.remove(idx).expect("Policy selected an invalid ready task");
				let start_time = *task.start_time.get_or_insert(now);
				tracing::trace!(process_id = ?task.process.process_id, now, start_time, "Dispatching");

				self.running = Some(Running {
					task,
					slice_start: now,
					time_in_cpu: 0,
				});
			}
		}

		// If nothing is ready, the CPU idles for this time unit
		let Some(mut running) = self.running.take() else {
			tracing::trace!(now, "CPU idle");
			self.time += 1;
			return TickOutcome::Idle;
		};

		assert!(running.task.remaining_time > 0, "Running process had no time remaining");
		running.task.remaining_time -= 1;
		running.time_in_cpu += 1;
		let process_id = running.task.process.process_id;

		self.time += 1;
		let now = self.time;

		// Note: Arrivals at `now` enter the ready queue before a task preempted at `now`
		self.admit_arrivals(now);

		let completed = running.task.remaining_time == 0;
		match completed {
			true => self.complete(running, now),
			false => match policy.slice_expired(&running) {
				true => {
					tracing::trace!(?process_id, now, "Time slice expired");
					self.preempt(running, now);
				},
				false => self.running = Some(running),
			},
		}

		TickOutcome::Ran { process_id, completed }
	}

	/// Moves all processes that arrived by `now` to the ready queue
	fn admit_arrivals(&mut self, now: u64) {
		while self
			.not_yet_arrived
			.front()
			.is_some_and(|task| task.process.arrival_time <= now)
		{
			let task = self.not_yet_arrived.pop_front().expect("Front task vanished");
			tracing::trace!(process_id = ?task.process.process_id, now, "Process arrived");
			self.ready.push_back(task);
		}
	}

	/// Closes the running task's interval and puts it back in the ready queue
	fn preempt(&mut self, running: Running, now: u64) {
		self.close_interval(&running, now);
		self.ready.push_back(running.task);
	}

	/// Closes the running task's interval and records it as completed
	fn complete(&mut self, running: Running, now: u64) {
		self.close_interval(&running, now);

		let task = running.task;
		assert!(
			!self
				.completed
				.iter()
				.any(|completed| completed.process.process_id == task.process.process_id),
			"Process completed twice: {:?}",
			task.process.process_id
		);

		let turnaround_time = now - task.process.arrival_time;
		let waiting_time = turnaround_time
			.checked_sub(task.process.burst_time)
			.expect("Process completed before running its whole burst");
		tracing::debug!(
			process_id = ?task.process.process_id,
			completion_time = now,
			turnaround_time,
			waiting_time,
			"Process completed"
		);

		self.completed.push(CompletedProcess {
			start_time: task.start_time.expect("Completed process was never dispatched"),
			completion_time: now,
			turnaround_time,
			waiting_time,
			process: task.process,
		});
	}

	/// Appends the running task's current slice to the execution history
	fn close_interval(&mut self, running: &Running, now: u64) {
		if now > running.slice_start {
			self.execution_history.push(ExecutionInterval {
				process_id: running.task.process.process_id,
				start:      running.slice_start,
				end:        now,
			});
		}
	}

	/// Returns if there's nothing left to run
	pub fn is_finished(&self) -> bool {
		self.not_yet_arrived.is_empty() && self.ready.is_empty() && self.running.is_none()
	}

	/// Returns the current time
	pub fn time(&self) -> u64 {
		self.time
	}

	/// Returns all processes that haven't arrived yet
	pub fn not_yet_arrived(&self) -> &VecDeque<Task> {
		&self.not_yet_arrived
	}

	/// Returns the ready queue
	pub fn ready(&self) -> &VecDeque<Task> {
		&self.ready
	}

	/// Returns the running task
	pub fn running(&self) -> Option<&Running> {
		self.running.as_ref()
	}

	/// Returns all completed processes, in completion order
	pub fn completed(&self) -> &[CompletedProcess] {
		&self.completed
	}

	/// Returns the execution history
	pub fn execution_history(&self) -> &[ExecutionInterval] {
		&self.execution_history
	}
}

/// A process as seen by the scheduler
#[derive(Clone, Debug)]
pub struct Task {
	/// The process
	pub process: ProcessDescriptor,

	/// Position in the caller's process list
	pub seq: usize,

	/// Remaining time
	pub remaining_time: u64,

	/// Time of the first dispatch
	pub start_time: Option<u64>,
}

/// Running task
#[derive(Clone, Debug)]
pub struct Running {
	/// The task
	pub task: Task,

	/// Time the current slice started
	pub slice_start: u64,

	/// Time spent on the CPU during the current slice
	pub time_in_cpu: u64,
}

/// A completed process
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct CompletedProcess {
	/// The process
	pub process: ProcessDescriptor,

	/// Time of the first dispatch
	pub start_time: u64,

	/// Completion time
	pub completion_time: u64,

	/// Turnaround time
	pub turnaround_time: u64,

	/// Waiting time
	pub waiting_time: u64,
}

/// Execution interval, `[start, end)` on the CPU
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct ExecutionInterval {
	pub process_id: ProcessId,
	pub start:      u64,
	pub end:        u64,
}

impl ExecutionInterval {
	/// Returns the length of this interval
	pub fn len(&self) -> u64 {
		self.end - self.start
	}
}

/// Outcome of [`Simulation::tick`]
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum TickOutcome {
	/// No process was ready, the CPU idled
	Idle,

	/// A process ran for a time unit
	Ran { process_id: ProcessId, completed: bool },

	/// Nothing left to run, time didn't advance
	Finished,
}

/// Policy kind
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
	/// First-come, first-served
	Fcfs,

	/// Shortest job first (preemptive)
	Sjf,

	/// Round robin
	#[clap(name = "rr")]
	#[serde(rename = "rr")]
	RoundRobin,

	/// Priority (non-preemptive)
	Priority,
}

impl PolicyKind {
	/// Builds this policy, using `quantum` for round robin.
	///
	/// # Errors
	/// Returns an error if the quantum is invalid for round robin.
	pub fn build(self, quantum: u64) -> Result<AnyPolicy, SchedError> {
		let policy = match self {
			Self::Fcfs => AnyPolicy::Fcfs(Fcfs),
			Self::Sjf => AnyPolicy::Sjf(Sjf),
			Self::RoundRobin => AnyPolicy::RoundRobin(RoundRobin::new(quantum)?),
			Self::Priority => AnyPolicy::Priority(Priority),
		};

		Ok(policy)
	}
}

/// Any policy
#[derive(Clone, Copy, Debug)]
pub enum AnyPolicy {
	Fcfs(Fcfs),
	Sjf(Sjf),
	RoundRobin(RoundRobin),
	Priority(Priority),
}

impl Policy for AnyPolicy {
	fn name(&self) -> &'static str {
		match self {
			Self::Fcfs(policy) => policy.name(),
			Self::Sjf(policy) => policy.name(),
			Self::RoundRobin(policy) => policy.name(),
			Self::Priority(policy) => policy.name(),
		}
	}

	fn select(&self, ready: &VecDeque<Task>) -> Option<usize> {
		match self {
			Self::Fcfs(policy) => policy.select(ready),
			Self::Sjf(policy) => policy.select(ready),
			Self::RoundRobin(policy) => policy.select(ready),
			Self::Priority(policy) => policy.select(ready),
		}
	}

	fn preempts(&self, running: &Running, ready: &VecDeque<Task>) -> bool {
		match self {
			Self::Fcfs(policy) => policy.preempts(running, ready),
			Self::Sjf(policy) => policy.preempts(running, ready),
			Self::RoundRobin(policy) => policy.preempts(running, ready),
			Self::Priority(policy) => policy.preempts(running, ready),
		}
	}

	fn slice_expired(&self, running: &Running) -> bool {
		match self {
			Self::Fcfs(policy) => policy.slice_expired(running),
			Self::Sjf(policy) => policy.slice_expired(running),
			Self::RoundRobin(policy) => policy.slice_expired(running),
			Self::Priority(policy) => policy.slice_expired(running),
		}
	}
}

/// Scheduling error
#[derive(PartialEq, Eq, Clone, Debug, thiserror::Error)]
pub enum SchedError {
	#[error("Process {process_id} has no burst time")]
	ZeroBurst { process_id: ProcessId },

	#[error("Process {process_id} appears more than once")]
	DuplicateProcess { process_id: ProcessId },

	#[error("Time quantum must be at least 1")]
	ZeroQuantum,
}
