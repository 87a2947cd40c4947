//! Textbook scenarios, checked end to end

// Imports
use {
	novasim::{
		memory::{BlockList, FitStrategy, MemoryBlock},
		replacement::{self, AccessResult, Fifo, Lru},
		sched::{Metrics, PolicyKind},
		AlgorithmKind,
		ProcessDescriptor,
		ProcessId,
		Simulation,
	},
	similar_asserts::assert_eq,
};

/// Reference string from the classic Belady's anomaly example
const BELADY_REFERENCES: [u64; 12] = [1, 2, 3, 4, 1, 2, 5, 1, 2, 3, 4, 5];

fn metrics_for(policy: PolicyKind, processes: &[ProcessDescriptor]) -> Metrics {
	let policy = policy.build(2).expect("Unable to build policy");
	let mut simulation = Simulation::new(processes, policy).expect("Unable to create simulation");
	simulation.run_to_completion();
	assert!(simulation.is_finished());

	simulation.metrics()
}

fn assert_close(lhs: f64, rhs: f64) {
	assert!((lhs - rhs).abs() < 1e-9, "{lhs} != {rhs}");
}

#[test]
fn policies_on_the_same_roster() {
	let processes = [
		ProcessDescriptor::new(1, 0, 5),
		ProcessDescriptor::new(2, 1, 3),
		ProcessDescriptor::new(3, 2, 1),
	];

	// (policy, average waiting time, average turnaround time)
	let expected = [
		(PolicyKind::Fcfs, 10.0 / 3.0, 19.0 / 3.0),
		(PolicyKind::Sjf, 5.0 / 3.0, 14.0 / 3.0),
		(PolicyKind::RoundRobin, 10.0 / 3.0, 19.0 / 3.0),
		(PolicyKind::Priority, 10.0 / 3.0, 19.0 / 3.0),
	];
	for (policy, avg_waiting_time, avg_turnaround_time) in expected {
		let metrics = self::metrics_for(policy, &processes);
		assert_eq!(metrics.completed, 3, "{policy:?}");
		assert_eq!(metrics.elapsed_time, 9, "{policy:?}");
		self::assert_close(metrics.avg_waiting_time, avg_waiting_time);
		self::assert_close(metrics.avg_turnaround_time, avg_turnaround_time);
		self::assert_close(metrics.throughput, 1.0 / 3.0);
	}
}

#[test]
fn priority_runs_to_completion() {
	let processes = [
		ProcessDescriptor::new(1, 0, 5).with_priority(2),
		ProcessDescriptor::new(2, 1, 3).with_priority(1),
		ProcessDescriptor::new(3, 2, 1).with_priority(0),
	];
	let policy = PolicyKind::Priority.build(1).expect("Unable to build policy");
	let mut simulation = Simulation::new(&processes, policy).expect("Unable to create simulation");
	simulation.run_to_completion();

	let history = simulation
		.state()
		.execution_history()
		.iter()
		.map(|interval| (interval.process_id.to_u32(), interval.start, interval.end))
		.collect::<Vec<_>>();
	assert_eq!(history, [(1, 0, 5), (3, 5, 6), (2, 6, 9)]);
}

#[test]
fn fifo_and_lru_on_belady_references() {
	let fifo = AlgorithmKind::Fifo
		.simulate(3, &BELADY_REFERENCES)
		.expect("Unable to simulate");
	let results = fifo.steps.iter().map(|step| step.result).collect::<Vec<_>>();
	let (h, m) = (AccessResult::Hit, AccessResult::Miss);
	assert_eq!(results, [m, m, m, m, m, m, m, h, h, m, m, h]);
	assert_eq!(fifo.statistics.total_hits, 3);
	assert_eq!(fifo.statistics.total_misses, 9);
	assert_eq!(fifo.statistics.hit_ratio, 25.0);
	assert_eq!(fifo.statistics.miss_ratio, 75.0);

	let lru = AlgorithmKind::Lru
		.simulate(3, &BELADY_REFERENCES)
		.expect("Unable to simulate");
	assert_eq!(lru.statistics.total_hits, 2);
	assert_eq!(lru.statistics.total_misses, 10);
	assert_eq!(lru.statistics.hit_ratio, 16.67);
	assert_eq!(lru.statistics.miss_ratio, 83.33);
}

#[test]
fn fifo_shows_belady_anomaly() {
	let faults = |capacity| {
		let mut fifo = Fifo::new(capacity).expect("Invalid capacity");
		replacement::simulate(&mut fifo, &BELADY_REFERENCES)
			.expect("Unable to simulate")
			.statistics
			.total_misses
	};

	// More frames, more faults
	assert_eq!(faults(3), 9);
	assert_eq!(faults(4), 10);
}

#[test]
fn lru_never_faults_more_with_more_frames() {
	let faults = |capacity| {
		let mut lru = Lru::new(capacity).expect("Invalid capacity");
		replacement::simulate(&mut lru, &BELADY_REFERENCES)
			.expect("Unable to simulate")
			.statistics
			.total_misses
	};

	for capacity in 1..6 {
		assert!(faults(capacity + 1) <= faults(capacity), "capacity {capacity}");
	}
}

#[test]
fn replacement_from_reference_string() {
	let references = replacement::parse_reference_string("7, 0, 1, 2, 0, 3, 0, 4").expect("Unable to parse");
	let report = AlgorithmKind::Lru.simulate(3, &references).expect("Unable to simulate");

	let last = report.steps.last().expect("No steps");
	assert_eq!(last.step, 8);
	assert_eq!(
		serde_json::to_value(&last.frames).expect("Unable to serialize"),
		serde_json::json!([4, 0, 3])
	);
}

#[test]
fn allocate_deallocate_reallocate() {
	let pid = ProcessId::new;
	let empty = BlockList::new(100).expect("Invalid memory");

	let blocks = empty
		.first_fit(30, pid(1))
		.and_then(|blocks| blocks.first_fit(20, pid(2)))
		.expect("Unable to allocate")
		.deallocate(pid(1));
	assert_eq!(blocks.blocks(), [
		MemoryBlock {
			start: 0,
			size:  30,
			owner: None,
		},
		MemoryBlock {
			start: 30,
			size:  20,
			owner: Some(pid(2)),
		},
		MemoryBlock {
			start: 50,
			size:  50,
			owner: None,
		},
	]);
	assert_eq!(blocks.external_fragmentation(), 30);

	// Only the trailing block fits, and best fit picks it over the hole
	let blocks = blocks
		.allocate(FitStrategy::Best, 40, pid(3))
		.expect("Unable to allocate");
	assert_eq!(blocks.largest_free(), 30);
	assert_eq!(blocks.owners().collect::<Vec<_>>(), [pid(2), pid(3)]);

	// Freeing everything coalesces back into a single block
	let blocks = blocks.deallocate(pid(2)).deallocate(pid(3));
	assert_eq!(blocks, empty);
}
