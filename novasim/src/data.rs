//! Output data

// Imports
use crate::{
	memory::{BlockList, FixedPartitions, PageTable, PagedMemory},
	process::ProcessId,
	sched::{CompletedProcess, ExecutionInterval, Metrics},
	sim::RunOutput,
};

/// Schedule output data
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ScheduleData {
	pub policy:            String,
	pub ticks:             u64,
	pub idle_ticks:        u64,
	pub completed:         Vec<CompletedData>,
	pub execution_history: Vec<IntervalData>,
	pub metrics:           Metrics,
}

impl ScheduleData {
	/// Creates schedule data from the output of a run with `policy`
	pub fn new(policy: &str, output: &RunOutput) -> Self {
		Self {
			policy:            policy.to_owned(),
			ticks:             output.ticks,
			idle_ticks:        output.idle_ticks,
			completed:         output.completed.iter().map(CompletedData::from).collect(),
			execution_history: output.execution_history.iter().map(IntervalData::from).collect(),
			metrics:           output.metrics,
		}
	}
}

/// Completed process
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct CompletedData {
	pub process_id:      ProcessId,
	pub arrival_time:    u64,
	pub burst_time:      u64,
	pub priority:        i32,
	pub start_time:      u64,
	pub completion_time: u64,
	pub turnaround_time: u64,
	pub waiting_time:    u64,
}

impl From<&CompletedProcess> for CompletedData {
	fn from(completed: &CompletedProcess) -> Self {
		Self {
			process_id:      completed.process.process_id,
			arrival_time:    completed.process.arrival_time,
			burst_time:      completed.process.burst_time,
			priority:        completed.process.priority,
			start_time:      completed.start_time,
			completion_time: completed.completion_time,
			turnaround_time: completed.turnaround_time,
			waiting_time:    completed.waiting_time,
		}
	}
}

/// Execution interval
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct IntervalData {
	pub process_id: ProcessId,
	pub start:      u64,
	pub end:        u64,
}

impl From<&ExecutionInterval> for IntervalData {
	fn from(interval: &ExecutionInterval) -> Self {
		Self {
			process_id: interval.process_id,
			start:      interval.start,
			end:        interval.end,
		}
	}
}

/// Allocation request outcome.
///
/// Each request is recorded along with a snapshot of memory after it, or
/// the reason it was rejected.
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct RequestData<R, S> {
	pub request: R,
	pub error:   Option<String>,
	pub memory:  S,
}

/// Contiguous memory snapshot
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "layout", rename_all = "kebab-case")]
pub enum ContiguousData {
	Variable {
		blocks:                 BlockList,
		free_total:             u64,
		external_fragmentation: u64,
	},
	Fixed {
		partitions:             FixedPartitions,
		internal_fragmentation: u64,
	},
}

impl From<&BlockList> for ContiguousData {
	fn from(blocks: &BlockList) -> Self {
		Self::Variable {
			blocks:                 blocks.clone(),
			free_total:             blocks.free_total(),
			external_fragmentation: blocks.external_fragmentation(),
		}
	}
}

impl From<&FixedPartitions> for ContiguousData {
	fn from(partitions: &FixedPartitions) -> Self {
		Self::Fixed {
			partitions:             partitions.clone(),
			internal_fragmentation: partitions.internal_fragmentation(),
		}
	}
}

/// Paged memory snapshot
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct PagingData {
	pub frames:                Vec<Option<ProcessId>>,
	pub free_frames:           usize,
	pub physical_address_bits: u32,
	pub processes:             Vec<PagedProcessData>,
}

impl From<&PagedMemory> for PagingData {
	fn from(memory: &PagedMemory) -> Self {
		Self {
			frames:                memory.frames().to_vec(),
			free_frames:           memory.free_frames(),
			physical_address_bits: memory.physical_address_bits(),
			processes:             memory
				.page_tables()
				.iter()
				.map(|(&process_id, page_table)| PagedProcessData {
					process_id,
					logical_address_bits: memory
						.logical_address_bits(process_id)
						.expect("Process with a page table had no logical address"),
					page_table: page_table.clone(),
				})
				.collect(),
		}
	}
}

/// Paged process
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct PagedProcessData {
	pub process_id:           ProcessId,
	pub logical_address_bits: u32,
	pub page_table:           PageTable,
}
