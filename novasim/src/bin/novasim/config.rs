//! Configuration

// Imports
use novasim::{ProcessDescriptor, ProcessId};

/// Schedule configuration
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ScheduleConfig {
	/// Debug output period (in seconds)
	#[serde(default = "default_debug_output_period_secs")]
	pub debug_output_period_secs: f64,

	/// Processes
	pub processes: Vec<ProcessDescriptor>,
}

/// Paging configuration
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct PagingConfig {
	pub total_memory: u64,
	pub page_size:    u64,
	pub requests:     Vec<Request>,
}

/// Contiguous configuration
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ContiguousConfig {
	pub layout:   Layout,
	pub requests: Vec<Request>,
}

/// Contiguous memory layout
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Layout {
	/// Variable partitions, starting as a single free block
	Variable { total_memory: u64 },

	/// Fixed partitions with the given sizes
	Fixed { partitions: Vec<u64> },
}

/// Allocation request
#[derive(Clone, Copy, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Request {
	Allocate { process_id: ProcessId, size: u64 },
	Deallocate { process_id: ProcessId },
}

fn default_debug_output_period_secs() -> f64 {
	1.0
}
