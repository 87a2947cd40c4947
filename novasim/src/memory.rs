//! Memory allocation

// Modules
pub mod contiguous;
pub mod fixed;
pub mod paging;

// Exports
pub use self::{
	contiguous::{BlockList, MemoryBlock},
	fixed::{FixedPartitions, Partition},
	paging::{PageTable, PageTableEntry, PagedMemory, PagingError},
};

// Imports
use {crate::process::ProcessId, std::cmp::Reverse};

/// Fit strategy for placing a request in a free slot
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FitStrategy {
	/// First free slot that fits
	#[clap(name = "first-fit")]
	#[serde(rename = "first-fit")]
	First,

	/// Free slot that leaves the least space behind
	#[clap(name = "best-fit")]
	#[serde(rename = "best-fit")]
	Best,

	/// Largest free slot
	#[clap(name = "worst-fit")]
	#[serde(rename = "worst-fit")]
	Worst,
}

impl FitStrategy {
	/// Selects a slot for `size` among the `free` slots, given as `(index, size)`.
	///
	/// Ties always go to the first slot.
	pub fn select(self, size: u64, free: impl IntoIterator<Item = (usize, u64)>) -> Option<usize> {
		let mut fitting = free.into_iter().filter(|&(_, free_size)| free_size >= size);
		let (idx, _) = match self {
			Self::First => fitting.next(),
			Self::Best => fitting.min_by_key(|&(_, free_size)| free_size - size),
			Self::Worst => fitting.min_by_key(|&(_, free_size)| Reverse(free_size)),
		}?;

		Some(idx)
	}
}

/// Allocation error
#[derive(PartialEq, Eq, Clone, Debug, thiserror::Error)]
pub enum AllocationError {
	#[error("Size must be at least 1")]
	ZeroSize,

	#[error("Requested {requested} exceeds total memory of {total}")]
	ExceedsMemory { requested: u64, total: u64 },

	#[error("Process {0} already has a partition")]
	AlreadyAllocated(ProcessId),

	#[error("Process {0} has no allocated memory")]
	NotAllocated(ProcessId),

	#[error("No free block fits {requested} (largest free block is {largest_free})")]
	NoSuitableBlock { requested: u64, largest_free: u64 },
}

impl AllocationError {
	/// Returns if this error is due to a lack of free memory, rather than a bad request
	pub fn is_capacity_exhausted(&self) -> bool {
		matches!(self, Self::NoSuitableBlock { .. })
	}
}
