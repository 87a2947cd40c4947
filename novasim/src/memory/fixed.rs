//! Contiguous allocation with fixed-size partitions

// Imports
use {
	super::{AllocationError, FitStrategy},
	crate::process::ProcessId,
};

/// Partition
#[derive(PartialEq, Eq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Partition {
	/// Start offset
	pub start: u64,

	/// Size
	pub size: u64,

	/// Owning process, if allocated
	pub owner: Option<ProcessId>,

	/// Memory actually used by the owner
	pub used: u64,
}

impl Partition {
	/// Returns if this partition is allocated
	pub fn is_allocated(&self) -> bool {
		self.owner.is_some()
	}
}

/// Fixed-size partitions.
///
/// Each partition holds at most one process, which gets the whole partition.
/// Partitions are never split nor merged.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FixedPartitions {
	partitions: Vec<Partition>,
}

impl FixedPartitions {
	/// Creates partitions with the given sizes, in order
	///
	/// # Errors
	/// Returns an error if any size is zero.
	pub fn new(sizes: impl IntoIterator<Item = u64>) -> Result<Self, AllocationError> {
		let mut partitions = Self::default();
		for size in sizes {
			partitions.add_partition(size)?;
		}

		Ok(partitions)
	}

	/// Adds a partition of `size` after all others
	///
	/// # Errors
	/// Returns an error if `size` is zero.
	pub fn add_partition(&mut self, size: u64) -> Result<(), AllocationError> {
		if size == 0 {
			return Err(AllocationError::ZeroSize);
		}

		let start = self.total();
		self.partitions.push(Partition {
			start,
			size,
			owner: None,
			used: 0,
		});

		Ok(())
	}

	/// Returns all partitions, in order
	pub fn partitions(&self) -> &[Partition] {
		&self.partitions
	}

	/// Returns the total memory size
	pub fn total(&self) -> u64 {
		self.partitions.iter().map(|partition| partition.size).sum()
	}

	/// Returns the memory wasted inside allocated partitions
	pub fn internal_fragmentation(&self) -> u64 {
		self.partitions
			.iter()
			.filter(|partition| partition.is_allocated())
			.map(|partition| partition.size - partition.used)
			.sum()
	}

	/// Gives a free partition to `process_id`, chosen by `strategy`
	///
	/// # Errors
	/// Returns an error if the request is invalid, if `process_id` already
	/// has a partition, or if no free partition fits `size`.
	pub fn allocate(&self, strategy: FitStrategy, size: u64, process_id: ProcessId) -> Result<Self, AllocationError> {
		if size == 0 {
			return Err(AllocationError::ZeroSize);
		}
		let total = self.total();
		if size > total {
			return Err(AllocationError::ExceedsMemory { requested: size, total });
		}
		if self.partitions.iter().any(|partition| partition.owner == Some(process_id)) {
			return Err(AllocationError::AlreadyAllocated(process_id));
		}

		let free = self
			.partitions
			.iter()
			.enumerate()
			.filter(|(_, partition)| !partition.is_allocated())
			.map(|(idx, partition)| (idx, partition.size));
		let Some(idx) = strategy.select(size, free) else {
			return Err(AllocationError::NoSuitableBlock {
				requested:    size,
				largest_free: self
					.partitions
					.iter()
					.filter(|partition| !partition.is_allocated())
					.map(|partition| partition.size)
					.max()
					.unwrap_or(0),
			});
		};

		let mut partitions = self.clone();
		let partition = &mut partitions.partitions[idx];
		partition.owner = Some(process_id);
		partition.used = size;
		tracing::trace!(?strategy, ?process_id, ?partition, "Allocated partition");

		Ok(partitions)
	}

	/// Frees the partition of `process_id`
	///
	/// # Errors
	/// Returns an error if `process_id` has no partition.
	pub fn deallocate(&self, process_id: ProcessId) -> Result<Self, AllocationError> {
		let idx = self
			.partitions
			.iter()
			.position(|partition| partition.owner == Some(process_id))
			.ok_or(AllocationError::NotAllocated(process_id))?;

		let mut partitions = self.clone();
		let partition = &mut partitions.partitions[idx];
		partition.owner = None;
		partition.used = 0;
		tracing::trace!(?process_id, ?partition, "Freed partition");

		Ok(partitions)
	}
}
