//! Contiguous allocation with variable-sized blocks

// Imports
use {
	super::{AllocationError, FitStrategy},
	crate::process::ProcessId,
	itertools::Itertools,
};

/// Memory block
#[derive(PartialEq, Eq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct MemoryBlock {
	/// Start offset
	pub start: u64,

	/// Size
	pub size: u64,

	/// Owning process, if allocated
	pub owner: Option<ProcessId>,
}

impl MemoryBlock {
	/// Returns if this block is allocated
	pub fn is_allocated(&self) -> bool {
		self.owner.is_some()
	}
}

/// Block list.
///
/// The blocks always partition the whole memory, in order, and no two free
/// blocks are ever adjacent after a deallocation.
///
/// All operations return a new list, leaving `self` untouched, so callers
/// can keep old lists around as snapshots.
#[derive(PartialEq, Eq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BlockList {
	blocks: Vec<MemoryBlock>,
}

impl BlockList {
	/// Creates a block list with a single free block of `total` size
	///
	/// # Errors
	/// Returns an error if `total` is zero.
	pub fn new(total: u64) -> Result<Self, AllocationError> {
		if total == 0 {
			return Err(AllocationError::ZeroSize);
		}

		Ok(Self {
			blocks: vec![MemoryBlock {
				start: 0,
				size:  total,
				owner: None,
			}],
		})
	}

	/// Returns all blocks, in order
	pub fn blocks(&self) -> &[MemoryBlock] {
		&self.blocks
	}

	/// Returns the total memory size
	pub fn total(&self) -> u64 {
		self.blocks.iter().map(|block| block.size).sum()
	}

	/// Returns the total free memory
	pub fn free_total(&self) -> u64 {
		self.free_blocks().map(|(_, size)| size).sum()
	}

	/// Returns the size of the largest free block
	pub fn largest_free(&self) -> u64 {
		self.free_blocks().map(|(_, size)| size).max().unwrap_or(0)
	}

	/// Returns the free memory that isn't part of the largest free block
	pub fn external_fragmentation(&self) -> u64 {
		self.free_total() - self.largest_free()
	}

	/// Returns all processes owning at least one block, in memory order
	pub fn owners(&self) -> impl Iterator<Item = ProcessId> + '_ {
		self.blocks.iter().filter_map(|block| block.owner).unique()
	}

	/// Allocates `size` for `process_id` in the first free block that fits
	///
	/// # Errors
	/// Returns an error if `size` is invalid or no free block fits it.
	pub fn first_fit(&self, size: u64, process_id: ProcessId) -> Result<Self, AllocationError> {
		self.allocate(FitStrategy::First, size, process_id)
	}

	/// Allocates `size` for `process_id` in the free block that leaves the least space behind
	///
	/// # Errors
	/// Returns an error if `size` is invalid or no free block fits it.
	pub fn best_fit(&self, size: u64, process_id: ProcessId) -> Result<Self, AllocationError> {
		self.allocate(FitStrategy::Best, size, process_id)
	}

	/// Allocates `size` for `process_id` in the largest free block
	///
	/// # Errors
	/// Returns an error if `size` is invalid or no free block fits it.
	pub fn worst_fit(&self, size: u64, process_id: ProcessId) -> Result<Self, AllocationError> {
		self.allocate(FitStrategy::Worst, size, process_id)
	}

	/// Allocates `size` for `process_id` using `strategy`.
	///
	/// The chosen block is split into an allocated block of exactly `size` and,
	/// if anything remains, a free block right after it.
	///
	/// # Errors
	/// Returns an error if `size` is invalid or no free block fits it.
	pub fn allocate(&self, strategy: FitStrategy, size: u64, process_id: ProcessId) -> Result<Self, AllocationError> {
		if size == 0 {
			return Err(AllocationError::ZeroSize);
		}
		let total = self.total();
		if size > total {
			return Err(AllocationError::ExceedsMemory { requested: size, total });
		}

		let Some(idx) = strategy.select(size, self.free_blocks()) else {
			tracing::trace!(?strategy, size, ?process_id, "No free block fits");
			return Err(AllocationError::NoSuitableBlock {
				requested:    size,
				largest_free: self.largest_free(),
			});
		};

		let block = &self.blocks[idx];
		tracing::trace!(?strategy, size, ?process_id, ?block, "Allocating in block");

		let mut split = vec![MemoryBlock {
			start: block.start,
			size,
			owner: Some(process_id),
		}];
		if block.size > size {
			split.push(MemoryBlock {
				start: block.start + size,
				size:  block.size - size,
				owner: None,
			});
		}

		let mut blocks = self.blocks.clone();
		blocks.splice(idx..=idx, split);

		Ok(Self { blocks })
	}

	/// Frees all blocks owned by `process_id`, merging adjacent free blocks.
	///
	/// If `process_id` owns nothing, free blocks are still merged.
	pub fn deallocate(&self, process_id: ProcessId) -> Self {
		let mut blocks = Vec::<MemoryBlock>::with_capacity(self.blocks.len());
		for block in &self.blocks {
			let mut block = block.clone();
			if block.owner == Some(process_id) {
				tracing::trace!(?process_id, ?block, "Freeing block");
				block.owner = None;
			}

			match blocks.last_mut() {
				Some(last) if !last.is_allocated() && !block.is_allocated() => last.size += block.size,
				_ => blocks.push(block),
			}
		}

		Self { blocks }
	}

	/// Returns all free blocks as `(index, size)`
	fn free_blocks(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
		self.blocks
			.iter()
			.enumerate()
			.filter(|(_, block)| !block.is_allocated())
			.map(|(idx, block)| (idx, block.size))
	}
}
