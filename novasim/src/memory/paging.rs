//! Paging

// Imports
use {
	crate::process::ProcessId,
	std::collections::{btree_map, BTreeMap},
};

/// Paged memory.
///
/// Physical memory is split into frames of `page_size` each. Processes get
/// the lowest free frames, which need not be contiguous.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct PagedMemory {
	/// Total memory size
	total_memory: u64,

	/// Page size
	page_size: u64,

	/// Frames, with their owner, if any
	frames: Vec<Option<ProcessId>>,

	/// Page tables, by process
	page_tables: BTreeMap<ProcessId, PageTable>,
}

impl PagedMemory {
	/// Creates paged memory with `total_memory / page_size` free frames.
	///
	/// # Errors
	/// Returns an error if either size is zero, if `total_memory` isn't a
	/// whole multiple of `page_size`, or if the frames can't be allocated.
	pub fn new(total_memory: u64, page_size: u64) -> Result<Self, PagingError> {
		if total_memory == 0 || page_size == 0 {
			return Err(PagingError::ZeroSize);
		}
		if total_memory < page_size {
			return Err(PagingError::MemorySmallerThanPage { total_memory, page_size });
		}
		if total_memory % page_size != 0 {
			return Err(PagingError::NotPageMultiple { total_memory, page_size });
		}

		let frame_count = usize::try_from(total_memory / page_size).map_err(|_| PagingError::TooManyFrames)?;
		let mut frames = Vec::new();
		frames
			.try_reserve_exact(frame_count)
			.map_err(|_| PagingError::TooManyFrames)?;
		frames.resize(frame_count, None);
		tracing::debug!(total_memory, page_size, frame_count, "Initialized paged memory");

		Ok(Self {
			total_memory,
			page_size,
			frames,
			page_tables: BTreeMap::new(),
		})
	}

	/// Allocates `memory_required` for `process_id`, returning its page table.
	///
	/// # Errors
	/// Returns an error if the request is empty, if the process already has
	/// memory, or if there aren't enough free frames.
	pub fn allocate(&mut self, process_id: ProcessId, memory_required: u64) -> Result<&PageTable, PagingError> {
		if memory_required == 0 {
			return Err(PagingError::ZeroRequest);
		}

		let entry = match self.page_tables.entry(process_id) {
			btree_map::Entry::Vacant(entry) => entry,
			btree_map::Entry::Occupied(_) => return Err(PagingError::AlreadyAllocated(process_id)),
		};

		let pages_needed = memory_required.div_ceil(self.page_size);
		let free_frames = self.frames.iter().filter(|frame| frame.is_none()).count();
		if (free_frames as u64) < pages_needed {
			tracing::trace!(?process_id, pages_needed, free_frames, "Not enough free frames");
			return Err(PagingError::NotEnoughFrames {
				needed: pages_needed,
				free:   free_frames,
			});
		}

		// Note: We know we have enough frames, so this takes exactly `pages_needed` of them
		let entries = self
			.frames
			.iter_mut()
			.enumerate()
			.filter(|(_, frame)| frame.is_none())
			.take(pages_needed as usize)
			.enumerate()
			.map(|(page, (frame_idx, frame))| {
				*frame = Some(process_id);
				PageTableEntry { page, frame: frame_idx }
			})
			.collect::<Vec<_>>();
		tracing::trace!(?process_id, ?entries, "Allocated frames");

		Ok(entry.insert(PageTable {
			process_size: memory_required,
			entries,
		}))
	}

	/// Frees all frames of `process_id`, returning its old page table
	///
	/// # Errors
	/// Returns an error if `process_id` has no memory.
	pub fn deallocate(&mut self, process_id: ProcessId) -> Result<PageTable, PagingError> {
		let page_table = self
			.page_tables
			.remove(&process_id)
			.ok_or(PagingError::NotAllocated(process_id))?;

		for entry in &page_table.entries {
			let frame = &mut self.frames[entry.frame];
			assert_eq!(*frame, Some(process_id), "Page table pointed to a frame not owned by the process");
			*frame = None;
		}
		tracing::trace!(?process_id, frames = page_table.entries.len(), "Freed frames");

		Ok(page_table)
	}

	/// Returns the total memory size
	pub fn total_memory(&self) -> u64 {
		self.total_memory
	}

	/// Returns the page size
	pub fn page_size(&self) -> u64 {
		self.page_size
	}

	/// Returns all frames
	pub fn frames(&self) -> &[Option<ProcessId>] {
		&self.frames
	}

	/// Returns the number of free frames
	pub fn free_frames(&self) -> usize {
		self.frames.iter().filter(|frame| frame.is_none()).count()
	}

	/// Returns the page table of `process_id`
	pub fn page_table(&self, process_id: ProcessId) -> Option<&PageTable> {
		self.page_tables.get(&process_id)
	}

	/// Returns all page tables
	pub fn page_tables(&self) -> &BTreeMap<ProcessId, PageTable> {
		&self.page_tables
	}

	/// Returns the logical address width of `process_id`
	pub fn logical_address_bits(&self, process_id: ProcessId) -> Option<u32> {
		self.page_tables
			.get(&process_id)
			.map(|page_table| self::address_bits(page_table.process_size))
	}

	/// Returns the physical address width
	pub fn physical_address_bits(&self) -> u32 {
		self::address_bits(self.total_memory)
	}
}

/// Returns the number of bits needed to address `value` bytes, `ceil(log2(value))`.
///
/// Both 0 and 1 need no bits.
pub fn address_bits(value: u64) -> u32 {
	match value {
		0 | 1 => 0,
		_ => u64::BITS - (value - 1).leading_zeros(),
	}
}

/// Page table
#[derive(PartialEq, Eq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct PageTable {
	/// Memory requested by the process
	pub process_size: u64,

	/// Entries, in page order
	pub entries: Vec<PageTableEntry>,
}

/// Page table entry
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct PageTableEntry {
	/// Logical page
	pub page: usize,

	/// Physical frame
	pub frame: usize,
}

/// Paging error
#[derive(PartialEq, Eq, Clone, Debug, thiserror::Error)]
pub enum PagingError {
	#[error("Memory and page sizes must be at least 1")]
	ZeroSize,

	#[error("Total memory ({total_memory}) is smaller than the page size ({page_size})")]
	MemorySmallerThanPage { total_memory: u64, page_size: u64 },

	#[error("Total memory ({total_memory}) isn't a multiple of the page size ({page_size})")]
	NotPageMultiple { total_memory: u64, page_size: u64 },

	#[error("Too many frames to allocate")]
	TooManyFrames,

	#[error("Requested memory must be at least 1")]
	ZeroRequest,

	#[error("Process {0} already has memory allocated")]
	AlreadyAllocated(ProcessId),

	#[error("Process {0} has no memory allocated")]
	NotAllocated(ProcessId),

	#[error("Not enough free frames: {needed} needed, {free} free")]
	NotEnoughFrames { needed: u64, free: usize },
}

impl PagingError {
	/// Returns if this error is due to a lack of free frames, rather than a bad request
	pub fn is_capacity_exhausted(&self) -> bool {
		matches!(self, Self::NotEnoughFrames { .. })
	}
}
