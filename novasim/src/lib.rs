//! NovaOS simulator (`novasim`)
//!
//! Discrete-time models of classic operating system algorithms: CPU
//! scheduling, contiguous and paged memory allocation, page replacement
//! and mutual exclusion.

// Modules
pub mod data;
pub mod memory;
pub mod process;
pub mod replacement;
pub mod sched;
pub mod sim;
pub mod sync;

// Exports
pub use self::{
	memory::{AllocationError, BlockList, FitStrategy, FixedPartitions, PagedMemory, PagingError},
	process::{ProcessDescriptor, ProcessId},
	replacement::{AlgorithmKind, ReplacementError, ReplacementPolicy},
	sched::{Policy, PolicyKind, SchedError, Simulation},
	sim::Simulator,
	sync::{Mutex, SyncError},
};
