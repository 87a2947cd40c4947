//! Process synchronization
//!
//! A binary semaphore guarding a critical section, with processes waiting
//! for it in FIFO order.

// Imports
use {crate::process::ProcessId, std::collections::VecDeque};

/// Mutex
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Mutex {
	/// Process currently in the critical section
	holder: Option<ProcessId>,

	/// Waiting processes, in arrival order
	waiters: VecDeque<ProcessId>,
}

impl Mutex {
	/// Creates a new, unlocked, mutex
	pub fn new() -> Self {
		Self::default()
	}

	/// Requests entry to the critical section for `process_id`.
	///
	/// # Errors
	/// Returns an error if `process_id` is already holding or waiting on this mutex.
	pub fn enter(&mut self, process_id: ProcessId) -> Result<EnterOutcome, SyncError> {
		if self.holder == Some(process_id) {
			return Err(SyncError::AlreadyHolding(process_id));
		}
		if self.waiters.contains(&process_id) {
			return Err(SyncError::AlreadyWaiting(process_id));
		}

		match self.holder {
			Some(holder) => {
				self.waiters.push_back(process_id);
				tracing::trace!(?process_id, ?holder, waiters = self.waiters.len(), "Process waiting on mutex");
				Ok(EnterOutcome::Queued)
			},
			None => {
				self.holder = Some(process_id);
				tracing::trace!(?process_id, "Process acquired mutex");
				Ok(EnterOutcome::Acquired)
			},
		}
	}

	/// Releases the critical section held by the current holder.
	///
	/// If any process is waiting, the lock is handed directly to the first
	/// one, which is returned.
	///
	/// # Errors
	/// Returns an error if the mutex isn't locked.
	pub fn exit(&mut self) -> Result<Option<ProcessId>, SyncError> {
		let prev_holder = self.holder.take().ok_or(SyncError::NotLocked)?;
		self.holder = self.waiters.pop_front();
		tracing::trace!(?prev_holder, next_holder = ?self.holder, "Process released mutex");

		Ok(self.holder)
	}

	/// Returns if the mutex is locked
	pub fn is_locked(&self) -> bool {
		self.holder.is_some()
	}

	/// Returns the process holding the mutex
	pub fn holder(&self) -> Option<ProcessId> {
		self.holder
	}

	/// Returns all waiting processes, in the order they'll acquire the mutex
	pub fn waiters(&self) -> &VecDeque<ProcessId> {
		&self.waiters
	}
}

/// Outcome of [`Mutex::enter`]
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum EnterOutcome {
	/// Process entered the critical section
	Acquired,

	/// Process is waiting for the critical section
	Queued,
}

/// Synchronization error
#[derive(PartialEq, Eq, Clone, Debug, thiserror::Error)]
pub enum SyncError {
	#[error("Process {0} is already in the critical section")]
	AlreadyHolding(ProcessId),

	#[error("Process {0} is already waiting for the critical section")]
	AlreadyWaiting(ProcessId),

	#[error("Mutex isn't locked")]
	NotLocked,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pid(id: u32) -> ProcessId {
		ProcessId::new(id)
	}

	#[test]
	fn acquire_and_release() {
		let mut mutex = Mutex::new();
		assert!(!mutex.is_locked());

		assert_eq!(mutex.enter(pid(1)), Ok(EnterOutcome::Acquired));
		assert_eq!(mutex.holder(), Some(pid(1)));
		assert_eq!(mutex.exit(), Ok(None));
		assert!(!mutex.is_locked());
	}

	#[test]
	fn hands_off_in_arrival_order() {
		let mut mutex = Mutex::new();

		assert_eq!(mutex.enter(pid(1)), Ok(EnterOutcome::Acquired));
		assert_eq!(mutex.enter(pid(3)), Ok(EnterOutcome::Queued));
		assert_eq!(mutex.enter(pid(2)), Ok(EnterOutcome::Queued));
		assert_eq!(mutex.waiters().iter().copied().collect::<Vec<_>>(), [pid(3), pid(2)]);

		// The lock never becomes free while someone is waiting
		assert_eq!(mutex.exit(), Ok(Some(pid(3))));
		assert!(mutex.is_locked());
		assert_eq!(mutex.exit(), Ok(Some(pid(2))));
		assert_eq!(mutex.exit(), Ok(None));
		assert!(mutex.waiters().is_empty());
	}

	#[test]
	fn rejects_double_entry() {
		let mut mutex = Mutex::new();
		mutex.enter(pid(1)).expect("Unable to enter");
		mutex.enter(pid(2)).expect("Unable to enter");

		let before = mutex.clone();
		assert_eq!(mutex.enter(pid(1)), Err(SyncError::AlreadyHolding(pid(1))));
		assert_eq!(mutex.enter(pid(2)), Err(SyncError::AlreadyWaiting(pid(2))));
		assert_eq!(mutex, before);
	}

	#[test]
	fn exit_when_unlocked() {
		let mut mutex = Mutex::new();
		assert_eq!(mutex.exit(), Err(SyncError::NotLocked));
	}
}
