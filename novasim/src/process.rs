//! Process descriptors

// Imports
use std::fmt;

/// Process id.
///
/// Assigned by the caller when the process is created and never changed afterwards.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ProcessId(u32);

impl ProcessId {
	/// Creates a process id
	pub const fn new(id: u32) -> Self {
		Self(id)
	}

	/// Returns the process id as a `u32`
	pub const fn to_u32(self) -> u32 {
		self.0
	}
}

impl fmt::Debug for ProcessId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "P{}", self.0)
	}
}

impl fmt::Display for ProcessId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "P{}", self.0)
	}
}

/// Process descriptor.
///
/// Supplied by the caller. The engines only ever work on their own copies,
/// so a descriptor is never mutated by a simulation.
#[derive(PartialEq, Eq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDescriptor {
	/// Process id
	#[serde(rename = "processID")]
	pub process_id: ProcessId,

	/// Owner name, only used for display
	#[serde(default)]
	pub owner: String,

	/// Priority, lower values are scheduled first
	#[serde(default)]
	pub priority: i32,

	/// Time unit at which the process becomes eligible to run
	pub arrival_time: u64,

	/// Total CPU time required
	pub burst_time: u64,

	/// Memory required, only used by the memory components
	#[serde(default)]
	pub memory_required: u64,

	/// Whether the process requested I/O
	#[serde(default)]
	pub io_request: bool,
}

impl ProcessDescriptor {
	/// Creates a descriptor with default owner, priority and memory
	pub fn new(process_id: u32, arrival_time: u64, burst_time: u64) -> Self {
		Self {
			process_id: ProcessId::new(process_id),
			owner: String::from("system"),
			priority: 0,
			arrival_time,
			burst_time,
			memory_required: 0,
			io_request: false,
		}
	}

	/// Sets the priority of this descriptor
	#[must_use]
	pub fn with_priority(mut self, priority: i32) -> Self {
		self.priority = priority;
		self
	}

	/// Sets the owner of this descriptor
	#[must_use]
	pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
		self.owner = owner.into();
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_camel_case_roster() {
		let json = r#"[
			{ "processID": 1, "owner": "alice", "priority": 2, "arrivalTime": 0, "burstTime": 5, "memoryRequired": 2048, "ioRequest": true },
			{ "processID": 2, "arrivalTime": 3, "burstTime": 1 }
		]"#;
		let processes = serde_json::from_str::<Vec<ProcessDescriptor>>(json).expect("Unable to parse roster");

		assert_eq!(processes[0].process_id, ProcessId::new(1));
		assert_eq!(processes[0].owner, "alice");
		assert_eq!(processes[0].memory_required, 2048);
		assert!(processes[0].io_request);
		assert_eq!(processes[1].priority, 0);
		assert_eq!(processes[1].arrival_time, 3);
		assert_eq!(processes[1].burst_time, 1);
	}

	#[test]
	fn builders_match_parsed_roster() {
		let json = r#"[
			{ "processID": 1, "owner": "alice", "priority": 2, "arrivalTime": 0, "burstTime": 5 },
			{ "processID": 2, "owner": "system", "arrivalTime": 3, "burstTime": 1 }
		]"#;
		let processes = serde_json::from_str::<Vec<ProcessDescriptor>>(json).expect("Unable to parse roster");

		assert_eq!(processes, [
			ProcessDescriptor::new(1, 0, 5).with_owner("alice").with_priority(2),
			ProcessDescriptor::new(2, 3, 1),
		]);
	}

	#[test]
	fn process_id_displays_with_prefix() {
		assert_eq!(ProcessId::new(7).to_string(), "P7");
		assert_eq!(format!("{:?}", ProcessId::new(7)), "P7");
	}
}
