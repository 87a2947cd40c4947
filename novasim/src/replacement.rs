//! Page replacement
//!
//! Replays a reference string against a fixed number of frames, recording
//! a snapshot of the frames after every reference.

// Modules
pub mod fifo;
pub mod lru;
pub mod statistics;

// Exports
pub use self::{fifo::Fifo, lru::Lru, statistics::Statistics};

// Imports
use std::fmt;

/// Page replacement policy
pub trait ReplacementPolicy<T> {
	/// Returns the name of this policy
	fn name(&self) -> &'static str;

	/// References `page`, loading it if it isn't resident
	fn access(&mut self, page: T) -> Access<T>;

	/// Returns all frames, `None` being a free frame
	fn frames(&self) -> &[Option<T>];
}

/// Access to a page
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Access<T> {
	/// Page was resident
	Hit,

	/// Page was loaded, possibly evicting another
	Miss { evicted: Option<T> },
}

impl<T> Access<T> {
	/// Returns the result of this access
	pub fn result(&self) -> AccessResult {
		match self {
			Self::Hit => AccessResult::Hit,
			Self::Miss { .. } => AccessResult::Miss,
		}
	}
}

/// Access result
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessResult {
	Hit,
	Miss,
}

/// Frame slot, as seen in a snapshot
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum FrameSlot<T> {
	/// Frame holds a page
	Page(T),

	/// Frame is free
	Free,
}

impl<T: serde::Serialize> serde::Serialize for FrameSlot<T> {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Page(page) => page.serialize(serializer),
			Self::Free => serializer.serialize_str("FREE"),
		}
	}
}

impl<T: fmt::Display> fmt::Display for FrameSlot<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Page(page) => page.fmt(f),
			Self::Free => f.pad("FREE"),
		}
	}
}

/// A single step of a simulation
#[derive(PartialEq, Eq, Clone, Debug)]
#[derive(serde::Serialize)]
pub struct Step<T> {
	/// Step number, starting at 1
	pub step: usize,

	/// Referenced page
	pub page: T,

	/// Result
	pub result: AccessResult,

	/// Evicted page, if any
	pub evicted: Option<T>,

	/// Frames after the reference
	pub frames: Vec<FrameSlot<T>>,
}

/// Simulation report
#[derive(PartialEq, Clone, Debug)]
#[derive(serde::Serialize)]
pub struct Report<T> {
	/// Policy name
	pub policy: &'static str,

	/// All steps
	pub steps: Vec<Step<T>>,

	/// Statistics
	pub statistics: Statistics,
}

/// Simulates `policy` over all `references`.
///
/// # Errors
/// Returns an error if `references` is empty.
pub fn simulate<T, P>(policy: &mut P, references: &[T]) -> Result<Report<T>, ReplacementError>
where
	T: Clone + PartialEq + fmt::Debug,
	P: ReplacementPolicy<T>,
{
	if references.is_empty() {
		return Err(ReplacementError::EmptyReferences);
	}

	let steps = references
		.iter()
		.enumerate()
		.map(|(idx, page)| {
			let access = policy.access(page.clone());
			tracing::trace!(policy = policy.name(), step = idx + 1, ?page, ?access, "Referenced page");

			let frames = policy
				.frames()
				.iter()
				.map(|frame| match frame {
					Some(page) => FrameSlot::Page(page.clone()),
					None => FrameSlot::Free,
				})
				.collect();

			let result = access.result();
			Step {
				step: idx + 1,
				page: page.clone(),
				result,
				evicted: match access {
					Access::Hit => None,
					Access::Miss { evicted } => evicted,
				},
				frames,
			}
		})
		.collect::<Vec<_>>();

	let statistics = Statistics::from_results(steps.iter().map(|step| step.result));
	tracing::debug!(policy = policy.name(), ?statistics, "Simulated page replacement");

	Ok(Report {
		policy: policy.name(),
		steps,
		statistics,
	})
}

/// Parses a comma-separated reference string, such as `"7, 0, 1, 2"`.
///
/// Blank tokens are skipped, and every other token must be a plain
/// non-negative integer.
///
/// # Errors
/// Returns an error if any token is malformed, or if there are no tokens.
pub fn parse_reference_string(s: &str) -> Result<Vec<u64>, ReplacementError> {
	let references = s
		.split(',')
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.enumerate()
		.map(|(position, token)| {
			let malformed = || ReplacementError::MalformedReference {
				position,
				token: token.to_owned(),
			};
			match token.bytes().all(|b| b.is_ascii_digit()) {
				true => token.parse::<u64>().map_err(|_| malformed()),
				false => Err(malformed()),
			}
		})
		.collect::<Result<Vec<_>, _>>()?;

	match references.is_empty() {
		true => Err(ReplacementError::EmptyReferences),
		false => Ok(references),
	}
}

/// Algorithm kind
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[derive(clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmKind {
	/// First in, first out
	Fifo,

	/// Least recently used
	Lru,
}

impl AlgorithmKind {
	/// Simulates this algorithm over `references` with `capacity` frames
	///
	/// # Errors
	/// Returns an error if `capacity` is zero or `references` is empty.
	pub fn simulate<T>(self, capacity: usize, references: &[T]) -> Result<Report<T>, ReplacementError>
	where
		T: Clone + PartialEq + fmt::Debug,
	{
		match self {
			Self::Fifo => self::simulate(&mut Fifo::new(capacity)?, references),
			Self::Lru => self::simulate(&mut Lru::new(capacity)?, references),
		}
	}
}

/// Allocates `capacity` free frames
fn free_frames<T>(capacity: usize) -> Result<Vec<Option<T>>, ReplacementError> {
	if capacity == 0 {
		return Err(ReplacementError::ZeroCapacity);
	}

	let mut frames = Vec::new();
	frames
		.try_reserve_exact(capacity)
		.map_err(|_| ReplacementError::TooManyFrames { capacity })?;
	frames.resize_with(capacity, || None);

	Ok(frames)
}

/// Replacement error
#[derive(PartialEq, Eq, Clone, Debug, thiserror::Error)]
pub enum ReplacementError {
	#[error("Reference string is empty")]
	EmptyReferences,

	#[error("Frame capacity must be at least 1")]
	ZeroCapacity,

	#[error("Unable to allocate {capacity} frames")]
	TooManyFrames { capacity: usize },

	#[error("Reference #{position} ({token:?}) is not a non-negative integer")]
	MalformedReference { position: usize, token: String },
}
