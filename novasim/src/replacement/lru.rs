//! Least recently used

// Imports
use {
	super::{Access, ReplacementError, ReplacementPolicy},
	std::collections::VecDeque,
};

/// Least recently used.
///
/// Evicts the page that was referenced the longest ago, replacing it in the
/// same frame.
#[derive(Clone, Debug)]
pub struct Lru<T> {
	/// Frames
	frames: Vec<Option<T>>,

	/// Frame indices, from least to most recently used
	recency: VecDeque<usize>,
}

impl<T> Lru<T> {
	/// Creates a policy over `capacity` free frames
	///
	/// # Errors
	/// Returns an error if `capacity` is zero or the frames can't be allocated.
	pub fn new(capacity: usize) -> Result<Self, ReplacementError> {
		Ok(Self {
			frames:  super::free_frames(capacity)?,
			recency: VecDeque::new(),
		})
	}

	/// Marks `frame_idx` as the most recently used
	fn touch(&mut self, frame_idx: usize) {
		self.recency.retain(|&idx| idx != frame_idx);
		self.recency.push_back(frame_idx);
	}
}

impl<T: PartialEq> ReplacementPolicy<T> for Lru<T> {
	fn name(&self) -> &'static str {
		"lru"
	}

	fn access(&mut self, page: T) -> Access<T> {
		if let Some(frame_idx) = self.frames.iter().position(|frame| frame.as_ref() == Some(&page)) {
			self.touch(frame_idx);
			return Access::Hit;
		}

		// Load into a free frame, if we have any
		if let Some(frame_idx) = self.frames.iter().position(Option::is_none) {
			self.frames[frame_idx] = Some(page);
			self.touch(frame_idx);
			return Access::Miss { evicted: None };
		}

		// Else replace the least recently used page
		let frame_idx = self.recency.pop_front().expect("Full memory had no used frames");
		let evicted = self.frames[frame_idx].replace(page);
		self.recency.push_back(frame_idx);

		Access::Miss { evicted }
	}

	fn frames(&self) -> &[Option<T>] {
		&self.frames
	}
}
