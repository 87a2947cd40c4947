//! First in, first out

// Imports
use super::{Access, ReplacementError, ReplacementPolicy};

/// First in, first out.
///
/// Evicts the page that was loaded the longest ago. Hits don't change the
/// eviction order.
///
/// Frames are kept in load order, oldest first, with any free frames at the end.
#[derive(Clone, Debug)]
pub struct Fifo<T> {
	/// Frames
	frames: Vec<Option<T>>,
}

impl<T> Fifo<T> {
	/// Creates a policy over `capacity` free frames
	///
	/// # Errors
	/// Returns an error if `capacity` is zero or the frames can't be allocated.
	pub fn new(capacity: usize) -> Result<Self, ReplacementError> {
		Ok(Self {
			frames: super::free_frames(capacity)?,
		})
	}
}

impl<T: PartialEq> ReplacementPolicy<T> for Fifo<T> {
	fn name(&self) -> &'static str {
		"fifo"
	}

	fn access(&mut self, page: T) -> Access<T> {
		if self.frames.iter().flatten().any(|resident| *resident == page) {
			return Access::Hit;
		}

		// Load into a free frame, if we have any
		if let Some(frame) = self.frames.iter_mut().find(|frame| frame.is_none()) {
			*frame = Some(page);
			return Access::Miss { evicted: None };
		}

		// Else evict the oldest page and load the new one as the newest
		let evicted = self.frames.remove(0);
		self.frames.push(Some(page));

		Access::Miss { evicted }
	}

	fn frames(&self) -> &[Option<T>] {
		&self.frames
	}
}

#[cfg(test)]
mod tests {
	use {super::*, similar_asserts::assert_eq};

	#[test]
	fn hit_does_not_refresh_page() {
		let mut fifo = Fifo::new(2).expect("Invalid capacity");

		assert_eq!(fifo.access(1), Access::Miss { evicted: None });
		assert_eq!(fifo.access(2), Access::Miss { evicted: None });
		assert_eq!(fifo.access(1), Access::Hit);

		// 1 is still the oldest, even though it was just used
		assert_eq!(fifo.access(3), Access::Miss { evicted: Some(1) });
		assert_eq!(fifo.frames(), [Some(2), Some(3)]);
		assert_eq!(fifo.access(4), Access::Miss { evicted: Some(2) });
		assert_eq!(fifo.frames(), [Some(3), Some(4)]);
	}

	#[test]
	fn frames_are_in_load_order() {
		let mut fifo = Fifo::new(3).expect("Invalid capacity");

		for page in [7, 0, 1, 2, 0, 3] {
			fifo.access(page);
		}
		assert_eq!(fifo.frames(), [Some(1), Some(2), Some(3)]);
	}

	#[test]
	fn free_frames_stay_at_the_end() {
		let mut fifo = Fifo::new(3).expect("Invalid capacity");

		fifo.access('a');
		assert_eq!(fifo.frames(), [Some('a'), None, None]);
	}

	#[test]
	fn single_frame() {
		let mut fifo = Fifo::new(1).expect("Invalid capacity");

		assert_eq!(fifo.access('a'), Access::Miss { evicted: None });
		assert_eq!(fifo.access('a'), Access::Hit);
		assert_eq!(fifo.access('b'), Access::Miss { evicted: Some('a') });
		assert_eq!(fifo.frames(), [Some('b')]);
	}

	#[test]
	fn rejects_unallocatable_capacity() {
		assert_eq!(
			Fifo::<u64>::new(usize::MAX).map(|_| ()),
			Err(ReplacementError::TooManyFrames { capacity: usize::MAX })
		);
		assert_eq!(Fifo::<u64>::new(0).map(|_| ()), Err(ReplacementError::ZeroCapacity));
	}
}
