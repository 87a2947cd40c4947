//! Utilities

// Modules
pub mod logger;

// Imports
use std::{cell::RefCell, fmt};

/// Extension trait for rounding `f64`s to a number of decimal places
#[extend::ext(name = RoundDecimals)]
pub impl f64 {
	/// Rounds this value to `decimals` decimal places.
	///
	/// Halfway cases round away from zero, matching [`f64::round`].
	fn round_to(self, decimals: u32) -> f64 {
		let scale = 10f64.powi(decimals as i32);
		(self * scale).round() / scale
	}
}

/// [`fmt::Display`] helper to display using a `FnMut(&mut fmt::Formatter)`
pub struct DisplayWrapper<F: FnMut(&mut fmt::Formatter) -> fmt::Result>(RefCell<F>);

impl<F: FnMut(&mut fmt::Formatter) -> fmt::Result> DisplayWrapper<F> {
	/// Creates a new display wrapper
	#[must_use]
	pub const fn new(func: F) -> Self {
		Self(RefCell::new(func))
	}
}

impl<F: FnMut(&mut fmt::Formatter) -> fmt::Result> fmt::Display for DisplayWrapper<F> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		// Note: `f` cannot be re-entrant, so this cannot fail
		self.0.borrow_mut()(f)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_to_two_decimals() {
		assert_eq!((100.0 / 6.0).round_to(2), 16.67);
		assert_eq!((250.0 / 3.0).round_to(2), 83.33);
		assert_eq!(25.0f64.round_to(2), 25.0);
		assert_eq!(0.0f64.round_to(2), 0.0);
	}

	#[test]
	fn display_wrapper_formats_through_closure() {
		let values = [1, 2, 3];
		let wrapper = DisplayWrapper::new(|f| {
			for value in &values {
				write!(f, "[{value}]")?;
			}
			Ok(())
		});

		assert_eq!(wrapper.to_string(), "[1][2][3]");
	}
}
