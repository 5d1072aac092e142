//! Inline messages that clear themselves after a delay.

use crate::error::Error;
use core::cell::Cell;
use std::rc::Rc;
use tracing::{instrument, trace};
use wasm_bindgen::{closure::Closure, JsCast};

/// Counts shown messages so that an older timer can tell it was superseded.
#[derive(Debug, Default)]
pub struct Generations(Cell<u32>);
impl Generations {
	pub fn advance(&self) -> u32 {
		let next = self.0.get().wrapping_add(1);
		self.0.set(next);
		next
	}

	#[must_use]
	pub fn is_current(&self, generation: u32) -> bool {
		self.0.get() == generation
	}
}

/// A region (found by selector) that displays one message at a time.
#[derive(Debug)]
pub struct Notice {
	selector: String,
	delay_ms: i32,
	generations: Rc<Generations>,
}
impl Notice {
	#[must_use]
	pub fn new(selector: String, delay_ms: i32) -> Self {
		Self {
			selector,
			delay_ms,
			generations: Rc::default(),
		}
	}

	/// Displays `text` and schedules it to be cleared, unless another message is shown in the meantime.
	///
	/// # Errors
	///
	/// Iff the region doesn't exist or the timer can't be scheduled.
	#[instrument(skip(self, document), fields(selector = %self.selector))]
	pub fn show(&self, document: &web_sys::Document, text: &str) -> Result<(), Error> {
		let element = document.query_selector(&self.selector)?.ok_or_else(|| Error::MissingElement(self.selector.clone()))?;
		let generation = self.generations.advance();
		element.set_text_content(Some(text));

		let generations = Rc::clone(&self.generations);
		let clear = Closure::once_into_js(move || {
			if generations.is_current(generation) {
				element.set_text_content(None);
			} else {
				trace!(generation, "Notice was superseded; not clearing.");
			}
		});
		let window = web_sys::window().ok_or(Error::NoWindow)?;
		window.set_timeout_with_callback_and_timeout_and_arguments_0(clear.unchecked_ref(), self.delay_ms)?;
		Ok(())
	}
}
