//! Hover tooltips for elements flagged with `data-toggle="tooltip"`.

use crate::error::Error;
use core::cell::Cell;
use tracing::{debug, instrument};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

const TEXT_ATTRIBUTE: &str = "data-original-title";
const LINK_ATTRIBUTE: &str = "aria-describedby";

thread_local! {
	static NEXT_TOOLTIP: Cell<u32> = Cell::new(0);
}

/// Moves each matching element's `title` into `data-original-title` (so the browser's own tooltip doesn't double up)
/// and `aria-label`. Returns how many elements were activated.
///
/// # Errors
///
/// Iff `selector` is invalid.
#[instrument(skip(document))]
pub fn activate(document: &Document, selector: &str) -> Result<u32, Error> {
	let flagged = document.query_selector_all(selector)?;
	let mut activated = 0;
	for i in 0..flagged.length() {
		let element = match flagged.item(i).and_then(|node| node.dyn_into::<Element>().ok()) {
			Some(element) => element,
			None => continue,
		};
		let title = match element.get_attribute("title").filter(|title| !title.is_empty()) {
			Some(title) => title,
			None => continue,
		};
		element.set_attribute(TEXT_ATTRIBUTE, &title)?;
		element.set_attribute("aria-label", &title)?;
		element.remove_attribute("title")?;
		activated += 1;
	}
	debug!(activated, "Activated tooltips.");
	Ok(activated)
}

/// Shows the tooltip of an activated element below it. Does nothing if it's already shown.
///
/// # Errors
///
/// Iff the tooltip element can't be created or inserted.
pub fn show(document: &Document, anchor: &Element) -> Result<(), Error> {
	if anchor.has_attribute(LINK_ATTRIBUTE) {
		return Ok(());
	}
	let text = match anchor.get_attribute(TEXT_ATTRIBUTE) {
		Some(text) => text,
		None => return Ok(()),
	};
	let body = match document.body() {
		Some(body) => body,
		None => return Ok(()),
	};

	let id = NEXT_TOOLTIP.with(|next| {
		let id = next.get();
		next.set(id.wrapping_add(1));
		format!("tooltip-{}", id)
	});
	let rect = anchor.get_bounding_client_rect();
	let (scroll_x, scroll_y) = web_sys::window().map_or((0.0, 0.0), |window| (window.page_x_offset().unwrap_or(0.0), window.page_y_offset().unwrap_or(0.0)));

	let tooltip = document.create_element("div")?;
	tooltip.set_id(&id);
	tooltip.set_class_name("tooltip bs-tooltip-bottom show");
	tooltip.set_attribute("role", "tooltip")?;
	tooltip.set_attribute("style", &format!("position: absolute; left: {}px; top: {}px;", rect.left() + scroll_x, rect.bottom() + scroll_y))?;
	let inner = document.create_element("div")?;
	inner.set_class_name("tooltip-inner");
	inner.set_text_content(Some(&text));
	tooltip.append_child(&inner)?;
	body.append_child(&tooltip)?;

	anchor.set_attribute(LINK_ATTRIBUTE, &id)?;
	Ok(())
}

/// Removes the tooltip shown for `anchor`, if any.
///
/// # Errors
///
/// Iff the link attribute can't be removed.
pub fn hide(document: &Document, anchor: &Element) -> Result<(), Error> {
	if let Some(id) = anchor.get_attribute(LINK_ATTRIBUTE) {
		if let Some(tooltip) = document.get_element_by_id(&id) {
			tooltip.remove();
		}
		anchor.remove_attribute(LINK_ATTRIBUTE)?;
	}
	Ok(())
}
