#![doc(html_root_url = "https://docs.rs/warbler-dom/0.1.0")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Browser-side view controller for Warbler pages.
//!
//! Call [`start`] once from JavaScript. After the DOM is ready it binds delete, like, follow and comment controls,
//! sends the matching backend requests and renders the confirmed responses.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod notice;
pub mod page;
pub mod state;
pub mod tooltip;

pub use crate::{
	api::{FetchTransport, Transport},
	config::Config,
	controller::{Bindings, ViewController},
	error::{ApiError, Error},
};

use std::rc::Rc;
use tracing::{error, instrument};
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};

/// Binds the page once its DOM is ready. The bindings last for the lifetime of the page.
///
/// # Errors
///
/// Iff there is no document or binding an already loaded document fails.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
	#[cfg(feature = "console-log")]
	if tracing_wasm::try_set_as_global_default().is_err() {
		tracing::debug!("Keeping the existing global subscriber.");
	}

	let document = web_sys::window().ok_or(Error::NoWindow)?.document().ok_or(Error::NoDocument)?;
	if document.ready_state() == "loading" {
		let ready = Closure::once_into_js(move || {
			if let Err(error) = install() {
				error!("Could not bind page: {}", error);
			}
		});
		document.add_event_listener_with_callback("DOMContentLoaded", ready.unchecked_ref())?;
		Ok(())
	} else {
		install().map_err(Into::into)
	}
}

#[instrument]
fn install() -> Result<(), Error> {
	let document = web_sys::window().ok_or(Error::NoWindow)?.document().ok_or(Error::NoDocument)?;
	let config = Config::from_document(&document)?;
	ViewController::new(document, config, Rc::new(FetchTransport)).bind()?.forget();
	Ok(())
}
