//! Page contract: selectors, classes, element identifiers, endpoints and timings.
//!
//! Every value has a default matching the stock Warbler templates. A page can override any subset of them with a JSON
//! object in `<script type="application/json" id="warbler-config">`.

use crate::error::Error;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Identifier of the optional configuration element.
pub const CONFIG_ELEMENT_ID: &str = "warbler-config";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
	pub delete_selector: String,
	pub like_selector: String,
	pub follow_selector: String,
	pub comment_open_selector: String,
	pub comment_submit_selector: String,
	pub tooltip_selector: String,

	pub message_attribute: String,
	pub user_attribute: String,

	/// `{prefix}{message id}` is the `id` of the message's list item.
	pub message_item_prefix: String,
	pub like_icon_prefix: String,
	pub like_count_prefix: String,
	pub comment_count_prefix: String,

	pub liked_classes: ClassPair,
	pub following_classes: ClassPair,

	pub modal: ModalConfig,
	/// Region for failures outside the comment modal.
	pub page_notice_selector: String,

	pub endpoints: Endpoints,
	pub notice_delay_ms: i32,
}
impl Default for Config {
	fn default() -> Self {
		Self {
			delete_selector: ".trash-btn".to_owned(),
			like_selector: ".like-btn".to_owned(),
			follow_selector: ".follow-btn".to_owned(),
			comment_open_selector: ".comment-btn".to_owned(),
			comment_submit_selector: "#comment-submit".to_owned(),
			tooltip_selector: r#"[data-toggle="tooltip"]"#.to_owned(),
			message_attribute: "data-msg".to_owned(),
			user_attribute: "data-user".to_owned(),
			message_item_prefix: "msg-".to_owned(),
			like_icon_prefix: "like-icon-".to_owned(),
			like_count_prefix: "like-count-".to_owned(),
			comment_count_prefix: "comment-count-".to_owned(),
			liked_classes: ClassPair::new("fas", "far"),
			following_classes: ClassPair::new("btn-primary", "btn-outline-primary"),
			modal: ModalConfig::default(),
			page_notice_selector: "#flash-notice".to_owned(),
			endpoints: Endpoints::default(),
			notice_delay_ms: 3000,
		}
	}
}
impl Config {
	/// Reads overrides from the page, if there are any.
	///
	/// # Errors
	///
	/// Iff the configuration element exists but doesn't contain a valid configuration object.
	#[instrument(skip(document))]
	pub fn from_document(document: &web_sys::Document) -> Result<Self, Error> {
		match document.get_element_by_id(CONFIG_ELEMENT_ID).and_then(|element| element.text_content()) {
			Some(json) => {
				debug!("Loading configuration overrides from #{}.", CONFIG_ELEMENT_ID);
				Self::from_json(&json)
			}
			None => Ok(Self::default()),
		}
	}

	/// # Errors
	///
	/// Iff `json` isn't a valid configuration object.
	pub fn from_json(json: &str) -> Result<Self, Error> {
		serde_json::from_str(json).map_err(Error::Config)
	}
}

/// Two mutually exclusive classes, one of which is present depending on a flag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassPair {
	pub on: String,
	pub off: String,
}
impl ClassPair {
	#[must_use]
	pub fn new(on: &str, off: &str) -> Self {
		Self {
			on: on.to_owned(),
			off: off.to_owned(),
		}
	}

	/// Returns `(added, removed)`.
	#[must_use]
	pub fn for_state(&self, on: bool) -> (&str, &str) {
		if on {
			(&self.on, &self.off)
		} else {
			(&self.off, &self.on)
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
	pub root_selector: String,
	/// Relative to the modal root.
	pub title_selector: String,
	/// Relative to the modal root.
	pub body_selector: String,
	pub list_selector: String,
	pub bound_field_selector: String,
	pub text_input_selector: String,
	pub form_selector: String,
	pub error_selector: String,
}
impl Default for ModalConfig {
	fn default() -> Self {
		Self {
			root_selector: "#comment-modal".to_owned(),
			title_selector: ".modal-title".to_owned(),
			body_selector: ".modal-body-text".to_owned(),
			list_selector: "#comment-list".to_owned(),
			bound_field_selector: "#comment-msg-id".to_owned(),
			text_input_selector: "#comment-text".to_owned(),
			form_selector: "#comment-form".to_owned(),
			error_selector: "#comment-error".to_owned(),
		}
	}
}

/// Endpoint paths. `{id}` is replaced by the URI-encoded identifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
	pub delete_message: String,
	pub like: String,
	pub follow: String,
	pub message_detail: String,
	pub post_comment: String,
}
impl Default for Endpoints {
	fn default() -> Self {
		Self {
			delete_message: "/messages/{id}/delete".to_owned(),
			like: "/like".to_owned(),
			follow: "/users/follow/{id}".to_owned(),
			message_detail: "/messages/{id}".to_owned(),
			post_comment: "/messages/comments".to_owned(),
		}
	}
}

/// Substitutes an already encoded path segment into an endpoint template.
#[must_use]
pub fn expand(template: &str, encoded_id: &str) -> String {
	template.replace("{id}", encoded_id)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_overrides_keep_defaults() {
		let config = Config::from_json(r##"{ "delete_selector": ".remove", "modal": { "root_selector": "#m" }, "notice_delay_ms": 10 }"##).unwrap();
		assert_eq!(config.delete_selector, ".remove");
		assert_eq!(config.like_selector, ".like-btn");
		assert_eq!(config.modal.root_selector, "#m");
		assert_eq!(config.modal.list_selector, "#comment-list");
		assert_eq!(config.notice_delay_ms, 10);
	}

	#[test]
	fn malformed_overrides_are_rejected() {
		assert!(matches!(Config::from_json("{ nope"), Err(Error::Config(_))));
	}

	#[test]
	fn class_pairs() {
		let pair = ClassPair::new("fas", "far");
		assert_eq!(pair.for_state(true), ("fas", "far"));
		assert_eq!(pair.for_state(false), ("far", "fas"));
	}

	#[test]
	fn endpoint_templates() {
		let endpoints = Endpoints::default();
		assert_eq!(expand(&endpoints.delete_message, "5"), "/messages/5/delete");
		assert_eq!(expand(&endpoints.like, "5"), "/like");
	}
}
