//! Loads view state from the server-rendered page and renders confirmed state back into it.

use crate::{
	config::{ClassPair, Config},
	error::Error,
	model::{MessageId, UserId},
	notice::Notice,
	state::{CommentCard, CommentCount, FollowState, LikeState, ModalState, Thread, NO_COMMENTS},
};
use std::rc::Rc;
use tracing::{debug, instrument, trace, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement};

/// The live document, addressed through [`Config`].
#[derive(Debug)]
pub struct Page {
	document: Document,
	config: Rc<Config>,
	page_notice: Notice,
	comment_error: Notice,
}
impl Page {
	#[must_use]
	pub fn new(document: Document, config: Rc<Config>) -> Self {
		Self {
			page_notice: Notice::new(config.page_notice_selector.clone(), config.notice_delay_ms),
			comment_error: Notice::new(config.modal.error_selector.clone(), config.notice_delay_ms),
			document,
			config,
		}
	}

	#[must_use]
	pub fn document(&self) -> &Document {
		&self.document
	}

	fn required(&self, selector: &str) -> Result<Element, Error> {
		self.document.query_selector(selector)?.ok_or_else(|| Error::MissingElement(selector.to_owned()))
	}

	fn by_prefixed_id(&self, prefix: &str, id: &str) -> Result<Element, Error> {
		let element_id = format!("{}{}", prefix, id);
		self.document.get_element_by_id(&element_id).ok_or(Error::MissingElement(format!("#{}", element_id)))
	}

	fn modal_part(&self, selector: &str) -> Result<Element, Error> {
		let root = self.required(&self.config.modal.root_selector)?;
		root.query_selector(selector)?.ok_or_else(|| Error::MissingElement(format!("{} {}", self.config.modal.root_selector, selector)))
	}

	/// Reads the message identifier of a clicked control.
	///
	/// The attribute may sit on the control itself or on one of its descendants.
	///
	/// # Errors
	///
	/// Iff neither carries a non-empty identifier.
	pub fn message_id_of(&self, control: &Element) -> Result<MessageId, Error> {
		carried_attribute(control, &self.config.message_attribute).map(MessageId::new)
	}

	/// # Errors
	///
	/// Iff `control` carries no non-empty user identifier.
	pub fn user_id_of(&self, control: &Element) -> Result<UserId, Error> {
		carried_attribute(control, &self.config.user_attribute).map(UserId::new)
	}

	/// # Errors
	///
	/// Iff the message's list item isn't on the page.
	#[instrument(skip(self))]
	pub fn remove_message(&self, id: &MessageId) -> Result<(), Error> {
		self.by_prefixed_id(&self.config.message_item_prefix, id.as_str())?.remove();
		debug!("Removed message.");
		Ok(())
	}

	/// Whether the like icon currently shows the message as liked.
	///
	/// # Errors
	///
	/// Iff the like icon isn't on the page.
	pub fn is_liked(&self, id: &MessageId) -> Result<bool, Error> {
		let icon = self.by_prefixed_id(&self.config.like_icon_prefix, id.as_str())?;
		Ok(icon.class_list().contains(&self.config.liked_classes.on))
	}

	/// # Errors
	///
	/// Iff the like icon or count isn't on the page.
	#[instrument(skip(self))]
	pub fn render_like(&self, id: &MessageId, state: LikeState) -> Result<(), Error> {
		let icon = self.by_prefixed_id(&self.config.like_icon_prefix, id.as_str())?;
		apply_class_pair(&icon, &self.config.liked_classes, state.liked)?;
		self.by_prefixed_id(&self.config.like_count_prefix, id.as_str())?
			.set_text_content(Some(&state.count.to_string()));
		Ok(())
	}

	/// Updates every follow control for `user`.
	///
	/// The label goes onto whichever element carries the user identifier, so a nested carrier survives.
	///
	/// # Errors
	///
	/// Iff there is no such control.
	#[instrument(skip(self))]
	pub fn render_follow(&self, user: &UserId, state: FollowState) -> Result<(), Error> {
		let controls = self.document.query_selector_all(&self.config.follow_selector)?;
		let mut updated = 0_u32;
		for i in 0..controls.length() {
			let control = match controls.item(i).and_then(|node| node.dyn_into::<Element>().ok()) {
				Some(control) => control,
				None => continue,
			};
			let carrier = match identifier_carrier(&control, &self.config.user_attribute)? {
				Some(carrier) if carrier.get_attribute(&self.config.user_attribute).as_deref() == Some(user.as_str()) => carrier,
				_ => continue,
			};
			carrier.set_text_content(Some(state.label()));
			apply_class_pair(&control, &self.config.following_classes, state.following)?;
			updated += 1;
		}
		if updated == 0 {
			return Err(Error::MissingElement(format!("{}[{}={:?}]", self.config.follow_selector, self.config.user_attribute, user.as_str())));
		}
		trace!(updated, "Updated follow control(s).");
		Ok(())
	}

	/// # Errors
	///
	/// Iff the message's comment count isn't on the page.
	pub fn comment_count(&self, id: &MessageId) -> Result<CommentCount, Error> {
		let element = self.by_prefixed_id(&self.config.comment_count_prefix, id.as_str())?;
		Ok(CommentCount::parse(&element.text_content().unwrap_or_default()))
	}

	/// # Errors
	///
	/// Iff the message's comment count isn't on the page.
	#[instrument(skip(self))]
	pub fn render_comment_count(&self, id: &MessageId, count: CommentCount) -> Result<(), Error> {
		self.by_prefixed_id(&self.config.comment_count_prefix, id.as_str())?
			.set_text_content(Some(&count.0.to_string()));
		Ok(())
	}

	/// Renders the modal's content, replacing anything rendered before.
	///
	/// # Errors
	///
	/// Iff a part of the modal is missing.
	#[instrument(skip(self, state), fields(bound = ?state.bound))]
	pub fn render_modal(&self, state: &ModalState) -> Result<(), Error> {
		let modal = &self.config.modal;
		if cfg!(feature = "dangerous-logging") {
			trace!(title = %state.title, body = %state.body, "Rendering comment modal.");
		}

		self.modal_part(&modal.title_selector)?.set_text_content(Some(&state.title));
		self.modal_part(&modal.body_selector)?.set_text_content(Some(&state.body));

		let bound_field: HtmlInputElement = self
			.required(&modal.bound_field_selector)?
			.dyn_into()
			.map_err(|_| Error::MissingElement(format!("input{}", modal.bound_field_selector)))?;
		bound_field.set_value(state.bound.as_ref().map_or("", MessageId::as_str));

		let list = self.required(&modal.list_selector)?;
		while let Some(child) = list.first_child() {
			list.remove_child(&child)?;
		}
		let item_tag = match list.tag_name().as_str() {
			"UL" | "OL" => "li",
			_ => "div",
		};
		match &state.thread {
			Thread::Empty => {
				let placeholder = self.document.create_element(item_tag)?;
				placeholder.set_class_name("list-group-item comment-placeholder");
				placeholder.set_text_content(Some(NO_COMMENTS));
				list.append_child(&placeholder)?;
			}
			Thread::Cards(cards) => {
				for card in cards {
					list.append_child(&self.comment_card(item_tag, card)?.into())?;
				}
				debug!(cards = cards.len(), "Rendered comment cards.");
			}
		}
		Ok(())
	}

	fn comment_card(&self, tag: &str, card: &CommentCard) -> Result<Element, Error> {
		let document = &self.document;
		let profile = card.profile_path();

		let item = document.create_element(tag)?;
		item.set_class_name("list-group-item comment-card");

		let avatar_link = document.create_element("a")?;
		avatar_link.set_attribute("href", &profile)?;
		let avatar = document.create_element("img")?;
		avatar.set_attribute("src", &card.image_url)?;
		avatar.set_attribute("alt", "")?;
		avatar.set_class_name("timeline-image");
		avatar_link.append_child(&avatar)?;

		let content = document.create_element("div")?;
		content.set_class_name("message-area");

		let handle = document.create_element("a")?;
		handle.set_attribute("href", &profile)?;
		handle.set_text_content(Some(&card.handle()));

		let timestamp = document.create_element("span")?;
		timestamp.set_class_name("text-muted");
		timestamp.set_text_content(Some(&card.timestamp));

		let text = document.create_element("p")?;
		text.set_text_content(Some(&card.text));

		content.append_child(&handle)?;
		content.append_child(&timestamp)?;
		content.append_child(&text)?;
		item.append_child(&avatar_link)?;
		item.append_child(&content)?;
		Ok(item)
	}

	fn modal_root(&self) -> Result<HtmlElement, Error> {
		self.required(&self.config.modal.root_selector)?
			.dyn_into()
			.map_err(|_| Error::MissingElement(self.config.modal.root_selector.clone()))
	}

	/// # Errors
	///
	/// Iff the modal isn't on the page.
	pub fn show_modal(&self) -> Result<(), Error> {
		let root = self.modal_root()?;
		root.class_list().add_1("show")?;
		root.style().set_property("display", "block")?;
		root.set_attribute("aria-hidden", "false")?;
		if let Some(body) = self.document.body() {
			body.class_list().add_1("modal-open")?;
		}
		Ok(())
	}

	/// # Errors
	///
	/// Iff the modal isn't on the page.
	pub fn hide_modal(&self) -> Result<(), Error> {
		let root = self.modal_root()?;
		root.class_list().remove_1("show")?;
		root.style().set_property("display", "none")?;
		root.set_attribute("aria-hidden", "true")?;
		if let Some(body) = self.document.body() {
			body.class_list().remove_1("modal-open")?;
		}
		let backdrops = self.document.query_selector_all(".modal-backdrop")?;
		for i in 0..backdrops.length() {
			if let Some(backdrop) = backdrops.item(i).and_then(|node| node.dyn_into::<Element>().ok()) {
				backdrop.remove();
			}
		}
		Ok(())
	}

	/// # Errors
	///
	/// Iff there is no comment text input.
	pub fn comment_text(&self) -> Result<String, Error> {
		let selector = &self.config.modal.text_input_selector;
		let input = self.required(selector)?;
		if let Some(text_area) = input.dyn_ref::<HtmlTextAreaElement>() {
			Ok(text_area.value())
		} else if let Some(input) = input.dyn_ref::<HtmlInputElement>() {
			Ok(input.value())
		} else {
			Err(Error::MissingElement(format!("textarea{}", selector)))
		}
	}

	/// The identifier held by the hidden field, if it holds one.
	#[must_use]
	pub fn bound_field_value(&self) -> Option<MessageId> {
		let field = self.document.query_selector(&self.config.modal.bound_field_selector).ok()??;
		let value = field.dyn_into::<HtmlInputElement>().ok()?.value();
		if value.is_empty() {
			None
		} else {
			Some(MessageId::new(value))
		}
	}

	/// # Errors
	///
	/// Iff there is no comment form.
	pub fn reset_comment_form(&self) -> Result<(), Error> {
		let selector = &self.config.modal.form_selector;
		let form: HtmlFormElement = self.required(selector)?.dyn_into().map_err(|_| Error::MissingElement(format!("form{}", selector)))?;
		form.reset();
		Ok(())
	}

	/// # Errors
	///
	/// Iff the page has no notice region.
	pub fn show_page_notice(&self, text: &str) -> Result<(), Error> {
		self.page_notice.show(&self.document, text)
	}

	/// # Errors
	///
	/// Iff the modal has no error region.
	pub fn show_comment_error(&self, text: &str) -> Result<(), Error> {
		self.comment_error.show(&self.document, text)
	}
}

/// The element holding `control`'s non-empty `attribute`: the control itself, or else its first descendant carrying it.
fn identifier_carrier(control: &Element, attribute: &str) -> Result<Option<Element>, Error> {
	let carries = |element: &Element| element.get_attribute(attribute).map_or(false, |value| !value.is_empty());
	if carries(control) {
		return Ok(Some(control.clone()));
	}
	Ok(control.query_selector(&format!("[{}]", attribute))?.filter(carries))
}

fn carried_attribute(control: &Element, attribute: &str) -> Result<String, Error> {
	identifier_carrier(control, attribute)?
		.and_then(|carrier| carrier.get_attribute(attribute))
		.ok_or_else(|| {
			warn!(attribute, tag = %control.tag_name(), "Control carries no identifier.");
			Error::MissingAttribute {
				attribute: attribute.to_owned(),
			}
		})
}

fn apply_class_pair(element: &Element, pair: &ClassPair, on: bool) -> Result<(), Error> {
	let (added, removed) = pair.for_state(on);
	let class_list = element.class_list();
	class_list.remove_1(removed)?;
	class_list.add_1(added)?;
	Ok(())
}
