use crate::{
	api::{Api, Transport},
	config::Config,
	error::{describe, ApiError, Error},
	model::CommentSubmission,
	page::Page,
	state::{self, FollowState, LikeState, ModalState},
	tooltip,
};
use core::cell::RefCell;
use std::rc::Rc;
use tracing::{error, info, instrument, trace_span, warn};
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, EventTarget};

/// A gesture the controller responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
	DeleteMessage,
	LikeMessage,
	FollowUser,
	OpenComments,
	SubmitComment,
}
impl Action {
	const ALL: [Action; 5] = [Action::DeleteMessage, Action::LikeMessage, Action::FollowUser, Action::OpenComments, Action::SubmitComment];

	fn selector(self, config: &Config) -> &str {
		match self {
			Action::DeleteMessage => &config.delete_selector,
			Action::LikeMessage => &config.like_selector,
			Action::FollowUser => &config.follow_selector,
			Action::OpenComments => &config.comment_open_selector,
			Action::SubmitComment => &config.comment_submit_selector,
		}
	}

	/// Page notice for a failed round trip.
	#[must_use]
	pub fn failure_notice(self) -> &'static str {
		match self {
			Action::DeleteMessage => "Could not delete message.",
			Action::LikeMessage => "Could not update like.",
			Action::FollowUser => "Could not update follow.",
			Action::OpenComments => "Could not load comments.",
			Action::SubmitComment => "Could not post comment.",
		}
	}
}

/// Turns clicks into backend calls and applies the confirmed responses to the page.
///
/// Cloning is cheap and yields a handle to the same controller.
#[derive(Debug, Clone)]
pub struct ViewController {
	inner: Rc<Inner>,
}

#[derive(Debug)]
struct Inner {
	config: Rc<Config>,
	page: Page,
	api: Api,
	modal: RefCell<ModalState>,
}

impl ViewController {
	#[must_use]
	pub fn new(document: Document, config: Config, transport: Rc<dyn Transport>) -> Self {
		let config = Rc::new(config);
		Self {
			inner: Rc::new(Inner {
				page: Page::new(document, Rc::clone(&config)),
				api: Api::new(transport, config.endpoints.clone()),
				modal: RefCell::default(),
				config,
			}),
		}
	}

	/// A snapshot of the comment modal's content.
	#[must_use]
	pub fn modal(&self) -> ModalState {
		self.inner.modal.borrow().clone()
	}

	/// Activates tooltips and registers delegated listeners on the document.
	///
	/// The listeners stay registered until the returned [`Bindings`] are dropped.
	///
	/// # Errors
	///
	/// Iff tooltips can't be activated or a listener can't be registered.
	#[instrument(skip(self))]
	pub fn bind(&self) -> Result<Bindings, Error> {
		let document = self.inner.page.document().clone();
		tooltip::activate(&document, &self.inner.config.tooltip_selector)?;

		let mut bindings = Bindings {
			target: document.into(),
			listeners: Vec::with_capacity(3),
		};

		let inner = Rc::clone(&self.inner);
		bindings.listen(
			"click",
			Closure::wrap(Box::new(move |event: web_sys::Event| {
				let target = match event.target().and_then(|target| target.dyn_into::<Element>().ok()) {
					Some(target) => target,
					None => return,
				};
				for &action in &Action::ALL {
					let selector = action.selector(&inner.config);
					match target.closest(selector) {
						Ok(Some(control)) => {
							event.prevent_default();
							if let Err(error) = Inner::dispatch(&inner, action, &control) {
								error!(?action, "Could not start action: {}", error);
							}
							return;
						}
						Ok(None) => (),
						Err(error) => error!(selector, "Invalid selector: {}", describe(&error)),
					}
				}
			}) as Box<dyn Fn(web_sys::Event)>),
		)?;

		for &(event_name, showing) in &[("mouseover", true), ("mouseout", false)] {
			let inner = Rc::clone(&self.inner);
			bindings.listen(
				event_name,
				Closure::wrap(Box::new(move |event: web_sys::Event| {
					let selector = &inner.config.tooltip_selector;
					let anchor = match event.target().and_then(|target| target.dyn_into::<Element>().ok()).and_then(|target| target.closest(selector).ok().flatten()) {
						Some(anchor) => anchor,
						None => return,
					};
					let document = inner.page.document();
					let result = if showing {
						tooltip::show(document, &anchor)
					} else if leaves_anchor(&event, &anchor) {
						tooltip::hide(document, &anchor)
					} else {
						Ok(())
					};
					if let Err(error) = result {
						warn!("Tooltip update failed: {}", error);
					}
				}) as Box<dyn Fn(web_sys::Event)>),
			)?;
		}

		info!("View controller bound.");
		Ok(bindings)
	}
}

/// `mouseout` also fires when moving onto a child of the anchor.
fn leaves_anchor(event: &web_sys::Event, anchor: &Element) -> bool {
	match event.dyn_ref::<web_sys::MouseEvent>().and_then(web_sys::MouseEvent::related_target) {
		Some(related) => !anchor.contains(related.dyn_ref::<web_sys::Node>()),
		None => true,
	}
}

impl Inner {
	fn dispatch(this: &Rc<Self>, action: Action, control: &Element) -> Result<(), Error> {
		match action {
			Action::DeleteMessage => Self::delete_message(this, control),
			Action::LikeMessage => Self::like_message(this, control),
			Action::FollowUser => Self::follow_user(this, control),
			Action::OpenComments => Self::open_comments(this, control),
			Action::SubmitComment => Self::submit_comment(this),
		}
	}

	fn delete_message(this: &Rc<Self>, control: &Element) -> Result<(), Error> {
		let id = this.page.message_id_of(control)?;
		let this = Rc::clone(this);
		spawn_local(async move {
			let outcome = this.api.delete_message(&id).await;
			this.settle(Action::DeleteMessage, outcome, |this, deleted| this.page.remove_message(&deleted));
		});
		Ok(())
	}

	fn like_message(this: &Rc<Self>, control: &Element) -> Result<(), Error> {
		let id = this.page.message_id_of(control)?;
		let this = Rc::clone(this);
		spawn_local(async move {
			let outcome = this.api.like(&id).await;
			this.settle(Action::LikeMessage, outcome, |this, response| {
				let state = LikeState::confirm(this.page.is_liked(&response.msg_id)?, &response);
				this.page.render_like(&response.msg_id, state)
			});
		});
		Ok(())
	}

	fn follow_user(this: &Rc<Self>, control: &Element) -> Result<(), Error> {
		let user = this.page.user_id_of(control)?;
		let this = Rc::clone(this);
		spawn_local(async move {
			let outcome = this.api.follow(&user).await;
			this.settle(Action::FollowUser, outcome, |this, response| this.page.render_follow(&response.followee_id, FollowState::confirm(&response)));
		});
		Ok(())
	}

	fn open_comments(this: &Rc<Self>, control: &Element) -> Result<(), Error> {
		let id = this.page.message_id_of(control)?;
		let this = Rc::clone(this);
		spawn_local(async move {
			let outcome = this.api.message_detail(&id).await;
			this.settle(Action::OpenComments, outcome, |this, detail| {
				this.modal.borrow_mut().populate(detail);
				this.page.render_modal(&this.modal.borrow())?;
				this.page.show_modal()
			});
		});
		Ok(())
	}

	fn submit_comment(this: &Rc<Self>) -> Result<(), Error> {
		let text = this.page.comment_text()?;
		let bound = this.modal.borrow().bound.clone();
		let msg_id = bound
			.or_else(|| this.page.bound_field_value())
			.ok_or_else(|| Error::MissingElement(this.config.modal.bound_field_selector.clone()))?;
		let submission = CommentSubmission::new(&text, msg_id);

		let this = Rc::clone(this);
		spawn_local(async move {
			match this.api.post_comment(&submission).await {
				Ok(receipt) => {
					let span = trace_span!("Applying comment receipt", msg_id = %receipt.msg_id);
					let _enter = span.enter();
					let applied = this
						.page
						.hide_modal()
						.and_then(|()| this.page.reset_comment_form())
						.and_then(|()| this.page.comment_count(&receipt.msg_id))
						.and_then(|count| this.page.render_comment_count(&receipt.msg_id, count.accepted()));
					if let Err(error) = applied {
						error!("Could not apply posted comment: {}", error);
					}
				}
				Err(error) => {
					warn!(msg_id = %submission.msg_id, "Comment was rejected: {}", error);
					if let Err(error) = this.page.show_comment_error(state::submission_failure(&submission)) {
						error!("Could not show comment error: {}", error);
					}
				}
			}
		});
		Ok(())
	}

	/// Applies a confirmed response, or tells the user the action failed.
	fn settle<T>(&self, action: Action, outcome: Result<T, ApiError>, apply: impl FnOnce(&Self, T) -> Result<(), Error>) {
		match outcome {
			Ok(value) => {
				let span = trace_span!("Applying response", ?action);
				let _enter = span.enter();
				if let Err(error) = apply(self, value) {
					error!(?action, "Could not apply response: {}", error);
				}
			}
			Err(error) => {
				warn!(?action, "Request failed: {}", error);
				if let Err(notice_error) = self.page.show_page_notice(action.failure_notice()) {
					error!(?action, "Could not report failure: {}", notice_error);
				}
			}
		}
	}
}

/// Registered listeners. Dropping this removes them again.
#[derive(Debug)]
#[must_use = "Listeners are removed when `Bindings` is dropped."]
pub struct Bindings {
	target: EventTarget,
	listeners: Vec<(&'static str, Closure<dyn Fn(web_sys::Event)>)>,
}
impl Bindings {
	fn listen(&mut self, event_name: &'static str, handler: Closure<dyn Fn(web_sys::Event)>) -> Result<(), Error> {
		self.target.add_event_listener_with_callback(event_name, handler.as_ref().unchecked_ref())?;
		self.listeners.push((event_name, handler));
		Ok(())
	}

	/// Keeps the listeners registered for the rest of the page's lifetime.
	pub fn forget(self) {
		core::mem::forget(self)
	}
}
impl Drop for Bindings {
	fn drop(&mut self) {
		for (event_name, handler) in self.listeners.drain(..) {
			if let Err(error) = self.target.remove_event_listener_with_callback(event_name, handler.as_ref().unchecked_ref()) {
				error!(event_name, "Failed to remove listener: {}", describe(&error));
			}
		}
	}
}
