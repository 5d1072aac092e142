#![cfg(target_arch = "wasm32")]
#![allow(dead_code)]

use std::{
	cell::RefCell,
	collections::HashMap,
	rc::Rc,
	sync::Once,
};
use warbler_dom::{
	api::{ResponseFuture, Transport},
	ApiError, Config, ViewController,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, Document, Element, HtmlElement};

pub const PAGE: &str = r##"
<div id="flash-notice"></div>
<ul id="messages">
	<li id="msg-1">
		<button class="trash-btn" data-msg="1"><i class="fa fa-trash"></i></button>
		<button class="like-btn" data-msg="1"><i id="like-icon-1" class="far fa-thumbs-up"></i></button>
		<span id="like-count-1">2</span>
		<a href="#" class="comment-btn"><i id="comment-icon-1" class="far fa-comment" data-msg="1"></i></a>
		<span id="comment-count-1">4</span>
	</li>
	<li id="msg-2">
		<button class="trash-btn" data-msg="2">Delete</button>
		<button class="like-btn" data-msg="2"><i id="like-icon-2" class="fas fa-thumbs-up"></i></button>
		<span id="like-count-2">5</span>
		<a href="#" id="comment-open-2" class="comment-btn" data-msg="2">Comments</a>
		<span id="comment-count-2">0</span>
	</li>
</ul>
<button class="follow-btn btn btn-outline-primary" data-user="7">Follow</button>
<span id="hint" data-toggle="tooltip" title="Say hi"><b id="hint-inner">?</b></span>
<div id="comment-modal" class="modal" aria-hidden="true" style="display: none;">
	<h5 class="modal-title"></h5>
	<p class="modal-body-text"></p>
	<ul id="comment-list"></ul>
	<form id="comment-form">
		<input type="hidden" id="comment-msg-id">
		<textarea id="comment-text"></textarea>
		<div id="comment-error"></div>
		<button type="submit" id="comment-submit">Post</button>
	</form>
</div>
"##;

static LOG_INITIALIZED: Once = Once::new();

pub fn init_logging() {
	LOG_INITIALIZED.call_once(tracing_wasm::set_as_global_default);
}

pub fn document() -> Document {
	window().unwrap().document().unwrap()
}

/// Replaces the body with `html`.
pub fn mount(html: &str) -> Document {
	init_logging();
	let document = document();
	document.body().unwrap().set_inner_html(html);
	document
}

pub fn element(selector: &str) -> Element {
	document()
		.query_selector(selector)
		.unwrap()
		.unwrap_or_else(|| panic!("no element matches {}", selector))
}

pub fn text(selector: &str) -> String {
	element(selector).text_content().unwrap_or_default()
}

pub fn click(selector: &str) {
	element(selector).dyn_into::<HtmlElement>().unwrap().click();
}

/// Waits for `ms` milliseconds, which also lets every spawned response handler run.
pub async fn sleep(ms: i32) {
	let promise = js_sys::Promise::new(&mut |resolve, _| {
		window()
			.unwrap()
			.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
			.unwrap();
	});
	JsFuture::from(promise).await.unwrap();
}

pub async fn settle() {
	sleep(0).await
}

/// Answers requests with canned bodies (or statuses) per path and records what was sent.
#[derive(Default)]
pub struct FakeTransport {
	replies: RefCell<HashMap<String, Result<String, u16>>>,
	pub requests: RefCell<Vec<(String, Option<String>)>>,
}
impl FakeTransport {
	pub fn new() -> Rc<Self> {
		Rc::default()
	}

	pub fn reply(&self, path: &str, body: serde_json::Value) {
		self.replies.borrow_mut().insert(path.to_owned(), Ok(body.to_string()));
	}

	pub fn fail(&self, path: &str, status: u16) {
		self.replies.borrow_mut().insert(path.to_owned(), Err(status));
	}

	pub fn sent_body(&self, path: &str) -> Option<serde_json::Value> {
		self.requests
			.borrow()
			.iter()
			.rev()
			.find(|(sent_path, _)| sent_path == path)
			.and_then(|(_, body)| body.as_deref())
			.map(|body| serde_json::from_str(body).unwrap())
	}
}
impl Transport for FakeTransport {
	fn post(&self, path: &str, json_body: Option<String>) -> ResponseFuture {
		self.requests.borrow_mut().push((path.to_owned(), json_body));
		let reply = self.replies.borrow().get(path).cloned().unwrap_or(Err(404)).map_err(ApiError::Status);
		Box::pin(async move { reply })
	}
}

pub fn controller(document: Document, transport: &Rc<FakeTransport>) -> ViewController {
	ViewController::new(document, Config::default(), Rc::clone(transport) as Rc<dyn Transport>)
}
