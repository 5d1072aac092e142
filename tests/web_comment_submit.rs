#![cfg(target_arch = "wasm32")]

use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{HtmlElement, HtmlTextAreaElement};

wasm_bindgen_test_configure!(run_in_browser);

mod web_fixture_;
use web_fixture_::{click, controller, element, mount, settle, sleep, text, FakeTransport, PAGE};

fn type_comment(comment: &str) {
	element("#comment-text").dyn_into::<HtmlTextAreaElement>().unwrap().set_value(comment);
}

fn comment_text() -> String {
	element("#comment-text").dyn_into::<HtmlTextAreaElement>().unwrap().value()
}

async fn open_first_message(transport: &FakeTransport) {
	transport.reply("/messages/1", json!({ "id": 1, "username": "testuser0", "text": "first", "comments": [] }));
	click("#msg-1 .comment-btn");
	settle().await;
}

#[wasm_bindgen_test]
async fn accepted_comment_counts_once_and_closes() {
	let document = mount(PAGE);
	let transport = FakeTransport::new();
	let _bindings = controller(document, &transport).bind().unwrap();
	open_first_message(&transport).await;

	transport.reply("/messages/comments", json!({ "id": 31, "text": "hello", "msg_id": 1, "user_id": 3 }));
	type_comment("hello");
	click("#comment-submit");
	settle().await;

	assert_eq!(transport.sent_body("/messages/comments"), Some(json!({ "text": "hello", "msgId": "1" })));
	assert_eq!(text("#comment-count-1"), "5");
	assert_eq!(comment_text(), "");

	let modal = element("#comment-modal").dyn_into::<HtmlElement>().unwrap();
	assert!(!modal.class_list().contains("show"));
	assert_eq!(modal.style().get_property_value("display").unwrap(), "none");
	assert_eq!(text("#comment-error"), "");
}

#[wasm_bindgen_test]
async fn falls_back_to_the_hidden_field() {
	let document = mount(PAGE);
	element("#comment-msg-id").set_attribute("value", "2").unwrap();
	let transport = FakeTransport::new();
	transport.reply("/messages/comments", json!({ "msg_id": 2 }));
	let _bindings = controller(document, &transport).bind().unwrap();

	type_comment("late to the party");
	click("#comment-submit");
	settle().await;

	assert_eq!(transport.sent_body("/messages/comments"), Some(json!({ "text": "late to the party", "msgId": "2" })));
	assert_eq!(text("#comment-count-2"), "1");
}

#[wasm_bindgen_test]
async fn rejected_text_is_too_long_then_clears() {
	let document = mount(PAGE);
	let transport = FakeTransport::new();
	let _bindings = controller(document, &transport).bind().unwrap();
	open_first_message(&transport).await;

	transport.fail("/messages/comments", 400);
	type_comment(&"a".repeat(141));
	click("#comment-submit");
	settle().await;

	assert_eq!(text("#comment-error"), "Comments must be less than 140 characters");
	assert_eq!(text("#comment-count-1"), "4");
	assert!(element("#comment-modal").class_list().contains("show"));

	sleep(3100).await;
	assert_eq!(text("#comment-error"), "");
}

#[wasm_bindgen_test]
async fn blank_text_is_sent_as_null_and_reported_blank() {
	let document = mount(PAGE);
	let transport = FakeTransport::new();
	let _bindings = controller(document, &transport).bind().unwrap();
	open_first_message(&transport).await;

	transport.fail("/messages/comments", 500);
	type_comment("");
	click("#comment-submit");
	settle().await;

	assert_eq!(transport.sent_body("/messages/comments"), Some(json!({ "text": null, "msgId": "1" })));
	assert_eq!(text("#comment-error"), "Comments cannot be blank");

	sleep(3100).await;
	assert_eq!(text("#comment-error"), "");
}

#[wasm_bindgen_test]
async fn newer_error_outlives_older_timer() {
	let document = mount(PAGE);
	let transport = FakeTransport::new();
	let _bindings = controller(document, &transport).bind().unwrap();
	open_first_message(&transport).await;
	transport.fail("/messages/comments", 400);

	type_comment("");
	click("#comment-submit");
	settle().await;
	sleep(2000).await;

	type_comment("too long, supposedly");
	click("#comment-submit");
	settle().await;
	sleep(1500).await;

	assert_eq!(text("#comment-error"), "Comments must be less than 140 characters");
	sleep(1700).await;
	assert_eq!(text("#comment-error"), "");
}
