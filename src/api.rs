//! Typed access to the backend endpoints.
//!
//! Every call resolves to a [`Result`] with [`ApiError`] as the one failure type,
//! regardless of whether the request never left the browser, the server refused it or the reply didn't parse.

use crate::{
	config::{self, Endpoints},
	error::{describe, ApiError},
	model::{CommentReceipt, CommentSubmission, FollowResponse, LikeRequest, LikeResponse, MessageDetail, MessageId, UserId},
};
use core::{future::Future, pin::Pin};
use serde::{de::DeserializeOwned, Serialize};
use std::rc::Rc;
use tracing::{instrument, trace};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// Resolves to the response body of a successful (2xx) request.
pub type ResponseFuture = Pin<Box<dyn Future<Output = Result<String, ApiError>>>>;

/// Sends `POST` requests. Implemented by [`FetchTransport`] for real pages and by fakes in tests.
pub trait Transport {
	fn post(&self, path: &str, json_body: Option<String>) -> ResponseFuture;
}

/// Sends requests with the browser's `fetch`, relative to the current page.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchTransport;
impl Transport for FetchTransport {
	fn post(&self, path: &str, json_body: Option<String>) -> ResponseFuture {
		let path = path.to_owned();
		Box::pin(async move { fetch_post(&path, json_body.as_deref()).await })
	}
}

fn network(error: JsValue) -> ApiError {
	ApiError::Network(describe(&error))
}

async fn fetch_post(path: &str, json_body: Option<&str>) -> Result<String, ApiError> {
	let window = web_sys::window().ok_or_else(|| ApiError::Network("no global `window`".to_owned()))?;

	let init = RequestInit::new();
	init.set_method("POST");
	if let Some(body) = json_body {
		let headers = Headers::new().map_err(network)?;
		headers.set("Content-Type", "application/json").map_err(network)?;
		init.set_headers(&headers);
		init.set_body(&JsValue::from_str(body));
	}
	let request = Request::new_with_str_and_init(path, &init).map_err(network)?;

	let response: Response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(network)?
		.dyn_into()
		.map_err(network)?;
	if !response.ok() {
		return Err(ApiError::Status(response.status()));
	}

	let body = JsFuture::from(response.text().map_err(network)?).await.map_err(network)?;
	body.as_string().ok_or(ApiError::Body)
}

/// The five endpoints the page talks to.
#[derive(Clone)]
pub struct Api {
	transport: Rc<dyn Transport>,
	endpoints: Endpoints,
}
impl core::fmt::Debug for Api {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Api").field("endpoints", &self.endpoints).finish_non_exhaustive()
	}
}
impl Api {
	#[must_use]
	pub fn new(transport: Rc<dyn Transport>, endpoints: Endpoints) -> Self {
		Self { transport, endpoints }
	}

	async fn post<T: DeserializeOwned>(&self, path: String, body: Option<String>) -> Result<T, ApiError> {
		trace!(%path, "POST");
		let response = self.transport.post(&path, body).await?;
		serde_json::from_str(&response).map_err(ApiError::Decode)
	}

	async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: String, body: &B) -> Result<T, ApiError> {
		let body = serde_json::to_string(body).map_err(ApiError::Encode)?;
		self.post(path, Some(body)).await
	}

	/// Resolves to the identifier of the deleted message.
	///
	/// # Errors
	///
	/// See [`ApiError`].
	#[instrument(skip(self))]
	pub async fn delete_message(&self, id: &MessageId) -> Result<MessageId, ApiError> {
		self.post(config::expand(&self.endpoints.delete_message, &encode(id.as_str())), None).await
	}

	/// Toggles the current user's like.
	///
	/// # Errors
	///
	/// See [`ApiError`].
	#[instrument(skip(self))]
	pub async fn like(&self, id: &MessageId) -> Result<LikeResponse, ApiError> {
		self.post_json(self.endpoints.like.clone(), &LikeRequest { msg_id: id }).await
	}

	/// Toggles whether the current user follows `user`.
	///
	/// # Errors
	///
	/// See [`ApiError`].
	#[instrument(skip(self))]
	pub async fn follow(&self, user: &UserId) -> Result<FollowResponse, ApiError> {
		self.post(config::expand(&self.endpoints.follow, &encode(user.as_str())), None).await
	}

	/// # Errors
	///
	/// See [`ApiError`].
	#[instrument(skip(self))]
	pub async fn message_detail(&self, id: &MessageId) -> Result<MessageDetail, ApiError> {
		self.post(config::expand(&self.endpoints.message_detail, &encode(id.as_str())), None).await
	}

	/// # Errors
	///
	/// See [`ApiError`]. The server rejects blank and overlong comments with a non-2xx status.
	#[instrument(skip(self, submission), fields(msg_id = %submission.msg_id))]
	pub async fn post_comment(&self, submission: &CommentSubmission) -> Result<CommentReceipt, ApiError> {
		self.post_json(self.endpoints.post_comment.clone(), submission).await
	}
}

fn encode(segment: &str) -> String {
	js_sys::encode_uri_component(segment).into()
}
