use thiserror::Error;
use wasm_bindgen::JsValue;

/// A failed round trip to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
	#[error("request could not be sent: {0}")]
	Network(String),
	#[error("server responded with status {0}")]
	Status(u16),
	#[error("response body was not text")]
	Body,
	#[error("malformed response: {0}")]
	Decode(#[source] serde_json::Error),
	#[error("request body could not be encoded: {0}")]
	Encode(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum Error {
	#[error("no global `window`")]
	NoWindow,
	#[error("no `document` on `window`")]
	NoDocument,
	#[error("no element matches `{0}`")]
	MissingElement(String),
	#[error("missing or empty `{attribute}` attribute")]
	MissingAttribute { attribute: String },
	#[error("JavaScript error: {0}")]
	Js(String),
	#[error("invalid configuration: {0}")]
	Config(#[source] serde_json::Error),
	#[error(transparent)]
	Api(#[from] ApiError),
}

impl From<JsValue> for Error {
	fn from(value: JsValue) -> Self {
		Self::Js(describe(&value))
	}
}

/// Best-effort text for a thrown JavaScript value.
pub(crate) fn describe(value: &JsValue) -> String {
	value
		.as_string()
		.or_else(|| js_sys::Reflect::get(value, &JsValue::from_str("message")).ok().and_then(|message| message.as_string()))
		.unwrap_or_else(|| format!("{:?}", value))
}

impl From<Error> for JsValue {
	fn from(error: Error) -> Self {
		JsValue::from_str(&error.to_string())
	}
}
