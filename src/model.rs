//! Identifiers and the JSON payloads exchanged with the Warbler backend.

use core::fmt::{self, Display, Formatter};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifies a message, as read from a `data-msg` attribute or echoed by the server.
///
/// The server renders identifiers as JSON numbers while the page carries them as attribute strings,
/// so deserialization accepts both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(String);

/// Identifies a user, as read from a `data-user` attribute or echoed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
	Number(i64),
	Text(String),
}
impl From<RawId> for String {
	fn from(raw: RawId) -> Self {
		match raw {
			RawId::Number(number) => number.to_string(),
			RawId::Text(text) => text,
		}
	}
}

macro_rules! id_impls {
	($($name:ident),*$(,)?) => {$(
		impl $name {
			#[must_use]
			pub fn new(id: impl Into<String>) -> Self {
				Self(id.into())
			}

			#[must_use]
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}
		impl<'de> Deserialize<'de> for $name {
			fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
				RawId::deserialize(deserializer).map(|raw| Self(raw.into()))
			}
		}
	)*};
}
id_impls!(MessageId, UserId);

#[derive(Debug, Clone, Serialize)]
pub struct LikeRequest<'a> {
	#[serde(rename = "msg-id")]
	pub msg_id: &'a MessageId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LikeResponse {
	#[serde(rename = "msgId")]
	pub msg_id: MessageId,
	pub likes: u32,
	/// Newer backends report the resulting state. Without it, the icon is swapped.
	#[serde(rename = "is-liked", default)]
	pub is_liked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FollowResponse {
	#[serde(rename = "followeeId")]
	pub followee_id: UserId,
	#[serde(rename = "isFollowing")]
	pub is_following: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageDetail {
	pub id: MessageId,
	pub username: String,
	pub text: String,
	#[serde(default)]
	pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Comment {
	pub text: String,
	pub user_id: UserId,
	pub username: String,
	pub image_url: String,
	pub timestamp: String,
}

/// Body of a comment submission. An empty text is sent as `null` so the server rejects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentSubmission {
	pub text: Option<String>,
	#[serde(rename = "msgId")]
	pub msg_id: MessageId,
}
impl CommentSubmission {
	#[must_use]
	pub fn new(text: &str, msg_id: MessageId) -> Self {
		Self {
			text: if text.is_empty() { None } else { Some(text.to_owned()) },
			msg_id,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommentReceipt {
	pub msg_id: MessageId,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn ids_accept_numbers_and_strings() {
		let numeric: MessageId = serde_json::from_value(json!(17)).unwrap();
		let text: MessageId = serde_json::from_value(json!("17")).unwrap();
		assert_eq!(numeric, text);
		assert_eq!(numeric.as_str(), "17");
	}

	#[test]
	fn like_request_uses_dashed_key() {
		let id = MessageId::new("4");
		assert_eq!(serde_json::to_value(LikeRequest { msg_id: &id }).unwrap(), json!({ "msg-id": "4" }));
	}

	#[test]
	fn like_response_from_backend() {
		let response: LikeResponse = serde_json::from_value(json!({
			"likes": 3,
			"is-liked": true,
			"msgId": 9,
			"userImg": "/static/images/default-pic.png",
		}))
		.unwrap();
		assert_eq!(
			response,
			LikeResponse {
				msg_id: MessageId::new("9"),
				likes: 3,
				is_liked: Some(true),
			}
		);

		let bare: LikeResponse = serde_json::from_value(json!({ "msgId": 9, "likes": 0 })).unwrap();
		assert_eq!(bare.is_liked, None);
	}

	#[test]
	fn empty_comment_text_is_null() {
		let blank = CommentSubmission::new("", MessageId::new("2"));
		assert_eq!(serde_json::to_value(&blank).unwrap(), json!({ "text": null, "msgId": "2" }));

		let filled = CommentSubmission::new("hi", MessageId::new("2"));
		assert_eq!(serde_json::to_value(&filled).unwrap(), json!({ "text": "hi", "msgId": "2" }));
	}

	#[test]
	fn message_detail_with_comments() {
		let detail: MessageDetail = serde_json::from_value(json!({
			"id": 1,
			"username": "testuser0",
			"text": "first!",
			"comments": [{
				"text": "nice",
				"user_id": 2,
				"username": "testuser1",
				"image_url": "/static/images/default-pic.png",
				"timestamp": "2020-05-12 14:33:21.123456",
			}],
		}))
		.unwrap();
		assert_eq!(detail.comments.len(), 1);
		assert_eq!(detail.comments[0].user_id, UserId::new("2"));
	}
}
