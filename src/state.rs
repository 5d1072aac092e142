//! View state and its transitions.
//!
//! Nothing in here touches the DOM: [`crate::page`] loads these values from the live page and renders them back
//! after each confirmed server response.

use crate::model::{Comment, CommentSubmission, FollowResponse, LikeResponse, MessageDetail, MessageId, UserId};

/// Shown in place of comment cards for a message without comments.
pub const NO_COMMENTS: &str = "No comments yet.";

pub const COMMENT_TOO_LONG: &str = "Comments must be less than 140 characters";
pub const COMMENT_BLANK: &str = "Comments cannot be blank";

/// Like icon and count of one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
	pub liked: bool,
	pub count: u32,
}
impl LikeState {
	/// The count is the server's. The icon follows the reported state, or flips from `was_liked` if none is reported.
	#[must_use]
	pub fn confirm(was_liked: bool, response: &LikeResponse) -> Self {
		Self {
			liked: response.is_liked.unwrap_or(!was_liked),
			count: response.likes,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowState {
	pub following: bool,
}
impl FollowState {
	#[must_use]
	pub fn confirm(response: &FollowResponse) -> Self {
		Self {
			following: response.is_following,
		}
	}

	#[must_use]
	pub fn label(self) -> &'static str {
		if self.following {
			"Unfollow"
		} else {
			"Follow"
		}
	}
}

/// The displayed comment count of one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommentCount(pub u32);
impl CommentCount {
	/// Parses the displayed count. Anything that isn't a plain number counts as zero.
	#[must_use]
	pub fn parse(displayed: &str) -> Self {
		Self(displayed.trim().parse().unwrap_or(0))
	}

	/// One accepted submission adds exactly one comment.
	#[must_use]
	pub fn accepted(self) -> Self {
		Self(self.0.saturating_add(1))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentCard {
	pub text: String,
	pub user_id: UserId,
	pub username: String,
	pub image_url: String,
	pub timestamp: String,
}
impl CommentCard {
	#[must_use]
	pub fn profile_path(&self) -> String {
		format!("/users/{}", self.user_id)
	}

	#[must_use]
	pub fn handle(&self) -> String {
		format!("@{}", self.username)
	}
}
impl From<Comment> for CommentCard {
	fn from(comment: Comment) -> Self {
		let timestamp = display_timestamp(&comment.timestamp).to_owned();
		Self {
			text: comment.text,
			user_id: comment.user_id,
			username: comment.username,
			image_url: comment.image_url,
			timestamp,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Thread {
	Empty,
	Cards(Vec<CommentCard>),
}
impl Default for Thread {
	fn default() -> Self {
		Self::Empty
	}
}

/// Content of the comment modal.
///
/// `bound` is the one message identifier the modal submits comments for. Every population overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModalState {
	pub title: String,
	pub body: String,
	pub bound: Option<MessageId>,
	pub thread: Thread,
}
impl ModalState {
	/// Replaces everything shown so far with `detail`.
	pub fn populate(&mut self, detail: MessageDetail) {
		let MessageDetail { id, username, text, comments } = detail;
		self.title = username;
		self.body = text;
		self.bound = Some(id);
		self.thread = if comments.is_empty() {
			Thread::Empty
		} else {
			Thread::Cards(comments.into_iter().map(CommentCard::from).collect())
		};
	}
}

/// Picks the inline error for a rejected submission.
///
/// The server doesn't say why it rejected a comment, so this only distinguishes by whether any text was sent.
#[must_use]
pub fn submission_failure(submission: &CommentSubmission) -> &'static str {
	match submission.text {
		Some(_) => COMMENT_TOO_LONG,
		None => COMMENT_BLANK,
	}
}

/// Cuts a server timestamp (`YYYY-MM-DD HH:MM:SS.ffffff`) down to minute precision.
#[must_use]
pub fn display_timestamp(timestamp: &str) -> &str {
	match timestamp.char_indices().nth(16) {
		Some((end, _)) => &timestamp[..end],
		None => timestamp,
	}
}
