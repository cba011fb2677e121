use chrono::{DateTime, Utc};
use palaver_model::id::{PostId, UserId};
use palaver_model::post::{Post, PostAction, PostStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Schema version of the envelope. Bump on breaking changes only.
pub const ENVELOPE_VERSION: u32 = 1;

/// Routing tag of a post event. Renders dotted on the wire and doubles as
/// the topic routing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostEventKind {
    #[serde(rename = "post.created")]
    Created,
    #[serde(rename = "post.published")]
    Published,
    #[serde(rename = "post.updated")]
    Updated,
    #[serde(rename = "post.archived")]
    Archived,
    #[serde(rename = "post.unarchived")]
    Unarchived,
    #[serde(rename = "post.deleted")]
    Deleted,
    #[serde(rename = "post.recovered")]
    Recovered,
    #[serde(rename = "post.banned")]
    Banned,
    #[serde(rename = "post.unbanned")]
    Unbanned,
}

impl PostEventKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "post.created",
            Self::Published => "post.published",
            Self::Updated => "post.updated",
            Self::Archived => "post.archived",
            Self::Unarchived => "post.unarchived",
            Self::Deleted => "post.deleted",
            Self::Recovered => "post.recovered",
            Self::Banned => "post.banned",
            Self::Unbanned => "post.unbanned",
        }
    }
}

impl std::fmt::Display for PostEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PostAction> for PostEventKind {
    fn from(action: PostAction) -> Self {
        match action {
            PostAction::Publish => Self::Published,
            PostAction::Hide => Self::Updated,
            PostAction::Unhide => Self::Updated,
            PostAction::Ban => Self::Banned,
            PostAction::Unban => Self::Unbanned,
            PostAction::Delete => Self::Deleted,
            PostAction::Recover => Self::Recovered,
        }
    }
}

/// Partial field diff of a post. Only touched fields serialize, so the
/// envelope carries exactly what changed (or a full snapshot when one was
/// explicitly requested).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
}

impl PostPatch {
    #[must_use]
    pub fn status(status: PostStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn archived(is_archived: bool) -> Self {
        Self {
            is_archived: Some(is_archived),
            ..Default::default()
        }
    }

    /// Full snapshot of the event-relevant fields of a post.
    #[must_use]
    pub fn snapshot(post: &Post) -> Self {
        Self {
            status: Some(post.status),
            is_archived: Some(post.is_archived),
            title: Some(post.title.clone()),
            content: Some(post.content.clone()),
            images: Some(post.images.clone()),
            attachments: Some(post.attachments.clone()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Immutable record of a completed state change, published for external
/// consumption. Consumers deduplicate on `event_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEvent {
    pub event_id: Uuid,
    pub event_type: PostEventKind,
    pub occurred_at: DateTime<Utc>,
    pub user_id: UserId,
    pub post_id: PostId,
    pub before: Option<PostPatch>,
    pub after: Option<PostPatch>,
    pub correlation_id: String,
    pub trace_id: String,
    pub service: String,
    pub version: u32,
}
