use chrono::{DateTime, Utc};

use crate::id::{PostId, UserId};

mod status;
mod visibility;

pub use self::status::{ActorClass, ParsePostStatusError, PostAction, PostStatus};
pub use self::visibility::can_view;

/// A top-level content item with a moderation status and an independent
/// archive flag. Posts are never physically deleted; `Deleted` is a status.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub owner_id: UserId,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub is_archived: bool,
    pub images: Vec<String>,
    pub attachments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_edited_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct NewPost {
    pub owner_id: UserId,
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    pub attachments: Vec<String>,
}

/// Requested field edits. `None` means "leave as is", mirroring a partial
/// update payload.
#[derive(Debug, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub images: Option<Vec<String>>,
    pub attachments: Option<Vec<String>>,
}

/// Per-field change flags computed by value comparison against the stored
/// record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangedFields {
    pub title: bool,
    pub content: bool,
    pub images: bool,
    pub attachments: bool,
}

impl ChangedFields {
    #[must_use]
    pub fn any(&self) -> bool {
        self.title || self.content || self.images || self.attachments
    }
}

impl Post {
    #[must_use]
    pub fn create(new: NewPost, now: DateTime<Utc>) -> Self {
        Self {
            id: PostId::new(),
            owner_id: new.owner_id,
            title: new.title,
            content: new.content,
            status: PostStatus::Unpublished,
            is_archived: false,
            images: new.images,
            attachments: new.attachments,
            created_at: now,
            updated_at: now,
            last_edited_at: None,
        }
    }

    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Banned and Deleted posts freeze edits and the archive flag.
    #[must_use]
    pub fn is_moderation_frozen(&self) -> bool {
        matches!(self.status, PostStatus::Banned | PostStatus::Deleted)
    }

    pub fn apply_status(&mut self, status: PostStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    pub fn set_archived(&mut self, archived: bool, now: DateTime<Utc>) {
        self.is_archived = archived;
        self.updated_at = now;
    }

    /// Applies requested field edits, comparing each against the stored
    /// value. `last_edited_at` moves iff title or content actually changed;
    /// collection-only edits do not count as an edit of the writing.
    pub fn apply_changes(&mut self, changes: PostChanges, now: DateTime<Utc>) -> ChangedFields {
        let mut flags = ChangedFields::default();

        if let Some(title) = changes.title {
            if title != self.title {
                self.title = title;
                flags.title = true;
            }
        }
        if let Some(content) = changes.content {
            if content != self.content {
                self.content = content;
                flags.content = true;
            }
        }
        if let Some(images) = changes.images {
            if images != self.images {
                self.images = images;
                flags.images = true;
            }
        }
        if let Some(attachments) = changes.attachments {
            if attachments != self.attachments {
                self.attachments = attachments;
                flags.attachments = true;
            }
        }

        if flags.title || flags.content {
            self.last_edited_at = Some(now);
        }
        if flags.any() {
            self.updated_at = now;
        }

        flags
    }
}
