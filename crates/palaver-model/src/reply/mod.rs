use chrono::{DateTime, Utc};

use crate::id::{PostId, ReplyId, UserId};

mod thread;

pub use self::thread::{build_thread, ReplyNode};

/// A threaded comment attached to a post. Soft-deleted (`is_active =
/// false`) rather than removed; `post_id`, `user_id` and `parent_reply_id`
/// never change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub id: ReplyId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub parent_reply_id: Option<ReplyId>,
    pub content: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewReply {
    pub post_id: PostId,
    pub user_id: UserId,
    pub parent_reply_id: Option<ReplyId>,
    pub content: String,
}

impl Reply {
    #[must_use]
    pub fn create(new: NewReply, now: DateTime<Utc>) -> Self {
        Self {
            id: ReplyId::new(),
            post_id: new.post_id,
            user_id: new.user_id,
            parent_reply_id: new.parent_reply_id,
            content: new.content,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    pub fn set_content(&mut self, content: String, now: DateTime<Utc>) {
        self.content = content;
        self.updated_at = now;
    }

    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.updated_at = now;
    }
}
