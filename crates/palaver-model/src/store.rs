//! Persistence contracts for the content core.
//!
//! The core is written against these traits only; storage mechanics stay
//! behind them. Errors are already funneled into [`ApiError`] so service
//! code can use `?` without caring which backend is wired in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use palaver_error::Result;

use crate::id::{PostId, ReplyId, UserId};
use crate::post::{Post, PostStatus};
use crate::reply::Reply;

/// Search predicate over posts.
#[derive(Debug, Clone)]
pub struct PostFilter {
    pub status: PostStatus,
    /// Substring match against the title.
    pub title_contains: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    ReplyCount,
    CreatedAt,
}

#[derive(Debug, Clone, Copy)]
pub struct PostOrder {
    pub key: SortKey,
    pub ascending: bool,
}

/// Listing projection of a post, with the active-reply aggregate the
/// backend computes (inline subquery in Postgres).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: PostId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
    pub reply_count: u64,
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create(&self, post: Post) -> Result<Post>;

    async fn find(&self, id: PostId) -> Result<Option<Post>>;

    /// Writes a mutated record back. Mutations are read-modify-write with
    /// no versioning discipline; two racing writers can lose an update
    /// (accepted, see DESIGN.md).
    async fn save(&self, post: &Post) -> Result<()>;

    /// Published posts, newest first.
    async fn list_published(&self) -> Result<Vec<Post>>;

    async fn count(&self, filter: &PostFilter) -> Result<u64>;

    /// Matching post cards ordered by `order.key` (secondary: creation
    /// time descending, then id descending for a stable tiebreak).
    async fn search(
        &self,
        filter: &PostFilter,
        order: &PostOrder,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<PostCard>>;

    async fn count_active_replies(&self, post_id: PostId) -> Result<u64>;
}

#[async_trait]
pub trait ReplyStore: Send + Sync {
    async fn create(&self, reply: Reply) -> Result<Reply>;

    async fn find(&self, id: ReplyId) -> Result<Option<Reply>>;

    async fn save(&self, reply: &Reply) -> Result<()>;

    /// Active replies of a post, creation time ascending. This is the
    /// batch [`build_thread`] assembles into a tree.
    ///
    /// [`build_thread`]: crate::reply::build_thread
    async fn list_active_by_post(&self, post_id: PostId) -> Result<Vec<Reply>>;
}
