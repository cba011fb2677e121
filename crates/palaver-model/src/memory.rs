//! In-memory store backend, used by the test suite and local development.

use async_trait::async_trait;
use dashmap::DashMap;
use palaver_error::Result;
use std::cmp::Ordering;

use crate::id::{PostId, ReplyId};
use crate::post::Post;
use crate::reply::Reply;
use crate::store::{PostCard, PostFilter, PostOrder, PostStore, ReplyStore, SortKey};

/// Keeps both aggregates in one backend so the active-reply aggregate is
/// computable without a second collaborator.
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: DashMap<PostId, Post>,
    replies: DashMap<ReplyId, Reply>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(filter: &PostFilter, post: &Post) -> bool {
        post.status == filter.status
            && filter
                .title_contains
                .as_deref()
                .map_or(true, |needle| post.title.contains(needle))
    }

    fn active_replies_of(&self, post_id: PostId) -> u64 {
        self.replies
            .iter()
            .filter(|entry| entry.post_id == post_id && entry.is_active)
            .count() as u64
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create(&self, post: Post) -> Result<Post> {
        self.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find(&self, id: PostId) -> Result<Option<Post>> {
        Ok(self.posts.get(&id).map(|entry| entry.clone()))
    }

    async fn save(&self, post: &Post) -> Result<()> {
        self.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn list_published(&self) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|entry| entry.status == crate::post::PostStatus::Published)
            .map(|entry| entry.clone())
            .collect();
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });
        Ok(posts)
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64> {
        Ok(self
            .posts
            .iter()
            .filter(|entry| Self::matches(filter, entry.value()))
            .count() as u64)
    }

    async fn search(
        &self,
        filter: &PostFilter,
        order: &PostOrder,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<PostCard>> {
        let mut cards: Vec<PostCard> = self
            .posts
            .iter()
            .filter(|entry| Self::matches(filter, entry.value()))
            .map(|entry| PostCard {
                id: entry.id,
                title: entry.title.clone(),
                created_at: entry.created_at,
                user_id: entry.owner_id,
                reply_count: self.active_replies_of(entry.id),
            })
            .collect();

        cards.sort_by(|a, b| {
            let primary = match order.key {
                SortKey::ReplyCount => a.reply_count.cmp(&b.reply_count),
                SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            let primary = if order.ascending {
                primary
            } else {
                primary.reverse()
            };
            primary
                .then_with(|| match order.key {
                    SortKey::ReplyCount => b.created_at.cmp(&a.created_at),
                    SortKey::CreatedAt => Ordering::Equal,
                })
                .then_with(|| b.id.0.cmp(&a.id.0))
        });

        Ok(cards
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_active_replies(&self, post_id: PostId) -> Result<u64> {
        Ok(self.active_replies_of(post_id))
    }
}

#[async_trait]
impl ReplyStore for MemoryStore {
    async fn create(&self, reply: Reply) -> Result<Reply> {
        self.replies.insert(reply.id, reply.clone());
        Ok(reply)
    }

    async fn find(&self, id: ReplyId) -> Result<Option<Reply>> {
        Ok(self.replies.get(&id).map(|entry| entry.clone()))
    }

    async fn save(&self, reply: &Reply) -> Result<()> {
        self.replies.insert(reply.id, reply.clone());
        Ok(())
    }

    async fn list_active_by_post(&self, post_id: PostId) -> Result<Vec<Reply>> {
        let mut replies: Vec<Reply> = self
            .replies
            .iter()
            .filter(|entry| entry.post_id == post_id && entry.is_active)
            .map(|entry| entry.clone())
            .collect();
        replies.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        Ok(replies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::UserId;
    use crate::post::{NewPost, PostStatus};
    use crate::reply::NewReply;
    use chrono::{Duration, Utc};

    fn published_post(store: &MemoryStore, title: &str, seconds: i64) -> Post {
        let mut post = Post::create(
            NewPost {
                owner_id: UserId::new(),
                title: title.to_string(),
                content: "content".to_string(),
                images: vec![],
                attachments: vec![],
            },
            Utc::now() + Duration::seconds(seconds),
        );
        post.status = PostStatus::Published;
        store.posts.insert(post.id, post.clone());
        post
    }

    fn reply_to(store: &MemoryStore, post: &Post, active: bool) {
        let mut reply = Reply::create(
            NewReply {
                post_id: post.id,
                user_id: UserId::new(),
                parent_reply_id: None,
                content: "hi".to_string(),
            },
            Utc::now(),
        );
        reply.is_active = active;
        store.replies.insert(reply.id, reply);
    }

    #[tokio::test]
    async fn search_orders_by_reply_count_with_created_at_tiebreak() {
        let store = MemoryStore::new();
        let quiet = published_post(&store, "quiet", 0);
        let busy = published_post(&store, "busy", 1);
        reply_to(&store, &busy, true);
        reply_to(&store, &busy, true);
        reply_to(&store, &busy, false);

        let filter = PostFilter {
            status: PostStatus::Published,
            title_contains: None,
        };
        let order = PostOrder {
            key: SortKey::ReplyCount,
            ascending: false,
        };
        let cards = store.search(&filter, &order, 10, 0).await.unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id, busy.id);
        assert_eq!(cards[0].reply_count, 2);
        assert_eq!(cards[1].id, quiet.id);
        assert_eq!(cards[1].reply_count, 0);
    }

    #[tokio::test]
    async fn title_filter_narrows_count_and_results() {
        let store = MemoryStore::new();
        published_post(&store, "cooking tips", 0);
        published_post(&store, "gardening", 1);

        let filter = PostFilter {
            status: PostStatus::Published,
            title_contains: Some("cook".to_string()),
        };
        assert_eq!(store.count(&filter).await.unwrap(), 1);

        let order = PostOrder {
            key: SortKey::CreatedAt,
            ascending: false,
        };
        let cards = store.search(&filter, &order, 10, 0).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "cooking tips");
    }

    #[tokio::test]
    async fn inactive_replies_never_leave_the_store() {
        let store = MemoryStore::new();
        let post = published_post(&store, "threaded", 0);
        reply_to(&store, &post, true);
        reply_to(&store, &post, false);

        let active = store.list_active_by_post(post.id).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(store.count_active_replies(post.id).await.unwrap(), 1);
    }
}
