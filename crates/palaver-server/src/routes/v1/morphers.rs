//! Wire shapes of the v1 API. Field names match what earlier consumers of
//! this service already parse.

use chrono::{DateTime, Utc};
use palaver_model::id::{PostId, ReplyId, UserId};
use palaver_model::post::{Post, PostStatus};
use palaver_model::reply::{Reply, ReplyNode};
use palaver_model::store::PostCard;
use serde::Serialize;

use crate::services::posts::SearchPostsResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub id: PostId,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub is_archived: bool,
    pub images: Vec<String>,
    pub attachments: Vec<String>,
    pub post_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
    pub last_edited_at: Option<DateTime<Utc>>,
}

impl From<Post> for PostDetail {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            user_id: post.owner_id,
            title: post.title,
            content: post.content,
            status: post.status,
            is_archived: post.is_archived,
            images: post.images,
            attachments: post.attachments,
            post_date: post.created_at,
            update_date: post.updated_at,
            last_edited_at: post.last_edited_at,
        }
    }
}

/// Listing card for the home feed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeCard {
    pub id: PostId,
    pub user_id: UserId,
    pub title: String,
    pub date: DateTime<Utc>,
}

impl From<Post> for HomeCard {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            user_id: post.owner_id,
            title: post.title,
            date: post.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    pub id: PostId,
    pub user_id: UserId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub reply_count: u64,
}

impl From<PostCard> for SearchItem {
    fn from(card: PostCard) -> Self {
        Self {
            id: card.id,
            user_id: card.user_id,
            title: card.title,
            created_at: card.created_at,
            reply_count: card.reply_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub total: u64,
    pub items: Vec<SearchItem>,
}

impl From<SearchPostsResponse> for SearchPage {
    fn from(response: SearchPostsResponse) -> Self {
        Self {
            total: response.total,
            items: response.items.into_iter().map(SearchItem::from).collect(),
        }
    }
}

/// One node of the nested reply tree.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyView {
    pub id: ReplyId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub parent_reply_id: Option<ReplyId>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub replies: Vec<ReplyView>,
}

impl From<Reply> for ReplyView {
    fn from(reply: Reply) -> Self {
        Self::from(ReplyNode {
            reply,
            children: Vec::new(),
        })
    }
}

impl From<ReplyNode> for ReplyView {
    fn from(node: ReplyNode) -> Self {
        Self {
            id: node.reply.id,
            post_id: node.reply.post_id,
            user_id: node.reply.user_id,
            parent_reply_id: node.reply.parent_reply_id,
            content: node.reply.content,
            created_at: node.reply.created_at,
            updated_at: node.reply.updated_at,
            replies: node.children.into_iter().map(ReplyView::from).collect(),
        }
    }
}
