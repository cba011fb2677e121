use chrono::Utc;
use palaver_error::{ApiError, ErrorCategory, Result};
use palaver_model::post::PostStatus;
use palaver_model::reply::{NewReply, Reply};
use palaver_model::{PostId, ReplyId, Viewer};

use crate::App;

#[derive(Debug)]
pub struct CreateReply {
    pub post_id: PostId,
    pub parent_reply_id: Option<ReplyId>,
    pub content: String,
}

impl CreateReply {
    #[tracing::instrument(skip_all, name = "services.replies.create")]
    pub async fn perform(self, app: &App, viewer: &Viewer) -> Result<Reply> {
        let post = super::load_visible_post(app, viewer, self.post_id).await?;

        // State gates hold for every role, including admins.
        if post.is_archived {
            return Err(ApiError::new(ErrorCategory::InvalidState)
                .message("Replies are disabled for archived posts"));
        }
        if post.status != PostStatus::Published {
            return Err(ApiError::new(ErrorCategory::InvalidState)
                .message("Replies are only accepted on published posts"));
        }

        let content = validated_content(&self.content)?;

        if let Some(parent_id) = self.parent_reply_id {
            let parent = app
                .replies
                .find(parent_id)
                .await?
                .filter(|parent| parent.post_id == self.post_id && parent.is_active);
            if parent.is_none() {
                return Err(ApiError::new(ErrorCategory::InvalidRequest)
                    .message("Parent reply does not exist on this post"));
            }
        }

        let reply = Reply::create(
            NewReply {
                post_id: self.post_id,
                user_id: viewer.id,
                parent_reply_id: self.parent_reply_id,
                content,
            },
            Utc::now(),
        );
        app.replies.create(reply).await
    }
}

pub(super) fn validated_content(raw: &str) -> Result<String> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(ApiError::new(ErrorCategory::InvalidRequest).message("content is required"));
    }
    Ok(content.to_string())
}
