use chrono::Utc;
use palaver_error::{ApiError, ErrorCategory, Result};
use palaver_model::reply::Reply;
use palaver_model::{PostId, ReplyId, Viewer};

use crate::App;

#[derive(Debug)]
pub struct UpdateReply {
    pub post_id: PostId,
    pub reply_id: ReplyId,
    pub content: String,
}

impl UpdateReply {
    #[tracing::instrument(skip_all, name = "services.replies.update")]
    pub async fn perform(self, app: &App, viewer: &Viewer) -> Result<Reply> {
        super::load_visible_post(app, viewer, self.post_id).await?;

        // A reply addressed through the wrong post is out of scope, not
        // merely forbidden.
        let mut reply = app
            .replies
            .find(self.reply_id)
            .await?
            .filter(|reply| reply.post_id == self.post_id)
            .ok_or_else(|| ApiError::new(ErrorCategory::NotFound))?;

        if !reply.is_active {
            return Err(ApiError::new(ErrorCategory::InvalidState)
                .message("Reply has been deleted"));
        }
        if !reply.is_authored_by(viewer.id) {
            return Err(ApiError::new(ErrorCategory::AccessDenied));
        }

        let content = super::create::validated_content(&self.content)?;
        reply.set_content(content, Utc::now());
        app.replies.save(&reply).await?;

        Ok(reply)
    }
}
