use chrono::Utc;
use palaver_error::{ApiError, ErrorCategory, Result};
use palaver_model::{PostId, ReplyId, Viewer};

use crate::App;

/// Soft-deletes a reply. Children stay active; the thread builder
/// promotes them when their parent disappears from the active set.
#[derive(Debug)]
pub struct DeleteReply {
    pub post_id: PostId,
    pub reply_id: ReplyId,
}

impl DeleteReply {
    #[tracing::instrument(skip_all, name = "services.replies.delete")]
    pub async fn perform(self, app: &App, viewer: &Viewer) -> Result<()> {
        let post = super::load_visible_post(app, viewer, self.post_id).await?;

        let mut reply = app
            .replies
            .find(self.reply_id)
            .await?
            .filter(|reply| reply.post_id == self.post_id)
            .ok_or_else(|| ApiError::new(ErrorCategory::NotFound))?;

        let allowed =
            reply.is_authored_by(viewer.id) || viewer.is_admin() || post.is_owned_by(viewer.id);
        if !allowed {
            return Err(ApiError::new(ErrorCategory::AccessDenied));
        }

        if reply.is_active {
            reply.deactivate(Utc::now());
            app.replies.save(&reply).await?;
        }

        Ok(())
    }
}
