use chrono::Utc;
use palaver_error::{ApiError, ErrorCategory, Result};
use palaver_events::{EventContext, PostPatch};
use palaver_model::post::{ActorClass, Post, PostAction};
use palaver_model::{PostId, Viewer};

use crate::App;

/// Requests one of the seven lifecycle actions against a post.
///
/// Actor class is checked before the status precondition, so a caller who
/// may never perform the action sees `access_denied` even when the post is
/// also in the wrong status.
#[derive(Debug)]
pub struct TransitionPost {
    pub id: PostId,
    pub action: PostAction,
}

impl TransitionPost {
    #[tracing::instrument(skip_all, fields(action = ?self.action), name = "services.posts.transition")]
    pub async fn perform(self, app: &App, viewer: &Viewer, ctx: &EventContext) -> Result<Post> {
        let mut post = app
            .posts
            .find(self.id)
            .await?
            .ok_or_else(|| ApiError::new(ErrorCategory::NotFound))?;

        let allowed = match self.action.required_actor() {
            ActorClass::Owner => post.is_owned_by(viewer.id),
            ActorClass::Admin => viewer.is_admin(),
        };
        if !allowed {
            return Err(ApiError::new(ErrorCategory::AccessDenied));
        }

        let from = post.status;
        let Some(to) = self.action.next_status(from) else {
            return Err(ApiError::new(ErrorCategory::InvalidTransition).message(format!(
                "Cannot {:?} a {} post",
                self.action, from
            )));
        };

        post.apply_status(to, Utc::now());
        app.posts.save(&post).await?;

        let _ = app
            .events
            .emit(
                ctx,
                self.action.into(),
                post.id,
                Some(PostPatch::status(from)),
                Some(PostPatch::status(to)),
            )
            .await;

        Ok(post)
    }
}
