mod create;
mod delete;
mod list;
mod update;

pub use self::create::CreateReply;
pub use self::delete::DeleteReply;
pub use self::list::ListReplies;
pub use self::update::UpdateReply;

use palaver_error::{ApiError, ErrorCategory, Result};
use palaver_model::post::{can_view, Post};
use palaver_model::{PostId, Viewer};

use crate::App;

/// Loads the post a reply operation addresses. A post the viewer cannot
/// see is indistinguishable from a missing one only in effect; the codes
/// stay distinct (404 vs 403) to match the post endpoints.
async fn load_visible_post(app: &App, viewer: &Viewer, post_id: PostId) -> Result<Post> {
    let post = app
        .posts
        .find(post_id)
        .await?
        .ok_or_else(|| ApiError::new(ErrorCategory::NotFound))?;

    if !can_view(viewer, &post) {
        return Err(ApiError::new(ErrorCategory::AccessDenied));
    }

    Ok(post)
}
