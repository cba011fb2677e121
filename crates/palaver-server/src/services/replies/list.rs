use palaver_error::Result;
use palaver_model::reply::{build_thread, ReplyNode};
use palaver_model::{PostId, Viewer};

use crate::App;

/// The active reply tree of a post, assembled from one flat fetch.
#[derive(Debug)]
pub struct ListReplies {
    pub post_id: PostId,
}

impl ListReplies {
    #[tracing::instrument(skip_all, name = "services.replies.list")]
    pub async fn perform(self, app: &App, viewer: &Viewer) -> Result<Vec<ReplyNode>> {
        super::load_visible_post(app, viewer, self.post_id).await?;

        let replies = app.replies.list_active_by_post(self.post_id).await?;
        Ok(build_thread(replies))
    }
}
