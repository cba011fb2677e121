use chrono::Utc;
use palaver_error::{ApiError, ErrorCategory, Result};
use palaver_events::{EventContext, PostEventKind, PostPatch};
use palaver_model::post::{ChangedFields, Post, PostChanges};
use palaver_model::{PostId, Viewer};

use crate::App;

/// Partial edit of a post's fields, plus an optional archive toggle folded
/// into the same request. Field edits and the archive flag are evented
/// separately.
#[derive(Debug)]
pub struct UpdatePost {
    pub id: PostId,
    pub title: Option<String>,
    pub content: Option<String>,
    pub images: Option<Vec<String>>,
    pub attachments: Option<Vec<String>>,
    pub is_archived: Option<bool>,
}

impl UpdatePost {
    #[tracing::instrument(skip_all, name = "services.posts.update")]
    pub async fn perform(self, app: &App, viewer: &Viewer, ctx: &EventContext) -> Result<Post> {
        let mut post = load_owned(app, viewer, self.id).await?;
        let previous = post.clone();
        let now = Utc::now();

        let flags = post.apply_changes(
            PostChanges {
                title: self.title,
                content: self.content,
                images: self.images,
                attachments: self.attachments,
            },
            now,
        );

        let archive_change = self.is_archived.filter(|&next| next != post.is_archived);
        if let Some(archived) = archive_change {
            post.set_archived(archived, now);
        }

        if flags.any() || archive_change.is_some() {
            app.posts.save(&post).await?;
        }

        if flags.any() {
            let _ = app
                .events
                .emit(
                    ctx,
                    PostEventKind::Updated,
                    post.id,
                    Some(diff_patch(&previous, flags)),
                    Some(diff_patch(&post, flags)),
                )
                .await;
        }
        if let Some(archived) = archive_change {
            let _ = app
                .events
                .emit(
                    ctx,
                    archive_event(archived),
                    post.id,
                    Some(PostPatch::archived(previous.is_archived)),
                    Some(PostPatch::archived(archived)),
                )
                .await;
        }

        Ok(post)
    }
}

/// Sets the archive flag directly. Asking for the state the post is
/// already in is a successful no-op and emits nothing.
#[derive(Debug)]
pub struct SetArchived {
    pub id: PostId,
    pub archived: bool,
}

impl SetArchived {
    #[tracing::instrument(skip_all, name = "services.posts.set_archived")]
    pub async fn perform(self, app: &App, viewer: &Viewer, ctx: &EventContext) -> Result<Post> {
        let mut post = load_owned(app, viewer, self.id).await?;

        if post.is_archived == self.archived {
            return Ok(post);
        }

        let previous = post.is_archived;
        post.set_archived(self.archived, Utc::now());
        app.posts.save(&post).await?;

        let _ = app
            .events
            .emit(
                ctx,
                archive_event(self.archived),
                post.id,
                Some(PostPatch::archived(previous)),
                Some(PostPatch::archived(self.archived)),
            )
            .await;

        Ok(post)
    }
}

async fn load_owned(app: &App, viewer: &Viewer, id: PostId) -> Result<Post> {
    let post = app
        .posts
        .find(id)
        .await?
        .ok_or_else(|| ApiError::new(ErrorCategory::NotFound))?;

    if !post.is_owned_by(viewer.id) {
        return Err(ApiError::new(ErrorCategory::AccessDenied));
    }
    if post.is_moderation_frozen() {
        return Err(ApiError::new(ErrorCategory::InvalidState)
            .message(format!("Post is {} and cannot be modified", post.status)));
    }

    Ok(post)
}

fn archive_event(archived: bool) -> PostEventKind {
    if archived {
        PostEventKind::Archived
    } else {
        PostEventKind::Unarchived
    }
}

/// Projects only the fields flagged as changed, from either side of the
/// edit, so both envelope halves carry the same key set.
fn diff_patch(post: &Post, flags: ChangedFields) -> PostPatch {
    PostPatch {
        title: flags.title.then(|| post.title.clone()),
        content: flags.content.then(|| post.content.clone()),
        images: flags.images.then(|| post.images.clone()),
        attachments: flags.attachments.then(|| post.attachments.clone()),
        ..Default::default()
    }
}
