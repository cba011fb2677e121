use chrono::Utc;
use palaver_error::{ApiError, ErrorCategory, Result};
use palaver_events::{EventContext, PostEventKind, PostPatch};
use palaver_model::post::{NewPost, Post};
use palaver_model::Viewer;

use crate::App;

#[derive(Debug)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    pub attachments: Vec<String>,
}

impl CreatePost {
    #[tracing::instrument(skip_all, name = "services.posts.create")]
    pub async fn perform(self, app: &App, viewer: &Viewer, ctx: &EventContext) -> Result<Post> {
        if !viewer.verified {
            return Err(ApiError::new(ErrorCategory::AccessDenied)
                .message("Email verification is required to create posts"));
        }
        if self.title.trim().is_empty() {
            return Err(ApiError::new(ErrorCategory::InvalidRequest).message("title is required"));
        }

        let post = Post::create(
            NewPost {
                owner_id: viewer.id,
                title: self.title,
                content: self.content,
                images: self.images,
                attachments: self.attachments,
            },
            Utc::now(),
        );
        let post = app.posts.create(post).await?;

        let _ = app
            .events
            .emit(
                ctx,
                PostEventKind::Created,
                post.id,
                None,
                Some(PostPatch::snapshot(&post)),
            )
            .await;

        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{self, TestResultExt};

    use assert_json_diff::assert_json_include;
    use palaver_model::post::PostStatus;
    use serde_json::json;

    fn request() -> super::CreatePost {
        super::CreatePost {
            title: "Hello world".to_string(),
            content: "First!".to_string(),
            images: vec![],
            attachments: vec![],
        }
    }

    #[tokio::test]
    async fn should_reject_unverified_authors() {
        let (app, sink) = test_utils::build_test_app();
        let viewer = test_utils::unverified_member();

        let error = request()
            .perform(&app, &viewer, &test_utils::event_ctx(&viewer))
            .await
            .expect_error_json();

        assert_json_include!(actual: error, expected: json!({ "code": "access_denied" }));
        assert!(sink.recorded().is_empty());
    }

    #[tokio::test]
    async fn should_reject_blank_titles() {
        let (app, _) = test_utils::build_test_app();
        let viewer = test_utils::member();

        let error = super::CreatePost {
            title: "   ".to_string(),
            ..request()
        }
        .perform(&app, &viewer, &test_utils::event_ctx(&viewer))
        .await
        .expect_error_json();

        assert_json_include!(actual: error, expected: json!({ "code": "invalid_request" }));
    }

    #[tokio::test]
    async fn should_create_unpublished_and_emit_a_snapshot() {
        let (app, sink) = test_utils::build_test_app();
        let viewer = test_utils::member();

        let post = request()
            .perform(&app, &viewer, &test_utils::event_ctx(&viewer))
            .await
            .unwrap();

        assert_eq!(post.status, PostStatus::Unpublished);
        assert!(!post.is_archived);

        let events = sink.take();
        assert_eq!(events.len(), 1);

        let event = serde_json::to_value(&events[0]).unwrap();
        assert_json_include!(
            actual: event,
            expected: json!({
                "eventType": "post.created",
                "postId": post.id,
                "userId": viewer.id,
                "before": null,
                "after": { "title": "Hello world", "status": "Unpublished" },
                "version": 1,
            })
        );
    }
}
