use palaver_error::{ApiError, ErrorCategory, Result};
use palaver_model::post::{can_view, Post, PostStatus};
use palaver_model::store::{PostCard, PostFilter, PostOrder, SortKey};
use palaver_model::{PostId, Viewer};

use crate::App;

#[derive(Debug)]
pub struct GetPost {
    pub id: PostId,
}

impl GetPost {
    #[tracing::instrument(skip_all, name = "services.posts.get")]
    pub async fn perform(self, app: &App, viewer: &Viewer) -> Result<Post> {
        let post = app
            .posts
            .find(self.id)
            .await?
            .ok_or_else(|| ApiError::new(ErrorCategory::NotFound))?;

        if !can_view(viewer, &post) {
            return Err(ApiError::new(ErrorCategory::AccessDenied));
        }

        Ok(post)
    }
}

/// The home listing: published posts, newest first.
#[derive(Debug)]
pub struct ListPublished;

impl ListPublished {
    #[tracing::instrument(skip_all, name = "services.posts.list_published")]
    pub async fn perform(self, app: &App) -> Result<Vec<Post>> {
        app.posts.list_published().await
    }
}

const MIN_LIMIT: u64 = 10;

/// Paged post search. All parameters arrive as raw query strings and are
/// validated here; anything unrecognized is an `invalid_request`.
#[derive(Debug, Default)]
pub struct SearchPosts {
    pub status: Option<String>,
    pub q: Option<String>,
    pub field: Option<String>,
    pub sort: Option<String>,
    pub ascending: bool,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug)]
pub struct SearchPostsResponse {
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
    pub items: Vec<PostCard>,
}

impl SearchPosts {
    #[tracing::instrument(skip_all, name = "services.posts.search")]
    pub async fn perform(self, app: &App, viewer: &Viewer) -> Result<SearchPostsResponse> {
        let offset = non_negative(self.offset, "offset")?.unwrap_or(0);
        let limit = non_negative(self.limit, "limit")?
            .unwrap_or(MIN_LIMIT)
            .max(MIN_LIMIT);

        // Only admins search beyond the published surface.
        let status = match self.status.as_deref().filter(|_| viewer.is_admin()) {
            None => PostStatus::Published,
            Some(raw) => raw.parse::<PostStatus>().map_err(|_| {
                ApiError::new(ErrorCategory::InvalidRequest)
                    .message(format!("Unknown status {raw:?}"))
            })?,
        };

        let title_contains = match (self.field.as_deref(), self.q) {
            (_, None) => None,
            (None | Some("title"), Some(q)) => Some(q),
            (Some(other), Some(_)) => {
                return Err(ApiError::new(ErrorCategory::InvalidRequest)
                    .message(format!("Unknown search field {other:?}")));
            }
        };

        let key = match self.sort.as_deref() {
            None | Some("createdAt") => SortKey::CreatedAt,
            Some("replyCount") => SortKey::ReplyCount,
            Some(other) => {
                return Err(ApiError::new(ErrorCategory::InvalidRequest)
                    .message(format!("Unknown sort key {other:?}")));
            }
        };

        let filter = PostFilter {
            status,
            title_contains,
        };
        let order = PostOrder {
            key,
            ascending: self.ascending,
        };

        let total = app.posts.count(&filter).await?;

        // An offset past the end lands on the last full page instead of an
        // empty one.
        let offset = if total > 0 && offset >= total {
            (total / limit) * limit
        } else {
            offset
        };

        let items = app.posts.search(&filter, &order, limit, offset).await?;

        Ok(SearchPostsResponse {
            total,
            offset,
            limit,
            items,
        })
    }
}

fn non_negative(value: Option<i64>, name: &'static str) -> Result<Option<u64>> {
    match value {
        None => Ok(None),
        Some(value) => u64::try_from(value).map(Some).map_err(|_| {
            ApiError::new(ErrorCategory::InvalidRequest)
                .message(format!("{name} must be non-negative"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{self, TestResultExt};

    use assert_json_diff::assert_json_include;
    use palaver_model::post::PostStatus;
    use serde_json::json;

    #[tokio::test]
    async fn hidden_posts_are_denied_to_strangers() {
        let (app, _) = test_utils::build_test_app();
        let owner = test_utils::member();
        let stranger = test_utils::member();
        let post = test_utils::seed_post(&app, &owner, PostStatus::Hidden).await;

        let found = super::GetPost { id: post.id }.perform(&app, &owner).await;
        assert!(found.is_ok());

        let error = super::GetPost { id: post.id }
            .perform(&app, &stranger)
            .await
            .expect_error_json();
        assert_json_include!(actual: error, expected: json!({ "code": "access_denied" }));
    }

    #[tokio::test]
    async fn unknown_posts_are_not_found() {
        let (app, _) = test_utils::build_test_app();
        let viewer = test_utils::member();

        let error = super::GetPost {
            id: palaver_model::PostId::new(),
        }
        .perform(&app, &viewer)
        .await
        .expect_error_json();

        assert_json_include!(actual: error, expected: json!({ "code": "not_found" }));
    }

    #[tokio::test]
    async fn non_admins_only_search_the_published_surface() {
        let (app, _) = test_utils::build_test_app();
        let owner = test_utils::member();
        let admin = test_utils::admin();
        test_utils::seed_post(&app, &owner, PostStatus::Published).await;
        let hidden = test_utils::seed_post(&app, &owner, PostStatus::Hidden).await;

        // The status parameter is ignored for members.
        let page = super::SearchPosts {
            status: Some("Hidden".to_string()),
            ..Default::default()
        }
        .perform(&app, &owner)
        .await
        .unwrap();
        assert_eq!(page.total, 1);
        assert!(page.items.iter().all(|item| item.id != hidden.id));

        let page = super::SearchPosts {
            status: Some("Hidden".to_string()),
            ..Default::default()
        }
        .perform(&app, &admin)
        .await
        .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, hidden.id);
    }

    #[tokio::test]
    async fn out_of_range_offsets_clamp_to_the_last_page() {
        let (app, _) = test_utils::build_test_app();
        let owner = test_utils::member();
        for _ in 0..12 {
            test_utils::seed_post(&app, &owner, PostStatus::Published).await;
        }

        let page = super::SearchPosts {
            offset: Some(100),
            ..Default::default()
        }
        .perform(&app, &owner)
        .await
        .unwrap();

        assert_eq!(page.total, 12);
        assert_eq!(page.offset, 10);
        assert_eq!(page.items.len(), 2);
    }

    #[tokio::test]
    async fn the_limit_has_a_floor() {
        let (app, _) = test_utils::build_test_app();
        let owner = test_utils::member();
        for _ in 0..12 {
            test_utils::seed_post(&app, &owner, PostStatus::Published).await;
        }

        let page = super::SearchPosts {
            limit: Some(3),
            ..Default::default()
        }
        .perform(&app, &owner)
        .await
        .unwrap();

        assert_eq!(page.limit, 10);
        assert_eq!(page.items.len(), 10);
    }

    #[tokio::test]
    async fn bad_parameters_are_rejected() {
        let (app, _) = test_utils::build_test_app();
        let viewer = test_utils::member();

        let error = super::SearchPosts {
            offset: Some(-1),
            ..Default::default()
        }
        .perform(&app, &viewer)
        .await
        .expect_error_json();
        assert_json_include!(actual: error, expected: json!({ "code": "invalid_request" }));

        let error = super::SearchPosts {
            sort: Some("karma".to_string()),
            ..Default::default()
        }
        .perform(&app, &viewer)
        .await
        .expect_error_json();
        assert_json_include!(actual: error, expected: json!({ "code": "invalid_request" }));

        let error = super::SearchPosts {
            q: Some("hello".to_string()),
            field: Some("body".to_string()),
            ..Default::default()
        }
        .perform(&app, &viewer)
        .await
        .expect_error_json();
        assert_json_include!(actual: error, expected: json!({ "code": "invalid_request" }));
    }

    #[tokio::test]
    async fn the_title_filter_narrows_results() {
        let (app, _) = test_utils::build_test_app();
        let owner = test_utils::member();
        test_utils::seed_post(&app, &owner, PostStatus::Published).await;

        let page = super::SearchPosts {
            q: Some("Seeded".to_string()),
            field: Some("title".to_string()),
            ..Default::default()
        }
        .perform(&app, &owner)
        .await
        .unwrap();
        assert_eq!(page.total, 1);

        let page = super::SearchPosts {
            q: Some("nonexistent".to_string()),
            ..Default::default()
        }
        .perform(&app, &owner)
        .await
        .unwrap();
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }
}
