use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use palaver_error::{ApiError, ErrorCategory, Result};
use palaver_model::post::PostAction;
use palaver_model::PostId;
use serde::Deserialize;
use uuid::Uuid;

use super::morphers::{HomeCard, PostDetail, SearchPage};
use crate::extract::{RequestContext, SessionViewer};
use crate::services::posts::{
    CreatePost, GetPost, ListPublished, SearchPosts, SetArchived, TransitionPost, UpdatePost,
};
use crate::App;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostBody {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

pub async fn create(
    app: App,
    viewer: SessionViewer,
    ctx: RequestContext,
    Json(body): Json<CreatePostBody>,
) -> Result<Response> {
    let post = CreatePost {
        title: body.title,
        content: body.content,
        images: body.images,
        attachments: body.attachments,
    }
    .perform(&app, &viewer, &ctx.event_context(&viewer))
    .await?;

    Ok((StatusCode::CREATED, Json(PostDetail::from(post))).into_response())
}

pub async fn get(
    app: App,
    viewer: SessionViewer,
    Path(id): Path<Uuid>,
) -> Result<Json<PostDetail>> {
    let post = GetPost { id: PostId(id) }.perform(&app, &viewer).await?;
    Ok(Json(post.into()))
}

pub async fn list_published(app: App, _viewer: SessionViewer) -> Result<Json<Vec<HomeCard>>> {
    let posts = ListPublished.perform(&app).await?;
    Ok(Json(posts.into_iter().map(HomeCard::from).collect()))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub status: Option<String>,
    pub q: Option<String>,
    pub field: Option<String>,
    pub sort: Option<String>,
    pub ascending: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
}

pub async fn search(
    app: App,
    viewer: SessionViewer,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchPage>> {
    let response = SearchPosts {
        status: params.status,
        q: params.q,
        field: params.field,
        sort: params.sort,
        ascending: params.ascending.as_deref() == Some("true"),
        offset: parse_page_param(params.offset, "offset")?,
        limit: parse_page_param(params.limit, "limit")?,
    }
    .perform(&app, &viewer)
    .await?;

    Ok(Json(response.into()))
}

fn parse_page_param(value: Option<String>, name: &'static str) -> Result<Option<i64>> {
    match value {
        None => Ok(None),
        Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| {
            ApiError::new(ErrorCategory::InvalidRequest)
                .message(format!("{name} must be an integer"))
        }),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostBody {
    pub title: Option<String>,
    pub content: Option<String>,
    pub images: Option<Vec<String>>,
    pub attachments: Option<Vec<String>>,
    pub is_archived: Option<bool>,
}

pub async fn update(
    app: App,
    viewer: SessionViewer,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePostBody>,
) -> Result<Json<PostDetail>> {
    let post = UpdatePost {
        id: PostId(id),
        title: body.title,
        content: body.content,
        images: body.images,
        attachments: body.attachments,
        is_archived: body.is_archived,
    }
    .perform(&app, &viewer, &ctx.event_context(&viewer))
    .await?;

    Ok(Json(post.into()))
}

#[derive(Debug, Deserialize)]
pub struct ArchiveBody {
    pub archived: bool,
}

pub async fn archive(
    app: App,
    viewer: SessionViewer,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(body): Json<ArchiveBody>,
) -> Result<Json<PostDetail>> {
    let post = SetArchived {
        id: PostId(id),
        archived: body.archived,
    }
    .perform(&app, &viewer, &ctx.event_context(&viewer))
    .await?;

    Ok(Json(post.into()))
}

async fn transition(
    app: App,
    viewer: SessionViewer,
    ctx: RequestContext,
    id: Uuid,
    action: PostAction,
) -> Result<Json<PostDetail>> {
    let post = TransitionPost {
        id: PostId(id),
        action,
    }
    .perform(&app, &viewer, &ctx.event_context(&viewer))
    .await?;

    Ok(Json(post.into()))
}

macro_rules! lifecycle_handler {
    ($name:ident, $action:expr) => {
        pub async fn $name(
            app: App,
            viewer: SessionViewer,
            ctx: RequestContext,
            Path(id): Path<Uuid>,
        ) -> Result<Json<PostDetail>> {
            transition(app, viewer, ctx, id, $action).await
        }
    };
}

lifecycle_handler!(publish, PostAction::Publish);
lifecycle_handler!(hide, PostAction::Hide);
lifecycle_handler!(unhide, PostAction::Unhide);
lifecycle_handler!(ban, PostAction::Ban);
lifecycle_handler!(unban, PostAction::Unban);
lifecycle_handler!(remove, PostAction::Delete);
lifecycle_handler!(recover, PostAction::Recover);
