use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use palaver_error::Result;
use palaver_model::{PostId, ReplyId};
use serde::Deserialize;
use uuid::Uuid;

use super::morphers::ReplyView;
use crate::extract::SessionViewer;
use crate::services::replies::{CreateReply, DeleteReply, ListReplies, UpdateReply};
use crate::App;

pub async fn list(
    app: App,
    viewer: SessionViewer,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ReplyView>>> {
    let thread = ListReplies {
        post_id: PostId(id),
    }
    .perform(&app, &viewer)
    .await?;

    Ok(Json(thread.into_iter().map(ReplyView::from).collect()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReplyBody {
    pub content: String,
    pub parent_reply_id: Option<Uuid>,
}

pub async fn create(
    app: App,
    viewer: SessionViewer,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateReplyBody>,
) -> Result<Response> {
    let reply = CreateReply {
        post_id: PostId(id),
        parent_reply_id: body.parent_reply_id.map(ReplyId),
        content: body.content,
    }
    .perform(&app, &viewer)
    .await?;

    Ok((StatusCode::CREATED, Json(ReplyView::from(reply))).into_response())
}

#[derive(Debug, Deserialize)]
pub struct UpdateReplyBody {
    pub content: String,
}

pub async fn update(
    app: App,
    viewer: SessionViewer,
    Path((id, reply_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateReplyBody>,
) -> Result<Json<ReplyView>> {
    let reply = UpdateReply {
        post_id: PostId(id),
        reply_id: ReplyId(reply_id),
        content: body.content,
    }
    .perform(&app, &viewer)
    .await?;

    Ok(Json(reply.into()))
}

pub async fn remove(
    app: App,
    viewer: SessionViewer,
    Path((id, reply_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode> {
    DeleteReply {
        post_id: PostId(id),
        reply_id: ReplyId(reply_id),
    }
    .perform(&app, &viewer)
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
