use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use palaver_error::{ApiError, ErrorCategory};
use palaver_model::Viewer;
use std::ops::Deref;

use crate::App;

/// The authenticated caller, placed into request extensions by
/// [`crate::middleware::catch_token`]. Handlers that take this extractor
/// reject unauthenticated requests.
#[derive(Debug, Clone, Copy)]
pub struct SessionViewer(pub Viewer);

impl Deref for SessionViewer {
    type Target = Viewer;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<App> for SessionViewer {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _app: &App) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .copied()
            .ok_or_else(|| ApiError::new(ErrorCategory::Unauthorized).into_response())
    }
}
