use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::{ApiError, ErrorCategory};

impl ErrorCategory {
    #[must_use]
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::InvalidTransition | Self::InvalidState => StatusCode::CONFLICT,
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Some(report) = self.report() {
            error!(?report, code = self.category().code(), "request failed");
        }
        (self.category().http_status(), axum::Json(self)).into_response()
    }
}
