use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::auth::LoginClaims;
use crate::extract::SessionViewer;
use crate::App;

/// Verifies the `Authorization` header and stashes the resulting
/// [`SessionViewer`] in request extensions. Requests without the header
/// pass through untouched; handlers that require a viewer reject them
/// at extraction time.
pub async fn catch_token(State(app): State<App>, mut request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if let Some(token) = token {
        match LoginClaims::decode(&app, token) {
            Ok(claims) => {
                request
                    .extensions_mut()
                    .insert(SessionViewer(claims.viewer()));
            }
            Err(error) => return error.into_response(),
        }
    }

    next.run(request).await
}
