use axum::middleware::from_fn_with_state;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::App;

mod v1;

/// Builds the full HTTP surface. Token verification runs on every route;
/// routes that need a viewer reject at extraction time.
pub fn build_axum_router(app: App) -> Router {
    Router::new()
        .nest("/api/v1", v1::routes())
        .layer(from_fn_with_state(app.clone(), crate::middleware::catch_token))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}
