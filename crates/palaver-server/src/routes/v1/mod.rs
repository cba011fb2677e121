use axum::routing::{get, post, put};
use axum::Router;

use crate::App;

mod morphers;
mod posts;
mod replies;

pub fn routes() -> Router<App> {
    Router::new()
        .route("/posts", post(posts::create).get(posts::list_published))
        .route("/posts/search", get(posts::search))
        .route(
            "/posts/{id}",
            get(posts::get).put(posts::update).delete(posts::remove),
        )
        .route("/posts/{id}/publish", post(posts::publish))
        .route("/posts/{id}/hide", post(posts::hide))
        .route("/posts/{id}/unhide", post(posts::unhide))
        .route("/posts/{id}/ban", post(posts::ban))
        .route("/posts/{id}/unban", post(posts::unban))
        .route("/posts/{id}/recover", post(posts::recover))
        .route("/posts/{id}/archive", put(posts::archive))
        .route(
            "/posts/{id}/replies",
            get(replies::list).post(replies::create),
        )
        .route(
            "/posts/{id}/replies/{reply_id}",
            put(replies::update).delete(replies::remove),
        )
}
