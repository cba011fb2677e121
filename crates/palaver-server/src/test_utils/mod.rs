use chrono::Utc;
use palaver_error::ApiError;
use palaver_events::{EventContext, EventPipeline, MemorySink};
use palaver_model::memory::MemoryStore;
use palaver_model::post::{NewPost, Post, PostStatus};
use palaver_model::{Role, UserId, Viewer};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::App;

/// An [`App`] backed by the in-memory stores with a recording event sink.
pub fn build_test_app() -> (App, Arc<MemorySink>) {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(MemorySink::new());
    let events = EventPipeline::new(sink.clone(), "palaver-posts", Duration::from_secs(5));
    let app = App::with_parts(
        palaver_config::Server::for_tests(),
        store.clone(),
        store,
        events,
    );
    (app, sink)
}

pub fn member() -> Viewer {
    Viewer {
        id: UserId::new(),
        role: Role::User,
        verified: true,
    }
}

pub fn unverified_member() -> Viewer {
    Viewer {
        verified: false,
        ..member()
    }
}

pub fn admin() -> Viewer {
    Viewer {
        id: UserId::new(),
        role: Role::Admin,
        verified: true,
    }
}

pub fn event_ctx(viewer: &Viewer) -> EventContext {
    EventContext::generate(viewer.id)
}

/// Inserts a post owned by `owner`, forced into the given status.
pub async fn seed_post(app: &App, owner: &Viewer, status: PostStatus) -> Post {
    let mut post = Post::create(
        NewPost {
            owner_id: owner.id,
            title: "Seeded post".to_string(),
            content: "Seeded content".to_string(),
            images: vec![],
            attachments: vec![],
        },
        Utc::now(),
    );
    post.status = status;
    app.posts.create(post).await.unwrap()
}

pub trait TestResultExt {
    /// Serializes the error side into its wire JSON.
    ///
    /// ## Panics
    /// Panics if the result is [`Ok`].
    fn expect_error_json(self) -> serde_json::Value;
}

impl<T: Debug> TestResultExt for std::result::Result<T, ApiError> {
    fn expect_error_json(self) -> serde_json::Value {
        match self {
            Ok(okay) => panic!("unexpected value Ok({okay:?}), expected error"),
            Err(error) => serde_json::to_value(error).unwrap(),
        }
    }
}
