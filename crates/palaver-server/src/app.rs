use axum::extract::{FromRequestParts, State};
use palaver_error::Result;
use palaver_events::{EventPipeline, TracingSink};
use palaver_model::postgres::PgStore;
use palaver_model::store::{PostStore, ReplyStore};

use std::fmt::Debug;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, FromRequestParts)]
#[from_request(via(State))]
#[must_use]
pub struct App(Arc<AppInner>);

pub struct AppInner {
    pub config: Arc<palaver_config::Server>,
    pub posts: Arc<dyn PostStore>,
    pub replies: Arc<dyn ReplyStore>,
    pub events: EventPipeline,
}

impl App {
    /// Creates an [`App`] wired to Postgres and the default event sink.
    pub async fn new(config: palaver_config::Server) -> Result<Self> {
        let store = Arc::new(
            PgStore::connect(&config.database.url, config.database.max_connections).await?,
        );
        store.run_migrations().await?;

        let events = EventPipeline::new(
            Arc::new(TracingSink),
            config.events.service.clone(),
            Duration::from_millis(config.events.ack_timeout_ms),
        );

        Ok(Self::with_parts(config, store.clone(), store, events))
    }

    /// Wires an [`App`] from explicit collaborators. The test suite uses
    /// this with in-memory stores and a recording sink.
    pub fn with_parts(
        config: palaver_config::Server,
        posts: Arc<dyn PostStore>,
        replies: Arc<dyn ReplyStore>,
        events: EventPipeline,
    ) -> Self {
        Self(Arc::new(AppInner {
            config: Arc::new(config),
            posts,
            replies,
            events,
        }))
    }
}

impl Deref for App {
    type Target = AppInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
