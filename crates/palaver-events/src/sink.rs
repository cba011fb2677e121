use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use thiserror::Error;
use tracing::info;

use crate::envelope::PostEvent;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("event broker is unavailable")]
    Unavailable,
    #[error("event broker did not acknowledge in time")]
    AckTimeout,
    #[error("could not serialize event payload")]
    Serialization(#[from] serde_json::Error),
}

/// An opaque at-least-once publish sink. A broker client implements this
/// trait; so do the local sinks below. Lifecycle is explicit: the owner
/// calls [`open`] once before first publish and [`close`] on shutdown.
///
/// [`open`]: EventSink::open
/// [`close`]: EventSink::close
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn open(&self) -> Result<(), PublishError> {
        Ok(())
    }

    async fn publish(&self, event: &PostEvent) -> Result<(), PublishError>;

    async fn close(&self) {}
}

/// Emits the envelope as a structured log record. Default sink when no
/// broker is configured.
#[derive(Debug, Default)]
pub struct TracingSink;

#[async_trait]
impl EventSink for TracingSink {
    async fn publish(&self, event: &PostEvent) -> Result<(), PublishError> {
        let payload = serde_json::to_string(event)?;
        info!(
            target: "palaver::events",
            event_type = %event.event_type,
            post_id = %event.post_id,
            %payload,
            "domain event"
        );
        Ok(())
    }
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NoopSink;

#[async_trait]
impl EventSink for NoopSink {
    async fn publish(&self, _event: &PostEvent) -> Result<(), PublishError> {
        Ok(())
    }
}

/// Records published events in memory; the test suite's broker. Can be
/// switched into a failing mode to exercise the degraded path.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<PostEvent>>,
    failing: AtomicBool,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events published so far, oldest first.
    #[must_use]
    pub fn recorded(&self) -> Vec<PostEvent> {
        self.events.lock().expect("sink poisoned").clone()
    }

    /// Drains and returns the recorded events.
    #[must_use]
    pub fn take(&self) -> Vec<PostEvent> {
        std::mem::take(&mut *self.events.lock().expect("sink poisoned"))
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventSink for MemorySink {
    async fn publish(&self, event: &PostEvent) -> Result<(), PublishError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PublishError::Unavailable);
        }
        self.events
            .lock()
            .expect("sink poisoned")
            .push(event.clone());
        Ok(())
    }
}
