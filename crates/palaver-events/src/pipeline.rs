use chrono::Utc;
use palaver_model::id::{PostId, UserId};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

use crate::envelope::{PostEvent, PostEventKind, PostPatch, ENVELOPE_VERSION};
use crate::sink::{EventSink, PublishError};

/// Correlation data propagated from the inbound request into every event
/// it causes.
#[derive(Debug, Clone)]
pub struct EventContext {
    pub user_id: UserId,
    pub correlation_id: String,
    pub trace_id: String,
}

impl EventContext {
    /// Context with freshly generated correlation ids, for callers that
    /// arrive without any (background jobs, tests).
    #[must_use]
    pub fn generate(user_id: UserId) -> Self {
        let correlation_id = Uuid::new_v4().to_string();
        Self {
            user_id,
            trace_id: correlation_id.clone(),
            correlation_id,
        }
    }
}

/// What happened to a publish attempt. Never an error: a dropped event is
/// logged and forgotten, the state change it described stays committed.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Delivered,
    Dropped,
}

/// Builds envelopes and hands them to the configured sink with a bounded
/// acknowledgment wait.
#[derive(Clone)]
pub struct EventPipeline {
    sink: Arc<dyn EventSink>,
    service: String,
    ack_timeout: Duration,
}

impl EventPipeline {
    pub fn new(sink: Arc<dyn EventSink>, service: impl Into<String>, ack_timeout: Duration) -> Self {
        Self {
            sink,
            service: service.into(),
            ack_timeout,
        }
    }

    /// Opens the underlying sink. A sink that cannot open is logged and
    /// left in place; later publishes will degrade to logged drops.
    pub async fn open(&self) {
        if let Err(error) = self.sink.open().await {
            warn!(%error, "event sink failed to open, events will be dropped until it recovers");
        }
    }

    pub async fn close(&self) {
        self.sink.close().await;
    }

    #[tracing::instrument(skip_all, fields(event_type = %kind, post_id = %post_id), name = "events.emit")]
    pub async fn emit(
        &self,
        ctx: &EventContext,
        kind: PostEventKind,
        post_id: PostId,
        before: Option<PostPatch>,
        after: Option<PostPatch>,
    ) -> PublishOutcome {
        let event = PostEvent {
            event_id: Uuid::new_v4(),
            event_type: kind,
            occurred_at: Utc::now(),
            user_id: ctx.user_id,
            post_id,
            before,
            after,
            correlation_id: ctx.correlation_id.clone(),
            trace_id: ctx.trace_id.clone(),
            service: self.service.clone(),
            version: ENVELOPE_VERSION,
        };

        let result = tokio::time::timeout(self.ack_timeout, self.sink.publish(&event)).await;
        match result {
            Ok(Ok(())) => PublishOutcome::Delivered,
            Ok(Err(error)) => {
                warn!(%error, "dropping domain event");
                PublishOutcome::Dropped
            }
            Err(_elapsed) => {
                warn!(error = %PublishError::AckTimeout, "dropping domain event");
                PublishOutcome::Dropped
            }
        }
    }
}

impl std::fmt::Debug for EventPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPipeline")
            .field("service", &self.service)
            .field("ack_timeout", &self.ack_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use async_trait::async_trait;
    use palaver_model::post::PostStatus;

    fn pipeline_with(sink: Arc<dyn EventSink>) -> EventPipeline {
        EventPipeline::new(sink, "palaver-posts", Duration::from_secs(5))
    }

    #[tokio::test]
    async fn delivered_events_carry_the_full_envelope() {
        let sink = Arc::new(MemorySink::new());
        let pipeline = pipeline_with(sink.clone());
        let ctx = EventContext::generate(UserId::new());
        let post_id = PostId::new();

        let outcome = pipeline
            .emit(
                &ctx,
                PostEventKind::Published,
                post_id,
                Some(PostPatch::status(PostStatus::Unpublished)),
                Some(PostPatch::status(PostStatus::Published)),
            )
            .await;

        assert_eq!(outcome, PublishOutcome::Delivered);

        let events = sink.take();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, PostEventKind::Published);
        assert_eq!(events[0].post_id, post_id);
        assert_eq!(events[0].user_id, ctx.user_id);
        assert_eq!(events[0].correlation_id, ctx.correlation_id);
        assert_eq!(events[0].version, ENVELOPE_VERSION);
        assert_eq!(events[0].service, "palaver-posts");
    }

    #[tokio::test]
    async fn each_event_gets_a_fresh_id() {
        let sink = Arc::new(MemorySink::new());
        let pipeline = pipeline_with(sink.clone());
        let ctx = EventContext::generate(UserId::new());
        let post_id = PostId::new();

        let _ = pipeline
            .emit(&ctx, PostEventKind::Archived, post_id, None, None)
            .await;
        let _ = pipeline
            .emit(&ctx, PostEventKind::Unarchived, post_id, None, None)
            .await;

        let events = sink.take();
        assert_ne!(events[0].event_id, events[1].event_id);
    }

    #[tokio::test]
    async fn sink_failures_degrade_to_a_dropped_outcome() {
        let sink = Arc::new(MemorySink::new());
        sink.set_failing(true);
        let pipeline = pipeline_with(sink.clone());
        let ctx = EventContext::generate(UserId::new());

        let outcome = pipeline
            .emit(&ctx, PostEventKind::Deleted, PostId::new(), None, None)
            .await;

        assert_eq!(outcome, PublishOutcome::Dropped);
        assert!(sink.take().is_empty());
    }

    struct StalledSink;

    #[async_trait]
    impl EventSink for StalledSink {
        async fn publish(&self, _event: &PostEvent) -> Result<(), PublishError> {
            // Never acknowledges.
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn acknowledgment_wait_is_bounded() {
        let pipeline = EventPipeline::new(
            Arc::new(StalledSink),
            "palaver-posts",
            Duration::from_millis(250),
        );
        let ctx = EventContext::generate(UserId::new());

        let outcome = pipeline
            .emit(&ctx, PostEventKind::Updated, PostId::new(), None, None)
            .await;

        assert_eq!(outcome, PublishOutcome::Dropped);
    }
}
