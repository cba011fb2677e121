//! Domain-event envelope and the best-effort emission pipeline.
//!
//! State mutations and event delivery are deliberately not transactional:
//! a committed mutation is never rolled back because the broker was slow
//! or unreachable. The pipeline reports an explicit [`PublishOutcome`]
//! which callers log-and-discard.

mod envelope;
mod pipeline;
mod sink;

pub use self::envelope::{PostEvent, PostEventKind, PostPatch};
pub use self::pipeline::{EventContext, EventPipeline, PublishOutcome};
pub use self::sink::{EventSink, MemorySink, NoopSink, PublishError, TracingSink};
