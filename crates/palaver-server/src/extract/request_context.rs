use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use palaver_events::EventContext;
use palaver_model::Viewer;
use std::convert::Infallible;
use uuid::Uuid;

/// Correlation identifiers threaded from the HTTP edge into emitted
/// events. Callers may send their own; fresh ids are generated otherwise.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub correlation_id: String,
    pub trace_id: String,
}

impl RequestContext {
    const CORRELATION_HEADER: &'static str = "x-correlation-id";
    const REQUEST_HEADER: &'static str = "x-request-id";

    #[must_use]
    pub fn event_context(&self, viewer: &Viewer) -> EventContext {
        EventContext {
            user_id: viewer.id,
            correlation_id: self.correlation_id.clone(),
            trace_id: self.trace_id.clone(),
        }
    }
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = header_value(parts, Self::REQUEST_HEADER);
        let correlation_id = header_value(parts, Self::CORRELATION_HEADER)
            .or_else(|| request_id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(Self {
            trace_id: request_id.unwrap_or_else(|| correlation_id.clone()),
            correlation_id,
        })
    }
}
