//! Error types shared across the Palaver service.
//!
//! [`ApiError`] is the error type every service operation returns. It pairs
//! a closed [`ErrorCategory`] (what the client is told) with an optional
//! [`error_stack::Report`] cause chain (what the operator is told) and a
//! captured span trace for diagnostics.

use error_stack::{Context, Report};
use std::borrow::Cow;
use std::fmt::{Debug, Display};
use thiserror::Error;
use tracing_error::SpanTrace;

mod category;
mod ext;

#[cfg(feature = "axum")]
mod response;

pub use self::category::ErrorCategory;
pub use self::ext::ResultExt;

/// Context attached to wrapped infrastructure failures whose real cause
/// must not leak to clients.
#[derive(Debug, Error)]
#[error("internal service error")]
pub struct Opaque;

pub struct ApiError {
    category: ErrorCategory,
    message: Option<Cow<'static, str>>,
    report: Option<Report<Opaque>>,
    trace: SpanTrace,
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

impl ApiError {
    #[must_use]
    pub fn new(category: ErrorCategory) -> Self {
        Self {
            category,
            message: None,
            report: None,
            trace: SpanTrace::capture(),
        }
    }

    /// Wraps an unanticipated failure. The cause is kept for logging but
    /// the client only ever sees [`ErrorCategory::Internal`].
    pub fn internal(context: impl Context) -> Self {
        Self {
            category: ErrorCategory::Internal,
            message: None,
            report: Some(Report::new(context).change_context(Opaque)),
            trace: SpanTrace::capture(),
        }
    }

    #[must_use]
    pub fn from_report(category: ErrorCategory, report: Report<impl Context>) -> Self {
        Self {
            category,
            message: None,
            report: Some(report.change_context(Opaque)),
            trace: SpanTrace::capture(),
        }
    }

    /// Overrides the message shown to the client.
    #[must_use]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    #[must_use]
    pub fn client_message(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.category.default_message())
    }

    #[must_use]
    pub fn report(&self) -> Option<&Report<Opaque>> {
        self.report.as_ref()
    }
}

impl Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiError")
            .field("category", &self.category)
            .field("message", &self.message)
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.category.code(), self.client_message())?;
        if let Some(report) = self.report.as_ref() {
            write!(f, ": {report:?}")?;
        }
        Display::fmt(&self.trace, f)
    }
}

impl serde::Serialize for ApiError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        // The report never crosses the wire, only the category and the
        // client-facing message do.
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("code", self.category.code())?;
        map.serialize_entry("message", self.client_message())?;
        map.end()
    }
}
