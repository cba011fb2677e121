/// Closed set of failures a Palaver API operation can report to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The addressed entity does not exist (or is out of the caller's
    /// addressing scope, e.g. a reply reached through the wrong post).
    NotFound,
    /// No usable bearer token on a request that needs one.
    Unauthorized,
    /// The caller is authenticated but not permitted to perform the
    /// operation on this entity.
    AccessDenied,
    /// The requested status change is not in the lifecycle transition
    /// table for the entity's current status.
    InvalidTransition,
    /// The operation itself is legal but the entity's current state
    /// forbids it (e.g. replying to an archived post).
    InvalidState,
    /// Malformed input: empty content, bad pagination parameters,
    /// unknown sort field, dangling parent reference.
    InvalidRequest,
    /// Anything unanticipated. The cause stays server-side.
    Internal,
}

impl ErrorCategory {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::AccessDenied => "access_denied",
            Self::InvalidTransition => "invalid_transition",
            Self::InvalidState => "invalid_state",
            Self::InvalidRequest => "invalid_request",
            Self::Internal => "internal",
        }
    }

    #[must_use]
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::NotFound => "Resource not found",
            Self::Unauthorized => "Authentication required",
            Self::AccessDenied => "Access denied",
            Self::InvalidTransition => "Transition not allowed from the current status",
            Self::InvalidState => "Operation not allowed in the current state",
            Self::InvalidRequest => "Invalid request",
            Self::Internal => "Internal server error",
        }
    }
}
