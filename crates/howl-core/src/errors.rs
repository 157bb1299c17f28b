use std::time::Duration;

/// Typed error hierarchy for chat-completion calls.
/// Classifies errors as fatal (don't retry), retryable, or operational.
#[derive(Clone, Debug, thiserror::Error)]
pub enum LlmError {
    // Fatal — don't retry
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    // Retryable
    #[error("rate limited")]
    RateLimited { retry_after: Option<Duration> },
    #[error("server error {status}: {body}")]
    ServerError { status: u16, body: String },
    #[error("network error: {0}")]
    NetworkError(String),

    // Transient model failure — the completion came back empty or unusable.
    // Not retried in the reference behavior; surfaced to the caller.
    #[error("empty completion")]
    EmptyCompletion,

    // Operational
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    #[error("cancelled")]
    Cancelled,
}

impl LlmError {
    /// Whether the rate-limit retry policy may re-issue the call.
    /// Only rate limits are retried; everything else is fatal for the
    /// invocation that hit it.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_) | Self::InvalidRequest(_))
    }

    pub fn suggested_delay(&self) -> Option<Duration> {
        if let Self::RateLimited { retry_after } = self {
            *retry_after
        } else {
            None
        }
    }

    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed(_) => "authentication_failed",
            Self::InvalidRequest(_) => "invalid_request",
            Self::RateLimited { .. } => "rate_limited",
            Self::ServerError { .. } => "server_error",
            Self::NetworkError(_) => "network_error",
            Self::EmptyCompletion => "empty_completion",
            Self::Timeout(_) => "timeout",
            Self::Cancelled => "cancelled",
        }
    }

    /// Classify an HTTP status code into the appropriate error variant.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::AuthenticationFailed(body),
            400 => Self::InvalidRequest(body),
            429 => Self::RateLimited { retry_after: None },
            500..=599 => Self::ServerError { status, body },
            _ => Self::InvalidRequest(format!("unexpected status {status}: {body}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rate_limits_are_retryable() {
        assert!(LlmError::RateLimited { retry_after: None }.is_rate_limited());
        assert!(!LlmError::ServerError { status: 500, body: "err".into() }.is_rate_limited());
        assert!(!LlmError::NetworkError("tcp".into()).is_rate_limited());
        assert!(!LlmError::EmptyCompletion.is_rate_limited());
    }

    #[test]
    fn fatal_classification() {
        assert!(LlmError::AuthenticationFailed("bad key".into()).is_fatal());
        assert!(LlmError::InvalidRequest("bad".into()).is_fatal());
        assert!(!LlmError::RateLimited { retry_after: None }.is_fatal());
        assert!(!LlmError::Cancelled.is_fatal());
    }

    #[test]
    fn suggested_delay_only_for_rate_limit() {
        let rl = LlmError::RateLimited {
            retry_after: Some(Duration::from_secs(30)),
        };
        assert_eq!(rl.suggested_delay(), Some(Duration::from_secs(30)));

        let se = LlmError::ServerError { status: 500, body: "err".into() };
        assert_eq!(se.suggested_delay(), None);
    }

    #[test]
    fn from_status_mapping() {
        assert!(LlmError::from_status(401, "unauthorized".into()).is_fatal());
        assert!(LlmError::from_status(400, "bad request".into()).is_fatal());
        assert!(LlmError::from_status(429, "slow down".into()).is_rate_limited());
        assert!(matches!(
            LlmError::from_status(503, "unavailable".into()),
            LlmError::ServerError { status: 503, .. }
        ));
        assert!(LlmError::from_status(302, "redirect".into()).is_fatal());
    }

    #[test]
    fn error_kind_strings() {
        assert_eq!(LlmError::Cancelled.error_kind(), "cancelled");
        assert_eq!(LlmError::EmptyCompletion.error_kind(), "empty_completion");
        assert_eq!(
            LlmError::RateLimited { retry_after: None }.error_kind(),
            "rate_limited"
        );
    }
}
