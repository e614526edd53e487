use std::time::Duration;
use thiserror::Error;

/// Errors returned by the assistant service, classified by how callers
/// should react to them.
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Assistant service error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Assistant API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl AssistantError {
    /// Build an error from a non-success HTTP status and its body.
    pub fn from_status(status: u16, body: &str, retry_after: Option<Duration>) -> Self {
        let message = extract_error_message(body);
        match status {
            401 | 403 => Self::Unauthorized(message),
            404 => Self::NotFound(message),
            429 => Self::RateLimited {
                message,
                retry_after,
            },
            408 | 504 => Self::Timeout(message),
            500..=599 => Self::Server { status, message },
            _ => Self::Api { status, message },
        }
    }

    /// Whether retrying the same request can succeed.
    ///
    /// Rate limits are always retryable. Timeouts, 5xx and transport failures
    /// only when the request is idempotent, since a creation call may have
    /// been applied before the failure was observed.
    pub fn is_retryable(&self, idempotent: bool) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::Timeout(_) | Self::Server { .. } | Self::Transport(_) => idempotent,
            Self::Unauthorized(_) | Self::NotFound(_) | Self::Api { .. } | Self::Decode(_) => false,
        }
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AssistantError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// OpenAI wraps errors as `{"error": {"message": "..."}}`; fall back to the raw body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

pub type Result<T> = std::result::Result<T, AssistantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            AssistantError::from_status(401, "", None),
            AssistantError::Unauthorized(_)
        ));
        assert!(matches!(
            AssistantError::from_status(404, "", None),
            AssistantError::NotFound(_)
        ));
        assert!(matches!(
            AssistantError::from_status(429, "", Some(Duration::from_secs(2))),
            AssistantError::RateLimited { retry_after: Some(_), .. }
        ));
        assert!(matches!(
            AssistantError::from_status(504, "", None),
            AssistantError::Timeout(_)
        ));
        assert!(matches!(
            AssistantError::from_status(502, "", None),
            AssistantError::Server { status: 502, .. }
        ));
        assert!(matches!(
            AssistantError::from_status(400, "", None),
            AssistantError::Api { status: 400, .. }
        ));
    }

    #[test]
    fn test_error_message_unwrapped() {
        let body = r#"{"error": {"message": "No thread found with id 'thread_x'.", "type": "invalid_request_error"}}"#;
        let err = AssistantError::from_status(404, body, None);
        assert_eq!(err.to_string(), "Not found: No thread found with id 'thread_x'.");
    }

    #[test]
    fn test_plain_body_kept() {
        let err = AssistantError::from_status(500, "upstream exploded", None);
        assert!(err.to_string().contains("upstream exploded"));
    }

    #[test]
    fn test_retryable_depends_on_idempotency() {
        let rate = AssistantError::RateLimited {
            message: "slow down".into(),
            retry_after: None,
        };
        assert!(rate.is_retryable(false));
        assert!(rate.is_retryable(true));

        let server = AssistantError::Server {
            status: 503,
            message: "busy".into(),
        };
        assert!(server.is_retryable(true));
        assert!(!server.is_retryable(false));

        assert!(!AssistantError::Unauthorized("bad key".into()).is_retryable(true));
        assert!(!AssistantError::NotFound("gone".into()).is_retryable(true));
    }
}
