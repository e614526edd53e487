use axum::{
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use routechat_llm::AssistantError;
use routechat_persist::PersistError;
use routechat_session::{PollError, SessionError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Gone(String),

    #[error("Assistant service is rate limiting requests: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("Timed out waiting for the assistant: {0}")]
    GatewayTimeout(String),

    #[error("Request was cancelled: {0}")]
    Unavailable(String),

    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Gone(_) => StatusCode::GONE,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::MissingProject => ApiError::BadRequest(err.to_string()),
            SessionError::ThreadGone { .. } => ApiError::Gone(err.to_string()),
            SessionError::Store(e) => e.into(),
            SessionError::Assistant(e) => e.into(),
            SessionError::Poll(e) => e.into(),
            SessionError::Serialize(_) | SessionError::Tokenizer(_) | SessionError::Config(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<PersistError> for ApiError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::ProjectNotFound(name) => {
                ApiError::NotFound(format!("Project not found: {}", name))
            }
            PersistError::RoutesMissing(name) => {
                ApiError::NotFound(format!("Project {} has no routes", name))
            }
            PersistError::Config(msg) => ApiError::Internal(msg),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::RateLimited {
                message,
                retry_after,
            } => ApiError::RateLimited {
                message,
                retry_after,
            },
            AssistantError::Timeout(msg) => ApiError::GatewayTimeout(msg),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<PollError> for ApiError {
    fn from(err: PollError) -> Self {
        match err {
            PollError::Timeout { .. } => ApiError::GatewayTimeout(err.to_string()),
            PollError::Cancelled { .. } => ApiError::Unavailable(err.to_string()),
            PollError::Assistant(e) => e.into(),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Upstream(detail) => {
                tracing::error!(error = %detail, "Upstream error");
                "Upstream service error".to_string()
            }
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                "Internal server error".to_string()
            }
            other => {
                tracing::warn!(status = status.as_u16(), error = %other, "Request failed");
                other.to_string()
            }
        };

        let mut response = (status, Json(json!({ "error": message }))).into_response();

        if let ApiError::RateLimited {
            retry_after: Some(wait),
            ..
        } = &self
        {
            let secs = wait.as_secs().max(1);
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
        }

        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_mapping() {
        let cases: Vec<(SessionError, StatusCode)> = vec![
            (SessionError::MissingProject, StatusCode::BAD_REQUEST),
            (
                SessionError::ThreadGone {
                    thread_id: "thread_1".into(),
                },
                StatusCode::GONE,
            ),
            (
                SessionError::Store(PersistError::ProjectNotFound("x".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                SessionError::Assistant(AssistantError::RateLimited {
                    message: "slow down".into(),
                    retry_after: None,
                }),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                SessionError::Poll(PollError::Timeout {
                    run_id: "run_1".into(),
                    elapsed: Duration::from_secs(120),
                }),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                SessionError::Poll(PollError::Cancelled {
                    run_id: "run_1".into(),
                }),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                SessionError::Poll(PollError::NoReply {
                    thread_id: "thread_1".into(),
                }),
                StatusCode::BAD_GATEWAY,
            ),
            (
                SessionError::Config("bad".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_rate_limit_sets_retry_after() {
        let response = ApiError::RateLimited {
            message: "slow down".into(),
            retry_after: Some(Duration::from_secs(7)),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(RETRY_AFTER).unwrap(), "7");
    }

    #[test]
    fn test_upstream_detail_hidden() {
        let response = ApiError::Upstream("secret detail".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
