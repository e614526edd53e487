use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use routechat_session::{SessionError, SessionState, TurnRequest};

use crate::{
    error::{ApiError, ApiResult},
    session::session_cookie,
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
    /// Required for the first message of a session, ignored afterwards
    #[serde(default)]
    pub project: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub message: String,
}

/// Send a chat message
///
/// The first message of a session uploads the project's routes and opens a
/// thread; later messages continue it.
#[utoipa::path(
    post,
    path = "/chatbot",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Invalid body or missing project"),
        (status = 404, description = "Project not found"),
        (status = 410, description = "Stored conversation thread no longer exists, session reset"),
        (status = 429, description = "Assistant rate limit"),
        (status = 502, description = "Assistant or project store failure"),
        (status = 503, description = "Cancelled by shutdown"),
        (status = 504, description = "Assistant did not answer in time")
    ),
    tag = "chat"
)]
pub async fn chatbot(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let (session_id, session_state, issued) = state.sessions.resolve(&headers);

    let result = run_turn(&state, session_id, session_state, body).await;
    let mut response = result.into_response();

    // the cookie goes out even on failure, a thread may already be stored
    if issued && state.sessions.load(session_id).is_some() {
        match HeaderValue::from_str(&session_cookie(session_id)) {
            Ok(value) => {
                response.headers_mut().insert(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "Invalid session cookie value"),
        }
    }

    response
}

async fn run_turn(
    state: &AppState,
    session_id: Uuid,
    session_state: SessionState,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let turn = TurnRequest {
        message: request.message,
        project: request.project,
    };

    let submitted = match state.manager.submit(session_state, turn).await {
        Ok(submitted) => submitted,
        Err(e @ SessionError::ThreadGone { .. }) => {
            state.sessions.flush(session_id);
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    state.sessions.save(session_id, submitted.state.clone());

    let cancel = state.shutdown.child_token();
    let outcome = state.manager.await_reply(submitted, &cancel).await?;

    tracing::info!(
        %session_id,
        thread_id = %outcome.thread_id,
        new_thread = outcome.new_thread,
        attachments = outcome.attachment_ids.len(),
        "Chat turn completed"
    );

    Ok(Json(ChatResponse {
        message: outcome.reply,
    }))
}
