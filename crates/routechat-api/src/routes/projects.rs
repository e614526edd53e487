use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{error::ApiResult, session::session_id_from_headers, state::AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectSummary {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectsResponse {
    pub projects: Vec<ProjectSummary>,
}

/// Project selection view
///
/// Ends the caller's current conversation, so the next chat message starts
/// a new thread for whichever project is picked.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Available projects", body = ProjectsResponse),
        (status = 502, description = "Project store unavailable")
    ),
    tag = "projects"
)]
pub async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<ProjectsResponse>> {
    if let Some(session_id) = session_id_from_headers(&headers) {
        if state.sessions.flush(session_id) {
            tracing::debug!(%session_id, "Session flushed");
        }
    }

    let projects = state
        .projects
        .list_projects()
        .await?
        .into_iter()
        .map(|p| ProjectSummary { name: p.name })
        .collect();

    Ok(Json(ProjectsResponse { projects }))
}
