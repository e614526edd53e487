use axum::Json;
use utoipa::OpenApi;

use crate::routes::{chat, health, projects};

#[derive(OpenApi)]
#[openapi(
    paths(health::health_check, projects::index, chat::chatbot),
    components(schemas(
        health::HealthResponse,
        projects::ProjectSummary,
        projects::ProjectsResponse,
        chat::ChatRequest,
        chat::ChatResponse,
    )),
    tags(
        (name = "health"),
        (name = "projects"),
        (name = "chat")
    )
)]
pub struct ApiDoc;

/// OpenAPI document for the HTTP surface
pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
