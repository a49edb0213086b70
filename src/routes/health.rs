use crate::{error::AppError, server::Server};
use axum::{Router, extract::State, response::Json, routing::get};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

/// Create health check routes
pub fn create_health_routes() -> Router<Server> {
    Router::new().route("/", get(health_check))
}

/// Service health
#[utoipa::path(
    get,
    path = "/health",
    summary = "Health check",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 500, description = "Database unreachable", body = crate::routes::ApiErrorResponse)
    ),
    tag = "Health"
)]
pub async fn health_check(State(server): State<Server>) -> Result<Json<HealthResponse>, AppError> {
    server.database.health_check().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        database: "ok".to_string(),
    }))
}
