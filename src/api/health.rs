//! Health check endpoints

use crate::api::ApiResponse;
use crate::state::HasServices;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

/// Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::message_only(200, "ok"))
}

/// Readiness probe: verifies the database connection
pub async fn ready<S: HasServices>(State(state): State<S>) -> impl IntoResponse {
    if state.check_ready().await {
        (StatusCode::OK, Json(ApiResponse::message_only(200, "ready"))).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "error",
                "status_code": 503,
                "message": "Database unavailable",
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_returns_ok() {
        let response = health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
