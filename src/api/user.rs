//! User API handlers

use crate::api::ApiResponse;
use crate::domain::{CreateUserInput, StringUuid};
use crate::error::Result;
use crate::state::HasServices;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

/// Register a new user
pub async fn create<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<CreateUserInput>,
) -> Result<impl IntoResponse> {
    let user = state.user_service().create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(201, "User registered", user)),
    ))
}

/// Get a user by ID
pub async fn get<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user = state.user_service().get(StringUuid::from(id)).await?;

    Ok(Json(ApiResponse::success(200, "User retrieved", user)))
}

/// List the organizations a user belongs to
pub async fn list_organizations<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let organizations = state
        .organization_service()
        .list_for_member(StringUuid::from(id))
        .await?;

    Ok(Json(ApiResponse::success(
        200,
        "Organizations retrieved",
        organizations,
    )))
}
