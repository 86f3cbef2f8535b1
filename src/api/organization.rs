//! Organization API handlers

use crate::api::{ApiResponse, Paginated, PaginationQuery};
use crate::domain::{CreateOrganizationInput, StringUuid};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

/// Create a new organization owned by the authenticated user
pub async fn create<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Json(input): Json<CreateOrganizationInput>,
) -> Result<impl IntoResponse> {
    let organization = state
        .organization_service()
        .create(StringUuid::from(auth.user_id), input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            201,
            "Organization created",
            organization,
        )),
    ))
}

/// Get an organization by ID
pub async fn get<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(org_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let organization = state
        .organization_service()
        .get(StringUuid::from(org_id))
        .await?;

    Ok(Json(ApiResponse::success(
        200,
        "Organization retrieved",
        organization,
    )))
}

/// Delete an organization
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state
        .organization_service()
        .delete(StringUuid::from(org_id), StringUuid::from(auth.user_id))
        .await?;

    Ok(Json(ApiResponse::message_only(200, "Organization deleted")))
}

/// List members of an organization
pub async fn list_members<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let (members, total) = state
        .organization_service()
        .list_members(
            StringUuid::from(org_id),
            pagination.page,
            pagination.per_page,
        )
        .await?;

    Ok(Json(ApiResponse::success(
        200,
        "Members retrieved",
        Paginated::new(members, pagination.page, pagination.per_page, total),
    )))
}

/// Remove a member from an organization.
///
/// An absent membership maps to a 404 envelope; the removal itself never
/// cascades past the membership row.
pub async fn remove_member<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path((org_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let removed = state
        .organization_service()
        .remove_member(StringUuid::from(org_id), StringUuid::from(user_id))
        .await?;

    if !removed {
        return Err(AppError::NotFound(
            "User is not a member of the organization".to_string(),
        ));
    }

    Ok(Json(ApiResponse::message_only(
        200,
        "User successfully removed from the organization",
    )))
}
