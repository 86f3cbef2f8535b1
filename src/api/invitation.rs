//! Invitation API handlers

use crate::api::{ApiResponse, Paginated, PaginationQuery};
use crate::domain::{
    AcceptInvitationInput, CreateInvitationInput, InvitationResponse, IssuedInvitationResponse,
    StringUuid,
};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::state::HasInvitations;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

/// Issue a scoped invitation for an organization
pub async fn create<S: HasInvitations>(
    State(state): State<S>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(input): Json<CreateInvitationInput>,
) -> Result<impl IntoResponse> {
    let (invitation, invite_link) = state
        .invitation_service()
        .issue(
            StringUuid::from(org_id),
            StringUuid::from(auth.user_id),
            input,
        )
        .await?;

    let response = IssuedInvitationResponse {
        invitation: invitation.into(),
        invite_link,
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(201, "Invitation created", response)),
    ))
}

/// Generate a generic invitation link for an organization
pub async fn create_link<S: HasInvitations>(
    State(state): State<S>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let (invitation, invite_link) = state
        .invitation_service()
        .issue_generic(StringUuid::from(org_id), StringUuid::from(auth.user_id))
        .await?;

    let response = IssuedInvitationResponse {
        invitation: invitation.into(),
        invite_link,
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            201,
            "Invitation link created",
            response,
        )),
    ))
}

/// List invitations for an organization
pub async fn list<S: HasInvitations>(
    State(state): State<S>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let (invitations, total) = state
        .invitation_service()
        .list_by_organization(
            StringUuid::from(org_id),
            StringUuid::from(auth.user_id),
            pagination.page,
            pagination.per_page,
        )
        .await?;

    let items: Vec<InvitationResponse> = invitations.into_iter().map(Into::into).collect();

    Ok(Json(ApiResponse::success(
        200,
        "Invitations retrieved",
        Paginated::new(items, pagination.page, pagination.per_page, total),
    )))
}

/// Revoke an invitation
pub async fn revoke<S: HasInvitations>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state
        .invitation_service()
        .revoke(StringUuid::from(id), StringUuid::from(auth.user_id))
        .await?;

    Ok(Json(ApiResponse::message_only(200, "Invitation revoked")))
}

/// Redeem an invitation token, joining the authenticated user to the
/// inviting organization
pub async fn accept<S: HasInvitations>(
    State(state): State<S>,
    auth: AuthUser,
    Json(input): Json<AcceptInvitationInput>,
) -> Result<impl IntoResponse> {
    input.validate()?;

    let membership = state
        .invitation_service()
        .redeem(&input.token, StringUuid::from(auth.user_id))
        .await?;

    Ok(Json(ApiResponse::success(
        200,
        "User successfully added to the organization",
        membership,
    )))
}
