//! Invitation domain types

use super::common::StringUuid;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Invitation entity
///
/// An invitation grants the right to join exactly one organization. Scoped
/// invitations carry the invitee's email; generic invitations carry none and
/// are redeemable by any authenticated user presenting the token. A row is
/// deleted the moment it is redeemed, so presence implies "not yet consumed".
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invitation {
    pub id: StringUuid,
    pub organization_id: StringUuid,
    pub invited_by: StringUuid,
    #[serde(skip_serializing)]
    pub token: String,
    pub email: Option<String>,
    pub is_generic: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    /// Check if the invitation has passed its expiry horizon
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

impl Default for Invitation {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            organization_id: StringUuid::new_v4(),
            invited_by: StringUuid::new_v4(),
            token: String::new(),
            email: None,
            is_generic: false,
            expires_at: now + Duration::days(7),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for issuing a scoped invitation
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvitationInput {
    /// Email address to invite
    #[validate(email)]
    pub email: String,

    /// Custom expiry in days (default: configured horizon)
    #[validate(range(min = 1, max = 90))]
    pub expires_in_days: Option<i64>,
}

/// Input for redeeming an invitation
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AcceptInvitationInput {
    /// The invitation token received via email or link
    #[validate(length(min = 1))]
    pub token: String,
}

/// API response for invitation listings (without the redeemable token)
#[derive(Debug, Clone, Serialize)]
pub struct InvitationResponse {
    pub id: StringUuid,
    pub organization_id: StringUuid,
    pub invited_by: StringUuid,
    pub email: Option<String>,
    pub is_generic: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<Invitation> for InvitationResponse {
    fn from(inv: Invitation) -> Self {
        Self {
            id: inv.id,
            organization_id: inv.organization_id,
            invited_by: inv.invited_by,
            email: inv.email,
            is_generic: inv.is_generic,
            expires_at: inv.expires_at,
            created_at: inv.created_at,
        }
    }
}

/// Response for a freshly issued invitation, carrying the join link
#[derive(Debug, Clone, Serialize)]
pub struct IssuedInvitationResponse {
    #[serde(flatten)]
    pub invitation: InvitationResponse,
    pub invite_link: String,
}
