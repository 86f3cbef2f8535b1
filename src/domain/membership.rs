//! Membership domain model (user-organization join)

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Role scoped to a single organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrgRole {
    Admin,
    #[default]
    Member,
}

impl std::str::FromStr for OrgRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(OrgRole::Admin),
            "member" => Ok(OrgRole::Member),
            _ => Err(format!("Unknown organization role: {}", s)),
        }
    }
}

impl std::fmt::Display for OrgRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrgRole::Admin => write!(f, "admin"),
            OrgRole::Member => write!(f, "member"),
        }
    }
}

impl<'r> sqlx::Decode<'r, sqlx::MySql> for OrgRole {
    fn decode(value: sqlx::mysql::MySqlValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = sqlx::Decode::<'r, sqlx::MySql>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl sqlx::Type<sqlx::MySql> for OrgRole {
    fn type_info() -> sqlx::mysql::MySqlTypeInfo {
        <String as sqlx::Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &sqlx::mysql::MySqlTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::MySql>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::MySql> for OrgRole {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<u8>,
    ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
        let s = self.to_string();
        <&str as sqlx::Encode<sqlx::MySql>>::encode_by_ref(&s.as_str(), buf)
    }
}

/// User-organization membership.
///
/// Identity is the (user_id, organization_id) pair; the storage layer
/// enforces at most one row per pair through the composite primary key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Membership {
    pub user_id: StringUuid,
    pub organization_id: StringUuid,
    pub role: OrgRole,
    pub joined_at: DateTime<Utc>,
}

impl Default for Membership {
    fn default() -> Self {
        Self {
            user_id: StringUuid::new_v4(),
            organization_id: StringUuid::new_v4(),
            role: OrgRole::default(),
            joined_at: Utc::now(),
        }
    }
}

/// Input for adding a member to an organization
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct AddMemberInput {
    pub user_id: StringUuid,
    pub organization_id: StringUuid,
    pub role: OrgRole,
}

/// A member row joined with user details, for listing endpoints
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MemberWithUser {
    pub user_id: StringUuid,
    pub email: String,
    pub name: Option<String>,
    pub role: OrgRole,
    pub joined_at: DateTime<Utc>,
}
