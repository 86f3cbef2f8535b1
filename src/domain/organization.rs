//! Organization domain model

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Organization entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: StringUuid,
    pub name: String,
    pub slug: String,
    pub owner_id: StringUuid,
    pub email: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Organization {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            name: String::new(),
            slug: String::new(),
            owner_id: StringUuid::new_v4(),
            email: None,
            industry: None,
            country: None,
            address: None,
            state: None,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a new organization
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrganizationInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 255))]
    pub industry: Option<String>,
    #[validate(length(max = 255))]
    pub country: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 255))]
    pub state: Option<String>,
    pub description: Option<String>,
}

// Regex for generated slugs (lowercase alphanumeric with hyphens)
lazy_static::lazy_static! {
    pub static ref SLUG_REGEX: regex::Regex = regex::Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Derive a unique slug from an organization name.
///
/// Lowercases the name, collapses runs of non-alphanumerics into single
/// hyphens, and appends a random suffix so two organizations may share a
/// display name without colliding on the unique slug column.
pub fn generate_slug(name: &str) -> String {
    let mut base: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();

    while base.contains("--") {
        base = base.replace("--", "-");
    }
    let base = base.trim_matches('-');

    let suffix = StringUuid::new_v4().simple().to_string();
    if base.is_empty() {
        suffix[..12].to_string()
    } else {
        format!("{}-{}", base, &suffix[..8])
    }
}
