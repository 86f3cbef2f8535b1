//! Membership repository (user-organization join table)

use crate::domain::{AddMemberInput, MemberWithUser, Membership, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Insert a membership row. The composite primary key rejects a second
    /// row for the same (user, organization) pair with Conflict.
    async fn add(&self, input: &AddMemberInput) -> Result<Membership>;

    async fn find(
        &self,
        user_id: StringUuid,
        organization_id: StringUuid,
    ) -> Result<Option<Membership>>;

    /// Delete the membership row for the pair. Returns false when no row
    /// existed; absence is a signal, not an error.
    async fn remove(&self, user_id: StringUuid, organization_id: StringUuid) -> Result<bool>;

    async fn list_by_organization(
        &self,
        organization_id: StringUuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<MemberWithUser>>;

    async fn count_by_organization(&self, organization_id: StringUuid) -> Result<i64>;

    async fn list_by_user(&self, user_id: StringUuid) -> Result<Vec<Membership>>;
}

pub struct MembershipRepositoryImpl {
    pool: MySqlPool,
}

impl MembershipRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for MembershipRepositoryImpl {
    async fn add(&self, input: &AddMemberInput) -> Result<Membership> {
        let result = sqlx::query(
            r#"
            INSERT INTO memberships (user_id, organization_id, role, joined_at)
            VALUES (?, ?, ?, NOW())
            "#,
        )
        .bind(input.user_id)
        .bind(input.organization_id)
        .bind(input.role)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            if e.as_database_error()
                .map(|d| d.is_unique_violation())
                .unwrap_or(false)
            {
                return Err(AppError::Conflict(
                    "User is already a member of the organization".to_string(),
                ));
            }
            return Err(e.into());
        }

        self.find(input.user_id, input.organization_id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create membership")))
    }

    async fn find(
        &self,
        user_id: StringUuid,
        organization_id: StringUuid,
    ) -> Result<Option<Membership>> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT user_id, organization_id, role, joined_at
            FROM memberships
            WHERE user_id = ? AND organization_id = ?
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }

    async fn remove(&self, user_id: StringUuid, organization_id: StringUuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM memberships WHERE user_id = ? AND organization_id = ?")
                .bind(user_id)
                .bind(organization_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_organization(
        &self,
        organization_id: StringUuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<MemberWithUser>> {
        let members = sqlx::query_as::<_, MemberWithUser>(
            r#"
            SELECT m.user_id, u.email, u.name, m.role, m.joined_at
            FROM memberships m
            INNER JOIN users u ON u.id = m.user_id
            WHERE m.organization_id = ?
            ORDER BY m.joined_at ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(organization_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    async fn count_by_organization(&self, organization_id: StringUuid) -> Result<i64> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM memberships WHERE organization_id = ?")
                .bind(organization_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(row.0)
    }

    async fn list_by_user(&self, user_id: StringUuid) -> Result<Vec<Membership>> {
        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            SELECT user_id, organization_id, role, joined_at
            FROM memberships
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(memberships)
    }
}
