//! Invitation repository

use crate::domain::{AddMemberInput, Invitation, Membership, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

/// Fields persisted when issuing a new invitation
#[derive(Debug, Clone)]
pub struct NewInvitation {
    pub organization_id: StringUuid,
    pub invited_by: StringUuid,
    pub token: String,
    pub email: Option<String>,
    pub is_generic: bool,
    pub expires_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Persist a new invitation
    async fn create(&self, new: &NewInvitation) -> Result<Invitation>;

    /// Find invitation by ID
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Invitation>>;

    /// Find invitation by its token
    async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>>;

    /// Find an unexpired invitation for an email within an organization
    async fn find_active_by_email_and_org(
        &self,
        email: &str,
        organization_id: StringUuid,
    ) -> Result<Option<Invitation>>;

    /// List invitations for an organization
    async fn list_by_organization(
        &self,
        organization_id: StringUuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Invitation>>;

    /// Count invitations for an organization
    async fn count_by_organization(&self, organization_id: StringUuid) -> Result<i64>;

    /// Delete an invitation
    async fn delete(&self, id: StringUuid) -> Result<()>;

    /// Consume an invitation and create the resulting membership.
    ///
    /// Runs as a single transaction. The invitation delete is the
    /// consumption point: exactly one concurrent caller observes an
    /// affected row, every other caller gets NotFound. The membership
    /// insert rides in the same transaction, so a crash between the two
    /// statements leaves the invitation intact.
    async fn consume(&self, id: StringUuid, member: &AddMemberInput) -> Result<Membership>;

    /// Delete all expired invitations, returning the number removed
    async fn delete_expired(&self) -> Result<u64>;
}

pub struct InvitationRepositoryImpl {
    pool: MySqlPool,
}

impl InvitationRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str =
    "id, organization_id, invited_by, token, email, is_generic, expires_at, created_at, updated_at";

#[async_trait]
impl InvitationRepository for InvitationRepositoryImpl {
    async fn create(&self, new: &NewInvitation) -> Result<Invitation> {
        let id = StringUuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO invitations (id, organization_id, invited_by, token, email, is_generic, expires_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(new.organization_id)
        .bind(new.invited_by)
        .bind(&new.token)
        .bind(&new.email)
        .bind(new.is_generic)
        .bind(new.expires_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create invitation")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Invitation>> {
        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            "SELECT {} FROM invitations WHERE id = ?",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invitation)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>> {
        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            "SELECT {} FROM invitations WHERE token = ?",
            SELECT_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invitation)
    }

    async fn find_active_by_email_and_org(
        &self,
        email: &str,
        organization_id: StringUuid,
    ) -> Result<Option<Invitation>> {
        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            r#"
            SELECT {}
            FROM invitations
            WHERE email = ? AND organization_id = ? AND expires_at > NOW()
            ORDER BY created_at DESC
            LIMIT 1
            "#,
            SELECT_COLUMNS
        ))
        .bind(email)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invitation)
    }

    async fn list_by_organization(
        &self,
        organization_id: StringUuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Invitation>> {
        let invitations = sqlx::query_as::<_, Invitation>(&format!(
            r#"
            SELECT {}
            FROM invitations
            WHERE organization_id = ?
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
            SELECT_COLUMNS
        ))
        .bind(organization_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(invitations)
    }

    async fn count_by_organization(&self, organization_id: StringUuid) -> Result<i64> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM invitations WHERE organization_id = ?")
                .bind(organization_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(row.0)
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM invitations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Invitation {} not found", id)));
        }

        Ok(())
    }

    async fn consume(&self, id: StringUuid, member: &AddMemberInput) -> Result<Membership> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM invitations WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            // A concurrent redemption won the race
            return Err(AppError::NotFound(
                "Invalid or expired invitation".to_string(),
            ));
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO memberships (user_id, organization_id, role, joined_at)
            VALUES (?, ?, ?, NOW())
            "#,
        )
        .bind(member.user_id)
        .bind(member.organization_id)
        .bind(member.role)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
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

        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT user_id, organization_id, role, joined_at
            FROM memberships
            WHERE user_id = ? AND organization_id = ?
            "#,
        )
        .bind(member.user_id)
        .bind(member.organization_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(membership)
    }

    async fn delete_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM invitations WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
