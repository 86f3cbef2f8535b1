//! Organization repository

use crate::domain::{CreateOrganizationInput, Organization, OrgRole, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Create an organization and its owner's admin membership in one
    /// transaction.
    async fn create(
        &self,
        owner_id: StringUuid,
        slug: &str,
        input: &CreateOrganizationInput,
    ) -> Result<Organization>;

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Organization>>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>>;

    /// List organizations the given user belongs to
    async fn list_by_member(&self, user_id: StringUuid) -> Result<Vec<Organization>>;

    /// Delete an organization along with its memberships and invitations
    async fn delete(&self, id: StringUuid) -> Result<()>;
}

pub struct OrganizationRepositoryImpl {
    pool: MySqlPool,
}

impl OrganizationRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = "id, name, slug, owner_id, email, industry, country, address, state, description, created_at, updated_at";

#[async_trait]
impl OrganizationRepository for OrganizationRepositoryImpl {
    async fn create(
        &self,
        owner_id: StringUuid,
        slug: &str,
        input: &CreateOrganizationInput,
    ) -> Result<Organization> {
        let id = StringUuid::new_v4();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO organizations (id, name, slug, owner_id, email, industry, country, address, state, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(slug)
        .bind(owner_id)
        .bind(&input.email)
        .bind(&input.industry)
        .bind(&input.country)
        .bind(&input.address)
        .bind(&input.state)
        .bind(&input.description)
        .execute(&mut *tx)
        .await;

        if let Err(e) = result {
            if e.as_database_error()
                .map(|d| d.is_unique_violation())
                .unwrap_or(false)
            {
                return Err(AppError::Conflict(format!(
                    "An organization with slug {} already exists",
                    slug
                )));
            }
            return Err(e.into());
        }

        // The owner joins their own organization as admin
        sqlx::query(
            r#"
            INSERT INTO memberships (user_id, organization_id, role, joined_at)
            VALUES (?, ?, ?, NOW())
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .bind(OrgRole::Admin)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create organization")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Organization>> {
        let organization = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {} FROM organizations WHERE id = ?",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organization)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>> {
        let organization = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {} FROM organizations WHERE slug = ?",
            SELECT_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organization)
    }

    async fn list_by_member(&self, user_id: StringUuid) -> Result<Vec<Organization>> {
        let organizations = sqlx::query_as::<_, Organization>(
            r#"
            SELECT o.id, o.name, o.slug, o.owner_id, o.email, o.industry, o.country, o.address, o.state, o.description, o.created_at, o.updated_at
            FROM organizations o
            INNER JOIN memberships m ON o.id = m.organization_id
            WHERE m.user_id = ?
            ORDER BY m.joined_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(organizations)
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM invitations WHERE organization_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM memberships WHERE organization_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM organizations WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Organization {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }
}
