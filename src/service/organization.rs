//! Organization service

use crate::domain::{
    generate_slug, CreateOrganizationInput, MemberWithUser, Organization, OrgRole, StringUuid,
};
use crate::error::{AppError, Result};
use crate::repository::{MembershipRepository, OrganizationRepository, UserRepository};
use std::sync::Arc;
use validator::Validate;

/// Service for managing organizations and their members
pub struct OrganizationService<OR, MR, UR>
where
    OR: OrganizationRepository,
    MR: MembershipRepository,
    UR: UserRepository,
{
    organization_repo: Arc<OR>,
    membership_repo: Arc<MR>,
    user_repo: Arc<UR>,
}

impl<OR, MR, UR> OrganizationService<OR, MR, UR>
where
    OR: OrganizationRepository,
    MR: MembershipRepository,
    UR: UserRepository,
{
    pub fn new(organization_repo: Arc<OR>, membership_repo: Arc<MR>, user_repo: Arc<UR>) -> Self {
        Self {
            organization_repo,
            membership_repo,
            user_repo,
        }
    }

    /// Create an organization owned by the given user.
    ///
    /// The owner becomes an admin member of the new organization.
    pub async fn create(
        &self,
        owner_id: StringUuid,
        input: CreateOrganizationInput,
    ) -> Result<Organization> {
        input.validate()?;

        self.user_repo
            .find_by_id(owner_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", owner_id)))?;

        let slug = generate_slug(&input.name);
        let organization = self.organization_repo.create(owner_id, &slug, &input).await?;

        tracing::info!(
            organization_id = %organization.id,
            owner_id = %owner_id,
            slug = %organization.slug,
            "Organization created"
        );

        Ok(organization)
    }

    /// Get an organization by ID
    pub async fn get(&self, id: StringUuid) -> Result<Organization> {
        self.organization_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Organization {} not found", id)))
    }

    /// List organizations the given user belongs to
    pub async fn list_for_member(&self, user_id: StringUuid) -> Result<Vec<Organization>> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        self.organization_repo.list_by_member(user_id).await
    }

    /// Delete an organization along with its memberships and invitations.
    ///
    /// Only the owner, an organization admin, or a platform admin may delete.
    pub async fn delete(&self, id: StringUuid, actor_id: StringUuid) -> Result<()> {
        let organization = self.get(id).await?;

        if organization.owner_id != actor_id {
            self.ensure_org_admin(id, actor_id).await?;
        }

        self.organization_repo.delete(id).await?;
        tracing::info!(organization_id = %id, actor_id = %actor_id, "Organization deleted");

        Ok(())
    }

    /// List members of an organization
    pub async fn list_members(
        &self,
        organization_id: StringUuid,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<MemberWithUser>, i64)> {
        self.get(organization_id).await?;

        let offset = (page - 1) * per_page;
        let members = self
            .membership_repo
            .list_by_organization(organization_id, offset, per_page)
            .await?;
        let total = self
            .membership_repo
            .count_by_organization(organization_id)
            .await?;

        Ok((members, total))
    }

    /// Remove a member from an organization.
    ///
    /// Returns false when no membership existed; the caller decides the
    /// HTTP status. Never cascades to the user or the organization.
    pub async fn remove_member(
        &self,
        organization_id: StringUuid,
        user_id: StringUuid,
    ) -> Result<bool> {
        let removed = self.membership_repo.remove(user_id, organization_id).await?;

        if removed {
            tracing::info!(
                organization_id = %organization_id,
                user_id = %user_id,
                "Member removed from organization"
            );
        }

        Ok(removed)
    }

    /// Require the actor to be an organization admin or a platform admin
    pub async fn ensure_org_admin(
        &self,
        organization_id: StringUuid,
        user_id: StringUuid,
    ) -> Result<()> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        if user.role.is_platform_admin() {
            return Ok(());
        }

        let membership = self.membership_repo.find(user_id, organization_id).await?;
        match membership {
            Some(m) if m.role == OrgRole::Admin => Ok(()),
            _ => Err(AppError::Forbidden(
                "User is not authorized to administer this organization".to_string(),
            )),
        }
    }
}
