//! Invitation service: issuance, redemption, revocation

use crate::domain::{
    AddMemberInput, CreateInvitationInput, Invitation, Membership, OrgRole, StringUuid,
};
use crate::email::{invitation_email, EmailMessage};
use crate::error::{AppError, Result};
use crate::queue::EmailQueue;
use crate::repository::{
    InvitationRepository, MembershipRepository, NewInvitation, OrganizationRepository,
    UserRepository,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use rand::Rng;
use std::sync::Arc;
use validator::Validate;

/// Message returned for any token that cannot be redeemed.
///
/// Unknown and expired tokens share it so a caller cannot probe which
/// tokens exist.
const INVALID_INVITATION: &str = "Invalid or expired invitation";

/// Service for managing invitations
pub struct InvitationService<IR, OR, MR, UR>
where
    IR: InvitationRepository,
    OR: OrganizationRepository,
    MR: MembershipRepository,
    UR: UserRepository,
{
    invitation_repo: Arc<IR>,
    organization_repo: Arc<OR>,
    membership_repo: Arc<MR>,
    user_repo: Arc<UR>,
    email_queue: EmailQueue,
    /// Base URL for invitation links (e.g., "https://app.example.com")
    app_base_url: String,
    /// Sender address for invitation emails
    from_email: String,
    /// Default expiry horizon in days
    expires_in_days: i64,
}

impl<IR, OR, MR, UR> InvitationService<IR, OR, MR, UR>
where
    IR: InvitationRepository,
    OR: OrganizationRepository,
    MR: MembershipRepository,
    UR: UserRepository,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        invitation_repo: Arc<IR>,
        organization_repo: Arc<OR>,
        membership_repo: Arc<MR>,
        user_repo: Arc<UR>,
        email_queue: EmailQueue,
        app_base_url: String,
        from_email: String,
        expires_in_days: i64,
    ) -> Self {
        Self {
            invitation_repo,
            organization_repo,
            membership_repo,
            user_repo,
            email_queue,
            app_base_url,
            from_email,
            expires_in_days,
        }
    }

    /// Issue a scoped invitation and submit the invitation email.
    ///
    /// Returns the persisted invitation together with its join link.
    pub async fn issue(
        &self,
        organization_id: StringUuid,
        inviter_id: StringUuid,
        input: CreateInvitationInput,
    ) -> Result<(Invitation, String)> {
        input.validate()?;

        let organization = self
            .organization_repo
            .find_by_id(organization_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Organization {} not found", organization_id))
            })?;

        self.ensure_inviter_authorized(organization_id, inviter_id)
            .await?;

        // A still-valid invitation for the same address is a conflict
        if let Some(existing) = self
            .invitation_repo
            .find_active_by_email_and_org(&input.email, organization_id)
            .await?
        {
            if !existing.is_expired() {
                return Err(AppError::Conflict(format!(
                    "An invitation for {} already exists",
                    input.email
                )));
            }
        }

        let expires_in_days = input.expires_in_days.unwrap_or(self.expires_in_days);
        let token = generate_token();

        let invitation = self
            .invitation_repo
            .create(&NewInvitation {
                organization_id,
                invited_by: inviter_id,
                token: token.clone(),
                email: Some(input.email.clone()),
                is_generic: false,
                expires_at: Utc::now() + Duration::days(expires_in_days),
            })
            .await?;

        let invite_link = self.invite_link(&token);

        let message: EmailMessage = invitation_email(
            &self.from_email,
            &input.email,
            &organization.name,
            &invite_link,
            expires_in_days,
        );
        self.email_queue.submit(message)?;

        tracing::info!(
            invitation_id = %invitation.id,
            organization_id = %organization_id,
            invited_by = %inviter_id,
            "Invitation issued"
        );

        Ok((invitation, invite_link))
    }

    /// Issue a generic invitation link, redeemable by any authenticated
    /// user until it expires.
    pub async fn issue_generic(
        &self,
        organization_id: StringUuid,
        inviter_id: StringUuid,
    ) -> Result<(Invitation, String)> {
        self.organization_repo
            .find_by_id(organization_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Organization {} not found", organization_id))
            })?;

        self.ensure_inviter_authorized(organization_id, inviter_id)
            .await?;

        let token = generate_token();

        let invitation = self
            .invitation_repo
            .create(&NewInvitation {
                organization_id,
                invited_by: inviter_id,
                token: token.clone(),
                email: None,
                is_generic: true,
                expires_at: Utc::now() + Duration::days(self.expires_in_days),
            })
            .await?;

        tracing::info!(
            invitation_id = %invitation.id,
            organization_id = %organization_id,
            invited_by = %inviter_id,
            "Generic invitation link issued"
        );

        Ok((invitation, self.invite_link(&token)))
    }

    /// Redeem an invitation token, creating a membership for the redeemer.
    ///
    /// The invitation is consumed exactly once: the final step delegates to
    /// the repository's transactional consume, so of two concurrent
    /// redemptions only one can succeed.
    pub async fn redeem(&self, token: &str, redeemer_id: StringUuid) -> Result<Membership> {
        let invitation = self
            .invitation_repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::NotFound(INVALID_INVITATION.to_string()))?;

        if invitation.is_expired() {
            return Err(AppError::NotFound(INVALID_INVITATION.to_string()));
        }

        let redeemer = self
            .user_repo
            .find_by_id(redeemer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", redeemer_id)))?;

        if !invitation.is_generic {
            let invited = invitation.email.as_deref().unwrap_or_default();
            if !invited.eq_ignore_ascii_case(&redeemer.email) {
                return Err(AppError::Forbidden(
                    "Invitation was issued to a different email address".to_string(),
                ));
            }
        }

        if self
            .membership_repo
            .find(redeemer_id, invitation.organization_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "User is already a member of the organization".to_string(),
            ));
        }

        let membership = self
            .invitation_repo
            .consume(
                invitation.id,
                &AddMemberInput {
                    user_id: redeemer_id,
                    organization_id: invitation.organization_id,
                    role: OrgRole::Member,
                },
            )
            .await?;

        tracing::info!(
            invitation_id = %invitation.id,
            organization_id = %invitation.organization_id,
            user_id = %redeemer_id,
            "Invitation redeemed"
        );

        Ok(membership)
    }

    /// List invitations for an organization (requester must administer it)
    pub async fn list_by_organization(
        &self,
        organization_id: StringUuid,
        requester_id: StringUuid,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Invitation>, i64)> {
        self.organization_repo
            .find_by_id(organization_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Organization {} not found", organization_id))
            })?;

        self.ensure_inviter_authorized(organization_id, requester_id)
            .await?;

        let offset = (page - 1) * per_page;
        let invitations = self
            .invitation_repo
            .list_by_organization(organization_id, offset, per_page)
            .await?;
        let total = self
            .invitation_repo
            .count_by_organization(organization_id)
            .await?;

        Ok((invitations, total))
    }

    /// Revoke an invitation so its token can no longer be redeemed
    pub async fn revoke(&self, id: StringUuid, requester_id: StringUuid) -> Result<()> {
        let invitation = self
            .invitation_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Invitation {} not found", id)))?;

        self.ensure_inviter_authorized(invitation.organization_id, requester_id)
            .await?;

        self.invitation_repo.delete(id).await?;

        tracing::info!(
            invitation_id = %id,
            organization_id = %invitation.organization_id,
            revoked_by = %requester_id,
            "Invitation revoked"
        );

        Ok(())
    }

    /// Delete all expired invitations
    pub async fn delete_expired(&self) -> Result<u64> {
        self.invitation_repo.delete_expired().await
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn invite_link(&self, token: &str) -> String {
        format!(
            "{}/invite?token={}",
            self.app_base_url.trim_end_matches('/'),
            token
        )
    }

    /// The inviter must exist and hold an admin membership in the
    /// organization, or a platform admin role.
    async fn ensure_inviter_authorized(
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
                "User is not authorized to invite members to this organization".to_string(),
            )),
        }
    }
}

/// Generate a URL-safe, cryptographically-unguessable invitation token
fn generate_token() -> String {
    let mut token_bytes = [0u8; 32];
    rand::thread_rng().fill(&mut token_bytes);
    URL_SAFE_NO_PAD.encode(token_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Membership, Organization, User, UserRole};
    use crate::repository::invitation::MockInvitationRepository;
    use crate::repository::membership::MockMembershipRepository;
    use crate::repository::organization::MockOrganizationRepository;
    use crate::repository::user::MockUserRepository;
    use mockall::predicate::*;

    struct Mocks {
        invitation_repo: MockInvitationRepository,
        organization_repo: MockOrganizationRepository,
        membership_repo: MockMembershipRepository,
        user_repo: MockUserRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                invitation_repo: MockInvitationRepository::new(),
                organization_repo: MockOrganizationRepository::new(),
                membership_repo: MockMembershipRepository::new(),
                user_repo: MockUserRepository::new(),
            }
        }

        fn into_service(
            self,
        ) -> (
            InvitationService<
                MockInvitationRepository,
                MockOrganizationRepository,
                MockMembershipRepository,
                MockUserRepository,
            >,
            tokio::sync::mpsc::Receiver<EmailMessage>,
        ) {
            let (queue, receiver) = EmailQueue::new(8);
            (
                InvitationService::new(
                    Arc::new(self.invitation_repo),
                    Arc::new(self.organization_repo),
                    Arc::new(self.membership_repo),
                    Arc::new(self.user_repo),
                    queue,
                    "https://app.example.com".to_string(),
                    "no-reply@teamspace.local".to_string(),
                    7,
                ),
                receiver,
            )
        }
    }

    fn admin_member(user_id: StringUuid, org_id: StringUuid) -> Membership {
        Membership {
            user_id,
            organization_id: org_id,
            role: OrgRole::Admin,
            ..Default::default()
        }
    }

    fn scoped_input(email: &str) -> CreateInvitationInput {
        CreateInvitationInput {
            email: email.to_string(),
            expires_in_days: None,
        }
    }

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();
        // 32 bytes base64url without padding
        assert_eq!(token.len(), 43);
        assert!(!token.contains('='));
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
    }

    #[test]
    fn test_generate_token_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_issue_organization_not_found() {
        let mut mocks = Mocks::new();

        mocks
            .organization_repo
            .expect_find_by_id()
            .returning(|_| Ok(None));

        let (service, _rx) = mocks.into_service();

        let result = service
            .issue(
                StringUuid::new_v4(),
                StringUuid::new_v4(),
                scoped_input("bob@example.com"),
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_issue_inviter_not_found() {
        let mut mocks = Mocks::new();

        mocks
            .organization_repo
            .expect_find_by_id()
            .returning(|id| {
                Ok(Some(Organization {
                    id,
                    ..Default::default()
                }))
            });
        mocks.user_repo.expect_find_by_id().returning(|_| Ok(None));

        let (service, _rx) = mocks.into_service();

        let result = service
            .issue(
                StringUuid::new_v4(),
                StringUuid::new_v4(),
                scoped_input("bob@example.com"),
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_issue_plain_member_forbidden_before_any_write() {
        let mut mocks = Mocks::new();

        mocks
            .organization_repo
            .expect_find_by_id()
            .returning(|id| {
                Ok(Some(Organization {
                    id,
                    ..Default::default()
                }))
            });
        mocks.user_repo.expect_find_by_id().returning(|id| {
            Ok(Some(User {
                id,
                role: UserRole::User,
                ..Default::default()
            }))
        });
        mocks.membership_repo.expect_find().returning(|user_id, org_id| {
            Ok(Some(Membership {
                user_id,
                organization_id: org_id,
                role: OrgRole::Member,
                ..Default::default()
            }))
        });
        // No expect_create: issuance must fail before any row is written

        let (service, _rx) = mocks.into_service();

        let result = service
            .issue(
                StringUuid::new_v4(),
                StringUuid::new_v4(),
                scoped_input("bob@example.com"),
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_issue_existing_invitation_conflict() {
        let mut mocks = Mocks::new();

        mocks
            .organization_repo
            .expect_find_by_id()
            .returning(|id| {
                Ok(Some(Organization {
                    id,
                    ..Default::default()
                }))
            });
        mocks.user_repo.expect_find_by_id().returning(|id| {
            Ok(Some(User {
                id,
                ..Default::default()
            }))
        });
        mocks
            .membership_repo
            .expect_find()
            .returning(|user_id, org_id| Ok(Some(admin_member(user_id, org_id))));
        mocks
            .invitation_repo
            .expect_find_active_by_email_and_org()
            .returning(|email, org_id| {
                Ok(Some(Invitation {
                    organization_id: org_id,
                    email: Some(email.to_string()),
                    expires_at: Utc::now() + Duration::days(1),
                    ..Default::default()
                }))
            });

        let (service, _rx) = mocks.into_service();

        let result = service
            .issue(
                StringUuid::new_v4(),
                StringUuid::new_v4(),
                scoped_input("bob@example.com"),
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_issue_success_enqueues_email() {
        let mut mocks = Mocks::new();

        mocks
            .organization_repo
            .expect_find_by_id()
            .returning(|id| {
                Ok(Some(Organization {
                    id,
                    name: "Acme".to_string(),
                    ..Default::default()
                }))
            });
        mocks.user_repo.expect_find_by_id().returning(|id| {
            Ok(Some(User {
                id,
                ..Default::default()
            }))
        });
        mocks
            .membership_repo
            .expect_find()
            .returning(|user_id, org_id| Ok(Some(admin_member(user_id, org_id))));
        mocks
            .invitation_repo
            .expect_find_active_by_email_and_org()
            .returning(|_, _| Ok(None));
        mocks.invitation_repo.expect_create().returning(|new| {
            Ok(Invitation {
                organization_id: new.organization_id,
                invited_by: new.invited_by,
                token: new.token.clone(),
                email: new.email.clone(),
                is_generic: new.is_generic,
                expires_at: new.expires_at,
                ..Default::default()
            })
        });

        let (service, mut rx) = mocks.into_service();

        let (invitation, link) = service
            .issue(
                StringUuid::new_v4(),
                StringUuid::new_v4(),
                scoped_input("bob@example.com"),
            )
            .await
            .unwrap();

        assert!(!invitation.is_generic);
        assert_eq!(invitation.email.as_deref(), Some("bob@example.com"));
        assert!(link.starts_with("https://app.example.com/invite?token="));
        assert!(link.contains(&invitation.token));

        let message = rx.recv().await.unwrap();
        assert_eq!(message.to, "bob@example.com");
        assert!(message.html.contains("Acme"));
        assert!(message.html.contains(&link));
    }

    #[tokio::test]
    async fn test_issue_generic_has_no_email_and_no_job() {
        let mut mocks = Mocks::new();

        mocks
            .organization_repo
            .expect_find_by_id()
            .returning(|id| {
                Ok(Some(Organization {
                    id,
                    ..Default::default()
                }))
            });
        mocks.user_repo.expect_find_by_id().returning(|id| {
            Ok(Some(User {
                id,
                role: UserRole::Admin,
                ..Default::default()
            }))
        });
        mocks.invitation_repo.expect_create().returning(|new| {
            Ok(Invitation {
                organization_id: new.organization_id,
                invited_by: new.invited_by,
                token: new.token.clone(),
                email: new.email.clone(),
                is_generic: new.is_generic,
                expires_at: new.expires_at,
                ..Default::default()
            })
        });

        let (service, mut rx) = mocks.into_service();

        let (invitation, link) = service
            .issue_generic(StringUuid::new_v4(), StringUuid::new_v4())
            .await
            .unwrap();

        assert!(invitation.is_generic);
        assert!(invitation.email.is_none());
        assert!(link.contains(&invitation.token));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_redeem_unknown_token() {
        let mut mocks = Mocks::new();

        mocks
            .invitation_repo
            .expect_find_by_token()
            .returning(|_| Ok(None));

        let (service, _rx) = mocks.into_service();

        let result = service.redeem("unknown", StringUuid::new_v4()).await;

        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Invalid or expired invitation"),
            other => panic!("Expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_redeem_expired_token_indistinguishable_from_unknown() {
        let mut mocks = Mocks::new();

        mocks
            .invitation_repo
            .expect_find_by_token()
            .returning(|token| {
                Ok(Some(Invitation {
                    token: token.to_string(),
                    expires_at: Utc::now() - Duration::hours(1),
                    ..Default::default()
                }))
            });

        let (service, _rx) = mocks.into_service();

        let result = service.redeem("expired", StringUuid::new_v4()).await;

        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Invalid or expired invitation"),
            other => panic!("Expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_redeem_email_mismatch_forbidden() {
        let mut mocks = Mocks::new();

        mocks
            .invitation_repo
            .expect_find_by_token()
            .returning(|token| {
                Ok(Some(Invitation {
                    token: token.to_string(),
                    email: Some("bob@example.com".to_string()),
                    is_generic: false,
                    expires_at: Utc::now() + Duration::days(1),
                    ..Default::default()
                }))
            });
        mocks.user_repo.expect_find_by_id().returning(|id| {
            Ok(Some(User {
                id,
                email: "mallory@example.com".to_string(),
                ..Default::default()
            }))
        });

        let (service, _rx) = mocks.into_service();

        let result = service.redeem("token", StringUuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_redeem_existing_member_conflict() {
        let mut mocks = Mocks::new();
        let org_id = StringUuid::new_v4();

        mocks
            .invitation_repo
            .expect_find_by_token()
            .returning(move |token| {
                Ok(Some(Invitation {
                    token: token.to_string(),
                    organization_id: org_id,
                    email: Some("bob@example.com".to_string()),
                    expires_at: Utc::now() + Duration::days(1),
                    ..Default::default()
                }))
            });
        mocks.user_repo.expect_find_by_id().returning(|id| {
            Ok(Some(User {
                id,
                email: "bob@example.com".to_string(),
                ..Default::default()
            }))
        });
        mocks
            .membership_repo
            .expect_find()
            .returning(|user_id, org_id| {
                Ok(Some(Membership {
                    user_id,
                    organization_id: org_id,
                    ..Default::default()
                }))
            });

        let (service, _rx) = mocks.into_service();

        let result = service.redeem("token", StringUuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_redeem_success_creates_member_role() {
        let mut mocks = Mocks::new();
        let org_id = StringUuid::new_v4();
        let invitation_id = StringUuid::new_v4();
        let redeemer_id = StringUuid::new_v4();

        mocks
            .invitation_repo
            .expect_find_by_token()
            .with(eq("valid-token"))
            .returning(move |token| {
                Ok(Some(Invitation {
                    id: invitation_id,
                    token: token.to_string(),
                    organization_id: org_id,
                    email: Some("bob@example.com".to_string()),
                    expires_at: Utc::now() + Duration::days(7),
                    ..Default::default()
                }))
            });
        mocks.user_repo.expect_find_by_id().returning(|id| {
            Ok(Some(User {
                id,
                email: "Bob@Example.com".to_string(),
                ..Default::default()
            }))
        });
        mocks.membership_repo.expect_find().returning(|_, _| Ok(None));
        mocks
            .invitation_repo
            .expect_consume()
            .with(
                eq(invitation_id),
                eq(AddMemberInput {
                    user_id: redeemer_id,
                    organization_id: org_id,
                    role: OrgRole::Member,
                }),
            )
            .returning(|_, member| {
                Ok(Membership {
                    user_id: member.user_id,
                    organization_id: member.organization_id,
                    role: member.role,
                    ..Default::default()
                })
            });

        let (service, _rx) = mocks.into_service();

        let membership = service.redeem("valid-token", redeemer_id).await.unwrap();

        assert_eq!(membership.role, OrgRole::Member);
        assert_eq!(membership.user_id, redeemer_id);
        assert_eq!(membership.organization_id, org_id);
    }

    #[tokio::test]
    async fn test_redeem_second_attempt_loses_race() {
        let mut mocks = Mocks::new();
        let org_id = StringUuid::new_v4();

        mocks
            .invitation_repo
            .expect_find_by_token()
            .returning(move |token| {
                Ok(Some(Invitation {
                    token: token.to_string(),
                    organization_id: org_id,
                    is_generic: true,
                    email: None,
                    expires_at: Utc::now() + Duration::days(7),
                    ..Default::default()
                }))
            });
        mocks.user_repo.expect_find_by_id().returning(|id| {
            Ok(Some(User {
                id,
                email: "bob@example.com".to_string(),
                ..Default::default()
            }))
        });
        mocks.membership_repo.expect_find().returning(|_, _| Ok(None));
        // The consume delete affects zero rows: a concurrent redemption won
        mocks.invitation_repo.expect_consume().returning(|_, _| {
            Err(AppError::NotFound("Invalid or expired invitation".to_string()))
        });

        let (service, _rx) = mocks.into_service();

        let result = service.redeem("token", StringUuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_redeem_generic_any_email() {
        let mut mocks = Mocks::new();
        let org_id = StringUuid::new_v4();

        mocks
            .invitation_repo
            .expect_find_by_token()
            .returning(move |token| {
                Ok(Some(Invitation {
                    token: token.to_string(),
                    organization_id: org_id,
                    is_generic: true,
                    email: None,
                    expires_at: Utc::now() + Duration::days(7),
                    ..Default::default()
                }))
            });
        mocks.user_repo.expect_find_by_id().returning(|id| {
            Ok(Some(User {
                id,
                email: "anyone@example.com".to_string(),
                ..Default::default()
            }))
        });
        mocks.membership_repo.expect_find().returning(|_, _| Ok(None));
        mocks.invitation_repo.expect_consume().returning(|_, member| {
            Ok(Membership {
                user_id: member.user_id,
                organization_id: member.organization_id,
                role: member.role,
                ..Default::default()
            })
        });

        let (service, _rx) = mocks.into_service();

        let membership = service
            .redeem("token", StringUuid::new_v4())
            .await
            .unwrap();
        assert_eq!(membership.role, OrgRole::Member);
    }

    #[tokio::test]
    async fn test_revoke_requires_authorization() {
        let mut mocks = Mocks::new();

        mocks.invitation_repo.expect_find_by_id().returning(|id| {
            Ok(Some(Invitation {
                id,
                ..Default::default()
            }))
        });
        mocks.user_repo.expect_find_by_id().returning(|id| {
            Ok(Some(User {
                id,
                role: UserRole::User,
                ..Default::default()
            }))
        });
        mocks.membership_repo.expect_find().returning(|_, _| Ok(None));

        let (service, _rx) = mocks.into_service();

        let result = service
            .revoke(StringUuid::new_v4(), StringUuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_revoke_success() {
        let mut mocks = Mocks::new();
        let invitation_id = StringUuid::new_v4();

        mocks.invitation_repo.expect_find_by_id().returning(|id| {
            Ok(Some(Invitation {
                id,
                ..Default::default()
            }))
        });
        mocks.user_repo.expect_find_by_id().returning(|id| {
            Ok(Some(User {
                id,
                role: UserRole::Admin,
                ..Default::default()
            }))
        });
        mocks
            .invitation_repo
            .expect_delete()
            .with(eq(invitation_id))
            .returning(|_| Ok(()));

        let (service, _rx) = mocks.into_service();

        assert!(service
            .revoke(invitation_id, StringUuid::new_v4())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_delete_expired_passthrough() {
        let mut mocks = Mocks::new();

        mocks.invitation_repo.expect_delete_expired().returning(|| Ok(3));

        let (service, _rx) = mocks.into_service();

        assert_eq!(service.delete_expired().await.unwrap(), 3);
    }
}
