//! Application state traits for dependency injection
//!
//! Storage access is built at startup and injected into services through
//! these traits, so the same handler code works against the production
//! `AppState` and test implementations.

use crate::config::Config;
use crate::jwt::JwtManager;
use crate::repository::{
    InvitationRepository, MembershipRepository, OrganizationRepository, UserRepository,
};
use crate::service::{InvitationService, OrganizationService, UserService};

/// Trait for application state that provides access to the core services.
pub trait HasServices: Clone + Send + Sync + 'static {
    /// The organization repository type
    type OrgRepo: OrganizationRepository;
    /// The membership repository type
    type MemberRepo: MembershipRepository;
    /// The user repository type
    type UserRepo: UserRepository;

    /// Get the application configuration
    fn config(&self) -> &Config;

    /// Get the JWT manager
    fn jwt_manager(&self) -> &JwtManager;

    /// Get the organization service
    fn organization_service(
        &self,
    ) -> &OrganizationService<Self::OrgRepo, Self::MemberRepo, Self::UserRepo>;

    /// Get the user service
    fn user_service(&self) -> &UserService<Self::UserRepo>;

    /// Check if the system is ready (database is healthy)
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}

/// Trait for states that provide invitation services
pub trait HasInvitations: HasServices {
    /// The invitation repository type
    type InvitationRepo: InvitationRepository;

    /// Get the invitation service
    fn invitation_service(
        &self,
    ) -> &InvitationService<
        Self::InvitationRepo,
        Self::OrgRepo,
        Self::MemberRepo,
        Self::UserRepo,
    >;
}
