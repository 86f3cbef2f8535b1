//! Domain models

pub mod common;
pub mod invitation;
pub mod membership;
pub mod organization;
pub mod user;

pub use common::StringUuid;
pub use invitation::{
    AcceptInvitationInput, CreateInvitationInput, Invitation, InvitationResponse,
    IssuedInvitationResponse,
};
pub use membership::{AddMemberInput, MemberWithUser, Membership, OrgRole};
pub use organization::{generate_slug, CreateOrganizationInput, Organization};
pub use user::{CreateUserInput, User, UserRole};
