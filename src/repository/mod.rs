//! Data access layer (Repository pattern)

pub mod invitation;
pub mod membership;
pub mod organization;
pub mod user;

pub use invitation::{InvitationRepository, NewInvitation};
pub use membership::MembershipRepository;
pub use organization::OrganizationRepository;
pub use user::UserRepository;
