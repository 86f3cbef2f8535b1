//! Business logic layer

pub mod invitation;
pub mod organization;
pub mod user;

pub use invitation::InvitationService;
pub use organization::OrganizationService;
pub use user::UserService;
