//! Access decisions and the member lifecycle built on them.

pub mod decision;
pub mod gate;
pub mod invitation;
pub mod member;
pub mod ownership;

pub use decision::{
    AccessRequest, Decision, DenyReason, GrantRequest, authorize, check_share_expiry, ownership_of,
};
pub use gate::AccessGate;
pub use invitation::{InvitationRequest, InvitationService};
pub use member::MemberService;
pub use ownership::OwnershipService;
