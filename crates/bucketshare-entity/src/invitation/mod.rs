//! Member invitation domain entity.

pub mod model;

pub use model::{Invitation, InvitationStatus};
