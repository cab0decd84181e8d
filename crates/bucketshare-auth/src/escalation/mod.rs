//! Escalation guard for invitations and member permission updates.

pub mod guard;

pub use guard::{EscalationDenial, can_grant, can_grant_scope, check_grant};
