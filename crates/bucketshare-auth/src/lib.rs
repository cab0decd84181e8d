//! # bucketshare-auth
//!
//! Authorization and scope engine for Bucketshare.
//!
//! ## Modules
//!
//! - `bridge`: conversion between legacy flag permissions and the structured model
//! - `scope`: folder-scope matching and listing filtering
//! - `escalation`: subset checks preventing members from granting more than they hold
//! - `access`: the access decision façade, the async gate, and member/invitation lifecycle
//! - `store`: persistence traits consumed by the gate, with an in-memory implementation
//!
//! Everything in `bridge`, `scope`, `escalation`, and `access::decision` is
//! pure and synchronous. The gate and services are async only because the
//! store traits are.

pub mod access;
pub mod bridge;
pub mod escalation;
pub mod scope;
pub mod store;

pub use access::{
    AccessGate, AccessRequest, Decision, DenyReason, GrantRequest, InvitationRequest,
    InvitationService, MemberService, OwnershipService,
};
pub use bridge::{effective_permission, from_legacy, to_legacy};
pub use escalation::{EscalationDenial, can_grant, can_grant_scope, check_grant};
pub use scope::{filter_listing, is_item_in_scope, normalize_item_path};
pub use store::{BucketStore, InvitationStore, MemberStore, MemoryStore, OwnershipStore};
