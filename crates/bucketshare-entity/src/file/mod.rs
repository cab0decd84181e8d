//! File-level domain types: listing entries and upload ownership.

pub mod item;
pub mod ownership;

pub use item::StorageItem;
pub use ownership::FileOwnershipRecord;
