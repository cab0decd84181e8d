//! Shared setup for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use bucketshare_auth::access::{AccessGate, InvitationService, MemberService, OwnershipService};
use bucketshare_auth::store::{MemoryStore, StoreFixture};
use bucketshare_core::config::access::AccessConfig;
use bucketshare_entity::file::StorageItem;

pub const BUCKET: &str = "team-assets";
pub const OWNER: &str = "owner@example.com";
pub const VIEWER: &str = "viewer@example.com";
pub const UPLOADER: &str = "uploader@example.com";
pub const LEAD: &str = "lead@example.com";

/// Gate and services over one in-memory store seeded from the fixture.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub gate: Arc<AccessGate>,
    pub invitations: InvitationService,
    pub members: MemberService,
    pub ownership: OwnershipService,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AccessConfig::default())
    }

    pub fn with_config(config: AccessConfig) -> Self {
        let fixture: StoreFixture = read_fixture("store.json");
        let store = Arc::new(MemoryStore::from_fixture(fixture));
        let gate = Arc::new(AccessGate::from_store(store.clone(), config.clone()));

        Self {
            invitations: InvitationService::new(
                gate.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                config,
            ),
            members: MemberService::new(gate.clone(), store.clone(), store.clone()),
            ownership: OwnershipService::new(gate.clone(), store.clone()),
            gate,
            store,
        }
    }
}

pub fn listing(name: &str) -> Vec<StorageItem> {
    read_fixture(name)
}

fn read_fixture<T: serde::de::DeserializeOwned>(name: &str) -> T {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", name]
        .iter()
        .collect();
    let raw = std::fs::read_to_string(&path).expect("read fixture");
    serde_json::from_str(&raw).expect("parse fixture")
}
