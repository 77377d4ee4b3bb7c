//! # Registry key layout
//!
//! Permission registry entries live in the protected account's data store
//! under fixed 32-byte keys, one per (category, controller) pair:
//!
//! ```text
//! bytes 0..8    d7 6b c0 4c 00 00 00 00   registry namespace
//! bytes 8..10   category tag
//! bytes 10..12  00 00
//! bytes 12..32  controller key id
//! ```
//!
//! | Category           | Tag    |
//! |--------------------|--------|
//! | `Roles`            | `eced` |
//! | `AllowedAddresses` | `c6dd` |
//! | `AllowedFunctions` | `8efe` |
//! | `AllowedStandards` | `3efa` |
//!
//! The mapping is pure: the same pair always yields the same key, and keys of
//! different categories never collide because their tags differ.

use gatekeeper_common::Controller;
use soroban_sdk::{contracttype, BytesN, Env};

pub const REGISTRY_NAMESPACE: [u8; 8] = [0xd7, 0x6b, 0xc0, 0x4c, 0x00, 0x00, 0x00, 0x00];

/// Kind of registry entry.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum KeyCategory {
    Roles = 0,
    AllowedAddresses = 1,
    AllowedFunctions = 2,
    AllowedStandards = 3,
}

impl KeyCategory {
    pub const fn tag(self) -> [u8; 2] {
        match self {
            KeyCategory::Roles => [0xec, 0xed],
            KeyCategory::AllowedAddresses => [0xc6, 0xdd],
            KeyCategory::AllowedFunctions => [0x8e, 0xfe],
            KeyCategory::AllowedStandards => [0x3e, 0xfa],
        }
    }
}

pub fn encode(category: KeyCategory, key_id: &[u8; 20]) -> [u8; 32] {
    let mut key = [0u8; 32];
    key[..8].copy_from_slice(&REGISTRY_NAMESPACE);
    key[8..10].copy_from_slice(&category.tag());
    key[12..].copy_from_slice(key_id);
    key
}

pub fn registry_key(env: &Env, category: KeyCategory, controller: &Controller) -> BytesN<32> {
    let key_id = controller.key_id(env).to_array();
    BytesN::from_array(env, &encode(category, &key_id))
}

/// True for any key inside the registry namespace, whatever its tag.
pub fn is_registry_key(key: &BytesN<32>) -> bool {
    key.to_array()[..8] == REGISTRY_NAMESPACE
}
