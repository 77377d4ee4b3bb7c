//! Events published by the social recovery contract.

use soroban_sdk::{contractevent, Address, BytesN};

/// Emitted when the whole recovery configuration is replaced.
#[contractevent]
#[derive(Clone, Debug)]
pub struct RecoveryConfiguredEvent {
    pub guardians: u32,
    pub threshold: u32,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct GuardianAddedEvent {
    pub guardian: Address,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct GuardianRemovedEvent {
    pub guardian: Address,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct ThresholdChangedEvent {
    pub threshold: u32,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct SecretHashChangedEvent {
    pub secret_hash: BytesN<32>,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct VoteCastEvent {
    pub attempt_id: BytesN<32>,
    pub guardian: Address,
    pub new_owner: Address,
}

/// Emitted when a recovered owner is granted every capability.
#[contractevent]
#[derive(Clone, Debug)]
pub struct OwnershipRecoveredEvent {
    pub attempt_id: BytesN<32>,
    pub new_owner: Address,
}

/// Emitted when the owner discards an open attempt.
#[contractevent]
#[derive(Clone, Debug)]
pub struct AttemptCancelledEvent {
    pub attempt_id: BytesN<32>,
}
