//! Events published by the protected account.

use soroban_sdk::{contractevent, Address, BytesN, Symbol};

/// Emitted when the owner names a candidate.
#[contractevent]
#[derive(Clone, Debug)]
pub struct OwnershipTransferStartedEvent {
    pub owner: Address,
    pub candidate: Address,
}

/// Emitted when the candidate claims and becomes owner.
#[contractevent]
#[derive(Clone, Debug)]
pub struct OwnershipClaimedEvent {
    pub previous_owner: Address,
    pub new_owner: Address,
}

/// Emitted on every data store write. The value itself is not republished.
#[contractevent]
#[derive(Clone, Debug)]
pub struct DataChangedEvent {
    pub key: BytesN<32>,
    pub length: u32,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct OperationExecutedEvent {
    pub target: Address,
    pub function: Symbol,
}
