//! Events published by the execution gateway.

use gatekeeper_common::Controller;
use soroban_sdk::{contractevent, Address, BytesN, Symbol};

use crate::keys::KeyCategory;
use crate::DenialReason;

/// Emitted when a controller's roles are overwritten.
#[contractevent]
#[derive(Clone, Debug)]
pub struct RolesChangedEvent {
    pub actor: Address,
    pub target: Controller,
    pub roles: u32,
}

/// Emitted when one restriction list of a controller is replaced.
#[contractevent]
#[derive(Clone, Debug)]
pub struct RestrictionChangedEvent {
    pub actor: Address,
    pub target: Controller,
    pub category: KeyCategory,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct ExecutedEvent {
    pub controller: Controller,
    pub target: Address,
    pub function: Symbol,
}

/// Emitted for every relayed call that got past signature and nonce checks,
/// whether or not it was then authorised.
#[contractevent]
#[derive(Clone, Debug)]
pub struct RelayedCallEvent {
    pub signer: BytesN<20>,
    pub nonce: u64,
    pub denied: Option<DenialReason>,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct GatewayDataSetEvent {
    pub caller: Address,
    pub key: BytesN<32>,
}
