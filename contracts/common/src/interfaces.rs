use soroban_sdk::{contractclient, Address, Bytes, BytesN, Env, Val, Vec};

use crate::{Capability, Controller, Operation};

/// What the gateway needs from a protected account.
///
/// Any contract exposing these functions can sit behind the gateway.
/// Mutating functions authenticate `caller` and require it to be the owner.
#[contractclient(name = "AccountClient")]
pub trait AccountInterface {
    fn owner(env: Env) -> Address;

    fn pending_owner(env: Env) -> Option<Address>;

    fn get_data(env: Env, key: BytesN<32>) -> Bytes;

    fn set_data(env: Env, caller: Address, key: BytesN<32>, value: Bytes);

    fn execute(env: Env, caller: Address, operation: Operation) -> Val;

    fn transfer_ownership(env: Env, caller: Address, candidate: Address);

    fn claim_ownership(env: Env, caller: Address);
}

/// The slice of the gateway other contracts call into.
#[contractclient(name = "GatewayClient")]
pub trait GatewayInterface {
    fn account(env: Env) -> Address;

    fn has_capability(env: Env, controller: Controller, capability: Capability) -> bool;

    fn set_permissions(
        env: Env,
        caller: Address,
        target: Controller,
        capabilities: Vec<Capability>,
    );
}
