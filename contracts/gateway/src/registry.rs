//! # Permission registry
//!
//! Roles and restriction lists per [`Controller`], persisted inside the
//! protected account's data store under the keys described in
//! [`crate::keys`]. The gateway writes through the account as its owner and
//! reads through the account's public `get_data`.
//!
//! Restrictions narrow what a controller may do with `Execute`: every
//! non-empty list must contain the attempted value (intersection across
//! categories). An empty list puts no constraint on its category.

use gatekeeper_common::{AccountClient, Capability, Controller, Operation, Permissions};
use soroban_sdk::{
    contracttype, panic_with_error,
    xdr::{FromXdr, ToXdr},
    Address, Bytes, BytesN, Env, IntoVal, Symbol, TryFromVal, Val, Vec,
};

use crate::events::{RestrictionChangedEvent, RolesChangedEvent};
use crate::keys::{registry_key, KeyCategory};
use crate::GatewayError;

/// All restriction lists of one controller.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RestrictionSet {
    pub addresses: Vec<Address>,
    pub functions: Vec<Symbol>,
    pub standards: Vec<BytesN<4>>,
}

/// One restriction list, replacing the stored list of the same kind.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Restriction {
    Addresses(Vec<Address>),
    Functions(Vec<Symbol>),
    Standards(Vec<BytesN<4>>),
}

impl Restriction {
    pub fn category(&self) -> KeyCategory {
        match self {
            Restriction::Addresses(_) => KeyCategory::AllowedAddresses,
            Restriction::Functions(_) => KeyCategory::AllowedFunctions,
            Restriction::Standards(_) => KeyCategory::AllowedStandards,
        }
    }
}

// ── Roles ─────────────────────────────────────────────────────────────────────

pub fn permissions(env: &Env, account: &Address, controller: &Controller) -> Permissions {
    let key = registry_key(env, KeyCategory::Roles, controller);
    Permissions::from_bytes(&AccountClient::new(env, account).get_data(&key))
}

pub fn has_capability(
    env: &Env,
    account: &Address,
    controller: &Controller,
    capability: Capability,
) -> bool {
    permissions(env, account, controller).contains(capability)
}

pub fn require_capability(
    env: &Env,
    account: &Address,
    controller: &Controller,
    capability: Capability,
) -> Result<(), GatewayError> {
    if !has_capability(env, account, controller, capability) {
        return Err(GatewayError::Unauthorized);
    }
    Ok(())
}

/// Registry writes need `Admin` or `AddPermissions`.
pub fn require_admin(
    env: &Env,
    account: &Address,
    actor: &Controller,
) -> Result<(), GatewayError> {
    let held = permissions(env, account, actor);
    if !(held.contains(Capability::Admin) || held.contains(Capability::AddPermissions)) {
        return Err(GatewayError::Unauthorized);
    }
    Ok(())
}

/// Overwrites `target`'s roles. The caller has already checked that the
/// gateway owns the account.
pub fn set_role(
    env: &Env,
    account: &Address,
    actor: &Address,
    target: &Controller,
    permissions: Permissions,
) -> Result<(), GatewayError> {
    require_admin(env, account, &Controller::Account(actor.clone()))?;

    let key = registry_key(env, KeyCategory::Roles, target);
    write(env, account, &key, &permissions.to_bytes(env));

    RolesChangedEvent {
        actor: actor.clone(),
        target: target.clone(),
        roles: permissions.bits(),
    }
    .publish(env);
    Ok(())
}

// ── Restrictions ──────────────────────────────────────────────────────────────

pub fn restrictions(env: &Env, account: &Address, controller: &Controller) -> RestrictionSet {
    let client = AccountClient::new(env, account);
    let read = |category| client.get_data(&registry_key(env, category, controller));

    RestrictionSet {
        addresses: decode_list(env, &read(KeyCategory::AllowedAddresses)),
        functions: decode_list(env, &read(KeyCategory::AllowedFunctions)),
        standards: decode_list(env, &read(KeyCategory::AllowedStandards)),
    }
}

pub fn set_restriction(
    env: &Env,
    account: &Address,
    actor: &Address,
    target: &Controller,
    restriction: Restriction,
) -> Result<(), GatewayError> {
    require_admin(env, account, &Controller::Account(actor.clone()))?;

    let category = restriction.category();
    let value = match restriction {
        Restriction::Addresses(list) => encode_list(env, list),
        Restriction::Functions(list) => encode_list(env, list),
        Restriction::Standards(list) => encode_list(env, list),
    };
    write(env, account, &registry_key(env, category, target), &value);

    RestrictionChangedEvent {
        actor: actor.clone(),
        target: target.clone(),
        category,
    }
    .publish(env);
    Ok(())
}

/// True iff `operation` passes every configured list of `controller`.
pub fn check_restriction(
    env: &Env,
    account: &Address,
    controller: &Controller,
    operation: &Operation,
) -> bool {
    let set = restrictions(env, account, controller);

    if !set.addresses.is_empty() && !set.addresses.contains(&operation.target) {
        return false;
    }
    if !set.functions.is_empty() && !set.functions.contains(&operation.function) {
        return false;
    }
    if !set.standards.is_empty() {
        match &operation.standard {
            Some(standard) if set.standards.contains(standard) => {}
            _ => return false,
        }
    }
    true
}

// ── Storage ───────────────────────────────────────────────────────────────────

pub fn write(env: &Env, account: &Address, key: &BytesN<32>, value: &Bytes) {
    AccountClient::new(env, account).set_data(&env.current_contract_address(), key, value);
}

// Empty lists are stored as empty bytes so that an unset and a cleared list
// read the same.
fn encode_list<T>(env: &Env, list: Vec<T>) -> Bytes
where
    T: IntoVal<Env, Val> + TryFromVal<Env, Val>,
{
    if list.is_empty() {
        Bytes::new(env)
    } else {
        list.to_xdr(env)
    }
}

fn decode_list<T>(env: &Env, value: &Bytes) -> Vec<T>
where
    T: IntoVal<Env, Val> + TryFromVal<Env, Val>,
{
    if value.is_empty() {
        return Vec::new(env);
    }
    // A stored list that does not decode fails closed.
    Vec::<T>::from_xdr(env, value)
        .unwrap_or_else(|_| panic_with_error!(env, GatewayError::RestrictionViolation))
}
