//! # Gatekeeper Protected Account
//!
//! A single-owner account holding a generic key/value data store and able to
//! call other contracts on its owner's behalf. In a full deployment the owner
//! is an `ExecutionGateway`, which decides who may drive the account.
//!
//! Ownership changes hands in two phases (see [`ownership`]): the owner names
//! a candidate, and the candidate must claim before anything changes.

#![no_std]

use gatekeeper_common::Operation;
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, Address, Bytes, BytesN, Env, Val, Vec,
};

mod events;
pub mod ownership;

pub use ownership::{OwnershipState, PendingOwnership};

use events::{DataChangedEvent, OperationExecutedEvent};

#[cfg(test)]
mod ownership_test;

/// Errors returned by the protected account
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum AccountError {
    /// `initialize` was already called
    AlreadyInitialized = 1,
    /// No owner has been set yet
    NotInitialized = 2,
    /// Caller is not the current owner
    NotOwner = 3,
    /// A previous transfer is still waiting to be claimed
    OngoingTransfer = 4,
    /// Caller is not the pending candidate, or nothing is pending
    NotAllowedToClaim = 5,
    /// The account cannot be made its own owner
    CannotTransferToSelf = 6,
    /// Batch keys and values differ in length
    LengthMismatch = 7,
}

impl AccountError {
    pub fn reason(&self) -> &'static str {
        match self {
            AccountError::AlreadyInitialized => "account already initialized",
            AccountError::NotInitialized => "account not initialized",
            AccountError::NotOwner => "caller is not the owner",
            AccountError::OngoingTransfer => "ownership transfer currently ongoing",
            AccountError::NotAllowedToClaim => "not allowed to claim ownership",
            AccountError::CannotTransferToSelf => "cannot transfer ownership to the account itself",
            AccountError::LengthMismatch => "keys and values length mismatch",
        }
    }
}

/// Storage keys for the protected account
#[contracttype]
#[derive(Clone)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub enum DataKey {
    /// Current owner
    Owner,
    /// Pending two-phase transfer, if any
    Pending,
    /// Entry of the generic data store
    Data(BytesN<32>),
}

#[contract]
pub struct ProtectedAccount;

#[contractimpl]
impl ProtectedAccount {
    /// Sets the initial owner. Can only be called once.
    pub fn initialize(env: Env, owner: Address) -> Result<(), AccountError> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(AccountError::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Owner, &owner);
        Ok(())
    }

    // ── Ownership ─────────────────────────────────────────────────────────────

    pub fn owner(env: Env) -> Result<Address, AccountError> {
        ownership::owner(&env)
    }

    pub fn pending_owner(env: Env) -> Option<Address> {
        ownership::pending(&env).map(|p| p.candidate)
    }

    pub fn ownership_state(env: Env) -> OwnershipState {
        ownership::state(&env)
    }

    /// Starts a two-phase transfer to `candidate`. The caller stays owner
    /// until the candidate calls [`ProtectedAccount::claim_ownership`].
    ///
    /// # Errors
    /// - `NotOwner` - caller is not the current owner
    /// - `OngoingTransfer` - a transfer is already pending
    /// - `CannotTransferToSelf` - candidate is this account
    pub fn transfer_ownership(
        env: Env,
        caller: Address,
        candidate: Address,
    ) -> Result<(), AccountError> {
        ownership::start_transfer(&env, caller, candidate)
    }

    /// Completes a pending transfer.
    ///
    /// # Errors
    /// - `NotAllowedToClaim` - nothing pending, or caller is not the candidate
    pub fn claim_ownership(env: Env, caller: Address) -> Result<(), AccountError> {
        ownership::claim(&env, caller)
    }

    // ── Data store ────────────────────────────────────────────────────────────

    /// Reads a value. Unset keys read as empty bytes.
    pub fn get_data(env: Env, key: BytesN<32>) -> Bytes {
        Self::load(&env, &key)
    }

    pub fn get_data_batch(env: Env, keys: Vec<BytesN<32>>) -> Vec<Bytes> {
        let mut values = Vec::new(&env);
        for key in keys.iter() {
            values.push_back(Self::load(&env, &key));
        }
        values
    }

    /// Writes a value (owner only). Writing empty bytes clears the key.
    pub fn set_data(
        env: Env,
        caller: Address,
        key: BytesN<32>,
        value: Bytes,
    ) -> Result<(), AccountError> {
        ownership::require_owner(&env, &caller)?;
        Self::store(&env, key, value);
        Ok(())
    }

    /// Writes several values at once (owner only).
    pub fn set_data_batch(
        env: Env,
        caller: Address,
        keys: Vec<BytesN<32>>,
        values: Vec<Bytes>,
    ) -> Result<(), AccountError> {
        ownership::require_owner(&env, &caller)?;
        if keys.len() != values.len() {
            return Err(AccountError::LengthMismatch);
        }
        for (key, value) in keys.iter().zip(values.iter()) {
            Self::store(&env, key, value);
        }
        Ok(())
    }

    // ── Execution ─────────────────────────────────────────────────────────────

    /// Invokes `operation.function` on `operation.target` as this account
    /// (owner only) and returns the callee's result.
    pub fn execute(env: Env, caller: Address, operation: Operation) -> Result<Val, AccountError> {
        ownership::require_owner(&env, &caller)?;

        let result: Val = env.invoke_contract(
            &operation.target,
            &operation.function,
            operation.args.clone(),
        );

        OperationExecutedEvent {
            target: operation.target,
            function: operation.function,
        }
        .publish(&env);
        Ok(result)
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn load(env: &Env, key: &BytesN<32>) -> Bytes {
        env.storage()
            .persistent()
            .get(&DataKey::Data(key.clone()))
            .unwrap_or_else(|| Bytes::new(env))
    }

    fn store(env: &Env, key: BytesN<32>, value: Bytes) {
        let entry = DataKey::Data(key.clone());
        if value.is_empty() {
            env.storage().persistent().remove(&entry);
        } else {
            env.storage().persistent().set(&entry, &value);
        }
        DataChangedEvent {
            key,
            length: value.len(),
        }
        .publish(env);
    }
}
