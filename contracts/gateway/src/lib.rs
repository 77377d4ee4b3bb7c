//! # Gatekeeper Execution Gateway
//!
//! The only owner a protected account needs. Controllers (Soroban addresses
//! or secp256k1 relay keys) are granted [`Capability`] sets and optional
//! restriction lists in a permission registry kept inside the account's own
//! data store; the gateway checks them before forwarding anything.
//!
//! ## Calling paths
//! - **Direct**: `execute(caller, operation)` with `caller.require_auth()`.
//! - **Relayed**: `execute_relayed_call(...)` carrying a signature from a
//!   relay key (see [`relay`]). The nonce is consumed as soon as the
//!   signature checks out, before authorisation, so a denied call cannot be
//!   replayed later once permissions change. A denial is therefore reported
//!   as [`RelayOutcome::Denied`] rather than an error, which would roll the
//!   nonce back.
//!
//! Every registry mutation and every forwarded call requires the gateway to
//! currently own the account.

#![no_std]

use gatekeeper_common::{AccountClient, Capability, Controller, Operation, Permissions};
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, log, vec, Address, Bytes, BytesN, Env,
    Val, Vec,
};

mod events;
pub mod keys;
pub mod registry;
pub mod relay;

pub use keys::KeyCategory;
pub use registry::{Restriction, RestrictionSet};

use events::{ExecutedEvent, GatewayDataSetEvent, RelayedCallEvent};


// ── Error type ────────────────────────────────────────────────────────────────

/// Errors returned by the execution gateway
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum GatewayError {
    /// `initialize` was already called
    AlreadyInitialized = 1,
    /// No protected account has been configured
    NotInitialized = 2,
    /// Caller lacks the required capability
    Unauthorized = 3,
    /// Operation is outside the caller's allowed lists
    RestrictionViolation = 4,
    /// Relayed nonce is not the signer's current nonce
    IncorrectNonce = 5,
    /// Signature does not recover to the claimed signer
    SignatureMismatch = 6,
    /// Relayed call was signed for another gateway
    WrongTarget = 7,
    /// The gateway does not own the protected account
    AccountNotOwned = 8,
    /// The account has no pending transfer to this gateway
    NotPendingOwner = 9,
    /// Roles value is wider than four bytes or sets undefined bits
    InvalidRoles = 10,
}

impl GatewayError {
    pub fn reason(&self) -> &'static str {
        match self {
            GatewayError::AlreadyInitialized => "gateway already initialized",
            GatewayError::NotInitialized => "gateway not initialized",
            GatewayError::Unauthorized => "caller lacks the required capability",
            GatewayError::RestrictionViolation => "operation not allowed by restrictions",
            GatewayError::IncorrectNonce => "incorrect nonce",
            GatewayError::SignatureMismatch => "signature does not match signer",
            GatewayError::WrongTarget => "relayed call signed for another gateway",
            GatewayError::AccountNotOwned => "gateway does not own the account",
            GatewayError::NotPendingOwner => "gateway is not the pending owner",
            GatewayError::InvalidRoles => "roles value has undefined bits",
        }
    }
}

/// Why an authenticated relayed call was not forwarded.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum DenialReason {
    Unauthorized = 1,
    RestrictionViolation = 2,
}

impl From<DenialReason> for GatewayError {
    fn from(reason: DenialReason) -> Self {
        match reason {
            DenialReason::Unauthorized => GatewayError::Unauthorized,
            DenialReason::RestrictionViolation => GatewayError::RestrictionViolation,
        }
    }
}

/// Result of a relayed call whose signature and nonce were accepted.
///
/// `Executed` holds the forwarded call's return value as its single element.
#[contracttype]
#[derive(Clone, Debug)]
pub enum RelayOutcome {
    Executed(Vec<Val>),
    Denied(DenialReason),
}

// ── Storage keys ──────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub enum DataKey {
    /// Protected account address
    Account,
    /// Next expected nonce of a relay key
    Nonce(BytesN<20>),
}

// ── Contract ──────────────────────────────────────────────────────────────────

#[contract]
pub struct ExecutionGateway;

#[contractimpl]
impl ExecutionGateway {
    /// Binds the gateway to its protected account. Can only be called once.
    pub fn initialize(env: Env, account: Address) -> Result<(), GatewayError> {
        if env.storage().instance().has(&DataKey::Account) {
            return Err(GatewayError::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Account, &account);
        log!(&env, "gateway initialized account={}", account);
        Ok(())
    }

    pub fn account(env: Env) -> Result<Address, GatewayError> {
        Self::load_account(&env)
    }

    /// Data store key under which `controller`'s `category` entry lives.
    pub fn registry_key(env: Env, category: KeyCategory, controller: Controller) -> BytesN<32> {
        keys::registry_key(&env, category, &controller)
    }

    // ── Registry views ────────────────────────────────────────────────────────

    pub fn roles(env: Env, controller: Controller) -> Result<u32, GatewayError> {
        let account = Self::load_account(&env)?;
        Ok(registry::permissions(&env, &account, &controller).bits())
    }

    pub fn capabilities(env: Env, controller: Controller) -> Result<Vec<Capability>, GatewayError> {
        let account = Self::load_account(&env)?;
        Ok(registry::permissions(&env, &account, &controller).capabilities(&env))
    }

    pub fn has_capability(
        env: Env,
        controller: Controller,
        capability: Capability,
    ) -> Result<bool, GatewayError> {
        let account = Self::load_account(&env)?;
        Ok(registry::has_capability(&env, &account, &controller, capability))
    }

    pub fn restrictions(env: Env, controller: Controller) -> Result<RestrictionSet, GatewayError> {
        let account = Self::load_account(&env)?;
        Ok(registry::restrictions(&env, &account, &controller))
    }

    pub fn check_restriction(
        env: Env,
        controller: Controller,
        operation: Operation,
    ) -> Result<bool, GatewayError> {
        let account = Self::load_account(&env)?;
        Ok(registry::check_restriction(&env, &account, &controller, &operation))
    }

    // ── Registry writes ───────────────────────────────────────────────────────

    /// Overwrites `target`'s roles. Empty `extra_data` installs the owner
    /// preset, anything else must be a big-endian permissions value of at
    /// most four bytes.
    ///
    /// # Errors
    /// - `AccountNotOwned` - the gateway does not own the account
    /// - `InvalidRoles` - `extra_data` sets bits that name no capability
    /// - `Unauthorized` - caller holds neither `Admin` nor `AddPermissions`
    pub fn set_roles(
        env: Env,
        caller: Address,
        target: Controller,
        extra_data: Bytes,
    ) -> Result<(), GatewayError> {
        caller.require_auth();
        let account = Self::load_owned_account(&env)?;

        let permissions = if extra_data.is_empty() {
            Permissions::OWNER
        } else {
            Permissions::try_from_bytes(&extra_data).ok_or(GatewayError::InvalidRoles)?
        };
        registry::set_role(&env, &account, &caller, &target, permissions)
    }

    /// Typed variant of [`ExecutionGateway::set_roles`].
    pub fn set_permissions(
        env: Env,
        caller: Address,
        target: Controller,
        capabilities: Vec<Capability>,
    ) -> Result<(), GatewayError> {
        caller.require_auth();
        let account = Self::load_owned_account(&env)?;
        let permissions = Permissions::from_capabilities(&capabilities);
        registry::set_role(&env, &account, &caller, &target, permissions)
    }

    /// Replaces one restriction list of `target`. An empty list lifts the
    /// restriction for that category.
    pub fn set_restriction(
        env: Env,
        caller: Address,
        target: Controller,
        restriction: Restriction,
    ) -> Result<(), GatewayError> {
        caller.require_auth();
        let account = Self::load_owned_account(&env)?;
        registry::set_restriction(&env, &account, &caller, &target, restriction)
    }

    /// Writes to the account's data store. Keys inside the registry
    /// namespace additionally need registry rights.
    pub fn set_data(
        env: Env,
        caller: Address,
        key: BytesN<32>,
        value: Bytes,
    ) -> Result<(), GatewayError> {
        caller.require_auth();
        let account = Self::load_owned_account(&env)?;
        let controller = Controller::Account(caller.clone());

        registry::require_capability(&env, &account, &controller, Capability::SetData)?;
        if keys::is_registry_key(&key) {
            registry::require_admin(&env, &account, &controller)?;
        }
        registry::write(&env, &account, &key, &value);

        GatewayDataSetEvent { caller, key }.publish(&env);
        Ok(())
    }

    // ── Execution ─────────────────────────────────────────────────────────────

    /// Forwards `operation` to the account if `caller` holds `Execute` and
    /// passes its restrictions.
    ///
    /// # Errors
    /// - `AccountNotOwned` - the gateway does not own the account
    /// - `Unauthorized` - caller lacks `Execute`
    /// - `RestrictionViolation` - operation outside the caller's lists
    pub fn execute(env: Env, caller: Address, operation: Operation) -> Result<Val, GatewayError> {
        caller.require_auth();
        let account = Self::load_owned_account(&env)?;
        let controller = Controller::Account(caller);

        Self::authorize(&env, &account, &controller, &operation)?;
        Ok(Self::forward(&env, &account, controller, operation))
    }

    /// Runs an operation signed off-chain by relay key `signer`.
    ///
    /// Checks, in order: `signed_for` is this gateway (`WrongTarget`), the
    /// signature recovers to `signer` (`SignatureMismatch`), `nonce` is the
    /// signer's current nonce (`IncorrectNonce`). The nonce is then consumed
    /// and the call is authorised as in [`ExecutionGateway::execute`]; a
    /// failed authorisation comes back as [`RelayOutcome::Denied`].
    pub fn execute_relayed_call(
        env: Env,
        signed_for: Address,
        signer: BytesN<20>,
        operation: Operation,
        nonce: u64,
        signature: BytesN<65>,
    ) -> Result<RelayOutcome, GatewayError> {
        let account = Self::load_account(&env)?;

        let signer = relay::verify(&env, &signed_for, &signer, &operation, nonce, &signature)?;
        relay::check_and_consume_nonce(&env, &signer, nonce)?;
        Self::ensure_owned(&env, &account)?;

        let controller = Controller::Key(signer.clone());
        if let Err(reason) = Self::authorize(&env, &account, &controller, &operation) {
            log!(&env, "relayed call denied signer={} nonce={}", signer, nonce);
            RelayedCallEvent {
                signer,
                nonce,
                denied: Some(reason),
            }
            .publish(&env);
            return Ok(RelayOutcome::Denied(reason));
        }

        RelayedCallEvent {
            signer,
            nonce,
            denied: None,
        }
        .publish(&env);
        let result = Self::forward(&env, &account, controller, operation);
        Ok(RelayOutcome::Executed(vec![&env, result]))
    }

    pub fn get_nonce(env: Env, signer: BytesN<20>) -> u64 {
        relay::nonce(&env, &signer)
    }

    /// Digest a relay key must sign for this call.
    pub fn relay_digest(
        env: Env,
        signed_for: Address,
        operation: Operation,
        nonce: u64,
    ) -> BytesN<32> {
        relay::message_digest(&env, &signed_for, &operation, nonce).to_bytes()
    }

    // ── Account ownership ─────────────────────────────────────────────────────

    /// Starts handing the account to `candidate`. The gateway stays owner
    /// until the candidate claims on the account.
    pub fn transfer_account_ownership(
        env: Env,
        caller: Address,
        candidate: Address,
    ) -> Result<(), GatewayError> {
        caller.require_auth();
        let account = Self::load_owned_account(&env)?;
        registry::require_capability(
            &env,
            &account,
            &Controller::Account(caller),
            Capability::ChangeOwner,
        )?;

        AccountClient::new(&env, &account)
            .transfer_ownership(&env.current_contract_address(), &candidate);
        Ok(())
    }

    /// Accepts a pending transfer of the account to this gateway.
    pub fn claim_account_ownership(env: Env) -> Result<(), GatewayError> {
        let account = Self::load_account(&env)?;
        let client = AccountClient::new(&env, &account);
        let gateway = env.current_contract_address();

        if client.pending_owner() != Some(gateway.clone()) {
            return Err(GatewayError::NotPendingOwner);
        }
        client.claim_ownership(&gateway);
        log!(&env, "gateway claimed account={}", account);
        Ok(())
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn load_account(env: &Env) -> Result<Address, GatewayError> {
        env.storage()
            .instance()
            .get(&DataKey::Account)
            .ok_or(GatewayError::NotInitialized)
    }

    fn load_owned_account(env: &Env) -> Result<Address, GatewayError> {
        let account = Self::load_account(env)?;
        Self::ensure_owned(env, &account)?;
        Ok(account)
    }

    fn ensure_owned(env: &Env, account: &Address) -> Result<(), GatewayError> {
        if AccountClient::new(env, account).owner() != env.current_contract_address() {
            return Err(GatewayError::AccountNotOwned);
        }
        Ok(())
    }

    fn authorize(
        env: &Env,
        account: &Address,
        controller: &Controller,
        operation: &Operation,
    ) -> Result<(), DenialReason> {
        if !registry::has_capability(env, account, controller, Capability::Execute) {
            return Err(DenialReason::Unauthorized);
        }
        if !registry::check_restriction(env, account, controller, operation) {
            return Err(DenialReason::RestrictionViolation);
        }
        Ok(())
    }

    fn forward(env: &Env, account: &Address, controller: Controller, operation: Operation) -> Val {
        let result = AccountClient::new(env, account)
            .execute(&env.current_contract_address(), &operation);

        ExecutedEvent {
            controller,
            target: operation.target,
            function: operation.function,
        }
        .publish(env);
        result
    }
}
