//! # Gatekeeper Social Recovery
//!
//! Lets a set of guardians restore control of a gateway-protected account
//! when its owner loses their keys. The owner configures guardians, a vote
//! threshold and the keccak256 hash of a secret ahead of time. Guardians then
//! vote, per recovery attempt, for the address that should take over; once
//! enough of them agree and that address reveals the secret, the gateway
//! grants it every capability.
//!
//! This contract must itself hold `AddPermissions` (or `Admin`) in the
//! gateway's registry for the final grant to succeed.

#![no_std]

use gatekeeper_common::{Controller, GatewayClient, Permissions};
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, log, Address, Bytes, BytesN, Env, Vec,
};

pub mod ballot;
pub mod config;
mod events;

pub use config::RecoveryConfig;

use events::{
    AttemptCancelledEvent, GuardianAddedEvent, GuardianRemovedEvent, OwnershipRecoveredEvent,
    RecoveryConfiguredEvent, SecretHashChangedEvent, ThresholdChangedEvent, VoteCastEvent,
};


// ── Error type ────────────────────────────────────────────────────────────────

/// Errors returned by the social recovery contract
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum RecoveryError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    /// Caller is not the configured owner
    NotOwner = 3,
    /// Voter is not in the guardian set
    NotAGuardian = 4,
    /// Too few guardians voted for the caller in this attempt
    ThresholdNotMet = 5,
    /// Secret does not hash to the committed value
    InvalidSecret = 6,
    /// Empty or duplicate guardians, or threshold out of range
    InvalidRecoveryConfig = 7,
    GuardianAlreadyExists = 8,
    GuardianNotFound = 9,
    /// Nothing has been configured yet
    RecoveryNotConfigured = 10,
    /// A new attempt would exceed the open attempt limit
    TooManyOpenAttempts = 11,
    /// No open attempt has this id
    AttemptNotFound = 12,
}

impl RecoveryError {
    pub fn reason(&self) -> &'static str {
        match self {
            RecoveryError::AlreadyInitialized => "recovery already initialized",
            RecoveryError::NotInitialized => "recovery not initialized",
            RecoveryError::NotOwner => "caller is not the owner",
            RecoveryError::NotAGuardian => "caller is not a guardian",
            RecoveryError::ThresholdNotMet => "guardian threshold not met",
            RecoveryError::InvalidSecret => "invalid secret",
            RecoveryError::InvalidRecoveryConfig => "invalid recovery configuration",
            RecoveryError::GuardianAlreadyExists => "guardian already exists",
            RecoveryError::GuardianNotFound => "guardian not found",
            RecoveryError::RecoveryNotConfigured => "recovery not configured",
            RecoveryError::TooManyOpenAttempts => "too many open recovery attempts",
            RecoveryError::AttemptNotFound => "recovery attempt not found",
        }
    }
}

// ── Storage keys ──────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub enum DataKey {
    Owner,
    Gateway,
    Config,
    /// Votes of one recovery attempt
    Ballot(BytesN<32>),
    /// Open attempt ids
    Attempts,
}

#[contract]
pub struct SocialRecovery;

#[contractimpl]
impl SocialRecovery {
    pub fn initialize(env: Env, owner: Address, gateway: Address) -> Result<(), RecoveryError> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(RecoveryError::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Gateway, &gateway);
        Ok(())
    }

    pub fn owner(env: Env) -> Result<Address, RecoveryError> {
        Self::load_owner(&env)
    }

    pub fn gateway(env: Env) -> Result<Address, RecoveryError> {
        env.storage()
            .instance()
            .get(&DataKey::Gateway)
            .ok_or(RecoveryError::NotInitialized)
    }

    // ── Owner configuration ───────────────────────────────────────────────────

    /// Replaces guardians, threshold and secret commitment in one go.
    ///
    /// # Errors
    /// - `NotOwner` - caller is not the owner
    /// - `InvalidRecoveryConfig` - empty or duplicate guardians, or
    ///   threshold outside `1..=guardians.len()`
    pub fn configure_recovery(
        env: Env,
        caller: Address,
        guardians: Vec<Address>,
        threshold: u32,
        secret_hash: BytesN<32>,
    ) -> Result<(), RecoveryError> {
        Self::require_owner(&env, &caller)?;

        let config = RecoveryConfig {
            guardians,
            threshold,
            secret_hash,
        };
        config.validate()?;
        config::store(&env, &config);

        RecoveryConfiguredEvent {
            guardians: config.guardians.len(),
            threshold,
        }
        .publish(&env);
        Ok(())
    }

    pub fn add_guardian(
        env: Env,
        caller: Address,
        guardian: Address,
    ) -> Result<(), RecoveryError> {
        Self::require_owner(&env, &caller)?;
        let mut config = config::load(&env)?;
        if config.is_guardian(&guardian) {
            return Err(RecoveryError::GuardianAlreadyExists);
        }

        config.guardians.push_back(guardian.clone());
        config::store(&env, &config);
        GuardianAddedEvent { guardian }.publish(&env);
        Ok(())
    }

    /// Removes a guardian. Its votes stop counting immediately.
    ///
    /// # Errors
    /// - `GuardianNotFound` - not in the set
    /// - `InvalidRecoveryConfig` - fewer guardians than the threshold would
    ///   remain
    pub fn remove_guardian(
        env: Env,
        caller: Address,
        guardian: Address,
    ) -> Result<(), RecoveryError> {
        Self::require_owner(&env, &caller)?;
        let mut config = config::load(&env)?;
        let index = config
            .guardians
            .first_index_of(&guardian)
            .ok_or(RecoveryError::GuardianNotFound)?;
        if config.guardians.len() - 1 < config.threshold {
            return Err(RecoveryError::InvalidRecoveryConfig);
        }

        config.guardians.remove(index);
        config::store(&env, &config);
        GuardianRemovedEvent { guardian }.publish(&env);
        Ok(())
    }

    pub fn set_threshold(env: Env, caller: Address, threshold: u32) -> Result<(), RecoveryError> {
        Self::require_owner(&env, &caller)?;
        let mut config = config::load(&env)?;
        config.threshold = threshold;
        config.validate()?;

        config::store(&env, &config);
        ThresholdChangedEvent { threshold }.publish(&env);
        Ok(())
    }

    pub fn set_secret_hash(
        env: Env,
        caller: Address,
        secret_hash: BytesN<32>,
    ) -> Result<(), RecoveryError> {
        Self::require_owner(&env, &caller)?;
        let mut config = config::load(&env)?;
        config.secret_hash = secret_hash.clone();

        config::store(&env, &config);
        SecretHashChangedEvent { secret_hash }.publish(&env);
        Ok(())
    }

    /// Discards an open attempt and its votes.
    pub fn cancel_recovery_attempt(
        env: Env,
        caller: Address,
        attempt_id: BytesN<32>,
    ) -> Result<(), RecoveryError> {
        Self::require_owner(&env, &caller)?;
        if !ballot::clear(&env, &attempt_id) {
            return Err(RecoveryError::AttemptNotFound);
        }
        AttemptCancelledEvent { attempt_id }.publish(&env);
        Ok(())
    }

    // ── Recovery ──────────────────────────────────────────────────────────────

    /// Records `guardian`'s choice of `new_owner` for `attempt_id`, replacing
    /// any earlier vote of that guardian in the same attempt.
    ///
    /// # Errors
    /// - `NotAGuardian` - voter is not in the guardian set
    /// - `TooManyOpenAttempts` - `attempt_id` is new and
    ///   [`ballot::MAX_OPEN_ATTEMPTS`] attempts are already open
    pub fn vote_for_recovery(
        env: Env,
        guardian: Address,
        attempt_id: BytesN<32>,
        new_owner: Address,
    ) -> Result<(), RecoveryError> {
        guardian.require_auth();
        Self::load_owner(&env)?;
        let config = config::load(&env)?;
        if !config.is_guardian(&guardian) {
            return Err(RecoveryError::NotAGuardian);
        }

        ballot::cast(&env, &attempt_id, guardian.clone(), new_owner.clone())?;
        VoteCastEvent {
            attempt_id,
            guardian,
            new_owner,
        }
        .publish(&env);
        Ok(())
    }

    /// Grants `caller` every capability on the gateway once enough guardians
    /// voted for it in `attempt_id` and `secret` matches the commitment. The
    /// attempt is then closed and the commitment becomes `new_secret_hash`.
    ///
    /// # Errors
    /// - `ThresholdNotMet` - fewer than `threshold` guardians voted for caller
    /// - `InvalidSecret` - keccak256(secret) differs from the commitment
    pub fn recover_ownership(
        env: Env,
        caller: Address,
        attempt_id: BytesN<32>,
        secret: Bytes,
        new_secret_hash: BytesN<32>,
    ) -> Result<(), RecoveryError> {
        caller.require_auth();
        let gateway = Self::gateway(env.clone())?;
        let mut config = config::load(&env)?;

        let votes = ballot::tally(&env, &attempt_id, &caller, &config.guardians);
        if votes < config.threshold {
            return Err(RecoveryError::ThresholdNotMet);
        }
        if env.crypto().keccak256(&secret).to_bytes() != config.secret_hash {
            return Err(RecoveryError::InvalidSecret);
        }

        GatewayClient::new(&env, &gateway).set_permissions(
            &env.current_contract_address(),
            &Controller::Account(caller.clone()),
            &Permissions::ALL.capabilities(&env),
        );

        ballot::clear(&env, &attempt_id);
        config.secret_hash = new_secret_hash;
        config::store(&env, &config);

        log!(&env, "ownership recovered votes={} new_owner={}", votes, caller);
        OwnershipRecoveredEvent {
            attempt_id,
            new_owner: caller,
        }
        .publish(&env);
        Ok(())
    }

    // ── Views ─────────────────────────────────────────────────────────────────

    pub fn guardians(env: Env) -> Vec<Address> {
        config::load(&env)
            .map(|config| config.guardians)
            .unwrap_or_else(|_| Vec::new(&env))
    }

    pub fn threshold(env: Env) -> u32 {
        config::load(&env).map(|config| config.threshold).unwrap_or(0)
    }

    pub fn is_guardian(env: Env, who: Address) -> bool {
        config::load(&env)
            .map(|config| config.is_guardian(&who))
            .unwrap_or(false)
    }

    pub fn secret_hash(env: Env) -> Result<BytesN<32>, RecoveryError> {
        config::load(&env).map(|config| config.secret_hash)
    }

    pub fn vote_of(env: Env, attempt_id: BytesN<32>, guardian: Address) -> Option<Address> {
        ballot::vote_of(&env, &attempt_id, &guardian)
    }

    /// Votes for `candidate` in `attempt_id` from current guardians.
    pub fn tally(env: Env, attempt_id: BytesN<32>, candidate: Address) -> u32 {
        let guardians = Self::guardians(env.clone());
        ballot::tally(&env, &attempt_id, &candidate, &guardians)
    }

    /// Attempts that have votes and have not succeeded or been cancelled.
    pub fn attempt_ids(env: Env) -> Vec<BytesN<32>> {
        ballot::attempt_ids(&env)
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn load_owner(env: &Env) -> Result<Address, RecoveryError> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(RecoveryError::NotInitialized)
    }

    fn require_owner(env: &Env, caller: &Address) -> Result<(), RecoveryError> {
        caller.require_auth();
        if Self::load_owner(env)? != *caller {
            return Err(RecoveryError::NotOwner);
        }
        Ok(())
    }
}
