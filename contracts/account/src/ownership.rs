//! # Two-phase ownership transfer
//!
//! ```text
//! Stable ──transfer_ownership──▶ PendingClaim ──claim_ownership──▶ Stable (new owner)
//! ```
//!
//! While a transfer is pending the current owner keeps full authority and
//! the candidate has none. A pending transfer never expires and a second
//! transfer cannot start until the first is claimed.

use soroban_sdk::{contracttype, Address, Env};

use crate::events::{OwnershipClaimedEvent, OwnershipTransferStartedEvent};
use crate::{AccountError, DataKey};

/// A transfer waiting for its candidate to claim.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingOwnership {
    pub candidate: Address,
    pub initiator: Address,
}

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum OwnershipState {
    Stable = 0,
    PendingClaim = 1,
}

pub fn owner(env: &Env) -> Result<Address, AccountError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(AccountError::NotInitialized)
}

pub fn pending(env: &Env) -> Option<PendingOwnership> {
    env.storage().instance().get(&DataKey::Pending)
}

pub fn state(env: &Env) -> OwnershipState {
    if env.storage().instance().has(&DataKey::Pending) {
        OwnershipState::PendingClaim
    } else {
        OwnershipState::Stable
    }
}

/// Authenticates `caller` and checks it is the current owner.
pub fn require_owner(env: &Env, caller: &Address) -> Result<Address, AccountError> {
    caller.require_auth();
    let current = owner(env)?;
    if current != *caller {
        return Err(AccountError::NotOwner);
    }
    Ok(current)
}

pub fn start_transfer(env: &Env, caller: Address, candidate: Address) -> Result<(), AccountError> {
    require_owner(env, &caller)?;

    if state(env) == OwnershipState::PendingClaim {
        return Err(AccountError::OngoingTransfer);
    }
    if candidate == env.current_contract_address() {
        return Err(AccountError::CannotTransferToSelf);
    }

    env.storage().instance().set(
        &DataKey::Pending,
        &PendingOwnership {
            candidate: candidate.clone(),
            initiator: caller.clone(),
        },
    );

    OwnershipTransferStartedEvent {
        owner: caller,
        candidate,
    }
    .publish(env);
    Ok(())
}

pub fn claim(env: &Env, caller: Address) -> Result<(), AccountError> {
    caller.require_auth();

    let transfer = pending(env).ok_or(AccountError::NotAllowedToClaim)?;
    if transfer.candidate != caller {
        return Err(AccountError::NotAllowedToClaim);
    }

    let previous_owner = owner(env)?;
    env.storage().instance().set(&DataKey::Owner, &caller);
    env.storage().instance().remove(&DataKey::Pending);

    OwnershipClaimedEvent {
        previous_owner,
        new_owner: caller,
    }
    .publish(env);
    Ok(())
}
