//! Per-attempt guardian votes.
//!
//! A ballot maps each guardian to the new owner it vouches for. Voting
//! again replaces the earlier choice, so a guardian counts at most once per
//! attempt. Only guardians in the current set are counted.
//!
//! Open attempts are listed in persistent storage, at most
//! [`MAX_OPEN_ATTEMPTS`] at a time. An attempt closes when it succeeds or the
//! owner cancels it.

use soroban_sdk::{Address, BytesN, Env, Map, Vec};

use crate::{DataKey, RecoveryError};

pub const MAX_OPEN_ATTEMPTS: u32 = 16;

pub fn load(env: &Env, attempt_id: &BytesN<32>) -> Map<Address, Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Ballot(attempt_id.clone()))
        .unwrap_or_else(|| Map::new(env))
}

/// Records a vote, opening the attempt on its first one.
///
/// # Errors
/// - `TooManyOpenAttempts` - `attempt_id` is new and the open list is full
pub fn cast(
    env: &Env,
    attempt_id: &BytesN<32>,
    guardian: Address,
    new_owner: Address,
) -> Result<(), RecoveryError> {
    let mut ids = attempt_ids(env);
    if !ids.contains(attempt_id) {
        if ids.len() >= MAX_OPEN_ATTEMPTS {
            return Err(RecoveryError::TooManyOpenAttempts);
        }
        ids.push_back(attempt_id.clone());
        store_ids(env, &ids);
    }

    let mut ballot = load(env, attempt_id);
    ballot.set(guardian, new_owner);
    env.storage()
        .persistent()
        .set(&DataKey::Ballot(attempt_id.clone()), &ballot);
    Ok(())
}

pub fn vote_of(env: &Env, attempt_id: &BytesN<32>, guardian: &Address) -> Option<Address> {
    load(env, attempt_id).get(guardian.clone())
}

/// Number of `guardians` whose vote in this attempt names `candidate`.
pub fn tally(
    env: &Env,
    attempt_id: &BytesN<32>,
    candidate: &Address,
    guardians: &Vec<Address>,
) -> u32 {
    let ballot = load(env, attempt_id);
    guardians
        .iter()
        .filter(|guardian| ballot.get(guardian.clone()).as_ref() == Some(candidate))
        .count() as u32
}

/// Drops the attempt's votes and closes it. Returns whether it was open.
pub fn clear(env: &Env, attempt_id: &BytesN<32>) -> bool {
    env.storage()
        .persistent()
        .remove(&DataKey::Ballot(attempt_id.clone()));

    let mut ids = attempt_ids(env);
    match ids.first_index_of(attempt_id) {
        Some(index) => {
            ids.remove(index);
            store_ids(env, &ids);
            true
        }
        None => false,
    }
}

/// Open attempt ids, in order of first vote.
pub fn attempt_ids(env: &Env) -> Vec<BytesN<32>> {
    env.storage()
        .persistent()
        .get(&DataKey::Attempts)
        .unwrap_or_else(|| Vec::new(env))
}

fn store_ids(env: &Env, ids: &Vec<BytesN<32>>) {
    if ids.is_empty() {
        env.storage().persistent().remove(&DataKey::Attempts);
    } else {
        env.storage().persistent().set(&DataKey::Attempts, ids);
    }
}
