use soroban_sdk::{contracttype, Address, BytesN, Env, Vec};

use crate::{DataKey, RecoveryError};

/// Guardian set, vote threshold and committed secret.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecoveryConfig {
    pub guardians: Vec<Address>,
    pub threshold: u32,
    /// keccak256 of the recovery secret
    pub secret_hash: BytesN<32>,
}

impl RecoveryConfig {
    /// Guardians non-empty and distinct, `1 <= threshold <= guardians`.
    pub fn validate(&self) -> Result<(), RecoveryError> {
        let count = self.guardians.len();
        if count == 0 || self.threshold == 0 || self.threshold > count {
            return Err(RecoveryError::InvalidRecoveryConfig);
        }
        for (i, guardian) in self.guardians.iter().enumerate() {
            let later = self.guardians.slice(i as u32 + 1..count);
            if later.contains(&guardian) {
                return Err(RecoveryError::InvalidRecoveryConfig);
            }
        }
        Ok(())
    }

    pub fn is_guardian(&self, who: &Address) -> bool {
        self.guardians.contains(who)
    }
}

pub fn load(env: &Env) -> Result<RecoveryConfig, RecoveryError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(RecoveryError::RecoveryNotConfigured)
}

pub fn store(env: &Env, config: &RecoveryConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}
