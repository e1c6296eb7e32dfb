use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::ContractError;

const CONFIG: Symbol = symbol_short!("CONFIG");

/// What a provider's break-glass invocation leaves behind.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EmergencyMode {
    /// Access lasts for the emergency call only.
    Transient,
    /// The call also installs a standing Full grant for the provider.
    StandingGrant,
}

/// Policy switches for the points where deployments have historically
/// disagreed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    /// Id handed to the first record. Fixed once the contract is initialized.
    pub first_record_id: u64,
    /// Whether a ReadOnly grant is enough to update a record.
    pub read_only_can_write: bool,
    pub emergency_mode: EmergencyMode,
}

impl EngineConfig {
    /// Ids from 0, Full grant required to write, transient emergency access.
    pub fn standard() -> Self {
        EngineConfig {
            first_record_id: 0,
            read_only_can_write: false,
            emergency_mode: EmergencyMode::Transient,
        }
    }
}

pub fn store(env: &Env, config: &EngineConfig) {
    env.storage().instance().set(&CONFIG, config);
}

pub fn load(env: &Env) -> Result<EngineConfig, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}
