//! Audit events. Every state change publishes exactly one of these per
//! effect, inside the same invocation as the storage write, so the host
//! commits or discards both together.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

use crate::{config::EngineConfig, grants::GrantLevel, roles::Role};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleEvent {
    pub principal: Address,
    pub role: Role,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordAddedEvent {
    pub record_id: u64,
    pub creator: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordUpdatedEvent {
    pub record_id: u64,
    pub editor: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessGrantedEvent {
    pub record_id: u64,
    pub grantee: Address,
    pub level: GrantLevel,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessRevokedEvent {
    pub record_id: u64,
    pub grantee: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyAccessUsedEvent {
    pub event_id: u64,
    pub record_id: u64,
    pub provider: Address,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, admin: Address) {
    env.events()
        .publish((symbol_short!("INIT"),), InitializedEvent { admin });
}

pub fn publish_config_updated(env: &Env, config: EngineConfig) {
    env.events().publish((symbol_short!("CFG_SET"),), config);
}

pub fn publish_role_assigned(env: &Env, principal: Address, role: Role) {
    env.events().publish(
        (symbol_short!("ROLE_ASG"), principal.clone()),
        RoleEvent { principal, role },
    );
}

pub fn publish_role_revoked(env: &Env, principal: Address, role: Role) {
    env.events().publish(
        (symbol_short!("ROLE_REV"), principal.clone()),
        RoleEvent { principal, role },
    );
}

pub fn publish_record_added(env: &Env, record_id: u64, creator: Address) {
    env.events().publish(
        (symbol_short!("REC_ADD"), record_id, creator.clone()),
        RecordAddedEvent { record_id, creator },
    );
}

pub fn publish_record_updated(env: &Env, record_id: u64, editor: Address) {
    env.events().publish(
        (symbol_short!("REC_UPD"), record_id),
        RecordUpdatedEvent { record_id, editor },
    );
}

pub fn publish_access_granted(env: &Env, record_id: u64, grantee: Address, level: GrantLevel) {
    env.events().publish(
        (symbol_short!("ACC_GRT"), record_id, grantee.clone()),
        AccessGrantedEvent {
            record_id,
            grantee,
            level,
        },
    );
}

pub fn publish_access_revoked(env: &Env, record_id: u64, grantee: Address) {
    env.events().publish(
        (symbol_short!("ACC_REV"), record_id, grantee.clone()),
        AccessRevokedEvent { record_id, grantee },
    );
}

pub fn publish_emergency_access_used(
    env: &Env,
    event_id: u64,
    record_id: u64,
    provider: Address,
    timestamp: u64,
) {
    env.events().publish(
        (symbol_short!("EMRG_USE"), record_id, provider.clone()),
        EmergencyAccessUsedEvent {
            event_id,
            record_id,
            provider,
            timestamp,
        },
    );
}
