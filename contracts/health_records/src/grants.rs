use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::storage;

/// Discretionary access level a record's creator hands out.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GrantLevel {
    Full,
    ReadOnly,
}

/// At most one grant exists per (record, grantee); absence means no access.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessGrant {
    pub record_id: u64,
    pub grantee: Address,
    pub level: GrantLevel,
    pub granted_at: u64,
}

fn grant_key(record_id: u64, grantee: &Address) -> (Symbol, u64, Address) {
    (symbol_short!("GRANT"), record_id, grantee.clone())
}

/// Write or overwrite the grant for (record, grantee).
pub fn put(env: &Env, record_id: u64, grantee: &Address, level: GrantLevel) -> AccessGrant {
    let grant = AccessGrant {
        record_id,
        grantee: grantee.clone(),
        level,
        granted_at: env.ledger().timestamp(),
    };
    let key = grant_key(record_id, grantee);
    env.storage().persistent().set(&key, &grant);
    storage::extend_persistent(env, &key);
    grant
}

/// Drop the grant if present. Returns whether one existed.
pub fn remove(env: &Env, record_id: u64, grantee: &Address) -> bool {
    let key = grant_key(record_id, grantee);
    if !env.storage().persistent().has(&key) {
        return false;
    }
    env.storage().persistent().remove(&key);
    true
}

pub fn get(env: &Env, record_id: u64, grantee: &Address) -> Option<AccessGrant> {
    let key = grant_key(record_id, grantee);
    let grant = env.storage().persistent().get::<_, AccessGrant>(&key)?;
    storage::extend_persistent(env, &key);
    Some(grant)
}

pub fn level(env: &Env, record_id: u64, grantee: &Address) -> Option<GrantLevel> {
    get(env, record_id, grantee).map(|grant| grant.level)
}

pub fn has_grant(env: &Env, record_id: u64, grantee: &Address) -> bool {
    get(env, record_id, grantee).is_some()
}
