use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::storage;

/// System-wide capability labels, independent of any single record.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Admin,
    Patient,
    Provider,
    Insurer,
}

fn roles_key(principal: &Address) -> (Symbol, Address) {
    (symbol_short!("ROLES"), principal.clone())
}

/// Every role held by `principal`, in assignment order.
pub fn get_roles(env: &Env, principal: &Address) -> Vec<Role> {
    let key = roles_key(principal);
    match env.storage().persistent().get::<_, Vec<Role>>(&key) {
        Some(roles) => {
            storage::extend_persistent(env, &key);
            roles
        }
        None => Vec::new(env),
    }
}

pub fn has_role(env: &Env, principal: &Address, role: Role) -> bool {
    get_roles(env, principal).iter().any(|held| held == role)
}

/// Adds `role` to the principal's set. Returns `false` if it was already held.
pub fn add_role(env: &Env, principal: &Address, role: Role) -> bool {
    let mut roles = get_roles(env, principal);
    if roles.iter().any(|held| held == role) {
        return false;
    }
    roles.push_back(role);

    let key = roles_key(principal);
    env.storage().persistent().set(&key, &roles);
    storage::extend_persistent(env, &key);
    true
}

/// Removes `role` from the principal's set. Returns `false` if it was not held.
pub fn remove_role(env: &Env, principal: &Address, role: Role) -> bool {
    let roles = get_roles(env, principal);
    let mut kept = Vec::new(env);
    for held in roles.iter() {
        if held != role {
            kept.push_back(held);
        }
    }
    if kept.len() == roles.len() {
        return false;
    }

    let key = roles_key(principal);
    if kept.is_empty() {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &kept);
        storage::extend_persistent(env, &key);
    }
    true
}
