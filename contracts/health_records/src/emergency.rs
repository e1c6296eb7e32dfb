use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::storage;

// ── Storage keys ──────────────────────────────────────────────
pub const EMRG_CTR: Symbol = symbol_short!("EMRG_CTR");

// ── Types ─────────────────────────────────────────────────────

/// Immutable break-glass entry. Written once, never updated or deleted.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyAccessEvent {
    /// Sequence number across the whole log, starting at 1.
    pub id: u64,
    pub record_id: u64,
    pub provider: Address,
    pub timestamp: u64,
}

// ── Storage helpers ───────────────────────────────────────────

fn event_key(id: u64) -> (Symbol, u64) {
    (symbol_short!("EMRG"), id)
}

fn record_len_key(record_id: u64) -> (Symbol, u64) {
    (symbol_short!("EMRG_LEN"), record_id)
}

fn record_page_key(record_id: u64, page: u32) -> (Symbol, u64, u32) {
    (symbol_short!("EMRG_REC"), record_id, page)
}

pub fn event_count(env: &Env) -> u64 {
    env.storage().instance().get(&EMRG_CTR).unwrap_or(0)
}

/// Append an override event for `record_id` and index it under the record.
pub fn append(env: &Env, record_id: u64, provider: &Address) -> EmergencyAccessEvent {
    let id = event_count(env).saturating_add(1);
    env.storage().instance().set(&EMRG_CTR, &id);

    let event = EmergencyAccessEvent {
        id,
        record_id,
        provider: provider.clone(),
        timestamp: env.ledger().timestamp(),
    };
    let key = event_key(id);
    env.storage().persistent().set(&key, &event);
    storage::extend_persistent(env, &key);

    storage::index_push(
        env,
        &record_len_key(record_id),
        |page| record_page_key(record_id, page),
        id,
    );

    event
}

/// All override events recorded against `record_id`, oldest first.
pub fn events_for_record(env: &Env, record_id: u64) -> Vec<EmergencyAccessEvent> {
    let mut events = Vec::new(env);
    let ids = storage::index_all(env, &record_len_key(record_id), |page| {
        record_page_key(record_id, page)
    });

    for id in ids.iter() {
        let key = event_key(id);
        if let Some(event) = env.storage().persistent().get::<_, EmergencyAccessEvent>(&key) {
            storage::extend_persistent(env, &key);
            events.push_back(event);
        }
    }
    events
}
