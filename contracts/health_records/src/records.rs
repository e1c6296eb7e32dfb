use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use crate::{storage, ContractError};

/// Next id to hand out; seeded from `EngineConfig::first_record_id`.
const REC_NEXT: Symbol = symbol_short!("REC_NEXT");
const REC_CTR: Symbol = symbol_short!("REC_CTR");

/// A per-person record. `id` and `creator` are fixed at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HealthRecord {
    pub id: u64,
    pub creator: Address,
    pub title: String,
    /// Opaque pointer to the externally stored payload (IPFS CID, digest, URI).
    pub content_ref: String,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Listing entry returned for a patient's records; the creator is implied.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordSummary {
    pub id: u64,
    pub title: String,
    pub content_ref: String,
    pub created_at: u64,
}

impl HealthRecord {
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            id: self.id,
            title: self.title.clone(),
            content_ref: self.content_ref.clone(),
            created_at: self.created_at,
        }
    }
}

fn record_key(id: u64) -> (Symbol, u64) {
    (symbol_short!("RECORD"), id)
}

fn creator_len_key(creator: &Address) -> (Symbol, Address) {
    (symbol_short!("CRT_LEN"), creator.clone())
}

fn creator_page_key(creator: &Address, page: u32) -> (Symbol, Address, u32) {
    (symbol_short!("CRT_REC"), creator.clone(), page)
}

pub fn init_counter(env: &Env, first_id: u64) {
    env.storage().instance().set(&REC_NEXT, &first_id);
    env.storage().instance().set(&REC_CTR, &0u64);
}

/// Allocate the next record id. Ids strictly increase and are never reused.
fn next_id(env: &Env) -> Result<u64, ContractError> {
    let id: u64 = env
        .storage()
        .instance()
        .get(&REC_NEXT)
        .ok_or(ContractError::NotInitialized)?;
    let next = id.checked_add(1).ok_or(ContractError::InvalidInput)?;
    env.storage().instance().set(&REC_NEXT, &next);

    let count = record_count(env).saturating_add(1);
    env.storage().instance().set(&REC_CTR, &count);
    Ok(id)
}

pub fn record_count(env: &Env) -> u64 {
    env.storage().instance().get(&REC_CTR).unwrap_or(0)
}

/// Create and persist a record owned by `creator`.
pub fn create(
    env: &Env,
    creator: &Address,
    title: String,
    content_ref: String,
) -> Result<HealthRecord, ContractError> {
    let id = next_id(env)?;
    let now = env.ledger().timestamp();
    let record = HealthRecord {
        id,
        creator: creator.clone(),
        title,
        content_ref,
        created_at: now,
        updated_at: now,
    };
    save(env, &record);

    storage::index_push(
        env,
        &creator_len_key(creator),
        |page| creator_page_key(creator, page),
        id,
    );

    Ok(record)
}

pub fn get(env: &Env, id: u64) -> Result<HealthRecord, ContractError> {
    let key = record_key(id);
    let record = env
        .storage()
        .persistent()
        .get::<_, HealthRecord>(&key)
        .ok_or(ContractError::RecordNotFound)?;
    storage::extend_persistent(env, &key);
    Ok(record)
}

/// Overwrite the mutable fields. `id` and `creator` are carried over from
/// the stored record, never from the caller.
pub fn update_content(
    env: &Env,
    record: &HealthRecord,
    title: String,
    content_ref: String,
) -> HealthRecord {
    let updated = HealthRecord {
        id: record.id,
        creator: record.creator.clone(),
        title,
        content_ref,
        created_at: record.created_at,
        updated_at: env.ledger().timestamp(),
    };
    save(env, &updated);
    updated
}

/// Ids of every record created by `creator`, oldest first.
pub fn ids_by_creator(env: &Env, creator: &Address) -> Vec<u64> {
    storage::index_all(env, &creator_len_key(creator), |page| {
        creator_page_key(creator, page)
    })
}

fn save(env: &Env, record: &HealthRecord) {
    let key = record_key(record.id);
    env.storage().persistent().set(&key, record);
    storage::extend_persistent(env, &key);
}
