#![no_std]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod emergency;
pub mod events;
pub mod grants;
pub mod records;
pub mod roles;
mod storage;
pub mod validation;

use soroban_sdk::{
    contract, contractimpl, log, symbol_short, Address, Env, IntoVal, String, Symbol, Vec,
};

pub use config::{EmergencyMode, EngineConfig};
pub use emergency::EmergencyAccessEvent;
pub use grants::{AccessGrant, GrantLevel};
pub use records::{HealthRecord, RecordSummary};
pub use roles::Role;

/// Storage keys for the contract
const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");

/// Contract errors
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    RecordNotFound = 4,
    InvalidInput = 5,
}

/// Log why `caller` was turned away and produce the error to return.
fn deny(env: &Env, caller: &Address, reason: &'static str) -> ContractError {
    env.logs().add(reason, &[caller.into_val(env)]);
    ContractError::Unauthorized
}

fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
    if roles::has_role(env, caller, Role::Admin) {
        Ok(())
    } else {
        Err(deny(env, caller, "unauthorized: caller must be admin"))
    }
}

fn can_read_record(env: &Env, caller: &Address, record: &HealthRecord) -> bool {
    *caller == record.creator
        || grants::has_grant(env, record.id, caller)
        || roles::has_role(env, caller, Role::Provider)
}

fn can_write_record(
    env: &Env,
    config: &EngineConfig,
    caller: &Address,
    record: &HealthRecord,
) -> bool {
    if *caller == record.creator {
        return true;
    }
    match grants::level(env, record.id, caller) {
        Some(GrantLevel::Full) => true,
        Some(GrantLevel::ReadOnly) => config.read_only_can_write,
        None => false,
    }
}

/// Break-glass checks: Provider role first, then record existence.
fn emergency_target(
    env: &Env,
    caller: &Address,
    record_id: u64,
) -> Result<HealthRecord, ContractError> {
    if !roles::has_role(env, caller, Role::Provider) {
        return Err(deny(
            env,
            caller,
            "unauthorized: emergency access requires the provider role",
        ));
    }
    records::get(env, record_id)
}

/// Append the override to the log and, in `StandingGrant` mode, leave a Full
/// grant behind.
fn record_emergency(env: &Env, config: &EngineConfig, caller: &Address, record_id: u64) {
    let entry = emergency::append(env, record_id, caller);
    events::publish_emergency_access_used(
        env,
        entry.id,
        record_id,
        caller.clone(),
        entry.timestamp,
    );
    log!(env, "emergency access used", record_id, entry.id);

    if config.emergency_mode == EmergencyMode::StandingGrant {
        grants::put(env, record_id, caller, GrantLevel::Full);
        events::publish_access_granted(env, record_id, caller.clone(), GrantLevel::Full);
    }

    storage::extend_instance(env);
}

#[contract]
pub struct HealthRecordsContract;

#[contractimpl]
impl HealthRecordsContract {
    /// Initialize the contract, making `admin` the one and only Admin.
    pub fn initialize(
        env: Env,
        admin: Address,
        config: EngineConfig,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);
        config::store(&env, &config);
        records::init_counter(&env, config.first_record_id);
        roles::add_role(&env, &admin, Role::Admin);
        storage::extend_instance(&env);

        events::publish_initialized(&env, admin);

        Ok(())
    }

    /// Get the admin address
    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    /// Check if the contract is initialized
    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_config(env: Env) -> Result<EngineConfig, ContractError> {
        config::load(&env)
    }

    /// Replace the access policy. The record id base cannot change after
    /// initialization.
    pub fn set_config(
        env: Env,
        caller: Address,
        config: EngineConfig,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        require_admin(&env, &caller)?;

        let current = config::load(&env)?;
        if current.first_record_id != config.first_record_id {
            return Err(ContractError::InvalidInput);
        }

        config::store(&env, &config);
        storage::extend_instance(&env);
        events::publish_config_updated(&env, config);

        Ok(())
    }

    // ── Roles ─────────────────────────────────────────────────

    /// Give `target` a non-Admin role. Re-assigning a held role changes nothing.
    pub fn assign_role(
        env: Env,
        caller: Address,
        target: Address,
        role: Role,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        require_admin(&env, &caller)?;

        if role == Role::Admin {
            return Err(ContractError::InvalidInput);
        }

        if roles::add_role(&env, &target, role) {
            events::publish_role_assigned(&env, target, role);
        }

        Ok(())
    }

    /// Take a non-Admin role away from `target`. Absent roles are a no-op.
    pub fn revoke_role(
        env: Env,
        caller: Address,
        target: Address,
        role: Role,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        require_admin(&env, &caller)?;

        if role == Role::Admin {
            return Err(ContractError::InvalidInput);
        }

        if roles::remove_role(&env, &target, role) {
            events::publish_role_revoked(&env, target, role);
        }

        Ok(())
    }

    pub fn has_role(env: Env, principal: Address, role: Role) -> bool {
        roles::has_role(&env, &principal, role)
    }

    pub fn get_roles(env: Env, principal: Address) -> Vec<Role> {
        roles::get_roles(&env, &principal)
    }

    // ── Records ───────────────────────────────────────────────

    /// Create a record owned by the caller and return its id.
    pub fn create_record(
        env: Env,
        caller: Address,
        title: String,
        content_ref: String,
    ) -> Result<u64, ContractError> {
        caller.require_auth();

        if !roles::has_role(&env, &caller, Role::Patient)
            && !roles::has_role(&env, &caller, Role::Provider)
        {
            return Err(deny(
                &env,
                &caller,
                "unauthorized: caller must be a patient or provider",
            ));
        }
        validation::validate_title(&title)?;
        validation::validate_content_ref(&content_ref)?;

        let record = records::create(&env, &caller, title, content_ref)?;
        storage::extend_instance(&env);

        events::publish_record_added(&env, record.id, caller);

        Ok(record.id)
    }

    /// Replace a record's title and content reference.
    pub fn update_record(
        env: Env,
        caller: Address,
        record_id: u64,
        title: String,
        content_ref: String,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        let config = config::load(&env)?;
        let record = records::get(&env, record_id)?;
        if !can_write_record(&env, &config, &caller, &record) {
            return Err(deny(
                &env,
                &caller,
                "unauthorized: caller must be the creator or hold a write grant",
            ));
        }
        validation::validate_title(&title)?;
        validation::validate_content_ref(&content_ref)?;

        records::update_content(&env, &record, title, content_ref);
        storage::extend_instance(&env);

        events::publish_record_updated(&env, record_id, caller);

        Ok(())
    }

    pub fn get_record(
        env: Env,
        caller: Address,
        record_id: u64,
    ) -> Result<HealthRecord, ContractError> {
        caller.require_auth();

        let record = records::get(&env, record_id)?;
        if !can_read_record(&env, &caller, &record) {
            return Err(deny(
                &env,
                &caller,
                "unauthorized: caller must be the creator, a grantee, or a provider",
            ));
        }

        Ok(record)
    }

    /// Every record created by `patient`, oldest first.
    ///
    /// Reads one entry per record, so a very large history can exceed the
    /// per-invocation read budget.
    pub fn get_patient_records(
        env: Env,
        caller: Address,
        patient: Address,
    ) -> Result<Vec<RecordSummary>, ContractError> {
        caller.require_auth();

        let ids = records::ids_by_creator(&env, &patient);
        let allowed = caller == patient
            || roles::has_role(&env, &caller, Role::Provider)
            || ids.iter().any(|id| grants::has_grant(&env, id, &caller));
        if !allowed {
            return Err(deny(
                &env,
                &caller,
                "unauthorized: caller must be the patient, a provider, or have explicit access",
            ));
        }

        let mut summaries = Vec::new(&env);
        for id in ids.iter() {
            summaries.push_back(records::get(&env, id)?.summary());
        }

        Ok(summaries)
    }

    /// Get the total number of records
    pub fn get_record_count(env: Env) -> u64 {
        records::record_count(&env)
    }

    // ── Grants ────────────────────────────────────────────────

    /// Grant (or overwrite) `grantee`'s access to one of the caller's records.
    pub fn grant_access(
        env: Env,
        caller: Address,
        grantee: Address,
        record_id: u64,
        level: GrantLevel,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        let record = records::get(&env, record_id)?;
        if caller != record.creator {
            return Err(deny(
                &env,
                &caller,
                "unauthorized: only the record creator can grant access",
            ));
        }

        grants::put(&env, record_id, &grantee, level);
        storage::extend_instance(&env);

        events::publish_access_granted(&env, record_id, grantee, level);

        Ok(())
    }

    /// Remove `grantee`'s access. Revoking a missing grant is not an error.
    pub fn revoke_access(
        env: Env,
        caller: Address,
        grantee: Address,
        record_id: u64,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        let record = records::get(&env, record_id)?;
        if caller != record.creator && !roles::has_role(&env, &caller, Role::Admin) {
            return Err(deny(
                &env,
                &caller,
                "unauthorized: caller must be the record creator or admin",
            ));
        }

        grants::remove(&env, record_id, &grantee);
        storage::extend_instance(&env);

        events::publish_access_revoked(&env, record_id, grantee);

        Ok(())
    }

    /// Whether the caller has discretionary access (creator or any grant).
    /// Standing provider read access is not counted.
    pub fn has_access(env: Env, caller: Address, record_id: u64) -> Result<bool, ContractError> {
        let record = records::get(&env, record_id)?;
        Ok(caller == record.creator || grants::has_grant(&env, record_id, &caller))
    }

    pub fn has_grant(env: Env, record_id: u64, principal: Address) -> bool {
        grants::has_grant(&env, record_id, &principal)
    }

    pub fn grant_level(env: Env, record_id: u64, principal: Address) -> Option<GrantLevel> {
        grants::level(&env, record_id, &principal)
    }

    pub fn can_read(env: Env, caller: Address, record_id: u64) -> Result<bool, ContractError> {
        let record = records::get(&env, record_id)?;
        Ok(can_read_record(&env, &caller, &record))
    }

    pub fn can_write(env: Env, caller: Address, record_id: u64) -> Result<bool, ContractError> {
        let config = config::load(&env)?;
        let record = records::get(&env, record_id)?;
        Ok(can_write_record(&env, &config, &caller, &record))
    }

    // ── Emergency access ──────────────────────────────────────

    /// Provider break-glass read. Logged whether or not the provider already
    /// had access.
    pub fn use_emergency_access(
        env: Env,
        caller: Address,
        record_id: u64,
    ) -> Result<HealthRecord, ContractError> {
        caller.require_auth();

        let config = config::load(&env)?;
        let record = emergency_target(&env, &caller, record_id)?;
        record_emergency(&env, &config, &caller, record_id);

        Ok(record)
    }

    /// Provider break-glass write, scoped to this call.
    pub fn emergency_update_record(
        env: Env,
        caller: Address,
        record_id: u64,
        title: String,
        content_ref: String,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        let config = config::load(&env)?;
        let record = emergency_target(&env, &caller, record_id)?;
        validation::validate_title(&title)?;
        validation::validate_content_ref(&content_ref)?;

        record_emergency(&env, &config, &caller, record_id);
        records::update_content(&env, &record, title, content_ref);

        events::publish_record_updated(&env, record_id, caller);

        Ok(())
    }

    /// Break-glass history for a record, visible to its creator and the admin.
    pub fn get_emergency_events(
        env: Env,
        caller: Address,
        record_id: u64,
    ) -> Result<Vec<EmergencyAccessEvent>, ContractError> {
        caller.require_auth();

        let record = records::get(&env, record_id)?;
        if caller != record.creator && !roles::has_role(&env, &caller, Role::Admin) {
            return Err(deny(
                &env,
                &caller,
                "unauthorized: caller must be the record creator or admin",
            ));
        }

        Ok(emergency::events_for_record(&env, record_id))
    }

    pub fn get_emergency_event_count(env: Env) -> u64 {
        emergency::event_count(&env)
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }
}


#[cfg(test)]
mod proptests;
