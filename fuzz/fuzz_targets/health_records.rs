#![no_main]

use arbitrary::Arbitrary;
use health_records::{
    ContractError, EmergencyMode, EngineConfig, GrantLevel, HealthRecordsContract,
    HealthRecordsContractClient, Role,
};
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{testutils::Address as _, Address, Env, String};

#[derive(Arbitrary, Debug)]
enum Action {
    Create { actor: u8 },
    Update { actor: u8, record: u8 },
    Grant { actor: u8, grantee: u8, record: u8, full: bool },
    Revoke { actor: u8, grantee: u8, record: u8 },
    Emergency { actor: u8, record: u8 },
    EmergencyUpdate { actor: u8, record: u8 },
    AssignRole { actor: u8, target: u8, role: u8 },
}

#[derive(Arbitrary, Debug)]
struct Input {
    read_only_can_write: bool,
    standing_emergency_grant: bool,
    actions: Vec<Action>,
}

fn role_from(raw: u8) -> Role {
    match raw % 4 {
        0 => Role::Admin,
        1 => Role::Patient,
        2 => Role::Provider,
        _ => Role::Insurer,
    }
}

fuzz_target!(|input: Input| {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(HealthRecordsContract, ());
    let client = HealthRecordsContractClient::new(&env, &contract_id);

    let mut config = EngineConfig::standard();
    config.read_only_can_write = input.read_only_can_write;
    if input.standing_emergency_grant {
        config.emergency_mode = EmergencyMode::StandingGrant;
    }

    // Slot 0 is the admin; the rest start with one role each.
    let actors: Vec<Address> = (0..6).map(|_| Address::generate(&env)).collect();
    client.initialize(&actors[0], &config);
    client.assign_role(&actors[0], &actors[1], &Role::Patient);
    client.assign_role(&actors[0], &actors[2], &Role::Provider);
    client.assign_role(&actors[0], &actors[3], &Role::Insurer);

    let pick = |raw: u8| &actors[raw as usize % actors.len()];
    let title = String::from_str(&env, "Fuzzed");
    let content = String::from_str(&env, "hash1");
    let mut creators: Vec<Address> = Vec::new();

    for action in input.actions.iter().take(64) {
        let known = creators.len() as u64;
        let record_id = |raw: u8| (raw as u64) % (known + 1);
        match *action {
            Action::Create { actor } => {
                match client.try_create_record(pick(actor), &title, &content) {
                    Ok(Ok(id)) => {
                        assert_eq!(id, known);
                        creators.push(pick(actor).clone());
                    }
                    Ok(Err(_)) | Err(Err(_)) => panic!("unexpected host failure"),
                    Err(Ok(_)) => {}
                }
            }
            Action::Update { actor, record } => {
                let id = record_id(record);
                let allowed = client.try_can_write(pick(actor), &id);
                let result = client.try_update_record(pick(actor), &id, &title, &content);
                match (allowed, result) {
                    (Ok(Ok(true)), Ok(Ok(()))) => {}
                    (Ok(Ok(false)), Err(Ok(ContractError::Unauthorized))) => {}
                    (
                        Err(Ok(ContractError::RecordNotFound)),
                        Err(Ok(ContractError::RecordNotFound)),
                    ) => {}
                    (allowed, result) => {
                        panic!("write predicate disagrees: {allowed:?} vs {result:?}")
                    }
                }
            }
            Action::Grant {
                actor,
                grantee,
                record,
                full,
            } => {
                let level = if full { GrantLevel::Full } else { GrantLevel::ReadOnly };
                let id = record_id(record);
                match client.try_grant_access(pick(actor), pick(grantee), &id, &level) {
                    Ok(_) => {
                        assert_eq!(client.grant_level(&id, pick(grantee)), Some(level));
                    }
                    Err(Ok(_)) => {}
                    Err(Err(_)) => panic!("unexpected host failure"),
                }
            }
            Action::Revoke {
                actor,
                grantee,
                record,
            } => {
                let id = record_id(record);
                match client.try_revoke_access(pick(actor), pick(grantee), &id) {
                    Ok(_) => {
                        assert!(!client.has_grant(&id, pick(grantee)));
                    }
                    Err(Ok(_)) => {}
                    Err(Err(_)) => panic!("unexpected host failure"),
                }
            }
            Action::Emergency { actor, record } => {
                let before = client.get_emergency_event_count();
                let id = record_id(record);
                let is_provider = client.has_role(pick(actor), &Role::Provider);
                match client.try_use_emergency_access(pick(actor), &id) {
                    Ok(_) => {
                        assert!(is_provider);
                        assert_eq!(client.get_emergency_event_count(), before + 1);
                    }
                    Err(Ok(_)) => {
                        assert_eq!(client.get_emergency_event_count(), before);
                    }
                    Err(Err(_)) => panic!("unexpected host failure"),
                }
            }
            Action::EmergencyUpdate { actor, record } => {
                let id = record_id(record);
                match client.try_emergency_update_record(pick(actor), &id, &title, &content) {
                    Ok(_) | Err(Ok(_)) => {}
                    Err(Err(_)) => panic!("unexpected host failure"),
                }
            }
            Action::AssignRole { actor, target, role } => {
                match client.try_assign_role(pick(actor), pick(target), &role_from(role)) {
                    Ok(_) | Err(Ok(_)) => {}
                    Err(Err(_)) => panic!("unexpected host failure"),
                }
            }
        }

        // Creators never change, whatever happened above.
        for (id, creator) in creators.iter().enumerate() {
            let record = client.get_record(creator, &(id as u64));
            assert_eq!(&record.creator, creator);
        }
    }

    // Admin stays unique.
    for actor in actors.iter().skip(1) {
        assert!(!client.has_role(actor, &Role::Admin));
    }
});
