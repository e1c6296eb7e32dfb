//! Model-based checks: random operation sequences run against the contract
//! and a plain in-memory model, which must agree after every step.

use std::collections::BTreeMap;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{Address, Env, String};

use crate::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Arbitrary)]
enum Actor {
    Patient,
    Provider,
    Insurer,
    Outsider,
}

const ACTORS: [Actor; 4] = [Actor::Patient, Actor::Provider, Actor::Insurer, Actor::Outsider];

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Create { actor: Actor },
    Update { actor: Actor, record: u8 },
    Grant { actor: Actor, grantee: Actor, record: u8, full: bool },
    Revoke { actor: Actor, grantee: Actor, record: u8 },
    Emergency { actor: Actor, record: u8 },
}

#[derive(Default)]
struct Model {
    creators: BTreeMap<u64, Actor>,
    grants: BTreeMap<(u64, Actor), GrantLevel>,
    emergency_events: u64,
}

impl Model {
    fn can_write(&self, actor: Actor, record_id: u64) -> bool {
        self.creators.get(&record_id) == Some(&actor)
            || self.grants.get(&(record_id, actor)) == Some(&GrantLevel::Full)
    }
}

struct Harness<'a> {
    env: &'a Env,
    client: HealthRecordsContractClient<'a>,
    addresses: [Address; 4],
}

impl<'a> Harness<'a> {
    fn new(env: &'a Env) -> Self {
        env.mock_all_auths();
        let contract_id = env.register(HealthRecordsContract, ());
        let client = HealthRecordsContractClient::new(env, &contract_id);

        let admin = Address::generate(env);
        client.initialize(&admin, &EngineConfig::standard());

        let addresses = [
            Address::generate(env),
            Address::generate(env),
            Address::generate(env),
            Address::generate(env),
        ];
        client.assign_role(&admin, &addresses[0], &Role::Patient);
        client.assign_role(&admin, &addresses[1], &Role::Provider);
        client.assign_role(&admin, &addresses[2], &Role::Insurer);

        Harness {
            env,
            client,
            addresses,
        }
    }

    fn addr(&self, actor: Actor) -> &Address {
        &self.addresses[actor as usize]
    }

    fn text(&self, value: &str) -> String {
        String::from_str(self.env, value)
    }
}

fn outcome<T, E1, E2>(
    result: Result<Result<T, E1>, Result<ContractError, E2>>,
) -> Result<(), ContractError> {
    match result {
        Ok(_) => Ok(()),
        Err(Ok(err)) => Err(err),
        Err(Err(_)) => panic!("host failure outside the contract's error set"),
    }
}

/// Map a raw byte onto a record id, one past the end meaning "unknown".
fn pick_record(model: &Model, raw: u8) -> u64 {
    (raw as u64) % (model.creators.len() as u64 + 1)
}

fn expect_existing(
    model: &Model,
    record_id: u64,
    allowed: impl FnOnce(Actor) -> bool,
) -> Result<(), ContractError> {
    match model.creators.get(&record_id) {
        None => Err(ContractError::RecordNotFound),
        Some(creator) if allowed(*creator) => Ok(()),
        Some(_) => Err(ContractError::Unauthorized),
    }
}

fn apply(h: &Harness, model: &mut Model, op: &Op) -> Result<(), TestCaseError> {
    match *op {
        Op::Create { actor } => {
            let expected = if matches!(actor, Actor::Patient | Actor::Provider) {
                Ok(())
            } else {
                Err(ContractError::Unauthorized)
            };
            let got = outcome(h.client.try_create_record(
                h.addr(actor),
                &h.text("Record"),
                &h.text("hash1"),
            ));
            prop_assert_eq!(got, expected);
            if got.is_ok() {
                let id = model.creators.len() as u64;
                model.creators.insert(id, actor);
            }
        }
        Op::Update { actor, record } => {
            let record_id = pick_record(model, record);
            let expected = match model.creators.get(&record_id) {
                None => Err(ContractError::RecordNotFound),
                Some(_) if model.can_write(actor, record_id) => Ok(()),
                Some(_) => Err(ContractError::Unauthorized),
            };
            let got = outcome(h.client.try_update_record(
                h.addr(actor),
                &record_id,
                &h.text("Updated"),
                &h.text("hash2"),
            ));
            prop_assert_eq!(got, expected);
        }
        Op::Grant {
            actor,
            grantee,
            record,
            full,
        } => {
            let record_id = pick_record(model, record);
            let level = if full {
                GrantLevel::Full
            } else {
                GrantLevel::ReadOnly
            };
            let expected = expect_existing(model, record_id, |creator| creator == actor);
            let got = outcome(h.client.try_grant_access(
                h.addr(actor),
                h.addr(grantee),
                &record_id,
                &level,
            ));
            prop_assert_eq!(got, expected);
            if got.is_ok() {
                model.grants.insert((record_id, grantee), level);
            }
        }
        Op::Revoke {
            actor,
            grantee,
            record,
        } => {
            let record_id = pick_record(model, record);
            let expected = expect_existing(model, record_id, |creator| creator == actor);
            let got = outcome(h.client.try_revoke_access(
                h.addr(actor),
                h.addr(grantee),
                &record_id,
            ));
            prop_assert_eq!(got, expected);
            if got.is_ok() {
                model.grants.remove(&(record_id, grantee));
            }
        }
        Op::Emergency { actor, record } => {
            let record_id = pick_record(model, record);
            let expected = if actor != Actor::Provider {
                Err(ContractError::Unauthorized)
            } else if !model.creators.contains_key(&record_id) {
                Err(ContractError::RecordNotFound)
            } else {
                Ok(())
            };
            let got = outcome(h.client.try_use_emergency_access(h.addr(actor), &record_id));
            prop_assert_eq!(got, expected);
            if got.is_ok() {
                model.emergency_events += 1;
            }
        }
    }
    Ok(())
}

fn check_state(h: &Harness, model: &Model) -> Result<(), TestCaseError> {
    prop_assert_eq!(h.client.get_record_count(), model.creators.len() as u64);
    prop_assert_eq!(h.client.get_emergency_event_count(), model.emergency_events);

    for (&record_id, &creator) in model.creators.iter() {
        let record = h.client.get_record(h.addr(creator), &record_id);
        prop_assert_eq!(&record.creator, h.addr(creator));

        for actor in ACTORS {
            let level = model.grants.get(&(record_id, actor)).copied();
            prop_assert_eq!(h.client.grant_level(&record_id, h.addr(actor)), level);
            prop_assert_eq!(
                h.client.can_write(h.addr(actor), &record_id),
                model.can_write(actor, record_id)
            );
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn contract_matches_access_model(ops in proptest::collection::vec(any::<Op>(), 1..16)) {
        let env = Env::default();
        let harness = Harness::new(&env);
        let mut model = Model::default();

        for op in ops.iter() {
            apply(&harness, &mut model, op)?;
            check_state(&harness, &model)?;
        }
    }

    #[test]
    fn last_grant_wins(levels in proptest::collection::vec(any::<bool>(), 1..6)) {
        let env = Env::default();
        let harness = Harness::new(&env);
        let patient = harness.addr(Actor::Patient);
        let insurer = harness.addr(Actor::Insurer);

        let record_id = harness
            .client
            .create_record(patient, &harness.text("Labs"), &harness.text("hash1"));

        let mut last = None;
        for full in levels.iter() {
            let level = if *full { GrantLevel::Full } else { GrantLevel::ReadOnly };
            harness.client.grant_access(patient, insurer, &record_id, &level);
            last = Some(level);
        }

        prop_assert_eq!(harness.client.grant_level(&record_id, insurer), last);
        prop_assert_eq!(
            harness.client.can_write(insurer, &record_id),
            last == Some(GrantLevel::Full)
        );
    }
}
