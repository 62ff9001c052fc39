use std::collections::HashSet;

use super::{make_record, save_or_fail, TestResult};
use crate::RecordStore;

pub(super) fn run_save_tests<S, F>(factory: &F) -> Vec<TestResult>
where
    S: RecordStore,
    F: Fn() -> S,
{
    vec![
        TestResult::from_result(
            "save",
            "save_returns_non_empty_id",
            save_returns_non_empty_id(factory),
        ),
        TestResult::from_result(
            "save",
            "repeated_saves_never_collide",
            repeated_saves_never_collide(factory),
        ),
        TestResult::from_result(
            "save",
            "envelope_id_matches_key",
            envelope_id_matches_key(factory),
        ),
        TestResult::from_result(
            "save",
            "envelope_has_saved_at",
            envelope_has_saved_at(factory),
        ),
    ]
}

fn save_returns_non_empty_id<S, F>(factory: &F) -> Result<(), String>
where
    S: RecordStore,
    F: Fn() -> S,
{
    let store = factory();
    let id = save_or_fail(&store, &make_record("Ahmad", "Teller"))?;
    if id.is_empty() {
        return Err("save returned an empty id".to_string());
    }
    Ok(())
}

fn repeated_saves_never_collide<S, F>(factory: &F) -> Result<(), String>
where
    S: RecordStore,
    F: Fn() -> S,
{
    let store = factory();
    let record = make_record("Ahmad", "Teller");
    let mut ids = HashSet::new();
    for i in 0..50 {
        let id = save_or_fail(&store, &record)?;
        if !ids.insert(id.clone()) {
            return Err(format!("save #{} reused id {}", i, id));
        }
    }
    let stored = store.get_all().len();
    if stored != 50 {
        return Err(format!("expected 50 stored envelopes, found {}", stored));
    }
    Ok(())
}

fn envelope_id_matches_key<S, F>(factory: &F) -> Result<(), String>
where
    S: RecordStore,
    F: Fn() -> S,
{
    let store = factory();
    let id = save_or_fail(&store, &make_record("Ahmad", "Teller"))?;
    let all = store.get_all();
    let env = all
        .get(&id)
        .ok_or_else(|| format!("id {} missing from get_all", id))?;
    if env.id != id {
        return Err(format!("envelope id {} under key {}", env.id, id));
    }
    Ok(())
}

fn envelope_has_saved_at<S, F>(factory: &F) -> Result<(), String>
where
    S: RecordStore,
    F: Fn() -> S,
{
    let store = factory();
    let id = save_or_fail(&store, &make_record("Ahmad", "Teller"))?;
    let env = store
        .get(&id)
        .ok_or_else(|| format!("id {} missing from get", id))?;
    if commitment_core::parse_iso(&env.saved_at).is_none() {
        return Err(format!("savedAt '{}' is not an ISO timestamp", env.saved_at));
    }
    Ok(())
}
