use super::{make_record, save_or_fail, TestResult};
use crate::RecordStore;

pub(super) fn run_read_tests<S, F>(factory: &F) -> Vec<TestResult>
where
    S: RecordStore,
    F: Fn() -> S,
{
    vec![
        TestResult::from_result(
            "read",
            "empty_store_reads_empty",
            empty_store_reads_empty(factory),
        ),
        TestResult::from_result(
            "read",
            "round_trip_preserves_fields",
            round_trip_preserves_fields(factory),
        ),
        TestResult::from_result(
            "read",
            "repeated_reads_are_identical",
            repeated_reads_are_identical(factory),
        ),
        TestResult::from_result(
            "read",
            "get_missing_returns_none",
            get_missing_returns_none(factory),
        ),
    ]
}

fn empty_store_reads_empty<S, F>(factory: &F) -> Result<(), String>
where
    S: RecordStore,
    F: Fn() -> S,
{
    let store = factory();
    let all = store.get_all();
    if !all.is_empty() {
        return Err(format!("expected empty mapping, found {} entries", all.len()));
    }
    Ok(())
}

fn round_trip_preserves_fields<S, F>(factory: &F) -> Result<(), String>
where
    S: RecordStore,
    F: Fn() -> S,
{
    let store = factory();
    let mut record = make_record("Siti Rahmawati", "Kepala Cabang");
    record.signature_url = Some("data:image/png;base64,iVBORw0KGgo=".to_string());
    let id = save_or_fail(&store, &record)?;

    let all = store.get_all();
    let env = all
        .get(&id)
        .ok_or_else(|| format!("id {} missing after save", id))?;
    if env.record != record {
        return Err(format!(
            "round trip changed record: saved {:?}, read {:?}",
            record, env.record
        ));
    }
    Ok(())
}

fn repeated_reads_are_identical<S, F>(factory: &F) -> Result<(), String>
where
    S: RecordStore,
    F: Fn() -> S,
{
    let store = factory();
    save_or_fail(&store, &make_record("Ahmad", "Teller"))?;
    save_or_fail(&store, &make_record("Budi", "Analis"))?;

    let first = store.get_all();
    let second = store.get_all();
    if first != second {
        return Err("two reads without writes disagreed".to_string());
    }
    Ok(())
}

fn get_missing_returns_none<S, F>(factory: &F) -> Result<(), String>
where
    S: RecordStore,
    F: Fn() -> S,
{
    let store = factory();
    save_or_fail(&store, &make_record("Ahmad", "Teller"))?;
    match store.get("form_0_missing00") {
        None => Ok(()),
        Some(env) => Err(format!("expected None, got {:?}", env)),
    }
}
