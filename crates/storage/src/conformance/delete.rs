use super::{make_record, save_or_fail, TestResult};
use crate::RecordStore;

pub(super) fn run_delete_tests<S, F>(factory: &F) -> Vec<TestResult>
where
    S: RecordStore,
    F: Fn() -> S,
{
    vec![
        TestResult::from_result(
            "delete",
            "delete_missing_returns_false",
            delete_missing_returns_false(factory),
        ),
        TestResult::from_result(
            "delete",
            "delete_missing_leaves_mapping_unchanged",
            delete_missing_leaves_mapping_unchanged(factory),
        ),
        TestResult::from_result(
            "delete",
            "delete_removes_exactly_one_entry",
            delete_removes_exactly_one_entry(factory),
        ),
        TestResult::from_result(
            "delete",
            "second_delete_returns_false",
            second_delete_returns_false(factory),
        ),
    ]
}

fn delete_missing_returns_false<S, F>(factory: &F) -> Result<(), String>
where
    S: RecordStore,
    F: Fn() -> S,
{
    let store = factory();
    if store.delete("form_0_missing00") {
        return Err("delete on empty store returned true".to_string());
    }
    Ok(())
}

fn delete_missing_leaves_mapping_unchanged<S, F>(factory: &F) -> Result<(), String>
where
    S: RecordStore,
    F: Fn() -> S,
{
    let store = factory();
    save_or_fail(&store, &make_record("Ahmad", "Teller"))?;
    save_or_fail(&store, &make_record("Budi", "Analis"))?;
    let before = store.get_all();

    if store.delete("form_0_missing00") {
        return Err("delete of unknown id returned true".to_string());
    }
    if store.get_all() != before {
        return Err("delete of unknown id changed the mapping".to_string());
    }
    Ok(())
}

fn delete_removes_exactly_one_entry<S, F>(factory: &F) -> Result<(), String>
where
    S: RecordStore,
    F: Fn() -> S,
{
    let store = factory();
    let keep_a = save_or_fail(&store, &make_record("Ahmad", "Teller"))?;
    let target = save_or_fail(&store, &make_record("Budi", "Analis"))?;
    let keep_b = save_or_fail(&store, &make_record("Citra", "Auditor"))?;
    let mut expected = store.get_all();
    expected.remove(&target);

    if !store.delete(&target) {
        return Err(format!("delete of {} returned false", target));
    }
    let after = store.get_all();
    if after != expected {
        return Err(format!(
            "expected only {} removed; remaining keys {:?}",
            target,
            after.keys().collect::<Vec<_>>()
        ));
    }
    if !after.contains_key(&keep_a) || !after.contains_key(&keep_b) {
        return Err("an unrelated entry was removed".to_string());
    }
    Ok(())
}

fn second_delete_returns_false<S, F>(factory: &F) -> Result<(), String>
where
    S: RecordStore,
    F: Fn() -> S,
{
    let store = factory();
    let id = save_or_fail(&store, &make_record("Ahmad", "Teller"))?;
    if !store.delete(&id) {
        return Err("first delete returned false".to_string());
    }
    if store.delete(&id) {
        return Err("second delete of the same id returned true".to_string());
    }
    Ok(())
}
