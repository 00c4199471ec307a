//! Dependency-count reconciliation across the whole store.

use tend::Task;

use crate::fixtures::{run, task_line, task_line_with, uuid, StoreFake};

/// Adding a dependency recomputes the closure for every task, fixes the
/// current task's counter in place, and emits commands only for the
/// other stale tasks, followed by one summary message.
#[test]
fn test_stale_counters_are_reconciled() {
    // Store: 2 -> 3. Task 2 claims 9 transitive deps (real: 1), task 3
    // is correct, task 4 claims 7 (real: 0).
    let store = StoreFake::new()
        .with_task(2, &[3], Some("9"))
        .with_task(3, &[], Some("0"))
        .with_task(4, &[], Some("7"));

    let new = task_line_with(
        1,
        "tidy shelves",
        &format!(r#""depends":["{}"]"#, uuid(2)),
    );
    let (stdout, stderr) = run(Some(&new), None, &store);

    // Current task: 2 -> 3 gives two transitive deps, fixed in place.
    let committed = Task::from_json_line(stdout.trim()).unwrap();
    assert_eq!(committed.dep_count.as_deref(), Some("2"));

    // Stale others get one command each, in uuid order; the current
    // task is never modified via command.
    let ran = store.ran.borrow();
    assert_eq!(
        *ran,
        vec![
            vec![uuid(2).to_string(), "modify".to_string(), "depCount:1".to_string()],
            vec![uuid(4).to_string(), "modify".to_string(), "depCount:0".to_string()],
        ]
    );

    assert_eq!(stderr.trim(), "Updated dependency counts");
}

/// Counters already in agreement produce no commands and no summary.
#[test]
fn test_settled_store_stays_silent() {
    let store = StoreFake::new()
        .with_task(2, &[3], Some("1"))
        .with_task(3, &[], Some("0"));

    let new = task_line_with(
        1,
        "tidy shelves",
        &format!(r#""depends":["{}"]"#, uuid(2)),
    );
    let (stdout, stderr) = run(Some(&new), None, &store);

    let committed = Task::from_json_line(stdout.trim()).unwrap();
    assert_eq!(committed.dep_count.as_deref(), Some("2"));
    assert!(store.ran.borrow().is_empty());
    assert!(stderr.is_empty());
}

/// Padding width follows the maximum counter stored before this run.
#[test]
fn test_padding_width_tracks_stored_maximum() {
    let store = StoreFake::new()
        .with_task(2, &[], Some("100"))
        .with_task(3, &[], Some("005"));

    let new = task_line_with(
        1,
        "tidy shelves",
        &format!(r#""depends":["{}"]"#, uuid(2)),
    );
    let (stdout, _) = run(Some(&new), None, &store);

    let committed = Task::from_json_line(stdout.trim()).unwrap();
    assert_eq!(committed.dep_count.as_deref(), Some("001"));

    // Task 2's stale counter (stored 100, real 0) is rewritten at the
    // same width.
    let ran = store.ran.borrow();
    assert!(ran
        .iter()
        .any(|args| args[0] == uuid(2).to_string() && args[2] == "depCount:000"));
}

/// A task arriving without a counter gets one even when it has no
/// dependencies at all.
#[test]
fn test_missing_counter_is_initialized() {
    let store = StoreFake::new();

    let (stdout, stderr) = run(Some(&task_line(1, "tidy shelves")), None, &store);

    let committed = Task::from_json_line(stdout.trim()).unwrap();
    assert_eq!(committed.dep_count.as_deref(), Some("0"));
    assert!(store.ran.borrow().is_empty());
    assert!(stderr.is_empty());
}

/// Dropping a dependency in the pending edit wins over the store's
/// stale copy of the dependency list.
#[test]
fn test_pending_edit_overlays_store() {
    let store = StoreFake::new()
        .with_task(1, &[2], Some("1"))
        .with_task(2, &[], Some("0"));

    let old = task_line_with(
        1,
        "tidy shelves",
        &format!(r#""depends":["{}"],"depCount":"1""#, uuid(2)),
    );
    let new = task_line_with(1, "tidy shelves", r#""depCount":"1""#);
    let (stdout, _) = run(Some(&new), Some(&old), &store);

    let committed = Task::from_json_line(stdout.trim()).unwrap();
    assert_eq!(committed.dep_count.as_deref(), Some("0"));
}
