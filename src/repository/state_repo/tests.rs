use super::{InMemoryStateStore, SchoolStateStore, SqliteStateRepository};
use crate::domain::school_class::{PeriodAllocation, SchoolClass};
use crate::domain::state::SchoolState;
use crate::domain::types::Grade;
use crate::repository::error::RepositoryError;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn setup_test_db() -> Arc<Mutex<Connection>> {
    let conn = Connection::open_in_memory().unwrap();
    crate::db::configure_sqlite_connection(&conn).unwrap();
    crate::db::ensure_schema(&conn).unwrap();
    Arc::new(Mutex::new(conn))
}

fn make_test_state() -> SchoolState {
    SchoolState {
        classes: vec![SchoolClass {
            id: "C1".to_string(),
            grade: Grade::from("5"),
            section: "A".to_string(),
            period_allocation: vec![PeriodAllocation::new("Math", 6)],
            total_periods_per_week: 40,
            student_ids: vec!["S1".to_string()],
        }],
        ..SchoolState::default()
    }
}

#[test]
fn test_load_empty_returns_default() {
    let repo = SqliteStateRepository::from_connection(setup_test_db());

    let state = repo.load().unwrap();

    assert_eq!(state, SchoolState::default());
    assert_eq!(repo.last_saved_at().unwrap(), None);
}

#[test]
fn test_save_then_load_stamps_timestamp() {
    let repo = SqliteStateRepository::from_connection(setup_test_db());
    let state = make_test_state();

    repo.save(&state).unwrap();
    let loaded = repo.load().unwrap();

    assert!(loaded.timestamp.is_some(), "保存时应写入时间戳");
    assert_eq!(loaded.classes, state.classes);
    assert!(repo.last_saved_at().unwrap().is_some());
}

#[test]
fn test_save_overwrites_single_row() {
    let conn = setup_test_db();
    let repo = SqliteStateRepository::from_connection(conn.clone());

    repo.save(&make_test_state()).unwrap();
    repo.save(&SchoolState::default()).unwrap();

    let count: i64 = conn
        .lock()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM school_state", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
    assert!(repo.load().unwrap().classes.is_empty());
}

#[test]
fn test_corrupt_json_is_serialization_error() {
    let conn = setup_test_db();
    conn.lock()
        .unwrap()
        .execute(
            "INSERT INTO school_state (id, state_json, saved_at) VALUES (1, 'not json', '2025-01-01')",
            [],
        )
        .unwrap();
    let repo = SqliteStateRepository::from_connection(conn);

    let result = repo.load();

    assert!(matches!(result, Err(RepositoryError::SerializationError(_))));
}

#[test]
fn test_in_memory_store() {
    let store = InMemoryStateStore::new();
    assert_eq!(store.load().unwrap(), SchoolState::default());

    store.save(&make_test_state()).unwrap();
    let loaded = store.load().unwrap();
    assert_eq!(loaded.classes.len(), 1);
    assert!(loaded.timestamp.is_some());

    let seeded = InMemoryStateStore::with_state(make_test_state());
    assert_eq!(seeded.load().unwrap().classes[0].id, "C1");
}
