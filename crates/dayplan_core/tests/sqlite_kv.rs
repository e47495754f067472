use chrono::{NaiveDate, TimeZone, Utc};
use dayplan_core::db::migrations::{current_user_version, latest_version};
use dayplan_core::db::{open_db, open_db_in_memory, DbError};
use dayplan_core::{
    Clock, CoreContext, FixedClock, KeyValueStore, Note, PersistenceError, SortOption, SqliteKvStore,
    Task,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_latest_schema() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());

    let table_exists: i64 = conn
        .query_row(
            "SELECT COUNT(1) FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(table_exists, 1);
}

#[test]
fn store_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteKvStore::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        PersistenceError::UninitializedConnection {
            expected_version: 1,
            actual_version: 0
        }
    ));
}

#[test]
fn put_overwrites_and_remove_deletes() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();

    assert_eq!(kv.get("notes").unwrap(), None);
    kv.put("notes", b"[1]").unwrap();
    kv.put("notes", b"[1,2]").unwrap();
    assert_eq!(kv.get("notes").unwrap(), Some(b"[1,2]".to_vec()));

    kv.remove("notes").unwrap();
    kv.remove("notes").unwrap();
    assert_eq!(kv.get("notes").unwrap(), None);
}

#[test]
fn prefix_scan_does_not_treat_underscore_as_wildcard() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    kv.put("journal-2026-01-02", b"b").unwrap();
    kv.put("journal-2026-01-01", b"a").unwrap();
    kv.put("journalX2026", b"x").unwrap();
    kv.put("tasks", b"[]").unwrap();

    assert_eq!(
        kv.keys_with_prefix("journal-").unwrap(),
        vec!["journal-2026-01-01", "journal-2026-01-02"]
    );
    assert_eq!(kv.keys_with_prefix("journal_").unwrap(), Vec::<String>::new());
}

#[test]
fn newer_schema_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 99;").unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion {
            db_version: 99,
            latest_supported: 1
        }
    ));
}

#[test]
fn file_backed_context_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dayplan.sqlite3");
    let clock = FixedClock::at(Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap());
    let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
    let task = Task::new("persist me");

    {
        let conn = open_db(&path).unwrap();
        let kv = SqliteKvStore::try_new(&conn).unwrap();
        let mut ctx = CoreContext::open(&kv, &clock).unwrap();
        ctx.tasks.add(task.clone()).unwrap();
        ctx.tasks.add(Task::new("second")).unwrap();
        ctx.tasks.move_tasks(&[1], 0).unwrap();
        ctx.notes
            .add(Note::new("idea", "write it down", clock.now()))
            .unwrap();
        ctx.journal.save(today, "quiet day").unwrap();
    }

    let conn = open_db(&path).unwrap();
    let kv = SqliteKvStore::try_new(&conn).unwrap();
    let mut ctx = CoreContext::open(&kv, &clock).unwrap();
    assert_eq!(ctx.tasks.tasks().len(), 2);
    assert_eq!(ctx.tasks.get(task.id).unwrap().title, "persist me");
    ctx.tasks.set_sort_option(SortOption::Custom);
    let order: Vec<String> = ctx
        .tasks
        .sorted_tasks()
        .into_iter()
        .map(|task| task.title)
        .collect();
    assert_eq!(order, vec!["second", "persist me"]);
    assert_eq!(ctx.notes.notes()[0].content, "write it down");
    assert_eq!(ctx.journal.entry(today).unwrap().text, "quiet day");
}

#[test]
fn open_db_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles").join("main").join("dayplan.sqlite3");

    let conn = open_db(&path).unwrap();
    assert!(path.exists());
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
}
