use kvtodo_core::db::migrations::latest_version;
use kvtodo_core::db::{open_db, open_db_in_memory, DbError};
use kvtodo_core::{KvGateway, SqliteKvGateway, TodoController, STORAGE_KEY};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn opened_connection_waits_on_busy_database() {
    let conn = open_db_in_memory().unwrap();
    let timeout_ms: i64 = conn
        .query_row("PRAGMA busy_timeout", [], |row| row.get(0))
        .unwrap();

    assert_eq!(timeout_ms, 5000);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kvtodo.db");

    let first = open_db(&path).unwrap();
    SqliteKvGateway::new(&first).set("k", "v").unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    assert_eq!(
        SqliteKvGateway::new(&second).get("k").unwrap().as_deref(),
        Some("v")
    );
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn controller_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todos.db");

    {
        let conn = open_db(&path).unwrap();
        let mut todos = TodoController::new(SqliteKvGateway::new(&conn));
        todos.load();
        todos.add("Buy milk");
        todos.add("Walk dog");
        todos.toggle(1).unwrap();
        todos.edit(2, "Walk the dog").unwrap();
        assert!(!todos.is_dirty());
    }

    let conn = open_db(&path).unwrap();
    let mut todos = TodoController::new(SqliteKvGateway::new(&conn));
    let notice = todos.load();
    assert_eq!(notice.message, "Todos loaded from cloud");

    let tasks = todos.tasks();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, 2);
    assert_eq!(tasks[0].text, "Walk the dog");
    assert!(!tasks[0].completed);
    assert_eq!(tasks[1].id, 1);
    assert!(tasks[1].completed);
    assert_eq!(todos.next_id(), Some(3));
}

#[test]
fn controller_writes_single_key() {
    let conn = open_db_in_memory().unwrap();
    let mut todos = TodoController::new(SqliteKvGateway::new(&conn));
    todos.add("one");
    todos.add("two");

    let keys: Vec<String> = conn
        .prepare("SELECT key FROM kv_entries;")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(keys, vec![STORAGE_KEY.to_string()]);
}

#[test]
fn save_failure_on_broken_table_keeps_memory_state() {
    let conn = open_db_in_memory().unwrap();
    let mut todos = TodoController::new(SqliteKvGateway::new(&conn));
    todos.add("kept");
    conn.execute_batch("DROP TABLE kv_entries;").unwrap();

    let notice = todos.add("memory only");
    assert!(notice.is_error());
    assert_eq!(todos.tasks().len(), 2);
    assert!(todos.is_dirty());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
