//! SQLite-backed key-value store.
//!
//! # Invariants
//! - Connection must come from `db::open_db*` so `kv_entries` exists.
//! - `set` is an upsert; one row per key.

use super::{GatewayResult, KvGateway};
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};

/// Key-value gateway over the `kv_entries` table.
pub struct SqliteKvGateway<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvGateway<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KvGateway for SqliteKvGateway<'_> {
    fn get(&self, key: &str) -> GatewayResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .inspect_err(|err| {
                error!("event=kv_get module=gateway status=error key={key} error={err}")
            })?;

        debug!(
            "event=kv_get module=gateway status=ok key={key} found={}",
            value.is_some()
        );
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> GatewayResult<()> {
        self.conn
            .execute(
                "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![key, value],
            )
            .inspect_err(|err| {
                error!("event=kv_set module=gateway status=error key={key} error={err}")
            })?;

        debug!(
            "event=kv_set module=gateway status=ok key={key} bytes={}",
            value.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteKvGateway;
    use crate::db::open_db_in_memory;
    use crate::gateway::KvGateway;

    #[test]
    fn get_returns_none_for_missing_key() {
        let conn = open_db_in_memory().expect("in-memory db should open");
        let gateway = SqliteKvGateway::new(&conn);
        assert_eq!(gateway.get("todos").expect("get should succeed"), None);
    }

    #[test]
    fn set_upserts_single_row() {
        let conn = open_db_in_memory().expect("in-memory db should open");
        let gateway = SqliteKvGateway::new(&conn);

        gateway.set("todos", "[]").expect("first set should succeed");
        gateway
            .set("todos", r#"[{"id":1}]"#)
            .expect("second set should succeed");

        assert_eq!(
            gateway.get("todos").expect("get should succeed").as_deref(),
            Some(r#"[{"id":1}]"#)
        );
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
            .expect("count should succeed");
        assert_eq!(rows, 1);
    }
}
