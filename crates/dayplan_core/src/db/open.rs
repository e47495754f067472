//! Connection opening for file and in-memory databases.
//!
//! # Invariants
//! - A returned connection is migrated to `latest_version()`.
//! - Each attempt logs one `db_open` outcome with its duration.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating when missing) the database file at `path`.
///
/// Missing parent directories are created first.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    timed("file", || {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| DbError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        prepare(Connection::open(path)?)
    })
}

/// Opens a private in-memory database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    timed("memory", || prepare(Connection::open_in_memory()?))
}

fn prepare(mut conn: Connection) -> DbResult<Connection> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(&mut conn)?;
    Ok(conn)
}

fn timed(mode: &'static str, open: impl FnOnce() -> DbResult<Connection>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = open();
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={duration_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={duration_ms} error={err}"
        ),
    }
    result
}
