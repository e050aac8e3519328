//! SQL schema for the contact table.

use crate::error::StoreResult;
use rusqlite::Connection;
use tracing::info;

/// Schema version stored in `PRAGMA user_version`.
pub const CURRENT_VERSION: i32 = 1;

/// Statements creating the schema, all idempotent.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    // Uniqueness is enforced here as well as by the pre-write checks, so two
    // concurrent submissions cannot both land.
    r"CREATE TABLE IF NOT EXISTS contacts (
        id    TEXT PRIMARY KEY NOT NULL,
        name  TEXT NOT NULL UNIQUE,
        phone TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE
    )",
];

/// Create tables and record the schema version.
pub fn initialize_schema(conn: &Connection) -> StoreResult<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version < CURRENT_VERSION {
        conn.pragma_update(None, "user_version", CURRENT_VERSION)?;
        info!(from = version, to = CURRENT_VERSION, "contact schema upgraded");
    }

    Ok(())
}
