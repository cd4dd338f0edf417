use rusqlite::Connection;
use tracing::info;

use crate::{Error, Result};

const SCHEMA_VERSION: i32 = 2;

pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    ensure_migration_table(conn)?;

    let current_version = get_schema_version(conn)?;

    if current_version > SCHEMA_VERSION {
        return Err(Error::Internal(format!(
            "Database schema version ({}) is newer than supported version ({}). Please update \
             gamestats.",
            current_version, SCHEMA_VERSION
        )));
    }

    for version in (current_version + 1)..=SCHEMA_VERSION {
        apply_migration(conn, version).map_err(|e| {
            Error::Internal(format!("Failed to apply migration {}: {}", version, e))
        })?;
        info!(version, "applied schema migration");
    }

    Ok(())
}

fn ensure_migration_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migration (
            id INTEGER PRIMARY KEY
        )",
        [],
    )?;
    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32> {
    let version = conn.query_row("SELECT COALESCE(MAX(id), 0) FROM migration", [], |row| {
        row.get(0)
    })?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("INSERT INTO migration (id) VALUES (?1)", [version])?;
    Ok(())
}

fn apply_migration(conn: &mut Connection, version: i32) -> Result<()> {
    let tx = conn.transaction()?;

    match version {
        1 => migration_v1(&tx)?,
        2 => migration_v2(&tx)?,
        _ => {
            return Err(Error::Internal(format!(
                "Unknown migration version: {}",
                version
            )));
        }
    }

    set_schema_version(&tx, version)?;
    tx.commit()?;

    Ok(())
}

// Session rows outlive revoked tokens, so `statistic.app_token` has no foreign key.
fn migration_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE app_token(
            token TEXT PRIMARY KEY,
            app_name TEXT NOT NULL
        );

        CREATE TABLE user(
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE statistic(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            app_token TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            played_time INTEGER NOT NULL CHECK(played_time >= 0),
            scores INTEGER NOT NULL,
            is_win INTEGER NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn migration_v2(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS statistic_user_id_created_at_idx
            ON statistic(user_id, created_at);

        CREATE INDEX IF NOT EXISTS statistic_app_token_idx
            ON statistic(app_token);
        "#,
    )?;
    Ok(())
}
