//! Database initialization and schema migration.

use rusqlite::Connection;

use crate::{
    card::create_card_table, goal::create_goal_table, transaction::create_transaction_table,
};

/// Create the tables for the domain models if they do not exist, after
/// migrating schemas written by older versions.
///
/// # Errors
/// Returns an error if a table cannot be created or migrated.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    migrate_legacy_budget_table(connection)?;

    create_transaction_table(connection)?;
    create_card_table(connection)?;
    create_goal_table(connection)?;

    Ok(())
}

/// Older databases stored goals in a `budget` table without the kind and
/// saved columns. Rename the table and backfill the columns so the data
/// keeps loading (missing kinds read as savings goals with no progress).
fn migrate_legacy_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    if !table_exists(connection, "budget")? || table_exists(connection, "goal")? {
        return Ok(());
    }

    tracing::info!("migrating legacy budget table to goal");
    connection.execute("ALTER TABLE budget RENAME TO goal", ())?;

    if !column_exists(connection, "goal", "kind")? {
        connection.execute(
            "ALTER TABLE goal ADD COLUMN kind TEXT NOT NULL DEFAULT 'savings'",
            (),
        )?;
    }

    if !column_exists(connection, "goal", "saved")? {
        connection.execute(
            "ALTER TABLE goal ADD COLUMN saved REAL NOT NULL DEFAULT 0",
            (),
        )?;
    }

    Ok(())
}

fn table_exists(connection: &Connection, name: &str) -> Result<bool, rusqlite::Error> {
    connection.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [name],
        |row| row.get(0),
    )
}

fn column_exists(
    connection: &Connection,
    table: &str,
    column: &str,
) -> Result<bool, rusqlite::Error> {
    let mut statement = connection.prepare(&format!("PRAGMA table_info({table})"))?;
    let mut rows = statement.query([])?;

    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;

        if name == column {
            return Ok(true);
        }
    }

    Ok(false)
}
