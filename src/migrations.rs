//! Embedded database migrations
//!
//! All SQL migrations are compiled into the binary. Every statement is
//! `CREATE ... IF NOT EXISTS`, so applying them never drops or rewrites
//! existing tables.

use crate::db::DbPool;
use crate::error::Result;

/// All migrations in order, each as (filename, sql_content)
pub const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_create_users.sql",
        include_str!("../migrations/001_create_users.sql"),
    ),
    (
        "002_create_templates.sql",
        include_str!("../migrations/002_create_templates.sql"),
    ),
    (
        "003_create_exercises.sql",
        include_str!("../migrations/003_create_exercises.sql"),
    ),
    (
        "004_create_workouts.sql",
        include_str!("../migrations/004_create_workouts.sql"),
    ),
];

/// Run all pending migrations on the database pool.
///
/// Applied migrations are tracked in a `_migrations` table and skipped on
/// later runs.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    tracing::info!("Running migrations...");

    let conn = pool.get()?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    for (filename, sql) in MIGRATIONS {
        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?",
            [filename],
            |row| row.get(0),
        )?;

        if already_applied {
            tracing::debug!("Skipping already applied migration: {}", filename);
            continue;
        }

        tracing::info!("Running migration: {}", filename);

        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO _migrations (name) VALUES (?)", [filename])?;
    }

    tracing::info!("Migrations completed");
    Ok(())
}

/// Run all migrations without tracking, for fresh in-memory test databases.
pub fn run_migrations_for_tests(pool: &DbPool) -> Result<()> {
    let conn = pool.get()?;

    for (_filename, sql) in MIGRATIONS {
        conn.execute_batch(sql)?;
    }

    Ok(())
}
