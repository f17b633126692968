//! Test account seeding
//!
//! Makes sure a known list of accounts exists in the user store. Safe to run
//! repeatedly: existing accounts are left alone unless a password reset is
//! requested. The whole batch runs in one transaction.

use std::fmt;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::migrations::run_migrations;
use crate::repositories::UserRepository;

pub const DEFAULT_TEST_EMAIL: &str = "lawton@example.com";
pub const DEFAULT_TEST_PASSWORD: &str = "testpass123";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedAccount {
    pub email: String,
    pub password: String,
}

impl SeedAccount {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

pub fn default_accounts() -> Vec<SeedAccount> {
    vec![SeedAccount::new(DEFAULT_TEST_EMAIL, DEFAULT_TEST_PASSWORD)]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Added,
    Skipped,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedEntry {
    pub email: String,
    pub outcome: SeedOutcome,
}

impl fmt::Display for SeedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            SeedOutcome::Added => write!(f, "Added {}", self.email),
            SeedOutcome::Skipped => write!(f, "Skipped {} (already exists)", self.email),
            SeedOutcome::Reset => write!(f, "Reset password for {}", self.email),
        }
    }
}

/// What happened to each account, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub entries: Vec<SeedEntry>,
}

impl SeedReport {
    pub fn count(&self, outcome: SeedOutcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    pub fn outcome_for(&self, email: &str) -> Option<SeedOutcome> {
        self.entries
            .iter()
            .find(|e| e.email == email)
            .map(|e| e.outcome)
    }
}

/// A failed seed run. `processed` holds the accounts handled before the
/// failure; none of them were committed.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct SeedError {
    pub processed: Vec<SeedEntry>,
    #[source]
    pub error: AppError,
}

impl From<AppError> for SeedError {
    fn from(error: AppError) -> Self {
        Self {
            processed: Vec::new(),
            error,
        }
    }
}

fn seed_account(
    users: &UserRepository<'_>,
    account: &SeedAccount,
    reset_passwords: bool,
) -> Result<SeedOutcome> {
    match users.find_by_email(&account.email)? {
        None => {
            users.create(&account.email, &account.password)?;
            Ok(SeedOutcome::Added)
        }
        Some(_) if !reset_passwords => Ok(SeedOutcome::Skipped),
        Some(existing) => {
            users.set_password(existing.id, &account.password)?;
            Ok(SeedOutcome::Reset)
        }
    }
}

fn seed_all(
    conn: &Connection,
    accounts: &[SeedAccount],
    reset_passwords: bool,
    report: &mut SeedReport,
) -> Result<()> {
    let users = UserRepository::new(conn);

    for account in accounts {
        let outcome = seed_account(&users, account, reset_passwords)?;
        let entry = SeedEntry {
            email: account.email.clone(),
            outcome,
        };
        tracing::debug!("{}", entry);
        report.entries.push(entry);
    }

    Ok(())
}

/// Ensure every account in `accounts` exists.
///
/// Creates the schema if needed, then applies all accounts in a single
/// transaction: on any error nothing is committed and the error is returned
/// together with the accounts processed before it.
/// The pooled connection goes back to the pool on every path.
pub fn seed(
    pool: &DbPool,
    accounts: &[SeedAccount],
    reset_passwords: bool,
) -> std::result::Result<SeedReport, SeedError> {
    run_migrations(pool)?;

    let mut conn = pool.get().map_err(AppError::from)?;
    let tx = conn.transaction().map_err(AppError::from)?;

    let mut report = SeedReport::default();
    let outcome = seed_all(&tx, accounts, reset_passwords, &mut report);
    let result = match outcome {
        Ok(()) => tx.commit().map_err(AppError::from),
        Err(e) => {
            tracing::error!("Seeding failed, rolling back: {}", e);
            if let Err(rollback_err) = tx.rollback() {
                tracing::error!("Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    };

    match result {
        Ok(()) => {
            tracing::info!(
                "Seeded users: {} added, {} skipped, {} reset",
                report.count(SeedOutcome::Added),
                report.count(SeedOutcome::Skipped),
                report.count(SeedOutcome::Reset)
            );
            Ok(report)
        }
        Err(error) => Err(SeedError {
            processed: report.entries,
            error,
        }),
    }
}
