use std::env;
use std::path::Path;

use anyhow::Context;

use crate::seed::{default_accounts, SeedAccount};

pub const DEFAULT_DATABASE_URL: &str = "sqlite:workouts.db?mode=rwc";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub seed_accounts: Vec<SeedAccount>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let seed_accounts = match env::var("SEED_ACCOUNTS_FILE") {
            Ok(path) if !path.is_empty() => load_seed_accounts(Path::new(&path))?,
            _ => default_accounts(),
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            seed_accounts,
        })
    }
}

/// Read a JSON array of `{"email": .., "password": ..}` objects.
pub fn load_seed_accounts(path: &Path) -> anyhow::Result<Vec<SeedAccount>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading seed accounts from {}", path.display()))?;
    parse_seed_accounts(&raw)
        .with_context(|| format!("parsing seed accounts in {}", path.display()))
}

pub fn parse_seed_accounts(raw: &str) -> anyhow::Result<Vec<SeedAccount>> {
    let accounts: Vec<SeedAccount> = serde_json::from_str(raw)?;
    Ok(accounts)
}
