//! Seed the database with test users.
//!
//! Usage:
//! ```bash
//! cargo run --bin seed-users
//!
//! # Reset passwords of existing test users
//! cargo run --bin seed-users -- --reset-passwords
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use workout_tracker::config::Config;
use workout_tracker::{db, seed};

#[derive(Parser)]
#[command(name = "seed-users", about = "Seed the database with test users.")]
struct SeedArgs {
    /// Reset passwords of existing users to the test password
    #[arg(long)]
    reset_passwords: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "workout_tracker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();

    let args = SeedArgs::parse();
    let config = Config::from_env()?;

    tracing::info!("Connecting to database: {}", config.database_url);
    let pool = db::create_pool(&config.database_url)?;

    // A failed batch is rolled back and reported, not propagated.
    match seed::seed(&pool, &config.seed_accounts, args.reset_passwords) {
        Ok(report) => {
            for entry in &report.entries {
                println!("  {entry}");
            }
            println!("\nDone! Users seeded successfully.");
        }
        Err(e) => {
            for entry in &e.processed {
                println!("  {entry}");
            }
            println!("\nError: {e}");
            println!("No changes were committed.");
        }
    }

    Ok(())
}
