//! CLI administration tool for nano-url.
//!
//! Runs maintenance operations directly against the database, without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Zero every link's daily click counter now
//! cargo run --bin admin -- reset-daily
//!
//! # When the scheduler will reset next
//! cargo run --bin admin -- next-reset --timezone Europe/Berlin
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`nano_url::config`]. `DATABASE_URL` (or the
//! `DB_*` components) is required for every command except `next-reset`.

use nano_url::application::jobs::{DailyResetScheduler, ResetZone};
use nano_url::config::Config;
use nano_url::server;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;

/// CLI tool for managing nano-url.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Zero the daily click counters of every link now
    ResetDaily {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show the next daily reset boundary
    NextReset {
        /// IANA timezone (defaults to RESET_TIMEZONE)
        #[arg(short, long)]
        timezone: Option<String>,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::ResetDaily { yes } => {
            let (config, pool) = connect().await?;
            reset_daily(pool, &config, yes).await?;
        }
        Commands::NextReset { timezone } => {
            let name = timezone.unwrap_or_else(|| {
                std::env::var("RESET_TIMEZONE").unwrap_or_else(|_| "Asia/Kolkata".to_string())
            });
            show_next_reset(&name)?;
        }
        Commands::Stats => {
            let (config, pool) = connect().await?;
            handle_stats(pool, &config).await?;
        }
        Commands::Db { action } => {
            let (_, pool) = connect().await?;
            handle_db_action(action, &pool).await?;
        }
    }

    Ok(())
}

async fn connect() -> Result<(Config, PgPool)> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = server::connect_pool(&config).await?;
    Ok((config, pool))
}

/// Runs the daily reset immediately, with the same retries as the scheduler.
async fn reset_daily(pool: PgPool, config: &Config, skip_confirm: bool) -> Result<()> {
    println!("{}", "Reset daily click counters".bright_blue().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Set daily_clicks = 0 on every link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let (links, _) = server::repositories(pool, config);
    let scheduler =
        DailyResetScheduler::new(links, config.reset_zone()).with_policy(config.retry_policy());

    let rows = scheduler
        .reset_now()
        .await
        .map_err(|e| anyhow::anyhow!("Daily reset failed: {}", e))?;

    println!(
        "{} {} links reset",
        "Done:".green().bold(),
        rows.to_string().bright_green()
    );
    Ok(())
}

fn show_next_reset(timezone: &str) -> Result<()> {
    let zone = ResetZone::resolve(timezone);
    let now = Utc::now();
    let next = zone
        .next_midnight_after(now)
        .context("Cannot compute next reset boundary")?;

    let remaining = next - now;
    println!("  Zone:       {}", zone.to_string().cyan());
    println!("  Next reset: {}", next.to_rfc3339().bright_white());
    println!(
        "  In:         {}h {}m",
        remaining.num_hours(),
        remaining.num_minutes() % 60
    );
    Ok(())
}

/// Displays store-wide link and click counts.
async fn handle_stats(pool: PgPool, config: &Config) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let owners: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analytics")
        .fetch_one(&pool)
        .await?;

    let (links, _) = server::repositories(pool, config);
    let totals = links
        .totals()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!(
        "  Links:        {}",
        totals.links.to_string().bright_green().bold()
    );
    println!(
        "  Total clicks: {}",
        totals.total_clicks.to_string().bright_green().bold()
    );
    println!(
        "  Clicks today: {}",
        totals.daily_clicks.to_string().bright_green().bold()
    );
    println!("  Owners:       {}", owners.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
