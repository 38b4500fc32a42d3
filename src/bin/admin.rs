//! CLI administration tool for shortscale.
//!
//! Inspects short codes and stored mappings without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show the short code a counter value maps to
//! cargo run --bin admin -- encode 3844
//!
//! # Show the counter value behind a short code
//! cargo run --bin admin -- decode 100
//!
//! # Print a stored mapping
//! cargo run --bin admin -- inspect abc123
//!
//! # Check Redis connection
//! cargo run --bin admin -- check
//! ```
//!
//! # Environment Variables
//!
//! - `REDIS_URL` or `REDIS_HOST`/`REDIS_PORT`/`REDIS_PASSWORD`/`REDIS_DB`:
//!   required by `inspect` and `check`

use shortscale::config::{Config, mask_connection_string};
use shortscale::domain::repositories::MappingStore;
use shortscale::infrastructure::store::RedisMappingStore;
use shortscale::utils::code_generator::{decode, encode};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;

/// CLI tool for managing shortscale.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a counter value as a short code
    Encode {
        /// Counter value
        value: u64,
    },

    /// Turn a generated short code back into its counter value
    Decode {
        /// Short code
        code: String,
    },

    /// Show a stored mapping
    Inspect {
        /// Short code
        code: String,
    },

    /// Check Redis connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { value } => {
            println!(
                "  {} → {}",
                value.to_string().bright_black(),
                encode(value).bright_yellow().bold()
            );
        }
        Commands::Decode { code } => {
            let value =
                decode(&code).with_context(|| format!("'{}' is not a generated code", code))?;
            println!(
                "  {} → {}",
                code.cyan(),
                value.to_string().bright_yellow().bold()
            );
        }
        Commands::Inspect { code } => inspect(&code).await?,
        Commands::Check => check().await?,
    }

    Ok(())
}

async fn connect() -> Result<RedisMappingStore> {
    let config = Config::from_env()?;
    let redis_url = config
        .redis_url
        .context("REDIS_URL or REDIS_HOST must be set")?;

    println!("  Redis: {}", mask_connection_string(&redis_url).bright_black());

    RedisMappingStore::connect(&redis_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to Redis: {}", e))
}

/// Prints one mapping with its expiry status.
///
/// # Output Format
///
/// ```text
/// 🔎 Mapping abc123
///
///   URL:      https://example.com
///   Created:  2024-01-15 10:30:00 UTC
///   Expires:  2024-01-15 11:30:00 UTC (EXPIRED)
///   Clicks:   42
/// ```
async fn inspect(code: &str) -> Result<()> {
    let store = connect().await?;

    println!("{}", format!("🔎 Mapping {}", code).bright_blue().bold());
    println!();

    let mapping = store
        .find_by_short_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Storage error: {}", e))?;

    let Some(mapping) = mapping else {
        println!("{}", "  Not found".yellow());
        return Ok(());
    };

    let expiry = match mapping.expires_at {
        Some(at) if mapping.is_expired_at(Utc::now()) => {
            format!("{} {}", at.format("%Y-%m-%d %H:%M:%S UTC"), "(EXPIRED)".red())
        }
        Some(at) => format!("{} {}", at.format("%Y-%m-%d %H:%M:%S UTC"), "(ACTIVE)".green()),
        None => "never".green().to_string(),
    };

    println!("  {:<9} {}", "URL:".bright_white(), mapping.original_url.cyan());
    println!(
        "  {:<9} {}",
        "Created:".bright_white(),
        mapping
            .created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );
    println!("  {:<9} {}", "Expires:".bright_white(), expiry);
    println!(
        "  {:<9} {}",
        "Clicks:".bright_white(),
        mapping.click_count.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn check() -> Result<()> {
    println!("{}", "🔌 Redis connection".bright_blue().bold());
    println!();

    let store = connect().await?;

    if store.health_check().await {
        println!("{}", "  ✅ PING ok".green().bold());
    } else {
        anyhow::bail!("PING failed");
    }
    println!();

    Ok(())
}
