//! CLI administration tool for quicklink.
//!
//! Works directly on the JSON data file, so it can manage links without the
//! HTTP server running.
//!
//! # Usage
//!
//! ```bash
//! # Shorten two URLs, the first with a custom code
//! cargo run --bin admin -- create https://example.com https://rust-lang.org --code docs
//!
//! # List all links
//! cargo run --bin admin -- list
//!
//! # Record a test click
//! cargo run --bin admin -- visit docs
//!
//! # Delete one link, or all of them
//! cargo run --bin admin -- delete 5f0c3a8e-2b7d-4c1e-9a4f-0e6d2b1c7a93
//! cargo run --bin admin -- clear
//!
//! # View statistics
//! cargo run --bin admin -- stats
//! ```
//!
//! # Environment Variables
//!
//! - `DATA_FILE` (optional): JSON data file (default: `quicklink-links.json`)
//! - `BASE_URL` (optional): Origin shown in short URLs
//! - `TELEMETRY_*` (optional): Same collector settings as the server

use quicklink::application::services::LinkService;
use quicklink::config::TelemetryConfig;
use quicklink::domain::entities::{ClickSource, LinkRequest, LinkStatus};
use quicklink::infrastructure::persistence::JsonFileStore;
use quicklink::infrastructure::telemetry::TelemetryClient;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;
use uuid::Uuid;

/// CLI tool for managing quicklink links.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON data file holding the links
    #[arg(long, env = "DATA_FILE", default_value = "quicklink-links.json")]
    data_file: String,

    /// Origin used to display short URLs
    #[arg(long, env = "BASE_URL", default_value = "http://localhost:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shorten one or more URLs (all or nothing)
    Create {
        /// URLs to shorten
        #[arg(required = true)]
        urls: Vec<String>,

        /// Custom codes, applied to the URLs in order
        #[arg(short, long = "code")]
        codes: Vec<String>,

        /// Minutes until the links expire (default: 30)
        #[arg(short, long)]
        validity: Option<i64>,
    },

    /// List all links
    List,

    /// Record a test click on a code
    Visit {
        /// Short code
        code: String,
    },

    /// Delete a link by id
    Delete {
        /// Link id (UUID)
        id: Uuid,
    },

    /// Delete every link
    Clear {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let telemetry_config =
        TelemetryConfig::from_env().context("Failed to load telemetry configuration")?;
    let telemetry = TelemetryClient::from_config(&telemetry_config)
        .context("Failed to build telemetry client")?;

    let store = Arc::new(JsonFileStore::new(&cli.data_file));
    let mut links = LinkService::load(store, telemetry.clone());

    let result = match cli.command {
        Commands::Create {
            urls,
            codes,
            validity,
        } => create_links(&mut links, &cli.base_url, urls, codes, validity),
        Commands::List => {
            list_links(&links, &cli.base_url);
            Ok(())
        }
        Commands::Visit { code } => visit_link(&mut links, &code),
        Commands::Delete { id } => delete_link(&mut links, id),
        Commands::Clear { yes } => clear_links(&mut links, yes),
        Commands::Stats => {
            show_stats(&links);
            Ok(())
        }
    };

    // Deliver whatever the command reported before the process exits.
    telemetry.shutdown().await;

    result
}

/// Creates a batch of links and prints their short URLs.
fn create_links(
    links: &mut LinkService,
    base_url: &str,
    urls: Vec<String>,
    codes: Vec<String>,
    validity: Option<i64>,
) -> Result<()> {
    println!("{}", "🔗 Create Links".bright_blue().bold());
    println!();

    if codes.len() > urls.len() {
        anyhow::bail!("Got {} codes for {} URLs", codes.len(), urls.len());
    }

    let mut codes = codes.into_iter();
    let requests: Vec<LinkRequest> = urls
        .into_iter()
        .map(|url| {
            let mut request = LinkRequest::new(url);
            request.custom_code = codes.next();
            request.validity_minutes = validity;
            request
        })
        .collect();

    let created = match links.create(requests, Utc::now()) {
        Ok(created) => created,
        Err(e) => {
            println!("{} {}", "❌".red(), e.to_string().red());
            return Err(e.into());
        }
    };

    for link in &created {
        println!(
            "  {} {} {}",
            LinkService::short_url(base_url, link.short_code())
                .bright_yellow()
                .bold(),
            "→".bright_black(),
            link.original_url().cyan()
        );
        println!(
            "    {} {}",
            "expires".bright_black(),
            link.expires_at().format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    println!();
    println!(
        "{}",
        format!("✅ Created {} links", created.len()).green().bold()
    );

    Ok(())
}

/// Lists all links with status indicators.
///
/// # Output Format
///
/// ```text
/// 📋 Links
///
///   Code     Status   Clicks  Expires              URL
///   ──────────────────────────────────────────────────────────────────
///   aB3dE9   ACTIVE   2       2025-01-15 10:30     https://example.com
/// ```
fn list_links(links: &LinkService, base_url: &str) {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        println!(
            "  Create one with: {} admin create <URL>",
            "cargo run --bin".bright_cyan()
        );
        return;
    }

    println!(
        "  {:<10} {:<8} {:<7} {:<20} {}",
        "Code".bright_white().bold(),
        "Status".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Expires".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    let now = Utc::now();
    for link in links.links() {
        let status = match link.status_at(now) {
            LinkStatus::Active => "ACTIVE".green(),
            LinkStatus::Expired => "EXPIRED".red(),
        };

        println!(
            "  {:<10} {:<8} {:<7} {:<20} {}",
            link.short_code().cyan(),
            status,
            link.click_count(),
            link.expires_at()
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.original_url()
        );
        println!(
            "  {:<10} {} {}",
            "",
            LinkService::short_url(base_url, link.short_code()).bright_black(),
            link.id().to_string().bright_black()
        );
    }

    println!();
    println!(
        "  Total: {}",
        links.len().to_string().bright_white().bold()
    );
    println!();
}

/// Records a `Test` click, as the dashboard's test button does.
fn visit_link(links: &mut LinkService, code: &str) -> Result<()> {
    links
        .record_visit(code, Utc::now(), ClickSource::Test)
        .with_context(|| format!("Could not visit '{code}'"))?;

    let clicks = links.find_by_code(code).map_or(0, |link| link.click_count());
    println!(
        "{} {} now has {} clicks",
        "✅".green(),
        code.cyan(),
        clicks.to_string().bright_white().bold()
    );

    Ok(())
}

fn delete_link(links: &mut LinkService, id: Uuid) -> Result<()> {
    links.delete(id)?;
    println!("{}", "✅ Link deleted".green().bold());
    Ok(())
}

/// Deletes every link after confirmation.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes` is given
fn clear_links(links: &mut LinkService, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Clear Links".bright_blue().bold());
    println!();

    if links.is_empty() {
        println!("{}", "  Nothing to clear".yellow());
        return Ok(());
    }

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete all {} links?", links.len()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    links.clear();
    println!("{}", "✅ All links deleted".green().bold());

    Ok(())
}

/// Displays registry statistics.
///
/// Shows:
/// - Total, active and expired links
/// - Total number of clicks
fn show_stats(links: &LinkService) {
    let stats = links.stats(Utc::now());

    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();
    println!(
        "  Links:   {}",
        stats.total.to_string().bright_green().bold()
    );
    println!("  Active:  {}", stats.active.to_string().green());
    println!("  Expired: {}", stats.expired.to_string().red());
    println!(
        "  Clicks:  {}",
        stats.total_clicks.to_string().bright_green().bold()
    );
    println!();
}
