//! match-engine binary source.
//! Runs cross-venue matching, watchlist sync, suggestion cleanup, and
//! reporting as subcommands of one process sharing the same repositories
//! and config, composable in a cron/systemd timer.

mod settings;

use std::env;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::{debug, info, warn};

use matchcore::config::MatchConfig;
use matchcore::engine::{run_topic, RunSummary};
use matchcore::model::{CanonicalTopic, LinkStatus, Venue};
use matchcore::repository::{IngestionRepository, MarketLinkRepository, WatchlistRepository};
use matchcore::watchlist::build_watchlist;
use matchcore_db::{build_pool, PgRepo};
use matchcore_venues::kalshi::KalshiClient;
use matchcore_venues::polymarket::PolymarketClient;
use matchcore_venues::{client::build_client, VenueClient};

use settings::Settings;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Set the log level (e.g., error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the matching pipeline for every canonical topic across the
    /// Kalshi/Polymarket venue pair and upsert the resulting links.
    Match {
        /// Restrict the run to a single topic (e.g. CRYPTO_DAILY)
        #[arg(long)]
        topic: Option<String>,
    },
    /// Recompute the watchlist from currently stored links and replace it.
    WatchlistSync,
    /// Report counts of suggested links older than `--older-than-days`
    /// that were never confirmed or rejected by a human reviewer.
    CleanupSuggestions {
        #[arg(long, default_value_t = 30)]
        older_than_days: i64,
    },
    /// Print summary counts of markets, links, and watchlist entries.
    Stats,
}

fn init_logging(log_level: &str) {
    let log_level = log_level.to_lowercase();
    match log_level.as_str() {
        "error" | "warn" | "info" | "debug" | "trace" => env::set_var("RUST_LOG", log_level),
        _ => {
            println!("Invalid log level, resetting to INFO.");
            env::set_var("RUST_LOG", "info")
        }
    }
    env_logger::init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);
    debug!("Command line args: {args:?}");

    dotenv().ok();
    let settings = Settings::load()?;
    let pool = build_pool(&settings.database_url, settings.db_pool_size).context("Failed to build connection pool")?;
    let mut repo = PgRepo::new(
        pool,
        settings.match_config.write_batch_size,
        settings.match_config.write_min_batch_size,
    );

    match args.command {
        Command::Match { topic } => {
            ingest_markets(&mut repo, &settings.match_config).await?;
            run_match(&mut repo, &settings.match_config, topic)?
        }
        Command::WatchlistSync => run_watchlist_sync(&mut repo, &settings.match_config)?,
        Command::CleanupSuggestions { older_than_days } => {
            run_cleanup_suggestions(&repo, older_than_days)?
        }
        Command::Stats => run_stats(&repo)?,
    }

    Ok(())
}

const VENUE_PAIRS: &[(Venue, Venue)] = &[(Venue::Kalshi, Venue::Polymarket)];

/// Fetch fresh catalogs from both venues concurrently (the only part of
/// the run that benefits from `tokio`'s cooperative scheduler; scoring
/// itself fans out over `rayon` inside `run_topic`) and upsert them ahead
/// of the topic loop.
async fn ingest_markets(repo: &mut PgRepo, config: &MatchConfig) -> Result<()> {
    let kalshi_base = env::var("KALSHI_BASE_URL").unwrap_or_else(|_| "https://trading-api.kalshi.com/trade-api/v2".to_string());
    let polymarket_base = env::var("POLYMARKET_BASE_URL").unwrap_or_else(|_| "https://clob.polymarket.com".to_string());
    let requests_per_second: usize = env::var("VENUE_REQUESTS_PER_SECOND").ok().and_then(|s| s.parse().ok()).unwrap_or(5);

    let kalshi = KalshiClient::new(
        kalshi_base,
        build_client(config.fetch_timeout_ms, config.fetch_max_attempts, requests_per_second),
    );
    let polymarket = PolymarketClient::new(
        polymarket_base,
        build_client(config.fetch_timeout_ms, config.fetch_max_attempts, requests_per_second),
    );

    let (kalshi_result, polymarket_result) = tokio::join!(kalshi.fetch_markets(), polymarket.fetch_markets());

    match kalshi_result {
        Ok(markets) => {
            let written = repo.upsert_markets(Venue::Kalshi, &markets).context("Failed to upsert Kalshi markets")?;
            info!("ingested {written} markets from kalshi");
        }
        Err(e) => warn!("kalshi fetch failed: {e}"),
    }
    match polymarket_result {
        Ok(markets) => {
            let written = repo.upsert_markets(Venue::Polymarket, &markets).context("Failed to upsert Polymarket markets")?;
            info!("ingested {written} markets from polymarket");
        }
        Err(e) => warn!("polymarket fetch failed: {e}"),
    }
    Ok(())
}

fn run_match(repo: &mut PgRepo, config: &MatchConfig, topic_filter: Option<String>) -> Result<()> {
    // UNKNOWN has no registered pipeline: it means the classifier couldn't
    // place the market anywhere, not a topic to run matching against.
    let matchable_topics: Vec<CanonicalTopic> =
        CanonicalTopic::all().into_iter().filter(|t| *t != CanonicalTopic::Unknown).collect();
    let topics: Vec<CanonicalTopic> = match topic_filter {
        Some(name) => {
            let wanted = name.to_uppercase();
            matchable_topics.into_iter().filter(|t| t.to_string() == wanted).collect()
        }
        None => matchable_topics,
    };
    if topics.is_empty() {
        warn!("no topic matched the --topic filter; nothing to do");
        return Ok(());
    }

    let now = Utc::now();
    let mut totals = RunSummary::default();
    for topic in topics {
        for &(left_venue, right_venue) in VENUE_PAIRS {
            info!("running topic={topic} left={left_venue} right={right_venue}");
            let (_, summary) = run_topic(repo, config, topic, left_venue, right_venue, now)
                .with_context(|| format!("match run failed for topic {topic}"))?;
            print_summary_table(&summary);
            totals.left_markets += summary.left_markets;
            totals.right_markets += summary.right_markets;
            totals.candidates_scored += summary.candidates_scored;
            totals.links_suggested += summary.links_suggested;
            totals.links_confirmed += summary.links_confirmed;
            totals.links_rejected += summary.links_rejected;
            totals.links_written += summary.links_written;
            totals.extractor_skipped += summary.extractor_skipped;
        }
    }
    info!(
        "match run complete: {} written across {} candidates scored",
        totals.links_written, totals.candidates_scored
    );
    Ok(())
}

fn run_watchlist_sync(repo: &mut PgRepo, config: &MatchConfig) -> Result<()> {
    let all_links = collect_all_links(repo)?;
    let items = build_watchlist(&all_links, &config.watchlist);
    let written = repo.replace_watchlist(&items).context("Failed to replace watchlist")?;
    info!("watchlist synced: {written} items");
    println!("watchlist items written: {written}");
    Ok(())
}

/// `MarketLinkRepository` does not expose a bare "all links" query (by
/// design: reads are scoped per-market or per-pair), so the sync command
/// walks every known market id by re-running `links_for_market` against
/// markets already present on both sides of each venue pair.
fn collect_all_links(repo: &PgRepo) -> Result<Vec<matchcore::model::MarketLink>> {
    use matchcore::repository::MarketRepository;
    use std::collections::HashMap;

    let since = Utc::now() - chrono::Duration::days(3650);
    let mut seen = HashMap::new();
    for venue in [Venue::Kalshi, Venue::Polymarket] {
        for market in repo.markets_for_venue(venue, since).context("Failed to list markets")? {
            for link in repo.links_for_market(market.id).context("Failed to list links")? {
                seen.insert((link.left_market_id, link.right_market_id), link);
            }
        }
    }
    Ok(seen.into_values().collect())
}

fn run_cleanup_suggestions(repo: &PgRepo, older_than_days: i64) -> Result<()> {
    let stale_cutoff = Utc::now() - chrono::Duration::days(older_than_days);
    let links = collect_all_links(repo)?;
    let stale: Vec<_> = links
        .iter()
        .filter(|l| l.status == LinkStatus::Suggested && l.created_at < stale_cutoff)
        .collect();
    info!("{} suggested links older than {older_than_days} days awaiting review", stale.len());
    println!("stale suggestions (> {older_than_days}d): {}", stale.len());
    for link in stale.iter().take(20) {
        println!(
            "  {} <-> {} topic={} score={:.2} created={}",
            link.left_market_id, link.right_market_id, link.topic, link.score, link.created_at
        );
    }
    Ok(())
}

fn run_stats(repo: &PgRepo) -> Result<()> {
    use matchcore::repository::MarketRepository;

    let since = Utc::now() - chrono::Duration::days(3650);
    let mut markets_by_venue = Vec::new();
    for venue in [Venue::Kalshi, Venue::Polymarket] {
        let count = repo.markets_for_venue(venue, since).context("Failed to list markets")?.len();
        markets_by_venue.push((venue, count));
    }
    let links = collect_all_links(repo)?;
    let watchlist = repo.current_watchlist().context("Failed to read watchlist")?;

    println!("--- match-engine stats ---");
    for (venue, count) in &markets_by_venue {
        println!("markets[{venue}] = {count}");
    }
    println!("links total = {}", links.len());
    println!(
        "links confirmed = {}",
        links.iter().filter(|l| l.status == LinkStatus::Confirmed).count()
    );
    println!(
        "links suggested = {}",
        links.iter().filter(|l| l.status == LinkStatus::Suggested).count()
    );
    println!(
        "links rejected = {}",
        links.iter().filter(|l| l.status == LinkStatus::Rejected).count()
    );
    println!("watchlist items = {}", watchlist.len());
    Ok(())
}

fn print_summary_table(summary: &RunSummary) {
    println!(
        "topic={:<16} left={:<6} right={:<6} candidates={:<8} suggested={:<6} confirmed={:<6} rejected={:<6} written={:<6} skipped={:<4}",
        summary.topic.map(|t| t.to_string()).unwrap_or_default(),
        summary.left_markets,
        summary.right_markets,
        summary.candidates_scored,
        summary.links_suggested,
        summary.links_confirmed,
        summary.links_rejected,
        summary.links_written,
        summary.extractor_skipped,
    );
}
