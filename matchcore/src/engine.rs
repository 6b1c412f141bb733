//! The engine loop: resolve a topic's pipeline, pull eligible markets from
//! both venues, block and score candidate pairs, gate/classify/bracket, and
//! upsert the resulting links. One call to `run_topic` handles one
//! `(topic, left venue, right venue)` triple; the binary crate loops this
//! over every topic the dispatcher knows about.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::{info, warn};
use rayon::prelude::*;

use crate::bracket::apply_bracket_grouping;
use crate::classify::classify;
use crate::config::MatchConfig;
use crate::dispatcher::pipeline_for;
use crate::error::{EngineError, ExtractError};
use crate::model::{CanonicalTopic, LinkStatus, Market, MarketLink, Venue};
use crate::repository::{MarketLinkRepository, MarketRepository};
use crate::rules::{auto_confirm_verdict, auto_reject_verdict, RuleVerdict};
use crate::signals::{extract_signals, Signals};

/// Per-run counters, logged at the end of every `run_topic` call and
/// returned to the caller for the CLI's `stats` summary.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub topic: Option<CanonicalTopic>,
    pub left_markets: usize,
    pub right_markets: usize,
    pub candidates_scored: usize,
    pub links_suggested: usize,
    pub links_confirmed: usize,
    pub links_rejected: usize,
    pub links_written: usize,
    /// Markets skipped individually because their title was missing or
    /// blank; never aborts the run.
    pub extractor_skipped: usize,
}

const ALGO_VERSION: &str = "matchcore-v1";

/// Run the full pipeline for one topic against one `(left, right)` venue
/// pair. `now` is threaded in explicitly so the eligibility window is
/// deterministic and testable.
pub fn run_topic<R>(
    repo: &mut R,
    config: &MatchConfig,
    topic: CanonicalTopic,
    left_venue: Venue,
    right_venue: Venue,
    now: DateTime<Utc>,
) -> Result<(Vec<MarketLink>, RunSummary), EngineError>
where
    R: MarketRepository + MarketLinkRepository,
{
    let pipeline = pipeline_for(topic)?;
    let since = now - chrono::Duration::hours(config.lookback_hours);

    let left_markets: Vec<Market> = repo
        .markets_for_venue(left_venue, since)?
        .into_iter()
        .filter(|m| m.is_eligible(now, config.lookback_hours) && classify(m).topic == topic)
        .collect();
    let right_markets: Vec<Market> = repo
        .markets_for_venue(right_venue, since)?
        .into_iter()
        .filter(|m| m.is_eligible(now, config.lookback_hours) && classify(m).topic == topic)
        .collect();

    let mut summary = RunSummary {
        topic: Some(topic),
        left_markets: left_markets.len(),
        right_markets: right_markets.len(),
        ..Default::default()
    };

    // Kalshi "mutually exclusive event" sports markets are excluded from
    // pairwise matching entirely, so they never even reach the blocking
    // index below.
    let (left_signals, left_skipped) = extract_eligible(left_markets, topic);
    let (right_signals, right_skipped) = extract_eligible(right_markets, topic);
    summary.extractor_skipped = left_skipped + right_skipped;

    let mut right_blocks: HashMap<String, Vec<usize>> = HashMap::new();
    let mut right_unblocked: Vec<usize> = Vec::new();
    for (i, (_, signals)) in right_signals.iter().enumerate() {
        match pipeline.block_key(signals) {
            Some(key) => right_blocks.entry(key).or_default().push(i),
            None => right_unblocked.push(i),
        }
    }

    // Scoring every (left, blocked-right) pair is pure CPU work with no
    // shared mutable state, so it fans out across a rayon thread pool; only
    // the repository writes after this point stay single-threaded.
    let per_left_results: Vec<(i64, Signals, usize, Vec<MarketLink>, Vec<(i64, Signals)>)> = left_signals
        .par_iter()
        .map(|(left_market, left_sig)| {
            let mut candidate_indices: Vec<usize> = match pipeline.block_key(left_sig) {
                Some(key) => right_blocks.get(&key).cloned().unwrap_or_default(),
                None => (0..right_signals.len()).collect(),
            };
            candidate_indices.extend(&right_unblocked);
            candidate_indices.sort_unstable();
            candidate_indices.dedup();

            let mut candidates_scored = 0usize;
            let mut scored: Vec<(f32, String, &Market, &Signals)> = Vec::new();
            for idx in candidate_indices {
                let (right_market, right_sig) = &right_signals[idx];
                candidates_scored += 1;

                if !pipeline.hard_gate(left_sig, right_sig) {
                    continue;
                }
                let (score, reason) = pipeline.score(left_sig, right_sig);
                if score < config.min_score(topic) {
                    continue;
                }
                scored.push((score, reason, right_market, right_sig));
            }

            scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
            scored.truncate(config.max_candidates_per_left);

            let mut links = Vec::new();
            let mut touched_right = Vec::new();
            for (score, reason, right_market, right_sig) in scored {
                touched_right.push((right_market.id, right_sig.clone()));

                // Auto-reject is checked first: a pair that fails both rule
                // packs keeps whichever verdict fired, since reject is the
                // more conservative of the two when (hypothetically) both
                // would otherwise apply.
                let mut status = LinkStatus::Suggested;
                let mut reason = reason;
                if config.is_auto_reject_enabled(topic) {
                    let outcome = auto_reject_verdict(config, topic, score, left_sig, right_sig);
                    if outcome.verdict == RuleVerdict::Reject {
                        status = LinkStatus::Rejected;
                        reason = format!("{reason} rule={}", outcome.rule);
                    }
                }
                if status == LinkStatus::Suggested && config.is_auto_confirm_enabled(topic) {
                    let outcome = auto_confirm_verdict(topic, score, left_sig, right_sig);
                    if outcome.verdict == RuleVerdict::Confirm {
                        status = LinkStatus::Confirmed;
                        reason = format!("{reason} rule={}", outcome.rule);
                    }
                }

                links.push(MarketLink {
                    left_market_id: left_market.id,
                    right_market_id: right_market.id,
                    left_venue,
                    right_venue,
                    topic,
                    score,
                    reason,
                    algo_version: ALGO_VERSION.to_string(),
                    status,
                    created_at: now,
                    updated_at: now,
                });
            }

            (left_market.id, left_sig.clone(), candidates_scored, links, touched_right)
        })
        .collect();

    let mut all_links: Vec<MarketLink> = Vec::new();
    let mut signals_by_market: HashMap<i64, Signals> = HashMap::new();

    for (left_id, left_sig, candidates_scored, links, touched_right) in per_left_results {
        signals_by_market.insert(left_id, left_sig);
        summary.candidates_scored += candidates_scored;
        for (right_id, right_sig) in touched_right {
            signals_by_market.insert(right_id, right_sig);
        }
        for link in &links {
            match link.status {
                LinkStatus::Confirmed => summary.links_confirmed += 1,
                LinkStatus::Rejected => summary.links_rejected += 1,
                LinkStatus::Suggested => summary.links_suggested += 1,
            }
        }
        all_links.extend(links);
    }

    let final_links = if config.bracket_grouping {
        apply_bracket_grouping(all_links, &signals_by_market)
    } else {
        all_links
    };

    let written = upsert_respecting_terminal_status(repo, &final_links, config.write_batch_size)?;
    summary.links_written = written;

    info!(
        "topic={topic} left={} right={} candidates={} suggested={} confirmed={} rejected={} written={}",
        summary.left_markets,
        summary.right_markets,
        summary.candidates_scored,
        summary.links_suggested,
        summary.links_confirmed,
        summary.links_rejected,
        summary.links_written
    );

    Ok((final_links, summary))
}

/// Extract signals for every market, skipping (and counting) any whose
/// title is blank rather than letting an extractor guess at nothing.
/// Also drops Kalshi "mutually exclusive event" sports markets, which are
/// excluded from pairwise matching entirely.
fn extract_eligible(markets: Vec<Market>, topic: CanonicalTopic) -> (Vec<(Market, Signals)>, usize) {
    let mut skipped = 0;
    let mut out = Vec::with_capacity(markets.len());
    for m in markets {
        if m.title.trim().is_empty() {
            let err = ExtractError::MissingField { market_id: m.id, field: "title" };
            warn!("extractor_skipped: {err}");
            skipped += 1;
            continue;
        }
        let signals = extract_signals(&m, topic);
        if signals.is_mve() {
            continue;
        }
        out.push((m, signals));
    }
    (out, skipped)
}

/// Write links in shrinking batches on failure, never writing a link whose
/// counterpart is already in a terminal state with a conflicting status
/// (the repository layer also enforces this; this is the engine's own
/// belt-and-suspenders check before it ever calls upsert).
fn upsert_respecting_terminal_status<R: MarketLinkRepository>(
    repo: &mut R,
    links: &[MarketLink],
    batch_size: usize,
) -> Result<usize, EngineError> {
    let mut filtered = Vec::with_capacity(links.len());
    for link in links {
        let existing = repo.existing_status(link.left_market_id, link.right_market_id)?;
        match existing {
            Some(status) if status.is_terminal() && status != link.status => {
                warn!(
                    "skipping write for ({}, {}): existing status {status:?} is terminal",
                    link.left_market_id, link.right_market_id
                );
            }
            _ => filtered.push(link.clone()),
        }
    }

    let mut written = 0;
    for batch in filtered.chunks(batch_size.max(1)) {
        written += repo.upsert_links(batch)?;
    }
    Ok(written)
}
