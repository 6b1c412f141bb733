//! Derives the ranked polling watchlist from the current set of market
//! links: confirmed pairs poll at the highest priority, suggested pairs
//! scoring above their topic's safe floor poll as candidate-safe, and the
//! remaining top-scoring suggestions round out a capped "top suggested"
//! tier. Idempotent: the same link set always produces the same watchlist.

use std::collections::HashSet;

use crate::config::WatchlistConfig;
use crate::model::{LinkStatus, MarketLink, Venue, WatchPriority, WatchlistItem};

/// Build the watchlist from every link the engine currently knows about.
/// `config.max_total`/`max_per_venue`/`max_top_suggested` are applied last,
/// after priority assignment, so higher-priority items are never crowded
/// out by lower-priority ones.
pub fn build_watchlist(links: &[MarketLink], config: &WatchlistConfig) -> Vec<WatchlistItem> {
    let mut confirmed = Vec::new();
    let mut candidate_safe = Vec::new();
    let mut top_suggested = Vec::new();

    for link in links {
        match link.status {
            LinkStatus::Confirmed => {
                confirmed.push(item(link, link.left_venue, link.left_market_id, WatchPriority::Confirmed));
                confirmed.push(item(link, link.right_venue, link.right_market_id, WatchPriority::Confirmed));
            }
            LinkStatus::Suggested => {
                if link.score >= config.safe_floor(link.topic) {
                    candidate_safe.push(item(link, link.left_venue, link.left_market_id, WatchPriority::CandidateSafe));
                    candidate_safe.push(item(link, link.right_venue, link.right_market_id, WatchPriority::CandidateSafe));
                } else {
                    top_suggested.push((
                        link.score,
                        item(link, link.left_venue, link.left_market_id, WatchPriority::TopSuggested),
                        item(link, link.right_venue, link.right_market_id, WatchPriority::TopSuggested),
                    ));
                }
            }
            LinkStatus::Rejected => {}
        }
    }

    top_suggested.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    top_suggested.truncate(config.max_top_suggested);
    let mut top_items = Vec::new();
    for (_, left, right) in top_suggested {
        top_items.push(left);
        top_items.push(right);
    }

    let mut result = Vec::new();
    let mut seen: HashSet<(Venue, i64)> = HashSet::new();
    for item in confirmed.into_iter().chain(candidate_safe).chain(top_items) {
        if seen.insert((item.venue, item.market_id)) {
            result.push(item);
        }
    }

    apply_caps(result, config)
}

fn item(link: &MarketLink, venue: Venue, market_id: i64, priority: WatchPriority) -> WatchlistItem {
    WatchlistItem {
        venue,
        market_id,
        priority: priority.value(),
        reason: format!("{:?} link, topic={}, score={:.2}", link.status, link.topic, link.score),
    }
}

/// Apply `max_per_venue` then `max_total`, always keeping the
/// highest-priority items first (ties broken by the order they were
/// already sorted in, which is priority-major already).
fn apply_caps(items: Vec<WatchlistItem>, config: &WatchlistConfig) -> Vec<WatchlistItem> {
    let mut per_venue_count: std::collections::HashMap<Venue, usize> = std::collections::HashMap::new();
    let mut capped = Vec::new();
    for item in items {
        let count = per_venue_count.entry(item.venue).or_insert(0);
        if *count >= config.max_per_venue {
            continue;
        }
        *count += 1;
        capped.push(item);
        if capped.len() >= config.max_total {
            break;
        }
    }
    capped
}
