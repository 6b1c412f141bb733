//! Lowercasing, punctuation-stripping, stop-word-dropping tokenizer shared
//! by every topic extractor and by the text-similarity scoring component.

use std::collections::HashSet;
use std::sync::OnceLock;

fn stop_words() -> &'static HashSet<&'static str> {
    static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STOP_WORDS.get_or_init(|| {
        [
            "the", "a", "an", "will", "on", "in", "of", "for", "to", "is", "be", "by", "at",
            "and", "or", "this", "that", "it", "as", "are", "was", "with", "from", "than",
        ]
        .into_iter()
        .collect()
    })
}

/// Lowercase, strip punctuation (keeping intra-word hyphens), collapse
/// whitespace, drop stop words and tokens shorter than 2 characters.
/// Output preserves the original word order.
pub fn tokenize(title: &str) -> Vec<String> {
    let lowered = title.to_lowercase();
    let mut tokens = Vec::new();
    for raw_word in lowered.split_whitespace() {
        let cleaned: String = raw_word
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '-')
            .collect();
        let cleaned = cleaned.trim_matches('-').to_string();
        if cleaned.len() < 2 {
            continue;
        }
        if stop_words().contains(cleaned.as_str()) {
            continue;
        }
        tokens.push(cleaned);
    }
    tokens
}

/// Jaccard similarity of two token sets: `|A ∩ B| / |A ∪ B|`, `1.0` if both
/// are empty (degenerate but conservative: "nothing to disagree on").
pub fn jaccard(a: &[String], b: &[String]) -> f32 {
    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();
    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_stopwords_and_punctuation() {
        let tokens = tokenize("Will BTC be over $100,000 by January 31, 2026?");
        assert!(!tokens.contains(&"will".to_string()));
        assert!(!tokens.contains(&"be".to_string()));
        assert!(!tokens.contains(&"by".to_string()));
        assert!(tokens.contains(&"btc".to_string()));
        assert!(tokens.contains(&"january".to_string()));
    }

    #[test]
    fn tokenize_keeps_intra_word_hyphens() {
        let tokens = tokenize("Final-Four matchup");
        assert!(tokens.iter().any(|t| t == "final-four"));
    }

    #[test]
    fn jaccard_identical_sets_is_one() {
        let a = tokenize("bitcoin above 100000");
        let b = tokenize("bitcoin above 100000");
        assert_eq!(jaccard(&a, &b), 1.0);
    }

    #[test]
    fn jaccard_disjoint_sets_is_zero() {
        let a = vec!["bitcoin".to_string()];
        let b = vec!["ethereum".to_string()];
        assert_eq!(jaccard(&a, &b), 0.0);
    }
}
