//! Consensus arithmetic over practitioner result mappings.
//!
//! Numeric score fields merge by arithmetic mean; recommendation-string
//! fields merge by set union, deduplicated and truncated to a fixed display
//! count. Principle labels count as common once two practitioners carry
//! them.

use serde::Serialize;
use serde_json::Value;

/// Display cap on merged recommendation/action-item lists.
pub const MAX_LIST_ITEMS: usize = 5;

/// Minimum number of practitioners that must carry a principle label for it
/// to count as common ground.
pub const AGREEMENT_THRESHOLD: usize = 2;

/// Score below which a practitioner's verdict counts as critical.
pub const CRITICAL_SCORE: f64 = 50.0;

/// The merged view across all successful practitioner results.
#[derive(Debug, Clone, Serialize)]
pub struct Consensus {
    pub average_score: f64,
    pub top_recommendations: Vec<String>,
}

/// Build a consensus from successful result mappings.
pub fn build_consensus(results: &[Value]) -> Consensus {
    Consensus {
        average_score: average_score(results),
        top_recommendations: top_recommendations(results),
    }
}

/// Arithmetic mean of the `overallScore` field across results that carry
/// one; zero when none do.
pub fn average_score(results: &[Value]) -> f64 {
    let scores: Vec<f64> = results
        .iter()
        .filter_map(|r| r.get("overallScore").and_then(Value::as_f64))
        .collect();

    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Deduplicated union of a string-list field across results, preserving
/// first-seen order.
pub fn string_union(results: &[Value], field: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for result in results {
        let Some(items) = result.get(field).and_then(Value::as_array) else {
            continue;
        };
        for item in items {
            if let Some(s) = item.as_str() {
                if !seen.iter().any(|existing: &String| existing == s) {
                    seen.push(s.to_string());
                }
            }
        }
    }
    seen
}

/// Union of `recommendations`, truncated to the display cap.
pub fn top_recommendations(results: &[Value]) -> Vec<String> {
    let mut union = string_union(results, "recommendations");
    union.truncate(MAX_LIST_ITEMS);
    union
}

/// Union of `actionItems`, truncated to the display cap.
pub fn action_items(results: &[Value]) -> Vec<String> {
    let mut union = string_union(results, "actionItems");
    union.truncate(MAX_LIST_ITEMS);
    union
}

/// Names of practitioners whose score fell below the critical threshold.
pub fn critical_issues(named_results: &[(String, Value)]) -> Vec<String> {
    named_results
        .iter()
        .filter(|(_, result)| {
            result
                .get("overallScore")
                .and_then(Value::as_f64)
                .unwrap_or(100.0)
                < CRITICAL_SCORE
        })
        .map(|(name, _)| format!("{} identified critical issues", name))
        .collect()
}

/// Tally `principles` labels across results and keep those at or above the
/// agreement threshold, sorted by count descending (label ascending on ties).
pub fn common_principles(results: &[Value]) -> Vec<(String, usize)> {
    let mut tallies: Vec<(String, usize)> = Vec::new();

    for result in results {
        let Some(items) = result.get("principles").and_then(Value::as_array) else {
            continue;
        };
        for item in items {
            if let Some(label) = item.as_str() {
                match tallies.iter_mut().find(|(l, _)| l == label) {
                    Some((_, count)) => *count += 1,
                    None => tallies.push((label.to_string(), 1)),
                }
            }
        }
    }

    tallies.retain(|(_, count)| *count >= AGREEMENT_THRESHOLD);
    tallies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    tallies
}
