//! Derived views over a history log: outcome counts, chart series and the
//! recent-results table. All functions are pure.

use serde::Serialize;

use crate::history::{HistoryEntry, HistoryLog};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub probabilities: Vec<i64>,
    pub positive: usize,
    pub negative: usize,
}

/// One line of the recent-results listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub rank: usize,
    pub date: String,
    pub outcome: String,
    pub probability_percent: i64,
}

pub fn summarize(log: &HistoryLog) -> Summary {
    let total = log.len();
    let positive = log.entries().iter().filter(|e| e.is_positive()).count();
    Summary { total, positive, negative: total - positive }
}

/// Chart input for the `limit` newest entries, in stored order. The ratio
/// counts cover the whole log.
pub fn chart_series(log: &HistoryLog, limit: usize) -> ChartSeries {
    let summary = summarize(log);
    let recent = &log.entries()[..log.len().min(limit)];
    ChartSeries {
        labels: recent.iter().map(|e| short_label(&e.timestamp).to_string()).collect(),
        probabilities: recent.iter().map(|e| e.probability_percent).collect(),
        positive: summary.positive,
        negative: summary.negative,
    }
}

pub fn recent(log: &HistoryLog, limit: usize) -> Vec<HistoryRow> {
    log.entries()
        .iter()
        .take(limit)
        .enumerate()
        .map(|(idx, e)| HistoryRow {
            rank: idx + 1,
            date: e.timestamp.clone(),
            outcome: format!("{} ({})", outcome_label(e), e.severity),
            probability_percent: e.probability_percent,
        })
        .collect()
}

/// Text before the first comma of a timestamp (the date part).
pub fn short_label(timestamp: &str) -> &str {
    timestamp.split(',').next().unwrap_or(timestamp)
}

pub fn outcome_label(entry: &HistoryEntry) -> &'static str {
    if entry.is_positive() {
        "Parkinson's"
    } else {
        "No Parkinson's"
    }
}
