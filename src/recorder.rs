use serde_json::json;

use crate::aggregate::{chart_series, recent, summarize};
use crate::dashboard::{DashboardSink, DashboardView};
use crate::history::{Clock, HistoryEntry, HistoryLog, HistoryStore, DEFAULT_CHART_LIMIT, MAX_ENTRIES};
use crate::logging::{self, obj, v_str, Domain};
use crate::storage::KvStore;

/// Appends results to the history log and pushes the refreshed aggregate
/// view to a sink.
pub struct Recorder<S, C, D> {
    history: HistoryStore<S>,
    clock: C,
    sink: D,
    chart_limit: usize,
}

impl<S: KvStore, C: Clock, D: DashboardSink> Recorder<S, C, D> {
    pub fn new(store: S, clock: C, sink: D) -> Self {
        Self {
            history: HistoryStore::new(store),
            clock,
            sink,
            chart_limit: DEFAULT_CHART_LIMIT,
        }
    }

    /// Number of newest entries fed to the chart and table. The log itself
    /// is always capped at `MAX_ENTRIES`.
    pub fn with_chart_limit(mut self, chart_limit: usize) -> Self {
        self.chart_limit = chart_limit;
        self
    }

    /// Values are stored as given; range checks are the caller's concern.
    pub fn record(&mut self, prediction: i64, probability_percent: i64, severity: &str) -> HistoryEntry {
        let mut log = self.history.load();
        let entry = HistoryEntry::new(self.clock.now(), prediction, probability_percent, severity);
        log.push_front(entry.clone(), MAX_ENTRIES);
        self.history.save(&log);
        logging::info(
            Domain::History,
            "result_recorded",
            obj(&[
                ("prediction", json!(entry.prediction)),
                ("probability", json!(entry.probability_percent)),
                ("severity", v_str(&entry.severity)),
                ("entries", json!(log.len())),
            ]),
        );
        self.render(&log);
        entry
    }

    /// Re-render the sink from the stored log.
    pub fn refresh(&mut self) -> DashboardView {
        let log = self.history.load();
        self.render(&log)
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.render(&HistoryLog::new());
    }

    pub fn load(&self) -> HistoryLog {
        self.history.load()
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    fn render(&mut self, log: &HistoryLog) -> DashboardView {
        let view = DashboardView {
            summary: summarize(log),
            series: chart_series(log, self.chart_limit),
            rows: recent(log, self.chart_limit),
        };
        self.sink.render(&view);
        view
    }
}
