//! Rendering sinks for the history dashboard.

use serde::Serialize;
use std::io::Write;

use crate::aggregate::{ChartSeries, HistoryRow, Summary};
use crate::logging::{self, obj, v_str, Domain};
use crate::theme::Theme;

const BAR_WIDTH: usize = 40;

/// Everything a dashboard needs to draw: counts, chart input and the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub summary: Summary,
    pub series: ChartSeries,
    pub rows: Vec<HistoryRow>,
}

pub trait DashboardSink {
    fn render(&mut self, view: &DashboardView);
}

impl<T: DashboardSink + ?Sized> DashboardSink for Box<T> {
    fn render(&mut self, view: &DashboardView) {
        (**self).render(view)
    }
}

/// Discards every view.
pub struct NullSink;

impl DashboardSink for NullSink {
    fn render(&mut self, _view: &DashboardView) {}
}

/// Keeps every rendered view, newest last.
#[derive(Debug, Default)]
pub struct CapturingSink {
    views: Vec<DashboardView>,
}

impl CapturingSink {
    pub fn last(&self) -> Option<&DashboardView> {
        self.views.last()
    }

    pub fn renders(&self) -> usize {
        self.views.len()
    }
}

impl DashboardSink for CapturingSink {
    fn render(&mut self, view: &DashboardView) {
        self.views.push(view.clone());
    }
}

// =============================================================================
// Terminal
// =============================================================================

struct Palette {
    bad: &'static str,
    good: &'static str,
    accent: &'static str,
    reset: &'static str,
}

impl Palette {
    fn for_theme(theme: Option<Theme>) -> Self {
        match theme {
            Some(Theme::Dark) => Self { bad: "\x1b[91m", good: "\x1b[92m", accent: "\x1b[95m", reset: "\x1b[0m" },
            Some(Theme::Light) => Self { bad: "\x1b[31m", good: "\x1b[32m", accent: "\x1b[34m", reset: "\x1b[0m" },
            None => Self { bad: "", good: "", accent: "", reset: "" },
        }
    }
}

/// Text dashboard: ratio line, probability bars and a listing of the most
/// recent results. Colors follow the theme; `None` renders plain text.
pub struct TerminalDashboard<W> {
    out: W,
    theme: Option<Theme>,
}

impl<W: Write> TerminalDashboard<W> {
    pub fn new(out: W, theme: Option<Theme>) -> Self {
        Self { out, theme }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_view(&mut self, view: &DashboardView) -> std::io::Result<()> {
        let p = Palette::for_theme(self.theme);
        let s = &view.summary;
        let out = &mut self.out;

        writeln!(out, "=== Results Dashboard ===\n")?;
        writeln!(out, "  Total tests:     {:>6}", s.total)?;
        writeln!(out, "  Parkinson's:     {}{:>6}{}", p.bad, s.positive, p.reset)?;
        writeln!(out, "  No Parkinson's:  {}{:>6}{}", p.good, s.negative, p.reset)?;

        writeln!(out, "\n--- Result Ratio ---")?;
        if s.total == 0 {
            writeln!(out, "  (no results yet)")?;
        } else {
            let pos_width = (view.series.positive * BAR_WIDTH + s.total / 2) / s.total;
            writeln!(
                out,
                "  [{}{}{}{}{}] {:.1}% / {:.1}%",
                p.bad,
                "#".repeat(pos_width),
                p.good,
                "-".repeat(BAR_WIDTH - pos_width.min(BAR_WIDTH)),
                p.reset,
                percent(view.series.positive, s.total),
                percent(view.series.negative, s.total),
            )?;
        }

        writeln!(out, "\n--- Predicted Probability Over Time ---")?;
        for (label, prob) in view.series.labels.iter().zip(&view.series.probabilities) {
            let width = ((*prob).clamp(0, 100) as usize * BAR_WIDTH) / 100;
            writeln!(out, "  {:<12} {}{}{} {:>3}%", label, p.accent, "█".repeat(width), p.reset, prob)?;
        }

        writeln!(out, "\n--- Recent Results ---")?;
        writeln!(out, "  {:>3}  {:<26} {:<30} {:>5}", "#", "Date", "Result", "Prob")?;
        for row in &view.rows {
            writeln!(
                out,
                "  {:>3}  {:<26} {:<30} {:>5}",
                row.rank, row.date, row.outcome, row.probability_percent
            )?;
        }
        out.flush()
    }
}

impl<W: Write> DashboardSink for TerminalDashboard<W> {
    fn render(&mut self, view: &DashboardView) {
        if let Err(err) = self.write_view(view) {
            logging::warn(Domain::History, "dashboard_write_failed", obj(&[("error", v_str(&err.to_string()))]));
        }
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{chart_series, recent, summarize};
    use crate::history::{HistoryEntry, HistoryLog};

    fn view_of(log: &HistoryLog) -> DashboardView {
        DashboardView { summary: summarize(log), series: chart_series(log, 20), rows: recent(log, 20) }
    }

    fn render_plain(view: &DashboardView) -> String {
        let mut dash = TerminalDashboard::new(Vec::new(), None);
        dash.render(view);
        String::from_utf8(dash.into_inner()).unwrap()
    }

    #[test]
    fn renders_empty_dashboard() {
        let text = render_plain(&DashboardView::default());
        assert!(text
            .lines()
            .any(|l| l.split_whitespace().collect::<Vec<_>>() == ["Total", "tests:", "0"]));
        assert!(text.contains("(no results yet)"));
    }

    #[test]
    fn renders_rows_and_bars() {
        let log = HistoryLog::from(vec![
            HistoryEntry::new("7/2/2026, 9:00:00 AM".into(), 1, 80, "severe"),
            HistoryEntry::new("7/1/2026, 9:00:00 AM".into(), 0, 10, ""),
        ]);
        let text = render_plain(&view_of(&log));
        assert!(text.contains("7/2/2026"));
        assert!(text.contains("Parkinson's (severe)"));
        assert!(text.contains("No Parkinson's (unknown)"));
        assert!(text.contains("50.0% / 50.0%"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn dark_theme_adds_color() {
        let mut dash = TerminalDashboard::new(Vec::new(), Some(Theme::Dark));
        dash.render(&DashboardView::default());
        let text = String::from_utf8(dash.into_inner()).unwrap();
        assert!(text.contains("\x1b[91m"));
    }
}
