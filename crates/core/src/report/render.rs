//! HTML rendering of the run report.

use std::fmt::Write as _;

use serde::Serialize;

use crate::outcome::{OutcomeLog, RunStatus, UnitOutcome};

/// Report derived from a run's outcome log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    /// Overall classification.
    pub status: RunStatus,
    /// Failed units in processing order.
    pub rows: Vec<UnitOutcome>,
}

impl ReportDocument {
    /// Builds the report for a run over `total_units` units.
    #[must_use]
    pub fn from_outcomes(outcomes: &OutcomeLog, total_units: usize) -> Self {
        Self {
            status: outcomes.status(total_units),
            rows: outcomes.failures().to_vec(),
        }
    }

    /// Renders the report as an HTML fragment suitable for an email body.
    #[must_use]
    pub fn render_html(&self) -> String {
        let mut html = String::with_capacity(256 + self.rows.len() * 128);
        html.push_str("<h3>Expense item bulk load</h3>");
        let _ = write!(html, "<p>{}</p>", escape_html(self.status.summary()));
        html.push_str(
            "<table><thead><tr><th>Execution unit</th><th>Error message</th></tr></thead><tbody>",
        );
        for row in &self.rows {
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(&row.unit_id),
                escape_html(row.reason.message())
            );
        }
        html.push_str("</tbody></table>");
        html
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
