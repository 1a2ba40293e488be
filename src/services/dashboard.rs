//! Everything the dashboard renders, derived from one batch of records.

use serde::Serialize;

use crate::models::record::{Decision, Record};
use crate::models::stats::{BreakdownSlice, ConfidencePoint, RecentDecision, Stats};
use crate::services::aggregator;

const NOT_AVAILABLE: &str = "N/A";

/// Cards, charts and table data for the overview page.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DashboardView {
    pub stats: Stats,
    pub breakdown: Vec<BreakdownSlice>,
    pub confidence_trend: Vec<ConfidencePoint>,
    pub recent: Vec<RecentDecision>,
}

impl DashboardView {
    /// Build the view from `records`, limiting the trend and table to the
    /// first `recent_limit` rows.
    pub fn build(records: &[Record], recent_limit: usize) -> Self {
        let stats = aggregator::aggregate(records);
        let breakdown = breakdown(&stats);
        let head = &records[..records.len().min(recent_limit)];

        let confidence_trend = head
            .iter()
            .enumerate()
            .map(|(index, record)| ConfidencePoint {
                index,
                confidence: record.confidence_percent(),
            })
            .collect();

        let recent = head.iter().map(recent_row).collect();

        Self {
            stats,
            breakdown,
            confidence_trend,
            recent,
        }
    }
}

fn breakdown(stats: &Stats) -> Vec<BreakdownSlice> {
    [
        (Decision::Approved, stats.approved),
        (Decision::Declined, stats.declined),
        (Decision::Pending, stats.pending),
    ]
    .into_iter()
    .map(|(decision, value)| BreakdownSlice {
        name: decision.label().to_string(),
        value,
    })
    .collect()
}

fn recent_row(record: &Record) -> RecentDecision {
    let decision_label = match record.clinician_decision.as_deref() {
        Some(raw) if !raw.is_empty() => raw.to_string(),
        _ => Decision::Pending.label().to_string(),
    };

    RecentDecision {
        patient_name: or_not_available(record.patient_name.as_deref()),
        antibiotic: or_not_available(record.current_antibiotic.as_deref()),
        recommendation: or_not_available(record.de_escalation_recommendation.as_deref()),
        decision: record.decision(),
        decision_label,
        confidence: record.confidence_percent(),
    }
}

fn or_not_available(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, decision: &str, score: Option<f64>) -> Record {
        Record {
            patient_name: Some(name.to_string()),
            current_antibiotic: Some("Vancomycin".to_string()),
            clinician_decision: Some(decision.to_string()),
            ai_confidence_score: score,
            ..Record::default()
        }
    }

    #[test]
    fn trend_and_table_are_limited_to_head() {
        let records: Vec<Record> = (0..15)
            .map(|i| row(&format!("P{i}"), "Approve", Some(0.5)))
            .collect();
        let view = DashboardView::build(&records, 10);

        assert_eq!(view.stats.total, 15);
        assert_eq!(view.confidence_trend.len(), 10);
        assert_eq!(view.recent.len(), 10);
        assert_eq!(view.recent[0].patient_name, "P0");
        assert_eq!(view.confidence_trend[9].index, 9);
    }

    #[test]
    fn missing_text_shows_placeholder() {
        let view = DashboardView::build(&[Record::default()], 10);
        let recent = &view.recent[0];
        assert_eq!(recent.patient_name, "N/A");
        assert_eq!(recent.antibiotic, "N/A");
        assert_eq!(recent.recommendation, "N/A");
        assert_eq!(recent.decision, Decision::Pending);
        assert_eq!(recent.decision_label, "Pending");
        assert_eq!(recent.confidence, 0);
    }

    #[test]
    fn decision_label_keeps_raw_text() {
        let view = DashboardView::build(&[row("A", "APPROVE", Some(0.875))], 10);
        assert_eq!(view.recent[0].decision, Decision::Approved);
        assert_eq!(view.recent[0].decision_label, "APPROVE");
        assert_eq!(view.recent[0].confidence, 88);
        assert_eq!(view.confidence_trend[0].confidence, 88);
    }

    #[test]
    fn breakdown_mirrors_counts() {
        let records = vec![
            row("A", "Approve", None),
            row("B", "Decline", None),
            row("C", "", None),
            row("D", "", None),
        ];
        let view = DashboardView::build(&records, 10);
        let values: Vec<(&str, u64)> = view
            .breakdown
            .iter()
            .map(|s| (s.name.as_str(), s.value))
            .collect();
        assert_eq!(values, [("Approved", 1), ("Declined", 1), ("Pending", 2)]);
    }

    #[test]
    fn zero_limit_hides_table() {
        let view = DashboardView::build(&[row("A", "Approve", None)], 0);
        assert!(view.recent.is_empty());
        assert!(view.confidence_trend.is_empty());
        assert_eq!(view.stats.total, 1);
    }
}
