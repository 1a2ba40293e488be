//! Aggregated dashboard statistics.

use serde::Serialize;

use super::record::Decision;

/// Per-group decision tally for the antibiotic and ward breakdowns.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupTally {
    pub name: String,
    pub approved: u64,
    pub declined: u64,
    pub pending: u64,
}

impl GroupTally {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            approved: 0,
            declined: 0,
            pending: 0,
        }
    }

    /// Count one record in its decision bucket.
    pub fn record(&mut self, decision: Decision) {
        match decision {
            Decision::Approved => self.approved += 1,
            Decision::Declined => self.declined += 1,
            Decision::Pending => self.pending += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.approved + self.declined + self.pending
    }
}

/// Summary statistics over one batch of records. Always recomputed wholesale.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Stats {
    pub total: u64,
    pub approved: u64,
    pub declined: u64,
    pub pending: u64,
    /// Whole percentage of decided records that were approved.
    pub approval_rate: u32,
    pub by_antibiotic: Vec<GroupTally>,
    pub by_ward: Vec<GroupTally>,
}

/// One slice of the decision breakdown chart.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BreakdownSlice {
    pub name: String,
    pub value: u64,
}

/// Confidence of one recent record, in percent.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfidencePoint {
    pub index: usize,
    pub confidence: i64,
}

/// Row of the recent-activity table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecentDecision {
    pub patient_name: String,
    pub antibiotic: String,
    pub recommendation: String,
    pub decision: Decision,
    pub decision_label: String,
    pub confidence: i64,
}
