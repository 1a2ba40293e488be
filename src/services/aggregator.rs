//! Decision statistics over a batch of audit-trail records.
//!
//! A single synchronous pass classifies every record once and feeds the
//! result into the overall counts and both group breakdowns. Groups are
//! emitted in the order their key was first seen.

use std::collections::HashMap;

use crate::models::record::{Decision, Record};
use crate::models::stats::{GroupTally, Stats};

/// Compute dashboard statistics for `records`.
pub fn aggregate(records: &[Record]) -> Stats {
    let mut approved = 0u64;
    let mut declined = 0u64;
    let mut pending = 0u64;
    let mut by_antibiotic = Grouping::default();
    let mut by_ward = Grouping::default();

    for record in records {
        let decision = record.decision();
        match decision {
            Decision::Approved => approved += 1,
            Decision::Declined => declined += 1,
            Decision::Pending => pending += 1,
        }
        by_antibiotic.record(record.antibiotic_key(), decision);
        by_ward.record(record.ward_key(), decision);
    }

    Stats {
        total: records.len() as u64,
        approved,
        declined,
        pending,
        approval_rate: approval_rate(approved, declined),
        by_antibiotic: by_antibiotic.into_groups(),
        by_ward: by_ward.into_groups(),
    }
}

/// Approved share of decided records as a whole percentage, rounded half up.
/// Zero when nothing has been decided.
pub fn approval_rate(approved: u64, declined: u64) -> u32 {
    let decided = approved + declined;
    if decided == 0 {
        return 0;
    }
    ((200 * approved + decided) / (2 * decided)) as u32
}

/// Insertion-ordered tallies keyed by group label.
#[derive(Default)]
struct Grouping {
    index: HashMap<String, usize>,
    groups: Vec<GroupTally>,
}

impl Grouping {
    fn record(&mut self, key: &str, decision: Decision) {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => {
                self.groups.push(GroupTally::new(key));
                self.index.insert(key.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[slot].record(decision);
    }

    fn into_groups(self) -> Vec<GroupTally> {
        self.groups
    }
}
