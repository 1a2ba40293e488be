//! Upstream records and the statistics derived from them.

pub mod record;
pub mod stats;
