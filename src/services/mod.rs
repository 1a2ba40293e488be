//! Business logic services.

pub mod aggregator;
pub mod dashboard;
pub mod poller;
pub mod store;
pub mod upstream;
