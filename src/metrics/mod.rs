//! Per-request outcomes and their aggregation into run statistics.
mod collector;
mod distribution;
mod types;

#[cfg(test)]
mod tests;

pub use collector::{StatsAggregator, spawn_aggregator};
pub use distribution::PhaseDistribution;
pub use types::{PhaseStats, RequestOutcome, ResultMetrics};
