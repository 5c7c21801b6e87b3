//! Core library for the `cassowary` CLI.
//!
//! The engine lives in [`http`] (target selection, per-phase request timing
//! and the worker pool) and [`metrics`] (aggregation into mean, median and
//! 95th percentile per phase). [`app`] wires a validated [`config::RunPlan`]
//! through an optional [`plugin`] hook, the engine and the [`sinks`]. The
//! `cassowary` binary is the primary interface; library APIs may change as
//! the CLI grows.
pub mod app;
pub mod args;
pub mod config;
pub mod domain;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod plugin;
pub mod sinks;

#[cfg(test)]
mod test_support;
