//! Configuration loading, merging and validation.
pub(crate) mod apply;
mod build;
mod loader;
mod parse;
pub mod types;


pub use apply::apply_config;
pub use build::{RunPlan, build_run_plan};
pub use loader::load_config;

#[cfg(test)]
pub(crate) use loader::load_config_file;
pub(crate) use parse::parse_duration_value;
