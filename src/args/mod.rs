//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;


pub use cli::{Cli, Command, RunArgs};
pub(crate) use parsers::parse_duration_arg;
