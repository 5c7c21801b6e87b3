//! Run orchestration and the collaborators that surround it: suffix
//! loading, the console summary and result export.
mod runner;
mod slurp;
pub(crate) mod summary;

#[cfg(test)]
mod tests;

pub use runner::{RunController, run_load_test};
pub use slurp::load_suffixes;
