//! Run-level data model shared by the engine and its collaborators.
mod run;

pub use run::{
    DEFAULT_CONTENT_TYPE, HttpMethod, RequestBody, RequestHeader, RunConfiguration, Termination,
    TlsMaterials,
};
