//! Source merging for `EngineConfig`.

pub mod merge_policy;
pub mod service;
