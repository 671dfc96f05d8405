//! Configuration sources layered by the merge service.

pub mod environment;
pub mod explicit_file;
pub mod global_file;
