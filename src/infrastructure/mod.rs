//! Infrastructure layer: file-backed stores, docker CLI access, caching
//! and log sinks.

pub mod action_log;
pub mod cache;
pub mod docker;
pub mod persistence;

pub use action_log::{FileActionLog, MatrixLog};
