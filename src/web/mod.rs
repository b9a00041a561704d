//! Web layer: server-rendered HTML pages.

pub mod handlers;
