//! Docker CLI integration.

pub mod cli_provider;

pub use cli_provider::DockerCliProvider;
