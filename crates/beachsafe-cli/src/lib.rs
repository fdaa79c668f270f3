//! BeachSafe command-line interface
//!
//! Argument parsing, configuration loading, and the subcommand handlers
//! behind the `beachsafe` binary.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Commands};
pub use config::AppConfig;
