//! Subcommand handlers.

pub mod config_cmd;
pub mod fetch;
pub mod serve;
