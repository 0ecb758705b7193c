//! FreshBooks CLI library.
//!
//! This crate provides the CLI interface: the OAuth helper and the time
//! entry workflows built on `fb-api`.

mod cli;
pub mod commands;
mod config;
pub mod prompt;

pub use cli::{Cli, Commands, ServicePolicyArg};
pub use config::Config;
