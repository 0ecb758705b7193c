//! CLI subcommand implementations.

pub mod auth;
pub mod entries;
pub mod lookup;
pub mod test_entry;
pub mod util;
