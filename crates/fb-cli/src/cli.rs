//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use fb_api::ServicePolicy;

/// FreshBooks API helper.
///
/// Obtains an access token through the OAuth2 authorization-code flow and
/// exercises the API by creating and listing time entries.
#[derive(Debug, Parser)]
#[command(name = "fb", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Do the OAuth dance with the API server to get an access token.
    Auth {
        /// OAuth application client ID.
        client_id: String,
        /// OAuth application client secret.
        client_secret: String,
        /// Redirect URL registered for the application.
        redirect_url: String,
    },

    /// Create a test time entry and print the created record.
    TestEntry {
        /// Name of the business to log time against.
        business: String,
        /// Organization name of the client.
        client: String,
        /// Exact title of the project.
        project: String,
        /// Exact name of the service within the project.
        service: String,

        /// Access token (falls back to `access_token` in config or `FB_ACCESS_TOKEN`).
        #[arg(long)]
        token: Option<String>,

        /// Entry duration in minutes.
        #[arg(long, default_value_t = 30)]
        minutes: u32,

        /// Note attached to the entry.
        #[arg(long, default_value = "This is a test…")]
        note: String,

        /// How to pick among services that share a name.
        #[arg(long, value_enum)]
        service_policy: Option<ServicePolicyArg>,
    },

    /// List time entries of a business.
    Entries {
        /// Name of the business.
        business: String,

        /// Access token (falls back to `access_token` in config or `FB_ACCESS_TOKEN`).
        #[arg(long)]
        token: Option<String>,

        /// Only show entries for this client ID.
        #[arg(long)]
        client_id: Option<i64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServicePolicyArg {
    /// Take the first service with a matching name.
    First,
    /// Ask which service to use when several match.
    Prompt,
}

impl From<ServicePolicyArg> for ServicePolicy {
    fn from(arg: ServicePolicyArg) -> Self {
        match arg {
            ServicePolicyArg::First => Self::First,
            ServicePolicyArg::Prompt => Self::Prompt,
        }
    }
}
