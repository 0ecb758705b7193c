use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use fb_api::HttpTransport;
use fb_api::oauth::Credentials;
use tracing_subscriber::EnvFilter;

use fb_cli::commands::{auth, entries, test_entry, util};
use fb_cli::prompt::TerminalPrompter;
use fb_cli::{Cli, Commands, Config};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so command output stays clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();

    match cli.command {
        Some(Commands::Auth {
            client_id,
            client_secret,
            redirect_url,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let transport = HttpTransport::with_timeout(Duration::from_secs(config.timeout_secs))
                .context("failed to build HTTP transport")?;
            let credentials = Credentials {
                client_id,
                client_secret,
                redirect_url,
            };
            let mut prompter = TerminalPrompter::stdio();
            auth::run(&mut stdout, &transport, &mut prompter, &credentials)?;
        }
        Some(Commands::TestEntry {
            business,
            client,
            project,
            service,
            token,
            minutes,
            note,
            service_policy,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let token = util::access_token(token.as_deref(), &config)?;
            let api = util::api_client(&config, token)?;
            let request = test_entry::EntryRequest {
                business,
                client,
                project,
                service,
                started_at: Utc::now(),
                duration_secs: i64::from(minutes) * 60,
                note,
                service_policy: service_policy.map_or(config.service_policy, Into::into),
            };
            let mut prompter = TerminalPrompter::stdio();
            test_entry::run(&mut stdout, &api, &mut prompter, &request)?;
        }
        Some(Commands::Entries {
            business,
            token,
            client_id,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let token = util::access_token(token.as_deref(), &config)?;
            let api = util::api_client(&config, token)?;
            let mut prompter = TerminalPrompter::stdio();
            entries::run(&mut stdout, &api, &mut prompter, &business, client_id)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
