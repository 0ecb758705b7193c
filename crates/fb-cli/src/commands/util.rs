//! Shared utilities for CLI commands.

use std::time::Duration as StdDuration;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use fb_api::{Client, HttpTransport};

use crate::Config;

/// Picks the access token from the command line, falling back to config.
pub fn access_token(flag: Option<&str>, config: &Config) -> anyhow::Result<String> {
    flag.map(str::to_string)
        .or_else(|| config.access_token.clone())
        .context("no access token: pass --token, set access_token in config, or set FB_ACCESS_TOKEN")
}

/// Builds an API client over the blocking HTTP transport.
pub fn api_client(config: &Config, token: String) -> anyhow::Result<Client> {
    let transport = HttpTransport::with_timeout(StdDuration::from_secs(config.timeout_secs))
        .context("failed to build HTTP transport")?;
    Client::with_transport(transport, config.base_url.clone(), token)
        .context("failed to create API client")
}

/// Formats a timestamp the way the time tracking API expects,
/// e.g. `2024-01-01T09:30:00.000Z`.
pub fn format_started_at(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Renders an offset from now as "in 12 hours" or "5 minutes ago".
pub fn humanize(delta: Duration) -> String {
    let seconds = delta.num_seconds();
    let magnitude = seconds.unsigned_abs();
    if magnitude < 45 {
        return "just now".to_string();
    }
    // Nearest unit, carrying into the next one at the boundary.
    let minutes = (magnitude + 30) / 60;
    let hours = (magnitude + 1_800) / 3_600;
    let (count, unit) = if minutes < 60 {
        (minutes, "minute")
    } else if hours < 24 {
        (hours, "hour")
    } else {
        ((magnitude + 43_200) / 86_400, "day")
    };
    let plural = if count == 1 { "" } else { "s" };
    if seconds >= 0 {
        format!("in {count} {unit}{plural}")
    } else {
        format!("{count} {unit}{plural} ago")
    }
}
