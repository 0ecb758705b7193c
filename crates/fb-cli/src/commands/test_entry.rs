//! Creates a test time entry from business, client, project and service names.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fb_api::models::NewTimeEntry;
use fb_api::{Client, Prompter, ServicePolicy, Transport};

use crate::commands::lookup;
use crate::commands::util::format_started_at;

const VERIFY_URL: &str = "https://my.freshbooks.com/#/time-tracking/";

/// What to log and where.
#[derive(Debug, Clone)]
pub struct EntryRequest {
    pub business: String,
    pub client: String,
    pub project: String,
    pub service: String,
    pub started_at: DateTime<Utc>,
    pub duration_secs: i64,
    pub note: String,
    pub service_policy: ServicePolicy,
}

/// Resolves every name, creates the entry and reports the created record.
///
/// The entry is not rolled back if reporting fails afterwards.
pub fn run<W, T, P>(
    writer: &mut W,
    client: &Client<T>,
    prompter: &mut P,
    request: &EntryRequest,
) -> Result<()>
where
    W: Write,
    T: Transport,
    P: Prompter + ?Sized,
{
    let business = lookup::find_business(client, &request.business, prompter)?;
    let account_id = business
        .account_id
        .as_deref()
        .with_context(|| format!("business \"{}\" has no accounting account", business.name))?;
    tracing::debug!(business_id = business.id, account_id, "resolved business");

    let customer = lookup::find_customer(client, account_id, &request.client, prompter)?;
    let (project, service) = lookup::find_project_and_service(
        client,
        business.id,
        customer.id,
        &request.project,
        &request.service,
        request.service_policy,
        prompter,
    )?;
    tracing::debug!(
        client_id = customer.id,
        project_id = project.id,
        service_id = service.id,
        "resolved entry targets"
    );

    let entry = NewTimeEntry {
        client_id: customer.id,
        project_id: project.id,
        service_id: service.id,
        started_at: format_started_at(request.started_at),
        duration: request.duration_secs,
        note: request.note.clone(),
        is_logged: true,
    };
    let created = client
        .create_time_entry(business.id, &entry)
        .context("failed to create time entry")?;

    let rendered = serde_json::to_string_pretty(&created).context("failed to render response")?;
    writeln!(writer, "Response: {rendered}")?;
    writeln!(writer, "Verify time entry at {VERIFY_URL}")?;
    Ok(())
}
