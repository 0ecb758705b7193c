//! Name-based lookups of businesses, clients, projects and services.

use anyhow::{Context, Result};
use fb_api::models::{self, Business, Customer, Identity, Project, Service};
use fb_api::{Client, Filters, Prompter, ServicePolicy, Transport, resolve, resolve_service};

/// Finds the caller's business with the given name.
pub fn find_business<T, P>(client: &Client<T>, name: &str, prompter: &mut P) -> Result<Business>
where
    T: Transport,
    P: Prompter + ?Sized,
{
    let identity: Identity = models::decode(client.fetch_identity()?)
        .context("failed to read identity")?;
    let matches: Vec<Business> = identity
        .business_memberships
        .into_iter()
        .map(|membership| membership.business)
        .filter(|business| business.name == name)
        .collect();
    Ok(resolve(matches, |b| b.name.clone(), "business", name, prompter)?)
}

/// Finds a client of the account by organization name.
pub fn find_customer<T, P>(
    client: &Client<T>,
    account_id: &str,
    name: &str,
    prompter: &mut P,
) -> Result<Customer>
where
    T: Transport,
    P: Prompter + ?Sized,
{
    let filters = Filters::new().with("organization_like", name);
    let result = client.list_clients(account_id, Some(&filters))?;
    let customers: Vec<Customer> =
        models::decode_list(result, "clients").context("failed to read clients")?;
    Ok(resolve(
        customers,
        |c| c.organization.clone(),
        "client",
        name,
        prompter,
    )?)
}

/// Finds an open project of the client by exact title, then a service in it.
pub fn find_project_and_service<T, P>(
    client: &Client<T>,
    business_id: i64,
    customer_id: i64,
    project_name: &str,
    service_name: &str,
    policy: ServicePolicy,
    prompter: &mut P,
) -> Result<(Project, Service)>
where
    T: Transport,
    P: Prompter + ?Sized,
{
    let filters = Filters::new().with("complete", false);
    let result = client.list_projects(business_id, Some(&filters))?;
    let projects: Vec<Project> =
        models::decode_list(result, "projects").context("failed to read projects")?;
    let matches: Vec<Project> = projects
        .into_iter()
        .filter(|p| p.client_id == Some(customer_id) && p.title == project_name)
        .collect();
    let mut project = resolve(
        matches,
        |p| p.id.to_string(),
        "project",
        project_name,
        prompter,
    )?;

    let services: Vec<Service> = std::mem::take(&mut project.services)
        .into_iter()
        .filter(|s| s.name == service_name)
        .collect();
    let service = resolve_service(
        services,
        |s| format!("{} ({})", s.name, s.id),
        service_name,
        policy,
        prompter,
    )?;
    Ok((project, service))
}
