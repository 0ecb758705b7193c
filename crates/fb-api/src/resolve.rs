//! Reduces a list of name matches to a single record.
//!
//! Zero matches is an error, one match is returned as is, and several matches
//! are listed for the user, who picks one through a [`Prompter`].

use std::fmt::Write as _;
use std::io;

use thiserror::Error;

/// Errors from resolving a name to a single record.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Could not find {label} \"{value}\"")]
    NotFound { label: String, value: String },
    /// The user picked an index outside the listing.
    #[error("invalid choice {choice}: expected a number from 1 to {count}")]
    InvalidChoice { choice: usize, count: usize },
    #[error("failed to read choice: {0}")]
    Prompt(#[from] io::Error),
}

/// Asks the user to pick one entry of a rendered, 1-based listing.
pub trait Prompter {
    /// Returns the 1-based index the user chose.
    fn choose(&mut self, listing: &str) -> io::Result<usize>;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn choose(&mut self, listing: &str) -> io::Result<usize> {
        (**self).choose(listing)
    }
}

/// How a service is picked when several in a project share a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServicePolicy {
    /// Take the first match.
    #[default]
    First,
    /// Ask the user, like every other lookup.
    Prompt,
}

/// Resolves `candidates` to exactly one item.
///
/// `display` renders the value shown for each candidate when the user has to
/// choose; `label` and `value` name what was searched for.
pub fn resolve<T, P>(
    mut candidates: Vec<T>,
    display: impl Fn(&T) -> String,
    label: &str,
    value: &str,
    prompter: &mut P,
) -> Result<T, ResolveError>
where
    P: Prompter + ?Sized,
{
    ensure_found(&candidates, label, value)?;
    if candidates.len() == 1 {
        return Ok(candidates.swap_remove(0));
    }

    let listing = render_listing(&candidates, &display, label, value);
    let choice = prompter.choose(&listing)?;
    let count = candidates.len();
    if choice == 0 || choice > count {
        return Err(ResolveError::InvalidChoice { choice, count });
    }
    tracing::debug!(label, value, choice, "user picked a match");
    Ok(candidates.swap_remove(choice - 1))
}

/// Resolves a service within a project under the given policy.
pub fn resolve_service<T, P>(
    mut candidates: Vec<T>,
    display: impl Fn(&T) -> String,
    value: &str,
    policy: ServicePolicy,
    prompter: &mut P,
) -> Result<T, ResolveError>
where
    P: Prompter + ?Sized,
{
    match policy {
        ServicePolicy::Prompt => resolve(candidates, display, "service", value, prompter),
        ServicePolicy::First => {
            ensure_found(&candidates, "service", value)?;
            if candidates.len() > 1 {
                tracing::warn!(
                    service = value,
                    matches = candidates.len(),
                    "several services share this name, using the first"
                );
            }
            Ok(candidates.swap_remove(0))
        }
    }
}

fn ensure_found<T>(candidates: &[T], label: &str, value: &str) -> Result<(), ResolveError> {
    if candidates.is_empty() {
        return Err(ResolveError::NotFound {
            label: label.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

fn render_listing<T>(
    candidates: &[T],
    display: &impl Fn(&T) -> String,
    label: &str,
    value: &str,
) -> String {
    let mut listing = format!(
        "There were {} \"{value}\" {label}s, pick one:\n\n",
        candidates.len()
    );
    for (i, candidate) in candidates.iter().enumerate() {
        writeln!(listing, "{}. {}", i + 1, display(candidate)).ok();
    }
    listing
}
