//! Client library for the FreshBooks REST API.
//!
//! This crate provides:
//! - Request building: derived auth headers, filter encoding, URLs
//! - A blocking API client that unwraps the service's response envelope
//! - Name resolution with interactive disambiguation
//! - The OAuth2 authorization-code exchange that produces a bearer token

mod client;
mod error;
pub mod models;
pub mod oauth;
pub mod request;
pub mod resolve;
pub mod transport;

pub use client::{Client, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use request::{FilterStyle, FilterValue, Filters, HeaderKind};
pub use resolve::{Prompter, ResolveError, ServicePolicy, resolve, resolve_service};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, Transport};
