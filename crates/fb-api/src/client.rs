//! Typed operations over the service's REST endpoints.

use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::request::{
    FilterStyle, Filters, HeaderKind, HeaderSets, Headers, QueryParams, build_url,
    derive_headers, encode_filters,
};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, Transport};

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.freshbooks.com";

/// Which part of the response envelope holds the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unwrap {
    /// `{ "response": <payload> }`
    Response,
    /// `{ "response": { "result": <payload> } }`
    Result,
}

/// FreshBooks API client.
///
/// Header sets are derived from the token on first use and cached for the
/// lifetime of the client. A `Client` can be shared across threads when its
/// transport can.
pub struct Client<T = HttpTransport> {
    transport: T,
    base_url: String,
    token: String,
    headers: OnceLock<HeaderSets>,
}

impl<T> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Client<HttpTransport> {
    /// Creates a client for the production host over a blocking HTTP transport.
    pub fn new(token: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_transport(HttpTransport::new()?, DEFAULT_BASE_URL, token)
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client that sends requests through `transport`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty, whitespace-only, or contains
    /// characters that cannot appear in an HTTP header.
    pub fn with_transport(
        transport: T,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ApiError::InvalidToken {
                reason: "access token cannot be empty",
            });
        }
        if token.trim().is_empty() {
            return Err(ApiError::InvalidToken {
                reason: "access token cannot be whitespace-only",
            });
        }
        if token.chars().any(|c| c.is_control() || !c.is_ascii()) {
            return Err(ApiError::InvalidToken {
                reason: "access token contains characters not allowed in a header",
            });
        }

        Ok(Self {
            transport,
            base_url: base_url.into(),
            token,
            headers: OnceLock::new(),
        })
    }

    /// Returns the cached header set of the given kind.
    pub fn headers(&self, kind: HeaderKind) -> &Headers {
        self.headers
            .get_or_init(|| derive_headers(&self.token))
            .get(kind)
    }

    /// The caller's identity, including business memberships.
    pub fn fetch_identity(&self) -> Result<Value, ApiError> {
        let request = self.get(
            "/auth/api/v1/users/me",
            HeaderKind::AuthWithContentType,
            None,
        );
        self.send(&request, Unwrap::Response)
    }

    /// Clients of an account, filtered with `search[...]` parameters.
    pub fn list_clients(
        &self,
        account_id: &str,
        filters: Option<&Filters>,
    ) -> Result<Value, ApiError> {
        let endpoint = format!("/accounting/account/{account_id}/users/clients");
        let query = encode_filters(filters, FilterStyle::SearchPrefixed);
        let request = self.get(&endpoint, HeaderKind::AuthWithContentType, query);
        self.send(&request, Unwrap::Result)
    }

    pub fn list_projects(
        &self,
        business_id: i64,
        filters: Option<&Filters>,
    ) -> Result<Value, ApiError> {
        let endpoint = format!("/projects/business/{business_id}/projects");
        let query = encode_filters(filters, FilterStyle::Raw);
        let request = self.get(&endpoint, HeaderKind::Auth, query);
        self.send(&request, Unwrap::Result)
    }

    pub fn fetch_time_entries(
        &self,
        business_id: i64,
        filters: Option<&Filters>,
    ) -> Result<Value, ApiError> {
        let endpoint = time_entries_endpoint(business_id);
        let query = encode_filters(filters, FilterStyle::Raw);
        let request = self.get(&endpoint, HeaderKind::Auth, query);
        self.send(&request, Unwrap::Result)
    }

    /// Creates a time entry; the entry is wrapped as `{"time_entry": ...}`.
    pub fn create_time_entry<E: Serialize>(
        &self,
        business_id: i64,
        entry: &E,
    ) -> Result<Value, ApiError> {
        let entry = serde_json::to_value(entry)
            .map_err(|err| ApiError::Transport(format!("failed to encode time entry: {err}")))?;
        let body = json!({ "time_entry": entry });
        tracing::debug!(%body, "time entry payload");

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: build_url(&self.base_url, &time_entries_endpoint(business_id)),
            headers: self.headers(HeaderKind::AuthWithContentType).clone(),
            query: None,
            body: Some(body),
        };
        self.send(&request, Unwrap::Result)
    }

    fn get(
        &self,
        endpoint: &str,
        kind: HeaderKind,
        query: Option<QueryParams>,
    ) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: build_url(&self.base_url, endpoint),
            headers: self.headers(kind).clone(),
            query,
            body: None,
        }
    }

    fn send(&self, request: &HttpRequest, unwrap: Unwrap) -> Result<Value, ApiError> {
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            query = ?request.query,
            "sending request"
        );
        let response = self.transport.execute(request)?;
        unwrap_envelope(response, unwrap)
    }
}

fn time_entries_endpoint(business_id: i64) -> String {
    format!("/timetracking/business/{business_id}/time_entries")
}

fn unwrap_envelope(response: HttpResponse, unwrap: Unwrap) -> Result<Value, ApiError> {
    if !response.is_success() {
        return Err(ApiError::Status {
            status: response.status,
            message: error_message(&response.body),
        });
    }

    let mut envelope: Value = serde_json::from_str(&response.body)
        .map_err(|err| ApiError::Transport(format!("undecodable response body: {err}")))?;
    let payload = take_key(&mut envelope, "response")?;
    match unwrap {
        Unwrap::Response => Ok(payload),
        Unwrap::Result => {
            let mut payload = payload;
            take_key(&mut payload, "result")
        }
    }
}

fn take_key(value: &mut Value, key: &str) -> Result<Value, ApiError> {
    value
        .as_object_mut()
        .and_then(|object| object.remove(key))
        .ok_or_else(|| ApiError::Protocol(format!("missing `{key}` in response envelope")))
}

/// Pulls a readable message out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let found = parsed.as_ref().and_then(|value| {
        [
            "/error_description",
            "/message",
            "/response/errors/0/message",
            "/error",
        ]
        .iter()
        .find_map(|pointer| value.pointer(pointer).and_then(Value::as_str))
    });
    match found {
        Some(message) => message.to_string(),
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.trim().to_string(),
    }
}
