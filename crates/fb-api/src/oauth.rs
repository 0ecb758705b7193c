//! OAuth2 authorization-code flow.
//!
//! The flow has three steps:
//! 1. [`AuthorizationRequest::new`] builds the URL the user opens in a browser,
//!    along with a random `state` value.
//! 2. After authorizing, the browser is redirected to the app's redirect URL.
//!    [`AuthorizationRequest::code_from_redirect`] checks `state` and pulls out
//!    the authorization code.
//! 3. [`exchange_code`] trades the code for an [`AccessToken`].
//!
//! Tokens are never stored; the caller decides what to do with them.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::request::Headers;
use crate::transport::{HttpMethod, HttpRequest, Transport};

pub const AUTHORIZE_URL: &str = "https://my.freshbooks.com/service/auth/oauth/authorize";
pub const TOKEN_URL: &str = "https://api.freshbooks.com/auth/oauth/token";
const USER_AGENT: &str = concat!("fb-api/", env!("CARGO_PKG_VERSION"));

/// OAuth flow errors.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The authorization URL could not be built from the given parameters.
    #[error("failed to build authorization URL: {0}")]
    AuthorizeUrl(String),
    #[error("invalid redirect URL: {0}")]
    InvalidRedirect(String),
    /// The authorization server redirected back with an error.
    #[error("authorization denied: {0}")]
    Denied(String),
    #[error("redirect URL has no authorization code")]
    MissingCode,
    /// The redirect's `state` does not belong to this flow.
    #[error("state mismatch: the redirect URL does not belong to this authorization request")]
    StateMismatch,
    #[error("token exchange failed: {0}")]
    Exchange(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Application credentials registered with the service.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_url", &self.redirect_url)
            .finish()
    }
}

/// An in-progress authorization.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: Url,
    pub state: String,
}

impl AuthorizationRequest {
    /// Builds the authorization URL with a freshly generated `state`.
    pub fn new(client_id: &str, redirect_url: &str) -> Result<Self, OAuthError> {
        Self::with_state(client_id, redirect_url, Uuid::new_v4().simple().to_string())
    }

    pub fn with_state(
        client_id: &str,
        redirect_url: &str,
        state: String,
    ) -> Result<Self, OAuthError> {
        let url = Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("response_type", "code"),
                ("client_id", client_id),
                ("redirect_uri", redirect_url),
                ("state", state.as_str()),
            ],
        )
        .map_err(|err| OAuthError::AuthorizeUrl(err.to_string()))?;
        Ok(Self { url, state })
    }

    /// Extracts the authorization code from the URL the browser landed on.
    pub fn code_from_redirect(&self, redirect: &str) -> Result<String, OAuthError> {
        parse_redirect(redirect, &self.state)
    }
}

/// Checks `state` and returns the `code` parameter of a redirect URL.
pub fn parse_redirect(redirect: &str, expected_state: &str) -> Result<String, OAuthError> {
    let url = Url::parse(redirect.trim())
        .map_err(|err| OAuthError::InvalidRedirect(err.to_string()))?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    let mut description = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "error_description" => description = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(OAuthError::Denied(description.unwrap_or(error)));
    }
    if state.as_deref() != Some(expected_state) {
        return Err(OAuthError::StateMismatch);
    }
    code.filter(|c| !c.is_empty()).ok_or(OAuthError::MissingCode)
}

/// Token returned by the token endpoint.
#[derive(Clone)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    /// Unix seconds; present on some responses instead of `expires_in`.
    expires_at: Option<i64>,
    created_at: Option<i64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl TokenResponse {
    fn into_token(self, now: DateTime<Utc>) -> Result<AccessToken, OAuthError> {
        let expires_at = match (self.expires_at, self.expires_in) {
            (Some(at), _) => DateTime::from_timestamp(at, 0),
            (None, Some(seconds)) => {
                let issued = self
                    .created_at
                    .and_then(|ts| DateTime::from_timestamp(ts, 0))
                    .unwrap_or(now);
                Duration::try_seconds(seconds).and_then(|d| issued.checked_add_signed(d))
            }
            (None, None) => None,
        }
        .ok_or_else(|| OAuthError::Exchange("token response has no usable expiry".to_string()))?;

        Ok(AccessToken {
            access_token: self.access_token,
            token_type: self.token_type,
            refresh_token: self.refresh_token,
            expires_at,
        })
    }
}

/// Builds the token-endpoint request for an authorization code.
pub fn token_request(credentials: &Credentials, code: &str) -> HttpRequest {
    let mut headers = Headers::new();
    headers.insert("Api-Version", "alpha".to_string());
    headers.insert("User-Agent", USER_AGENT.to_string());
    headers.insert("Content-Type", "application/json".to_string());

    HttpRequest {
        method: HttpMethod::Post,
        url: TOKEN_URL.to_string(),
        headers,
        query: None,
        body: Some(json!({
            "grant_type": "authorization_code",
            "client_id": credentials.client_id,
            "client_secret": credentials.client_secret,
            "code": code,
            "redirect_uri": credentials.redirect_url,
        })),
    }
}

/// Exchanges an authorization code for an access token.
pub fn exchange_code<T: Transport + ?Sized>(
    transport: &T,
    credentials: &Credentials,
    code: &str,
) -> Result<AccessToken, OAuthError> {
    let request = token_request(credentials, code);
    tracing::debug!(url = %request.url, "exchanging authorization code");
    let response = transport.execute(&request)?;

    if !response.is_success() {
        let message = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|body| {
                body.get("error_description")
                    .or_else(|| body.get("error"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("status {}", response.status));
        return Err(OAuthError::Exchange(message));
    }

    let token: TokenResponse = serde_json::from_str(&response.body)
        .map_err(|err| OAuthError::Exchange(format!("invalid token response: {err}")))?;
    token.into_token(Utc::now())
}
