//! Request construction: URLs, derived headers and filter encoding.

use std::collections::BTreeMap;
use std::fmt;

/// Header name/value pairs attached to a request.
pub type Headers = BTreeMap<&'static str, String>;

/// Query parameters in the order they were inserted.
pub type QueryParams = Vec<(String, String)>;

const API_VERSION: &str = "alpha";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Which derived header set an operation sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    /// `Authorization` and `Api-Version` only.
    Auth,
    /// The `Auth` set plus `Content-Type: application/json`.
    AuthWithContentType,
}

/// Both header sets derived from a single bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSets {
    auth: Headers,
    auth_with_content_type: Headers,
}

impl HeaderSets {
    pub const fn get(&self, kind: HeaderKind) -> &Headers {
        match kind {
            HeaderKind::Auth => &self.auth,
            HeaderKind::AuthWithContentType => &self.auth_with_content_type,
        }
    }
}

/// Derives every header set the client sends from the bearer token.
pub fn derive_headers(token: &str) -> HeaderSets {
    let mut auth = Headers::new();
    auth.insert("Authorization", format!("Bearer {token}"));
    auth.insert("Api-Version", API_VERSION.to_string());

    let mut auth_with_content_type = auth.clone();
    auth_with_content_type.insert("Content-Type", JSON_CONTENT_TYPE.to_string());

    HeaderSets {
        auth,
        auth_with_content_type,
    }
}

/// Joins the base URL and an endpoint path that starts with `/`.
pub fn build_url(base: &str, endpoint: &str) -> String {
    format!("{}{endpoint}", base.trim_end_matches('/'))
}

/// A scalar filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Field filters for list endpoints, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters(Vec<(String, FilterValue)>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field filter, replacing an earlier value for the same field.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        let field = field.into();
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(existing, _)| *existing == field) {
            slot.1 = value;
        } else {
            self.0.push((field, value));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(field, value)| (field.as_str(), value))
    }
}

/// How filter field names map onto query parameter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStyle {
    /// `field` becomes `search[field]`.
    SearchPrefixed,
    /// `field` is sent as is.
    Raw,
}

/// Encodes filters as query parameters.
///
/// Returns `None` when there is nothing to send so the request carries no
/// parameter block at all.
pub fn encode_filters(filters: Option<&Filters>, style: FilterStyle) -> Option<QueryParams> {
    let filters = filters.filter(|f| !f.is_empty())?;
    let params = filters
        .iter()
        .map(|(field, value)| {
            let key = match style {
                FilterStyle::SearchPrefixed => format!("search[{field}]"),
                FilterStyle::Raw => field.to_string(),
            };
            (key, value.to_string())
        })
        .collect();
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_headers_carry_bearer_and_version() {
        let sets = derive_headers("abc");
        let auth = sets.get(HeaderKind::Auth);
        assert_eq!(auth.len(), 2);
        assert_eq!(auth["Authorization"], "Bearer abc");
        assert_eq!(auth["Api-Version"], "alpha");
    }

    #[test]
    fn content_type_set_extends_auth_set() {
        let sets = derive_headers("abc");
        let auth = sets.get(HeaderKind::Auth);
        let with_ct = sets.get(HeaderKind::AuthWithContentType);
        assert_eq!(with_ct["Content-Type"], "application/json");
        for (name, value) in auth {
            assert_eq!(&with_ct[name], value);
        }
        assert_eq!(with_ct.len(), auth.len() + 1);
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(derive_headers("tok"), derive_headers("tok"));
    }

    #[test]
    fn search_prefixed_rewrites_every_key() {
        let filters = Filters::new()
            .with("organization_like", "Acme")
            .with("email", "a@b.c");
        let params = encode_filters(Some(&filters), FilterStyle::SearchPrefixed).unwrap();
        assert_eq!(
            params,
            vec![
                ("search[organization_like]".to_string(), "Acme".to_string()),
                ("search[email]".to_string(), "a@b.c".to_string()),
            ]
        );
    }

    #[test]
    fn raw_style_passes_keys_through() {
        let filters = Filters::new().with("complete", false).with("client_id", 12);
        let params = encode_filters(Some(&filters), FilterStyle::Raw).unwrap();
        assert_eq!(
            params,
            vec![
                ("complete".to_string(), "false".to_string()),
                ("client_id".to_string(), "12".to_string()),
            ]
        );
    }

    #[test]
    fn empty_or_absent_filters_yield_no_parameters() {
        assert!(encode_filters(None, FilterStyle::Raw).is_none());
        assert!(encode_filters(Some(&Filters::new()), FilterStyle::SearchPrefixed).is_none());
    }

    #[test]
    fn repeated_field_replaces_value() {
        let filters = Filters::new().with("complete", true).with("complete", false);
        let params = encode_filters(Some(&filters), FilterStyle::Raw).unwrap();
        assert_eq!(params, vec![("complete".to_string(), "false".to_string())]);
    }

    #[test]
    fn build_url_concatenates() {
        assert_eq!(
            build_url("https://api.freshbooks.com", "/auth/api/v1/users/me"),
            "https://api.freshbooks.com/auth/api/v1/users/me"
        );
        assert_eq!(
            build_url("http://127.0.0.1:8080/", "/projects/business/1/projects"),
            "http://127.0.0.1:8080/projects/business/1/projects"
        );
    }
}
