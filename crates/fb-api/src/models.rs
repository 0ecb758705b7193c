//! Typed views of the record fields the workflows read and write.
//!
//! Payloads from the client are opaque JSON; these structs pick out only the
//! fields that are needed and ignore the rest.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Payload of the identity endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub business_memberships: Vec<BusinessMembership>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BusinessMembership {
    pub business: Business,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Business {
    pub id: i64,
    pub name: String,
    /// Accounting systems are addressed by account id rather than business id.
    pub account_id: Option<String>,
}

/// A client record of the accounting system.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Customer {
    pub id: i64,
    #[serde(default)]
    pub organization: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub client_id: Option<i64>,
    #[serde(default)]
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
}

/// Fields sent when creating a time entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTimeEntry {
    pub client_id: i64,
    pub project_id: i64,
    pub service_id: i64,
    /// UTC timestamp, e.g. `2024-01-01T00:00:00.000Z`.
    pub started_at: String,
    /// Seconds.
    pub duration: i64,
    pub note: String,
    pub is_logged: bool,
}

/// Decodes a whole payload.
pub fn decode<D: DeserializeOwned>(payload: Value) -> Result<D, ApiError> {
    serde_json::from_value(payload).map_err(|err| ApiError::Protocol(err.to_string()))
}

/// Decodes the list stored under `key` in a `result` payload, such as
/// `{"clients": [...], "page": 1}`.
pub fn decode_list<D: DeserializeOwned>(mut payload: Value, key: &str) -> Result<Vec<D>, ApiError> {
    let items = payload
        .as_object_mut()
        .and_then(|object| object.remove(key))
        .ok_or_else(|| ApiError::Protocol(format!("missing `{key}` in result")))?;
    serde_json::from_value(items)
        .map_err(|err| ApiError::Protocol(format!("invalid `{key}` list: {err}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn identity_ignores_unknown_fields() {
        let payload = json!({
            "id": 9,
            "email": "me@example.com",
            "business_memberships": [
                {"role": "owner", "business": {"id": 1, "name": "Acme", "account_id": "abc12"}}
            ]
        });
        let identity: Identity = decode(payload).unwrap();
        assert_eq!(identity.business_memberships.len(), 1);
        assert_eq!(
            identity.business_memberships[0].business,
            Business {
                id: 1,
                name: "Acme".to_string(),
                account_id: Some("abc12".to_string()),
            }
        );
    }

    #[test]
    fn decode_list_reads_named_key() {
        let payload = json!({"clients": [{"id": 3, "organization": "Acme"}], "page": 1});
        let clients: Vec<Customer> = decode_list(payload, "clients").unwrap();
        assert_eq!(clients[0].id, 3);
    }

    #[test]
    fn decode_list_missing_key_is_protocol_error() {
        let err = decode_list::<Customer>(json!({"page": 1}), "clients").unwrap_err();
        assert!(matches!(err, ApiError::Protocol(_)));
    }

    #[test]
    fn project_services_default_to_empty() {
        let project: Project = decode(json!({"id": 5, "title": "Site", "client_id": 3})).unwrap();
        assert!(project.services.is_empty());
    }

    #[test]
    fn new_time_entry_serializes_all_fields() {
        let entry = NewTimeEntry {
            client_id: 1,
            project_id: 2,
            service_id: 3,
            started_at: "2024-01-01T00:00:00.000Z".to_string(),
            duration: 1800,
            note: "x".to_string(),
            is_logged: true,
        };
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "client_id": 1,
                "project_id": 2,
                "service_id": 3,
                "started_at": "2024-01-01T00:00:00.000Z",
                "duration": 1800,
                "note": "x",
                "is_logged": true
            })
        );
    }
}
