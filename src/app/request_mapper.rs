//! Translates a validated potato request into a call against the REST data-API.
//!
//! The store speaks PostgREST: rows live under `/rest/v1/<table>`, filters go in the
//! query string (`id=eq.3`), and `Prefer: return=representation` makes writes echo the
//! affected rows back.

use super::error::{ApiError, ApiResult};
use crate::domain::{NewPotato, PotatoPatch};
use crate::infra::config::{ConfigError, StoreConfig, SUPABASE_SERVICE_ROLE_KEY};
use crate::infra::data_api::RemoteCall;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde::Serialize;
use serde_json::Value as JsonValue;

pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("apikey");
pub const PREFER_HEADER: HeaderName = HeaderName::from_static("prefer");
pub const RETURN_REPRESENTATION: &str = "return=representation";

/// The four operations exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    Update,
    Delete,
}

impl Operation {
    /// The only inbound method each operation accepts. The remote call uses the same verb.
    pub fn method(self) -> Method {
        match self {
            Operation::Create => Method::POST,
            Operation::List => Method::GET,
            Operation::Update => Method::PATCH,
            Operation::Delete => Method::DELETE,
        }
    }

    pub fn success_status(self) -> StatusCode {
        match self {
            Operation::Create => StatusCode::CREATED,
            _ => StatusCode::OK,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::List => "list",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// A validated request, ready to be mapped.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreRequest {
    Create(NewPotato),
    List,
    Update { id: i64, patch: PotatoPatch },
    Delete { id: i64 },
}

impl StoreRequest {
    pub fn operation(&self) -> Operation {
        match self {
            StoreRequest::Create(_) => Operation::Create,
            StoreRequest::List => Operation::List,
            StoreRequest::Update { .. } => Operation::Update,
            StoreRequest::Delete { .. } => Operation::Delete,
        }
    }
}

/// Builds the remote call for `request`. Fails closed when the store is not configured,
/// so an unauthenticated request is never sent.
pub fn map_request(config: &StoreConfig, request: &StoreRequest) -> ApiResult<RemoteCall> {
    let creds = config.credentials()?;
    let collection = format!("/rest/v1/{}", creds.table);

    let mut headers = auth_headers(creds.service_key)?;

    let (path, body) = match request {
        StoreRequest::Create(potato) => (collection, Some(encode(&[potato])?)),
        StoreRequest::List => (format!("{}?select=*", collection), None),
        StoreRequest::Update { id, patch } => {
            (format!("{}?id=eq.{}", collection, id), Some(encode(patch)?))
        }
        StoreRequest::Delete { id } => (format!("{}?id=eq.{}", collection, id), None),
    };

    if body.is_some() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    if request.operation() != Operation::List {
        headers.insert(PREFER_HEADER, HeaderValue::from_static(RETURN_REPRESENTATION));
    }

    Ok(RemoteCall {
        method: request.operation().method(),
        base_url: creds.base_url.to_string(),
        path,
        headers,
        body,
    })
}

/// The fixed credential pair every call carries. Values are marked sensitive so they
/// never show up in `Debug` output.
fn auth_headers(service_key: &str) -> ApiResult<HeaderMap> {
    let invalid = || ConfigError::Invalid {
        name: SUPABASE_SERVICE_ROLE_KEY,
        reason: "not a valid header value".to_string(),
    };

    let mut api_key = HeaderValue::from_str(service_key).map_err(|_| invalid())?;
    api_key.set_sensitive(true);
    let mut bearer =
        HeaderValue::from_str(&format!("Bearer {}", service_key)).map_err(|_| invalid())?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(API_KEY_HEADER, api_key);
    headers.insert(AUTHORIZATION, bearer);
    Ok(headers)
}

fn encode<T: Serialize + ?Sized>(value: &T) -> ApiResult<JsonValue> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::Transport(format!("Failed to encode request body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn config() -> StoreConfig {
        StoreConfig::new("https://store.example.com/", "service-key")
    }

    fn russet() -> NewPotato {
        NewPotato {
            name: "Russet".to_string(),
            weight_kg: 1.5,
            quantity: 10,
            harvest_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            is_organic: true,
        }
    }

    #[test]
    fn create_posts_a_one_element_array() {
        let call = map_request(&config(), &StoreRequest::Create(russet())).unwrap();
        assert_eq!(call.method, Method::POST);
        assert_eq!(call.url(), "https://store.example.com/rest/v1/potatoes");
        assert_eq!(
            call.body,
            Some(json!([{
                "name": "Russet",
                "weight_kg": 1.5,
                "quantity": 10,
                "harvest_date": "2024-05-01",
                "is_organic": true
            }]))
        );
        assert_eq!(call.headers[CONTENT_TYPE], "application/json");
        assert_eq!(call.headers[PREFER_HEADER], RETURN_REPRESENTATION);
    }

    #[test]
    fn list_selects_everything_without_a_body() {
        let call = map_request(&config(), &StoreRequest::List).unwrap();
        assert_eq!(call.method, Method::GET);
        assert_eq!(call.path, "/rest/v1/potatoes?select=*");
        assert!(call.body.is_none());
        assert!(call.headers.get(CONTENT_TYPE).is_none());
        assert!(call.headers.get(PREFER_HEADER).is_none());
    }

    #[test]
    fn update_filters_by_id_and_sends_only_changed_fields() {
        let patch = PotatoPatch {
            quantity: Some(4),
            ..Default::default()
        };
        let call = map_request(&config(), &StoreRequest::Update { id: 3, patch }).unwrap();
        assert_eq!(call.method, Method::PATCH);
        assert_eq!(call.path, "/rest/v1/potatoes?id=eq.3");
        assert_eq!(call.body, Some(json!({ "quantity": 4 })));
        assert_eq!(call.headers[PREFER_HEADER], RETURN_REPRESENTATION);
    }

    #[test]
    fn delete_asks_for_the_removed_rows() {
        let call = map_request(&config(), &StoreRequest::Delete { id: 12 }).unwrap();
        assert_eq!(call.method, Method::DELETE);
        assert_eq!(call.path, "/rest/v1/potatoes?id=eq.12");
        assert!(call.body.is_none());
        assert_eq!(call.headers[PREFER_HEADER], RETURN_REPRESENTATION);
    }

    #[test]
    fn every_call_carries_both_credential_headers() {
        for request in [
            StoreRequest::Create(russet()),
            StoreRequest::List,
            StoreRequest::Update { id: 1, patch: PotatoPatch { is_organic: Some(false), ..Default::default() } },
            StoreRequest::Delete { id: 1 },
        ] {
            let call = map_request(&config(), &request).unwrap();
            assert_eq!(call.headers[API_KEY_HEADER], "service-key");
            assert_eq!(call.headers[AUTHORIZATION], "Bearer service-key");
            assert!(call.headers[AUTHORIZATION].is_sensitive());
            assert!(!format!("{:?}", call).contains("service-key"));
        }
    }

    #[test]
    fn missing_configuration_fails_closed() {
        let err = map_request(&StoreConfig::unconfigured(), &StoreRequest::List).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(ConfigError::Missing(_))));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn custom_table_name_is_used_in_the_path() {
        let config = config().with_table("spuds");
        let call = map_request(&config, &StoreRequest::List).unwrap();
        assert_eq!(call.path, "/rest/v1/spuds?select=*");
    }
}
