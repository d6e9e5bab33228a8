//! HTTP record store for the Airtable REST API.
//!
//! The HTTP client itself is abstracted behind [`HttpClient`] so the wire
//! format can be exercised without a network. [`ReqwestClient`] is the
//! production implementation.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::record::{RecordFields, RecordPage, RecordUpdate, RemoteRecord};
use crate::remote::RecordStore;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// HTTP methods used by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET.
    Get,
    /// POST.
    Post,
    /// PATCH.
    Patch,
}

/// An outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Request method.
    pub method: Method,
    /// Absolute URL including query string.
    pub url: String,
    /// Bearer token, if any.
    pub bearer_token: Option<String>,
    /// JSON body, if any.
    pub body: Option<String>,
}

/// A received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client abstraction.
///
/// Implementations return `Err` only when no response was received at all
/// (DNS, TLS, timeout). Non-2xx responses are returned as `Ok`.
pub trait HttpClient: Send + Sync {
    /// Sends a request and returns the response.
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, String>;
}

/// Blocking [`HttpClient`] backed by `reqwest`.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with the given request timeout.
    pub fn new(timeout: Duration) -> SyncResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
        };

        let mut builder = self.client.request(method, &request.url);
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| e.to_string())?;
        Ok(HttpResponse { status, body })
    }
}

#[derive(Serialize)]
struct CreateBody<'a> {
    records: Vec<CreateEntry<'a>>,
}

#[derive(Serialize)]
struct CreateEntry<'a> {
    fields: &'a RecordFields,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    records: &'a [RecordUpdate],
}

#[derive(Deserialize)]
struct RecordsBody {
    #[serde(default)]
    records: Vec<RemoteRecord>,
}

/// A [`RecordStore`] speaking the Airtable REST API.
pub struct AirtableStore<C: HttpClient> {
    table_url: Url,
    view: String,
    api_key: Option<String>,
    client: C,
}

impl<C: HttpClient> AirtableStore<C> {
    /// Creates a store for the table named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if the configuration is incomplete or
    /// the API URL cannot be parsed.
    pub fn new(config: &SyncConfig, client: C) -> SyncResult<Self> {
        config.validate()?;

        let mut table_url = Url::parse(&config.api_url)
            .map_err(|e| SyncError::Config(format!("invalid API URL {}: {e}", config.api_url)))?;
        table_url
            .path_segments_mut()
            .map_err(|_| SyncError::Config(format!("API URL {} cannot be a base", config.api_url)))?
            .pop_if_empty()
            .push(&config.base_id)
            .push(&config.table_name);

        Ok(Self {
            table_url,
            view: config.view.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }

    /// Returns the table endpoint.
    pub fn table_url(&self) -> &str {
        self.table_url.as_str()
    }

    /// Returns the underlying HTTP client.
    pub fn client(&self) -> &C {
        &self.client
    }

    fn list_url(&self, offset: Option<&str>) -> String {
        let mut url = self.table_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("view", &self.view);
            if let Some(offset) = offset {
                query.append_pair("offset", offset);
            }
        }
        url.into()
    }

    fn call<T: for<'de> Deserialize<'de>>(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
    ) -> SyncResult<T> {
        debug!("{:?} {}", method, url);

        let response = self
            .client
            .send(HttpRequest {
                method,
                url,
                bearer_token: self.api_key.clone(),
                body,
            })
            .map_err(SyncError::unreachable)?;

        if !response.is_success() {
            return Err(SyncError::remote(
                response.status,
                extract_error_message(&response.body),
            ));
        }

        serde_json::from_str(&response.body).map_err(|e| SyncError::Remote {
            status: Some(response.status),
            message: format!("invalid response body: {e}"),
        })
    }

    fn encode<T: Serialize>(body: &T) -> SyncResult<String> {
        serde_json::to_string(body).map_err(|e| SyncError::Remote {
            status: None,
            message: format!("failed to encode request: {e}"),
        })
    }
}

impl<C: HttpClient> RecordStore for AirtableStore<C> {
    fn list_page(&self, offset: Option<&str>) -> SyncResult<RecordPage> {
        self.call(Method::Get, self.list_url(offset), None)
    }

    fn create(&self, batch: &[RecordFields]) -> SyncResult<Vec<RemoteRecord>> {
        let body = Self::encode(&CreateBody {
            records: batch.iter().map(|fields| CreateEntry { fields }).collect(),
        })?;
        let created: RecordsBody = self.call(Method::Post, self.table_url.to_string(), Some(body))?;
        Ok(created.records)
    }

    fn update(&self, batch: &[RecordUpdate]) -> SyncResult<Vec<RemoteRecord>> {
        let body = Self::encode(&UpdateBody { records: batch })?;
        let updated: RecordsBody =
            self.call(Method::Patch, self.table_url.to_string(), Some(body))?;
        Ok(updated.records)
    }
}

/// Pulls a readable message out of an error body.
///
/// Handles `{"error": {"type": .., "message": ..}}` and `{"error": "TYPE"}`,
/// falling back to the trimmed raw body.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("error") {
            Some(serde_json::Value::String(kind)) => return kind.clone(),
            Some(serde_json::Value::Object(error)) => {
                let kind = error.get("type").and_then(|t| t.as_str());
                let message = error.get("message").and_then(|m| m.as_str());
                match (kind, message) {
                    (Some(kind), Some(message)) => return format!("{kind}: {message}"),
                    (Some(text), None) | (None, Some(text)) => return text.to_string(),
                    (None, None) => {}
                }
            }
            _ => {}
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(400).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct TestClient {
        responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl TestClient {
        fn respond(&self, status: u16, body: &str) {
            self.responses.lock().push_back(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }));
        }

        fn fail(&self, message: &str) {
            self.responses.lock().push_back(Err(message.to_string()));
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().clone()
        }
    }

    impl HttpClient for TestClient {
        fn send(&self, request: HttpRequest) -> Result<HttpResponse, String> {
            self.requests.lock().push(request);
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err("no response queued".into()))
        }
    }

    fn store() -> AirtableStore<TestClient> {
        let config = SyncConfig::new("appBASE")
            .with_api_key("pat-token")
            .with_table_name("i18n strings");
        AirtableStore::new(&config, TestClient::default()).unwrap()
    }

    #[test]
    fn table_url_encodes_segments() {
        assert_eq!(
            store().table_url(),
            "https://api.airtable.com/v0/appBASE/i18n%20strings"
        );
    }

    #[test]
    fn missing_base_id_is_config_error() {
        let result = AirtableStore::new(&SyncConfig::new(""), TestClient::default());
        assert!(matches!(result, Err(SyncError::Config(_))));
    }

    #[test]
    fn list_sends_view_offset_and_token() {
        let store = store();
        store.client().respond(
            200,
            r#"{"records":[{"id":"rec1","fields":{"key":"a","en":"A"}}],"offset":"itr/2"}"#,
        );

        let page = store.list_page(Some("itr/1")).unwrap();

        assert_eq!(page.records.len(), 1);
        assert_eq!(page.offset.as_deref(), Some("itr/2"));

        let request = &store.client().requests()[0];
        assert_eq!(request.method, Method::Get);
        assert_eq!(
            request.url,
            "https://api.airtable.com/v0/appBASE/i18n%20strings?view=Grid+view&offset=itr%2F1"
        );
        assert_eq!(request.bearer_token.as_deref(), Some("pat-token"));
        assert!(request.body.is_none());
    }

    #[test]
    fn create_posts_fields() {
        let store = store();
        store.client().respond(
            200,
            r#"{"records":[{"id":"recNEW","fields":{"key":"k","en":"Hi","zh-TW":"嗨"}}]}"#,
        );

        let created = store.create(&[RecordFields::new("k", "Hi", "嗨")]).unwrap();
        assert_eq!(created[0].id, "recNEW");

        let request = &store.client().requests()[0];
        assert_eq!(request.method, Method::Post);
        let body: serde_json::Value =
            serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"records": [{"fields": {"key": "k", "en": "Hi", "zh-TW": "嗨"}}]})
        );
    }

    #[test]
    fn update_patches_full_field_set() {
        let store = store();
        store.client().respond(200, r#"{"records":[]}"#);

        store
            .update(&[RecordUpdate {
                id: "rec9".into(),
                fields: RecordFields::new("x", "new", "y"),
            }])
            .unwrap();

        let request = &store.client().requests()[0];
        assert_eq!(request.method, Method::Patch);
        let body: serde_json::Value =
            serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"records": [{"id": "rec9", "fields": {"key": "x", "en": "new", "zh-TW": "y"}}]})
        );
    }

    #[test]
    fn http_errors_carry_status_and_message() {
        let store = store();
        store.client().respond(
            401,
            r#"{"error":{"type":"AUTHENTICATION_REQUIRED","message":"Authentication required"}}"#,
        );

        let err = store.list_page(None).unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(err
            .to_string()
            .contains("AUTHENTICATION_REQUIRED: Authentication required"));
    }

    #[test]
    fn not_found_string_error() {
        let store = store();
        store.client().respond(404, r#"{"error":"NOT_FOUND"}"#);

        let err = store.list_page(None).unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("NOT_FOUND"));
    }

    #[test]
    fn transport_failure_has_no_status() {
        let store = store();
        store.client().fail("connection refused");

        let err = store.list_page(None).unwrap_err();
        assert_eq!(err.status(), None);
    }

    #[test]
    fn malformed_body_is_an_error() {
        let store = store();
        store.client().respond(200, "<html>");
        assert!(store.list_page(None).is_err());
    }

    #[test]
    fn error_message_fallback() {
        assert_eq!(extract_error_message("  plain text  "), "plain text");
        assert_eq!(extract_error_message(""), "empty response body");
    }
}
