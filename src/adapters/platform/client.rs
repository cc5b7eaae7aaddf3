//! HTTP client for the platform's contacts and orders APIs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;

use crate::config::PlatformConfig;
use crate::ports::{DirectoryError, DirectoryService, OrderError, OrderSource};

/// Response of the contacts query endpoint.
#[derive(Debug, Deserialize)]
struct ContactQueryResponse {
    #[serde(default)]
    items: Vec<Value>,
}

/// Failure shared by both ports before it is mapped to the port's error.
#[derive(Debug)]
enum FetchError {
    Unavailable,
    NotFound,
    Network(String),
    Rejected { status: u16, body: String },
    Parse(String),
}

impl FetchError {
    fn into_directory(self, what: &str) -> DirectoryError {
        match self {
            FetchError::Unavailable => DirectoryError::Unavailable,
            FetchError::NotFound => DirectoryError::NotFound(what.to_string()),
            FetchError::Network(e) => DirectoryError::Network(e),
            FetchError::Rejected { status, body } => DirectoryError::Rejected { status, body },
            FetchError::Parse(e) => DirectoryError::Parse(e),
        }
    }

    fn into_order(self, what: &str) -> OrderError {
        match self {
            FetchError::Unavailable => OrderError::Unavailable,
            FetchError::NotFound => OrderError::NotFound(what.to_string()),
            FetchError::Network(e) => OrderError::Network(e),
            FetchError::Rejected { status, body } => OrderError::Rejected { status, body },
            FetchError::Parse(e) => OrderError::Parse(e),
        }
    }
}

/// Directory and order lookups over the platform's REST API.
pub struct HttpPlatformClient {
    client: Client,
    base_url: Option<Url>,
    api_key: Option<SecretString>,
}

impl HttpPlatformClient {
    pub fn new(config: &PlatformConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        // Validated at startup; an unparsable URL leaves lookups unavailable.
        let base_url = config.base_url.as_deref().and_then(|url| Url::parse(url).ok());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone().ok_or(FetchError::Unavailable)?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Unavailable)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key.expose_secret()),
            None => request,
        }
    }

    async fn fetch(&self, request: RequestBuilder) -> Result<Value, FetchError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}

#[async_trait]
impl DirectoryService for HttpPlatformClient {
    async fn query_by_email(&self, email: &str) -> Result<Vec<Value>, DirectoryError> {
        let url = self
            .endpoint(&["contacts"])
            .map_err(|e| e.into_directory(email))?;
        let body = self
            .fetch(self.client.get(url).query(&[("email", email)]))
            .await
            .map_err(|e| e.into_directory(email))?;

        let parsed: ContactQueryResponse =
            serde_json::from_value(body).map_err(|e| DirectoryError::Parse(e.to_string()))?;
        Ok(parsed.items)
    }

    async fn get_by_id(&self, contact_id: &str) -> Result<Value, DirectoryError> {
        let url = self
            .endpoint(&["contacts", contact_id])
            .map_err(|e| e.into_directory(contact_id))?;
        self.fetch(self.client.get(url))
            .await
            .map_err(|e| e.into_directory(contact_id))
    }
}

#[async_trait]
impl OrderSource for HttpPlatformClient {
    async fn get_order(&self, order_id: &str) -> Result<Value, OrderError> {
        let url = self
            .endpoint(&["orders", order_id])
            .map_err(|e| e.into_order(order_id))?;
        let body = self
            .fetch(self.client.get(url))
            .await
            .map_err(|e| e.into_order(order_id))?;

        // Some deployments wrap the order.
        Ok(match body {
            Value::Object(mut map) if map.get("order").map_or(false, Value::is_object) => {
                map.remove("order").unwrap_or_default()
            }
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::HeaderMap;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    async fn fake_platform() -> String {
        let app = Router::new()
            .route(
                "/v1/contacts",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let items = if q.get("email").map(String::as_str) == Some("ada@example.com") {
                        vec![json!({"info": {"name": {"first": "Ada"}}})]
                    } else {
                        vec![]
                    };
                    Json(json!({ "items": items }))
                }),
            )
            .route(
                "/v1/contacts/:id",
                get(|Path(id): Path<String>, headers: HeaderMap| async move {
                    let authorized = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        == Some("Bearer key-1");
                    match (id.as_str(), authorized) {
                        (_, false) => (axum::http::StatusCode::UNAUTHORIZED, Json(json!({}))),
                        ("c 1", true) => (axum::http::StatusCode::OK, Json(json!({"id": "c 1"}))),
                        _ => (axum::http::StatusCode::NOT_FOUND, Json(json!({}))),
                    }
                }),
            )
            .route(
                "/v1/orders/:id",
                get(|Path(id): Path<String>| async move {
                    Json(json!({"order": {"id": id, "planName": "Gold"}}))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1/", addr)
    }

    fn client(base_url: Option<String>) -> HttpPlatformClient {
        let config = PlatformConfig {
            base_url,
            api_key: Some(SecretString::new("key-1".to_string())),
            ..PlatformConfig::default()
        };
        HttpPlatformClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn queries_contacts_by_email() {
        let client = client(Some(fake_platform().await));

        let items = client.query_by_email("ada@example.com").await.unwrap();
        assert_eq!(items.len(), 1);
        assert!(client.query_by_email("nobody@example.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetches_contact_with_encoded_id() {
        let client = client(Some(fake_platform().await));

        let record = client.get_by_id("c 1").await.unwrap();
        assert_eq!(record["id"], "c 1");
        assert!(matches!(
            client.get_by_id("c-2").await,
            Err(DirectoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn unwraps_wrapped_orders() {
        let client = client(Some(fake_platform().await));

        let order = client.get_order("o-1").await.unwrap();
        assert_eq!(order["planName"], "Gold");
        assert_eq!(order["id"], "o-1");
    }

    #[tokio::test]
    async fn unconfigured_client_is_unavailable() {
        let client = client(None);

        assert!(!client.is_configured());
        assert!(matches!(
            client.query_by_email("a@b.c").await,
            Err(DirectoryError::Unavailable)
        ));
        assert!(matches!(client.get_order("o-1").await, Err(OrderError::Unavailable)));
    }
}
