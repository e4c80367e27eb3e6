//! HTTP client utilities for the Parfum backend.
//!
//! A thin builder over `reqwest` with a base URL, default headers and
//! uniform error mapping.
//!
//! # Example
//!
//! ```rust,ignore
//! use parfum_data::FetchClient;
//!
//! let client = FetchClient::new()
//!     .with_base_url("https://project.example.co")
//!     .with_default_header("apikey", anon_key);
//!
//! let rows: Vec<Product> = client
//!     .get("/rest/v1/products")
//!     .query("select", "*")
//!     .query("order", "name.asc")
//!     .fetch_json()
//!     .await?;
//! ```

mod error;
mod request;
mod response;

pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;

use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for making outbound requests.
#[derive(Debug, Clone)]
pub struct FetchClient {
    inner: reqwest::Client,
    base_url: Option<String>,
    default_headers: BTreeMap<String, String>,
    timeout: Duration,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Create a new HTTP client.
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: None,
            default_headers: BTreeMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Resolve a path against the base URL. Absolute URLs pass through.
    pub fn resolve(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) if !url.starts_with("http://") && !url.starts_with("https://") => {
                format!("{}{}", base.trim_end_matches('/'), url)
            }
            _ => url.to_string(),
        }
    }

    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    pub fn put(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Put, url)
    }

    pub fn patch(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Patch, url)
    }

    pub fn delete(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Delete, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let full_url = self.resolve(&url.into());

        let mut builder = RequestBuilder::new(method, full_url).timeout(self.timeout);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            client: self.inner.clone(),
            builder,
        }
    }
}

/// A request builder bound to a client.
#[derive(Debug)]
pub struct ClientRequestBuilder {
    client: reqwest::Client,
    builder: RequestBuilder,
}

impl ClientRequestBuilder {
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.query(key, value);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.builder = self.builder.content_type(content_type);
        self
    }

    pub fn json<T: serde::Serialize + ?Sized>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// The request as built so far.
    pub fn request(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Send the request and return the response, whatever its status.
    pub async fn send(self) -> Result<Response, FetchError> {
        let method = self.builder.method();
        let url = self.builder.url().to_string();
        tracing::debug!(method = method.as_str(), url = %url, "sending request");

        let resp = self.builder.into_reqwest(&self.client).send().await?;
        let response = Response::from_reqwest(resp).await?;

        tracing::debug!(
            method = method.as_str(),
            url = %url,
            status = response.status,
            bytes = response.body.len(),
            "received response"
        );
        Ok(response)
    }

    /// Send, fail on non-2xx, and parse the body as JSON.
    pub async fn fetch_json<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        self.send().await?.error_for_status()?.json()
    }

    /// Send and fail on non-2xx, ignoring the body.
    pub async fn execute(self) -> Result<(), FetchError> {
        self.send().await?.error_for_status()?;
        Ok(())
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, Method, RequestBuilder, Response};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_resolution() {
        let client = FetchClient::new().with_base_url("https://db.example.co/");
        assert_eq!(
            client.resolve("/rest/v1/products"),
            "https://db.example.co/rest/v1/products"
        );
        assert_eq!(
            client.resolve("https://cdn.example.co/a.png"),
            "https://cdn.example.co/a.png"
        );
    }

    #[test]
    fn test_default_headers_applied() {
        let client = FetchClient::new()
            .with_base_url("https://db.example.co")
            .with_default_header("apikey", "anon");
        let req = client.get("/rest/v1/skus").query("select", "*");
        assert_eq!(req.request().header_value("apikey"), Some("anon"));
        assert_eq!(req.request().url(), "https://db.example.co/rest/v1/skus");
        assert_eq!(req.request().method(), Method::Get);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let client = FetchClient::new().with_timeout(Duration::from_millis(200));
        let result = client.get("http://127.0.0.1:9/nothing").send().await;
        assert!(matches!(
            result,
            Err(FetchError::RequestError(_)) | Err(FetchError::Timeout)
        ));
    }
}
