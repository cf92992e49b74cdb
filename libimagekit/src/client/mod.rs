//! HTTP client for the ImageKit REST API.
//!
//! This module builds authenticated requests against the configured API
//! prefix and performs exactly one round trip per request through a
//! [`Transport`]. The transport is injected at construction; the default is
//! a pooled `reqwest::Client`.

use crate::auth::Credentials;
use crate::config::Config;
use crate::context::Context;
use crate::error::{ImageKitError, Result, TransportKind};
use crate::response::Response;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Client as ReqwestClient, Method, Request};
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use url::Url;


/// Query parameters of a request. Keys are encoded in sorted order.
pub type Query = BTreeMap<String, String>;

/// Configuration for the default HTTP transport.
///
/// # Examples
///
/// ```
/// use libimagekit::client::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_timeout(60)
///     .with_max_idle_per_host(20);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// Maximum idle connections per host (default: 10)
    pub max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_idle_per_host: 10,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the maximum idle connections per host.
    pub fn with_max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }

    /// Builds a reqwest client with these settings.
    pub fn build(&self) -> Result<ReqwestClient> {
        ReqwestClient::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .pool_max_idle_per_host(self.max_idle_per_host)
            .build()
            .map_err(|e| {
                ImageKitError::transport_with_source(
                    TransportKind::Other,
                    "Failed to create HTTP client",
                    e,
                )
            })
    }
}

/// The capability that performs one HTTP exchange.
///
/// Implementations must not retry; failures are reported as they happen.
pub trait Transport: Send + Sync {
    /// Sends `request` and resolves with the response head.
    fn execute(
        &self,
        request: Request,
    ) -> impl Future<Output = reqwest::Result<reqwest::Response>> + Send;
}

impl Transport for ReqwestClient {
    fn execute(
        &self,
        request: Request,
    ) -> impl Future<Output = reqwest::Result<reqwest::Response>> + Send {
        ReqwestClient::execute(self, request)
    }
}

/// Authenticated client bound to one API prefix.
///
/// Cloning is cheap and clones share the credentials read-only, so one
/// client can serve any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct Client<T = ReqwestClient> {
    transport: T,
    credentials: Arc<Credentials>,
    base_url: String,
}

impl Client<ReqwestClient> {
    /// Creates a client with a reqwest transport configured from `config`.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagekit::Config;
    /// use libimagekit::client::Client;
    ///
    /// let config = Config::from_params("private", "public", "https://ik.imagekit.io/demo/");
    /// let client = Client::new(&config).unwrap();
    /// assert_eq!(client.base_url(), "https://api.imagekit.io/v1/");
    /// ```
    pub fn new(config: &Config) -> Result<Self> {
        let transport = config.client_config().build()?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client that sends through `transport`.
    pub fn with_transport(config: &Config, transport: T) -> Self {
        Self {
            transport,
            credentials: Arc::new(config.credentials()),
            base_url: Self::normalize_url(&config.api.prefix),
        }
    }

    /// Ensures the prefix ends with exactly one slash so paths append to it.
    fn normalize_url(url: &str) -> String {
        format!("{}/", url.trim().trim_end_matches('/'))
    }

    /// Returns the API prefix requests are built against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the credentials used to sign requests.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds an authenticated request for `segments` below the API prefix.
    ///
    /// Each segment is percent-encoded as a single path segment, and every
    /// query value is form-encoded. An empty `query` adds no query string.
    ///
    /// # Errors
    ///
    /// Returns [`ImageKitError::MalformedUrl`] if the prefix and path do not
    /// form a valid URL.
    pub fn build_request(&self, method: Method, segments: &[&str], query: &Query) -> Result<Request> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ImageKitError::malformed_url(format!("Invalid API prefix '{}'", self.base_url), Some(e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                ImageKitError::malformed_url(
                    format!("API prefix '{}' cannot carry a path", self.base_url),
                    None,
                )
            })?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let mut request = Request::new(method, url);
        let auth = HeaderValue::from_str(&self.credentials.to_header_value())
            .map_err(|_| ImageKitError::invalid_argument("Private key is not a valid header value"))?;
        request.headers_mut().insert(AUTHORIZATION, auth);

        Ok(request)
    }

    /// Builds an authenticated request with `body` encoded as JSON.
    pub fn build_json_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<Request> {
        let encoded = serde_json::to_vec(body).map_err(|e| {
            ImageKitError::invalid_argument(format!("Failed to encode request body: {}", e))
        })?;

        let mut request = self.build_request(method, segments, &Query::new())?;
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        *request.body_mut() = Some(encoded.into());

        Ok(request)
    }

    /// Sends `request` and reads the whole response body.
    ///
    /// The exchange is raced against `ctx`: if the context is canceled or
    /// its deadline passes first, the in-flight request is dropped and a
    /// cancellation error is returned. A context that is already done fails
    /// without touching the network.
    pub async fn send(&self, ctx: &Context, request: Request) -> Result<Response> {
        if let Some(err) = ctx.err() {
            tracing::warn!("Request not sent: {}", err);
            return Err(err);
        }

        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(%method, %url, "Sending request");

        let exchange = async {
            let response = self
                .transport
                .execute(request)
                .await
                .map_err(|e| Self::translate_reqwest_error(e, &url))?;

            let status = response.status().as_u16();
            let body = response.bytes().await.map_err(|e| {
                ImageKitError::transport_with_source(
                    TransportKind::Body,
                    format!("Failed to read response body from {}", url),
                    e,
                )
            })?;

            Ok(Response::new(status, body))
        };

        let result = tokio::select! {
            result = exchange => result,
            err = ctx.done() => Err(err),
        };

        match &result {
            Ok(response) => {
                tracing::debug!(%method, %url, status = response.status_code(), "Received response")
            }
            Err(e) => tracing::warn!(%method, %url, "Request failed: {}", e),
        }

        result
    }

    /// Translates a reqwest error into an ImageKitError.
    fn translate_reqwest_error(error: reqwest::Error, url: &Url) -> ImageKitError {
        let (kind, message) = if error.is_timeout() {
            (TransportKind::Timeout, format!("Request to {} timed out", url))
        } else if error.is_connect() {
            (TransportKind::Connect, format!("Failed to connect to {}", url))
        } else if error.is_request() {
            (TransportKind::Request, format!("Failed to send request to {}", url))
        } else if error.is_body() || error.is_decode() {
            (TransportKind::Body, format!("Failed to read response from {}", url))
        } else {
            (TransportKind::Other, format!("Network error communicating with {}", url))
        };
        ImageKitError::transport_with_source(kind, message, error)
    }
}
