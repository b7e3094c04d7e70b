//! `reqwest`-backed transport with tracing instrumentation.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tokio_util::sync::CancellationToken;
use tracing::{Span, instrument};
use url::Url;

use super::{HttpResponse, Payload, Transport};
use crate::error::ClientError;
use restgen_define::Verb;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Credentials attached to every request.
#[derive(Debug, Clone, Default)]
pub enum Auth {
    /// No authentication.
    #[default]
    None,
    /// `Authorization: Bearer <token>`.
    Bearer(String),
    /// A custom header carrying an API key, e.g. `X-API-Key`.
    ApiKey {
        /// Header name.
        header: HeaderName,
        /// Key sent as the header value.
        key: String,
    },
}

/// Builder for configuring a [`ReqwestTransport`].
#[derive(Debug)]
pub struct ReqwestTransportBuilder {
    base_url: Url,
    timeout: Duration,
    default_headers: HeaderMap,
    auth: Auth,
}

impl ReqwestTransportBuilder {
    fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: HeaderMap::new(),
            auth: Auth::None,
        }
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a default header to all requests.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ClientError> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| ClientError::InvalidHeader(format!("invalid header name: {e}")))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| ClientError::InvalidHeader(format!("invalid header value: {e}")))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Authenticates with a bearer token.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = Auth::Bearer(token.into());
        self
    }

    /// Authenticates with an API key sent in `header`.
    ///
    /// ## Errors
    ///
    /// Returns an error if `header` is not a valid header name.
    pub fn api_key(
        mut self,
        header: impl AsRef<str>,
        key: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let header = HeaderName::try_from(header.as_ref())
            .map_err(|e| ClientError::InvalidHeader(format!("invalid header name: {e}")))?;
        self.auth = Auth::ApiKey {
            header,
            key: key.into(),
        };
        Ok(self)
    }

    /// Builds the [`ReqwestTransport`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ReqwestTransport, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(self.default_headers)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(ReqwestTransport {
            client,
            base_url: self.base_url,
            auth: self.auth,
        })
    }
}

/// Transport backed by a pooled `reqwest::Client`.
///
/// The request path is appended to the base URL verbatim, so a base of
/// `https://example.com/api/v2` keeps its `/api/v2` prefix.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
    auth: Auth,
}

impl ReqwestTransport {
    /// Creates a new builder for configuring a transport.
    pub fn builder(base_url: Url) -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new(base_url)
    }

    /// Creates a transport with default settings and no authentication.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, ClientError> {
        Self::builder(base_url).build()
    }

    /// Returns the base URL for this transport.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn full_url(&self, path: &str) -> Result<Url, ClientError> {
        let raw = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| ClientError::InvalidUrl {
            url: raw.clone(),
            message: e.to_string(),
        })
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::None => request,
            Auth::Bearer(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            Auth::ApiKey { header, key } => request.header(header.clone(), key.as_str()),
        }
    }

    #[instrument(
        name = "api_request",
        skip(self, body, _cancellation),
        fields(
            http.method = %verb,
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    async fn send(
        &self,
        verb: Verb,
        path: &str,
        body: Option<Payload>,
        _cancellation: Option<CancellationToken>,
    ) -> Result<HttpResponse, ClientError> {
        let full_url = self.full_url(path)?;
        Span::current().record("http.url", full_url.as_str());

        let mut request = self.client.request(method(verb), full_url);
        request = self.apply_auth(request);
        if let Some(payload) = body {
            request = request
                .header(CONTENT_TYPE, payload.content_type)
                .body(payload.bytes);
        }

        let response = request.send().await?;
        let status = response.status();
        Span::current().record("http.status_code", status.as_u16());

        let otel_status = if status.is_server_error() {
            "ERROR"
        } else if status.is_success() {
            "OK"
        } else {
            "UNSET"
        };
        Span::current().record("otel.status_code", otel_status);

        let body = response.bytes().await?;
        Ok(HttpResponse::new(status.as_u16(), body))
    }
}

impl Transport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        verb: Verb,
        path: &'a str,
        body: Option<Payload>,
        cancellation: Option<CancellationToken>,
    ) -> BoxFuture<'a, Result<HttpResponse, ClientError>> {
        Box::pin(self.send(verb, path, body, cancellation))
    }
}

fn method(verb: Verb) -> reqwest::Method {
    match verb {
        Verb::Get => reqwest::Method::GET,
        Verb::Post => reqwest::Method::POST,
        Verb::Put => reqwest::Method::PUT,
        Verb::Delete => reqwest::Method::DELETE,
    }
}
