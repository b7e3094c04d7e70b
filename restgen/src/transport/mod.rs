//! The transport seam between generated clients and the network.
//!
//! Generated code never talks to an HTTP library directly. It hands a verb,
//! a path (query included) and an optional encoded payload to a
//! [`Transport`], which owns the base URL, authentication, timeouts and
//! any retry behaviour.
//!
//! ## Examples
//!
//! ```rust,ignore
//! use restgen::ReqwestTransport;
//! use url::Url;
//!
//! let transport = ReqwestTransport::builder(Url::parse("https://api.github.com")?)
//!     .bearer_token(std::env::var("GITHUB_TOKEN")?)
//!     .build()?;
//! ```

mod http;

use bytes::Bytes;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::error::ClientError;
use restgen_define::Verb;

pub use http::{Auth, ReqwestTransport, ReqwestTransportBuilder};

/// An encoded request payload.
#[derive(Debug, Clone)]
pub struct Payload {
    /// Encoded body bytes.
    pub bytes: Bytes,
    /// The `Content-Type` the codec produced.
    pub content_type: &'static str,
}

/// A response as seen by the generated client.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The raw response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Creates a response from a status and body.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes requests on behalf of generated clients.
///
/// Non-success statuses are returned as responses, not errors; the client
/// core turns them into [`ClientError::HttpStatus`].
pub trait Transport: Send + Sync {
    /// Sends one request.
    ///
    /// `path` is relative to the transport's base URL and already carries
    /// the escaped route values and the query string.
    fn execute<'a>(
        &'a self,
        verb: Verb,
        path: &'a str,
        body: Option<Payload>,
        cancellation: Option<CancellationToken>,
    ) -> BoxFuture<'a, Result<HttpResponse, ClientError>>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute<'a>(
        &'a self,
        verb: Verb,
        path: &'a str,
        body: Option<Payload>,
        cancellation: Option<CancellationToken>,
    ) -> BoxFuture<'a, Result<HttpResponse, ClientError>> {
        (**self).execute(verb, path, body, cancellation)
    }
}
