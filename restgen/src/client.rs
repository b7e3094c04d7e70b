//! The request core shared by every generated client.
//!
//! A generated client is a thin struct around [`ClientCore`]; each method
//! builds a path and calls [`ClientCore::request`]:
//!
//! ```rust,ignore
//! self.core
//!     .request(::restgen::Verb::Post, path)
//!     .body(&issue)
//!     .cancellation(&cancel)
//!     .send::<Issue>()
//!     .await
//! ```

use serde::{Serialize, de::DeserializeOwned};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::codec::{Codec, JsonCodec};
use crate::error::ClientError;
use crate::transport::{HttpResponse, Payload, Transport};
use restgen_define::Verb;

/// Transport and codec owned by a generated client.
#[derive(Debug, Clone)]
pub struct ClientCore<T, C = JsonCodec> {
    transport: T,
    codec: C,
}

impl<T: Transport, C: Codec + Default> ClientCore<T, C> {
    /// Creates a core using the codec's default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_codec(transport, C::default())
    }
}

impl<T: Transport, C: Codec> ClientCore<T, C> {
    /// Creates a core with an explicit codec.
    pub fn with_codec(transport: T, codec: C) -> Self {
        Self { transport, codec }
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Starts a request for `verb` on `path` (query string included).
    pub fn request(&self, verb: Verb, path: String) -> RequestBuilder<'_, T, C> {
        RequestBuilder {
            core: self,
            verb,
            path,
            body: Ok(None),
            cancellation: None,
        }
    }
}

/// Anything a generated method may accept as its cancellation parameter.
///
/// Implemented for [`CancellationToken`], `Option`s of it and references to
/// either, so generated code passes the parameter through unchanged.
pub trait CancellationSource {
    /// Returns the token to observe, if any.
    fn token(&self) -> Option<CancellationToken>;
}

impl CancellationSource for CancellationToken {
    fn token(&self) -> Option<CancellationToken> {
        Some(self.clone())
    }
}

impl<S: CancellationSource> CancellationSource for Option<S> {
    fn token(&self) -> Option<CancellationToken> {
        self.as_ref().and_then(CancellationSource::token)
    }
}

impl<S: CancellationSource + ?Sized> CancellationSource for &S {
    fn token(&self) -> Option<CancellationToken> {
        (**self).token()
    }
}

/// One request in flight, assembled by a generated method.
#[derive(Debug)]
pub struct RequestBuilder<'a, T, C> {
    core: &'a ClientCore<T, C>,
    verb: Verb,
    path: String,
    body: Result<Option<Payload>, ClientError>,
    cancellation: Option<CancellationToken>,
}

impl<'a, T: Transport, C: Codec> RequestBuilder<'a, T, C> {
    /// Encodes `value` as the request payload.
    ///
    /// An encoding failure is reported when the request is sent.
    pub fn body<V: Serialize + ?Sized>(mut self, value: &V) -> Self {
        let core = self.core;
        self.body = core.codec.encode(value).map(|bytes| {
            Some(Payload {
                bytes,
                content_type: core.codec.content_type(),
            })
        });
        self
    }

    /// Makes the request cancellable through `source`.
    pub fn cancellation<S: CancellationSource + ?Sized>(mut self, source: &S) -> Self {
        self.cancellation = source.token();
        self
    }

    /// Sends the request and decodes the response body as `R`.
    ///
    /// ## Errors
    ///
    /// Returns an error if encoding, transport or decoding fails, the
    /// server answers with a non-success status, or the request is
    /// cancelled.
    pub async fn send<R: DeserializeOwned>(self) -> Result<R, ClientError> {
        let core = self.core;
        let response = self.dispatch().await?;
        core.codec.decode(&response.body)
    }

    /// Sends the request and discards the response body.
    ///
    /// ## Errors
    ///
    /// Same as [`send`](Self::send), minus decoding.
    pub async fn send_unit(self) -> Result<(), ClientError> {
        self.dispatch().await.map(|_| ())
    }

    async fn dispatch(self) -> Result<HttpResponse, ClientError> {
        let body = self.body?;
        debug!(verb = %self.verb, path = %self.path, "dispatching request");

        let response = match self.cancellation {
            Some(token) => {
                if token.is_cancelled() {
                    return Err(ClientError::Cancelled);
                }
                let watch = token.clone();
                tokio::select! {
                    biased;
                    _ = watch.cancelled() => return Err(ClientError::Cancelled),
                    response = self.core.transport.execute(self.verb, &self.path, body, Some(token)) => response?,
                }
            }
            None => {
                self.core
                    .transport
                    .execute(self.verb, &self.path, body, None)
                    .await?
            }
        };

        if !response.is_success() {
            return Err(ClientError::HttpStatus {
                status: response.status,
                message: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use serde::Deserialize;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Recorded {
        verb: Verb,
        path: String,
        body: Option<String>,
        cancellable: bool,
    }

    /// Answers every request with a fixed response and records it.
    struct FixedTransport {
        status: u16,
        body: &'static str,
        seen: Mutex<Vec<Recorded>>,
    }

    impl FixedTransport {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for FixedTransport {
        fn execute<'a>(
            &'a self,
            verb: Verb,
            path: &'a str,
            body: Option<Payload>,
            cancellation: Option<CancellationToken>,
        ) -> BoxFuture<'a, Result<HttpResponse, ClientError>> {
            self.seen.lock().unwrap().push(Recorded {
                verb,
                path: path.to_string(),
                body: body.map(|p| String::from_utf8(p.bytes.to_vec()).unwrap()),
                cancellable: cancellation.is_some(),
            });
            let response = HttpResponse::new(self.status, self.body);
            Box::pin(async move { Ok(response) })
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u64,
    }

    #[tokio::test]
    async fn send_decodes_success_bodies() {
        let core: ClientCore<_> = ClientCore::new(FixedTransport::new(200, r#"{"id":7}"#));
        let user: User = core
            .request(Verb::Get, "/users/7".into())
            .send()
            .await
            .unwrap();
        assert_eq!(user, User { id: 7 });

        let seen = core.transport().seen.lock().unwrap().clone();
        assert_eq!(seen[0].path, "/users/7");
        assert!(!seen[0].cancellable);
    }

    #[tokio::test]
    async fn body_is_encoded_by_the_codec() {
        let core: ClientCore<_> = ClientCore::new(FixedTransport::new(204, ""));
        core.request(Verb::Post, "/users".into())
            .body(&serde_json::json!({"name": "ferris"}))
            .send_unit()
            .await
            .unwrap();

        let seen = core.transport().seen.lock().unwrap().clone();
        assert_eq!(seen[0].verb, Verb::Post);
        assert_eq!(seen[0].body.as_deref(), Some(r#"{"name":"ferris"}"#));
    }

    #[tokio::test]
    async fn non_success_becomes_http_status() {
        let core: ClientCore<_> = ClientCore::new(FixedTransport::new(404, "missing"));
        let err = core
            .request(Verb::Get, "/users/1".into())
            .send_unit()
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert!(err.to_string().contains("missing"));
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let core: ClientCore<_> = ClientCore::new(FixedTransport::new(200, "{}"));
        let token = CancellationToken::new();
        token.cancel();

        let err = core
            .request(Verb::Delete, "/users/1".into())
            .cancellation(&token)
            .send_unit()
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(core.transport().seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn live_token_is_forwarded() {
        let core: ClientCore<_> = ClientCore::new(FixedTransport::new(200, "{}"));
        let token = Some(CancellationToken::new());

        core.request(Verb::Get, "/".into())
            .cancellation(&token)
            .send_unit()
            .await
            .unwrap();
        assert!(core.transport().seen.lock().unwrap()[0].cancellable);
    }

    #[test]
    fn cancellation_sources_unwrap_options_and_refs() {
        let token = CancellationToken::new();
        assert!(token.token().is_some());
        assert!(Some(&token).token().is_some());
        assert!(None::<CancellationToken>.token().is_none());
        assert!((&&token).token().is_some());
    }
}
