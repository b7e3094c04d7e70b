//! Runtime support for restgen-generated API clients.
//!
//! Declarations are ordinary Rust traits carrying marker attributes;
//! `restgen-gen` reads them and writes one client per trait. The generated
//! code only ever calls into this crate:
//!
//! - [`ClientCore`] / [`RequestBuilder`] - path, body and cancellation in,
//!   decoded response out
//! - [`Transport`] - the network seam ([`ReqwestTransport`] by default)
//! - [`Codec`] - payload encoding ([`JsonCodec`] by default)
//! - [`QueryBuilder`] / [`QueryValue`] - query strings under a [`ValuePolicy`]
//! - [`path::escape`] - route values as escaped path segments
//! - [`Task`] / [`block_on`] - async and blocking return shapes
//!
//! ## Example
//!
//! ```rust,ignore
//! use restgen::prelude::*;
//!
//! #[api_client]
//! pub trait GithubApi {
//!     #[get("/repos/{owner}/{repo}")]
//!     fn repository(&self, owner: String, repo: String) -> Task<'_, Repository>;
//! }
//!
//! include!(concat!(env!("OUT_DIR"), "/restgen/GithubApi.client.rs"));
//!
//! let transport = ReqwestTransport::new(Url::parse("https://api.github.com")?)?;
//! let client = GithubApiClient::new(transport);
//! let repo = client.repository("rust-lang".into(), "rust".into()).await?;
//! ```

pub mod client;
pub mod codec;
pub mod error;
pub mod path;
pub mod prelude;
pub mod query;
pub mod task;
pub mod transport;

pub use client::{CancellationSource, ClientCore, RequestBuilder};
pub use codec::{Codec, JsonCodec};
pub use error::ClientError;
pub use query::{QueryBuilder, QueryValue, ValuePolicy};
pub use task::{Task, block_on};
pub use transport::{
    Auth, HttpResponse, Payload, ReqwestTransport, ReqwestTransportBuilder, Transport,
};

pub use restgen_define::Verb;
pub use restgen_macros::{QueryParams, api_client, delete, generate_serializer, get, post, put};
pub use tokio_util::sync::CancellationToken;

// Generated code reaches these through `::restgen::` so consumers need no
// direct dependency on them.
pub use serde;
pub use tracing;
