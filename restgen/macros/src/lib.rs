//! Marker attributes for restgen API client declarations.
//!
//! These macros do not generate clients. They make annotated declarations
//! compile in the crate that owns them, while `restgen-gen` reads the very
//! same source and generates the implementations:
//!
//! - [`macro@api_client`] - hosts the verb and body helpers on a trait
//! - [`macro@generate_serializer`] - hosts `#[alias]` on enum variants
//! - [`QueryParams`] - hosts `#[alias]` on query struct fields
//! - [`macro@get`], [`macro@post`], [`macro@put`], [`macro@delete`] - only valid
//!   inside an `#[api_client]` trait; on their own they report an error
//!
//! ## Examples
//!
//! ```ignore
//! use restgen::prelude::*;
//!
//! #[api_client]
//! pub trait GithubApi {
//!     #[get("/repos/{owner}/{repo}")]
//!     async fn repository(&self, owner: String, repo: String) -> Result<Repository, ClientError>;
//!
//!     #[post("/repos/{owner}/{repo}/issues")]
//!     async fn open_issue(&self, owner: String, repo: String, #[body] issue: NewIssue)
//!         -> Result<Issue, ClientError>;
//! }
//! ```

use proc_macro::TokenStream;
use restgen_define::Marker;

mod api_client;
mod derive_query;
mod parse;
mod serializer;

/// Marks a trait as an endpoint group.
///
/// ## Attributes
///
/// - `#[api_client]` - generated client is named `{Trait}Client`
/// - `#[api_client(name = "Custom")]` - overrides the generated client name
///
/// Inside the trait, `#[get("..")]`, `#[post("..")]`, `#[put("..")]`,
/// `#[delete("..")]` and the parameter marker `#[body]` are accepted and
/// removed before the trait reaches the compiler.
#[proc_macro_attribute]
pub fn api_client(attr: TokenStream, item: TokenStream) -> TokenStream {
    api_client::api_client_impl(attr.into(), item.into()).into()
}

/// Marks an enum to receive an alias-aware serializer.
///
/// Variants may carry `#[alias("wire-name")]`; the helper is removed before
/// the enum reaches the compiler.
#[proc_macro_attribute]
pub fn generate_serializer(attr: TokenStream, item: TokenStream) -> TokenStream {
    serializer::generate_serializer_impl(attr.into(), item.into()).into()
}

/// Hosts `#[alias("key")]` on the fields of a composite query parameter.
///
/// The derive emits no items; it validates the helper attributes so a
/// malformed alias is reported where it is written.
#[proc_macro_derive(QueryParams, attributes(alias))]
pub fn derive_query_params(input: TokenStream) -> TokenStream {
    derive_query::derive_query_params_impl(input.into()).into()
}

/// Binds a trait method to `GET`. Only valid inside `#[api_client]`.
#[proc_macro_attribute]
pub fn get(_attr: TokenStream, item: TokenStream) -> TokenStream {
    parse::misplaced_helper(Marker::Get, item.into()).into()
}

/// Binds a trait method to `POST`. Only valid inside `#[api_client]`.
#[proc_macro_attribute]
pub fn post(_attr: TokenStream, item: TokenStream) -> TokenStream {
    parse::misplaced_helper(Marker::Post, item.into()).into()
}

/// Binds a trait method to `PUT`. Only valid inside `#[api_client]`.
#[proc_macro_attribute]
pub fn put(_attr: TokenStream, item: TokenStream) -> TokenStream {
    parse::misplaced_helper(Marker::Put, item.into()).into()
}

/// Binds a trait method to `DELETE`. Only valid inside `#[api_client]`.
#[proc_macro_attribute]
pub fn delete(_attr: TokenStream, item: TokenStream) -> TokenStream {
    parse::misplaced_helper(Marker::Delete, item.into()).into()
}
