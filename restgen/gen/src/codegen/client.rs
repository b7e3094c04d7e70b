//! The client struct and its trait implementation.

use proc_macro2::TokenStream;
use quote::quote;

use super::EmitContext;
use super::method::generate_method;
use crate::ir::ApiClientDefinition;

/// Generates the client for one declaration.
///
/// The client wraps a `ClientCore<T, C>`; `C` defaults to `JsonCodec` so
/// `Client::new(transport)` needs no annotations:
///
/// ```ignore
/// #[derive(Debug, Clone)]
/// pub struct GithubApiClient<T, C = ::restgen::JsonCodec> {
///     core: ::restgen::ClientCore<T, C>,
/// }
///
/// impl<T: ::restgen::Transport> GithubApiClient<T> {
///     pub fn new(transport: T) -> Self { .. }
/// }
///
/// impl<T: ::restgen::Transport, C: ::restgen::Codec> GithubApiClient<T, C> {
///     pub fn with_codec(transport: T, codec: C) -> Self { .. }
///     pub fn core(&self) -> &::restgen::ClientCore<T, C> { .. }
/// }
///
/// impl<T: ::restgen::Transport, C: ::restgen::Codec> GithubApi for GithubApiClient<T, C> {
///     // one body per endpoint method
/// }
/// ```
pub fn generate_client(client: &ApiClientDefinition, ctx: &EmitContext) -> TokenStream {
    let rt = ctx.runtime();
    let vis = &client.visibility;
    let name = &client.client_name;
    let trait_ident = &client.trait_ident;
    let unsafety = client.is_unsafe.then(|| quote!(unsafe));
    let methods = client.methods.iter().map(|method| generate_method(method, ctx));

    let struct_doc = format!(" HTTP client for [`{trait_ident}`].");
    let new_doc = format!(" Creates a `{name}` that encodes bodies as JSON.");

    quote! {
        #[doc = #struct_doc]
        #[derive(Debug, Clone)]
        #vis struct #name<T, C = #rt::JsonCodec> {
            core: #rt::ClientCore<T, C>,
        }

        impl<T: #rt::Transport> #name<T> {
            #[doc = #new_doc]
            #vis fn new(transport: T) -> Self {
                Self {
                    core: #rt::ClientCore::new(transport),
                }
            }
        }

        impl<T: #rt::Transport, C: #rt::Codec> #name<T, C> {
            /// Creates a client with a custom codec.
            #vis fn with_codec(transport: T, codec: C) -> Self {
                Self {
                    core: #rt::ClientCore::with_codec(transport, codec),
                }
            }

            /// The request core, for access to the transport and codec.
            #vis fn core(&self) -> &#rt::ClientCore<T, C> {
                &self.core
            }
        }

        #unsafety impl<T: #rt::Transport, C: #rt::Codec> #trait_ident for #name<T, C> {
            #(#methods)*
        }
    }
}
