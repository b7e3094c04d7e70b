//! Endpoint method bodies.
//!
//! Every body has the same three parts:
//!
//! 1. build `path`: route literals plus escaped route values, then the query
//! 2. build `request` from the core: verb, path, body, cancellation
//! 3. send it and hand the outcome to the declared error channel
//!
//! For `Task` and `impl Future` methods the first two parts run before the
//! future is created, so the future only borrows the client: the body is
//! already encoded and the cancellation token cloned.
//!
//! ```ignore
//! fn repository(&self, owner: &str, repo: &str) -> Task<'_, Repository> {
//!     let mut path = String::from("/repos/");
//!     path.push_str(&::restgen::path::escape(&owner));
//!     path.push_str("/");
//!     path.push_str(&::restgen::path::escape(&repo));
//!     let request = self.core.request(::restgen::Verb::Get, path);
//!     Box::pin(async move {
//!         let outcome = request.send::<Repository>().await;
//!         outcome
//!     })
//! }
//! ```

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use tracing::debug;

use super::EmitContext;
use crate::ir::{
    ApiMethodDefinition, ErrorChannel, ParameterBinding, QueryAccess, RouteSegment, Wrapper,
};
use crate::parser::ident;

/// Generates the trait method implementation for one endpoint.
pub fn generate_method(method: &ApiMethodDefinition, ctx: &EmitContext) -> TokenStream {
    let rt = ctx.runtime();
    let signature = &method.signature;
    let path = path_statements(method, ctx);
    let request = request_expression(method, ctx);
    let send = match method.returns.descriptor.value() {
        Some(ty) => quote!(request.send::<#ty>()),
        None => quote!(request.send_unit()),
    };
    let finish = finish(method, ctx);

    let body = match method.returns.wrapper {
        Wrapper::AsyncFn => quote! {
            #path
            let request = #request;
            let outcome = #send.await;
            #finish
        },
        Wrapper::ImplFuture => quote! {
            #path
            let request = #request;
            async move {
                let outcome = #send.await;
                #finish
            }
        },
        Wrapper::Task => quote! {
            #path
            let request = #request;
            ::std::boxed::Box::pin(async move {
                let outcome = #send.await;
                #finish
            })
        },
        Wrapper::Blocking => quote! {
            #path
            let request = #request;
            let outcome = #rt::block_on(#send);
            #finish
        },
    };

    debug!(
        method = %method.name,
        verb = %method.verb,
        route = %method.route.raw,
        "emitted method"
    );

    quote! {
        #signature {
            #body
        }
    }
}

/// `let path = ..;` followed by the pushes for the remaining segments and
/// the query string.
fn path_statements(method: &ApiMethodDefinition, ctx: &EmitContext) -> TokenStream {
    let rt = ctx.runtime();
    let mut segments = method.route.segments.iter().peekable();
    let initial = match segments.peek() {
        Some(RouteSegment::Literal(text)) => {
            let text = text.clone();
            segments.next();
            text
        }
        _ => String::new(),
    };

    let pushes: Vec<TokenStream> = segments
        .map(|segment| match segment {
            RouteSegment::Literal(text) => quote!(path.push_str(#text);),
            RouteSegment::Placeholder(name) => {
                let value = route_parameter(method, name);
                quote!(path.push_str(&#rt::path::escape(&#value));)
            }
        })
        .collect();

    let query = query_statements(method, ctx);
    let mutability = (!pushes.is_empty() || query.is_some()).then(|| quote!(mut));

    quote! {
        let #mutability path = ::std::string::String::from(#initial);
        #(#pushes)*
        #query
    }
}

fn route_parameter(method: &ApiMethodDefinition, placeholder: &str) -> proc_macro2::Ident {
    method
        .bindings
        .iter()
        .find(|binding| {
            matches!(binding, ParameterBinding::Route { placeholder: p, .. } if p == placeholder)
        })
        .map(|binding| binding.ident().clone())
        .unwrap_or_else(|| ident(placeholder))
}

/// The query builder statements, or `None` when the method has no query
/// parameters.
fn query_statements(method: &ApiMethodDefinition, ctx: &EmitContext) -> Option<TokenStream> {
    let rt = ctx.runtime();
    let policy = ctx.query();

    let pushes: Vec<TokenStream> = method
        .bindings
        .iter()
        .filter_map(|binding| match binding {
            ParameterBinding::Query {
                ident,
                keys,
                composite,
            } => Some((ident, keys, *composite)),
            _ => None,
        })
        .flat_map(|(param, keys, composite)| {
            let value_policy = if composite {
                policy.composite_fields
            } else {
                policy.scalars
            };
            let policy = format_ident!("{}", value_policy.ident());
            let rt = rt.clone();
            keys.iter().map(move |key| {
                let name = &key.key;
                match &key.access {
                    QueryAccess::Direct => {
                        quote!(query.push(#name, &#param, #rt::ValuePolicy::#policy);)
                    }
                    QueryAccess::Field(field) => {
                        quote!(query.push(#name, &#param.#field, #rt::ValuePolicy::#policy);)
                    }
                    QueryAccess::OptionalField(field) => quote! {
                        if let ::core::option::Option::Some(value) = &#param {
                            query.push(#name, &value.#field, #rt::ValuePolicy::#policy);
                        }
                    },
                }
            })
        })
        .collect();

    if pushes.is_empty() {
        return None;
    }

    Some(quote! {
        let mut query = #rt::QueryBuilder::new();
        #(#pushes)*
        path.push_str(&query.finish());
    })
}

/// `self.core.request(..)` with the body and cancellation attached.
fn request_expression(method: &ApiMethodDefinition, ctx: &EmitContext) -> TokenStream {
    let rt = ctx.runtime();
    let verb = format_ident!("{}", method.verb.ident());
    let mut request = quote!(self.core.request(#rt::Verb::#verb, path));

    for binding in &method.bindings {
        match binding {
            ParameterBinding::Body { ident } => {
                request = quote!(#request.body(&#ident));
            }
            ParameterBinding::Cancellation { ident, .. } => {
                request = quote!(#request.cancellation(&#ident));
            }
            _ => {}
        }
    }
    request
}

/// Turns `outcome: Result<_, ClientError>` into the declared return value.
fn finish(method: &ApiMethodDefinition, ctx: &EmitContext) -> TokenStream {
    let rt = ctx.runtime();
    match &method.returns.error {
        ErrorChannel::Result(error) => quote! {
            outcome.map_err(<#error as ::core::convert::From<#rt::ClientError>>::from)
        },
        ErrorChannel::Builtin => quote!(outcome),
        ErrorChannel::None => {
            let name = &method.name;
            quote! {
                if let ::core::result::Result::Err(error) = outcome {
                    #rt::tracing::warn!(method = #name, %error, "request failed");
                }
            }
        }
    }
}
