//! Implementation of the `#[api_client]` attribute macro.
//!
//! The trait is re-emitted unchanged apart from the helper markers, which
//! the compiler would otherwise reject (attribute macros are not allowed on
//! trait method parameters).

use proc_macro2::TokenStream;
use quote::quote;
use restgen_define::MarkerTarget;
use syn::{Error, FnArg, ItemTrait, Result, TraitItem, parse2};

use crate::parse::{ApiClientArgs, strip_helpers};

/// Main implementation for the `#[api_client]` attribute macro.
pub fn api_client_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    match api_client_inner(attr, item) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn api_client_inner(attr: TokenStream, item: TokenStream) -> Result<TokenStream> {
    let _args: ApiClientArgs = parse2(attr)?;

    let mut item_trait: ItemTrait = parse2(item).map_err(|err| {
        Error::new(err.span(), "#[api_client] can only be applied to traits")
    })?;

    for item in &mut item_trait.items {
        if let TraitItem::Fn(method) = item {
            strip_helpers(&mut method.attrs, MarkerTarget::Method);
            for input in &mut method.sig.inputs {
                if let FnArg::Typed(pat_type) = input {
                    strip_helpers(&mut pat_type.attrs, MarkerTarget::Parameter);
                }
            }
        }
    }

    Ok(quote! { #item_trait })
}
