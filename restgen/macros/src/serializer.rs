//! Implementation of the `#[generate_serializer]` attribute macro.

use proc_macro2::TokenStream;
use quote::quote;
use restgen_define::{Marker, MarkerTarget};
use syn::{Error, ItemEnum, Result, parse2};

use crate::parse::{alias_value, helper_marker, strip_helpers};

/// Main implementation for the `#[generate_serializer]` attribute macro.
pub fn generate_serializer_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    match generate_serializer_inner(attr, item) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn generate_serializer_inner(attr: TokenStream, item: TokenStream) -> Result<TokenStream> {
    if !attr.is_empty() {
        return Err(Error::new_spanned(
            attr,
            "#[generate_serializer] does not take arguments",
        ));
    }

    let mut item_enum: ItemEnum = parse2(item).map_err(|err| {
        Error::new(err.span(), "#[generate_serializer] can only be applied to enums")
    })?;

    for variant in &mut item_enum.variants {
        for attr in &variant.attrs {
            if helper_marker(attr) == Some(Marker::Alias) {
                alias_value(attr)?;
            }
        }
        strip_helpers(&mut variant.attrs, MarkerTarget::Member);
    }

    Ok(quote! { #item_enum })
}
