//! Implementation of the `#[derive(QueryParams)]` macro.
//!
//! The derive only hosts the `alias` helper; it checks the helper syntax and
//! that the target is a struct with named fields, then emits nothing.

use proc_macro2::TokenStream;
use syn::{Data, DeriveInput, Error, Fields, Result, parse2};

use crate::parse::alias_value;

/// Main implementation for the `#[derive(QueryParams)]` macro.
pub fn derive_query_params_impl(input: TokenStream) -> TokenStream {
    match derive_query_params_inner(input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn derive_query_params_inner(input: TokenStream) -> Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(Error::new_spanned(
                    other,
                    "QueryParams can only be derived on structs with named fields",
                ));
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            return Err(Error::new_spanned(
                &input.ident,
                "QueryParams can only be derived on structs",
            ));
        }
    };

    for field in fields {
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("alias")) {
            alias_value(attr)?;
        }
    }

    Ok(TokenStream::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    #[test]
    fn accepts_named_struct_with_aliases() {
        let output = derive_query_params_impl(quote! {
            pub struct Filter {
                #[alias("q")]
                pub query: String,
                pub sort: String,
            }
        });
        assert!(output.is_empty());
    }

    #[test]
    fn rejects_tuple_structs() {
        let output = derive_query_params_impl(quote! { pub struct Filter(String); });
        assert!(output.to_string().contains("compile_error"));
    }

    #[test]
    fn rejects_empty_alias() {
        let output = derive_query_params_impl(quote! {
            pub struct Filter {
                #[alias("")]
                pub query: String,
            }
        });
        assert!(output.to_string().contains("compile_error"));
    }
}
