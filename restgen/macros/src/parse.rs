//! Attribute parsing shared by the marker macros.
//!
//! This module recognizes helper markers on nested items and parses the
//! arguments of the host markers.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use restgen_define::{Marker, MarkerTarget};
use syn::{
    Attribute, Error, Ident, LitStr, Result, Token,
    parse::{Parse, ParseStream},
};

/// Returns the helper marker an attribute names, if any.
///
/// A single-segment path is matched by name (helpers are consumed by their
/// host before name resolution); a qualified path must point into the
/// vocabulary crates.
pub fn helper_marker(attr: &Attribute) -> Option<Marker> {
    let segments: Vec<String> = attr
        .path()
        .segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect();

    let marker = match segments.as_slice() {
        [single] => Marker::from_name(single)?,
        qualified => Marker::from_qualified(qualified)?,
    };

    marker.is_helper().then_some(marker)
}

/// Removes every helper attribute aimed at `target` from `attrs`.
pub fn strip_helpers(attrs: &mut Vec<Attribute>, target: MarkerTarget) {
    attrs.retain(|attr| !matches!(helper_marker(attr), Some(marker) if marker.target() == target));
}

/// Parsed arguments of `#[api_client(...)]`.
#[derive(Debug, Default)]
pub struct ApiClientArgs {
    /// Explicit name for the generated client.
    pub name: Option<LitStr>,
}

impl Parse for ApiClientArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args = ApiClientArgs::default();

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            if key == "name" {
                let _: Token![=] = input.parse()?;
                let value: LitStr = input.parse()?;
                if syn::parse_str::<Ident>(&value.value()).is_err() {
                    return Err(Error::new(
                        value.span(),
                        format!("`{}` is not a valid client name", value.value()),
                    ));
                }
                args.name = Some(value);
            } else {
                return Err(Error::new(
                    key.span(),
                    format!("unknown api_client attribute: `{}`. Expected `name`", key),
                ));
            }

            if input.peek(Token![,]) {
                let _: Token![,] = input.parse()?;
            }
        }

        Ok(args)
    }
}

/// Parses the `("value")` argument of an alias helper.
pub fn alias_value(attr: &Attribute) -> Result<LitStr> {
    let value: LitStr = attr.parse_args()?;
    if value.value().is_empty() {
        return Err(Error::new(value.span(), "alias cannot be empty"));
    }
    Ok(value)
}

/// Reports a helper marker used outside of its host, keeping the item.
pub fn misplaced_helper(marker: Marker, item: TokenStream) -> TokenStream {
    let message = format!(
        "#[{}] is only valid on a method inside an #[api_client] trait",
        marker.name()
    );
    let error = Error::new(Span::call_site(), message).to_compile_error();
    quote! {
        #error
        #item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn bare_helpers_are_recognized() {
        let attr: Attribute = parse_quote!(#[get("/users")]);
        assert_eq!(helper_marker(&attr), Some(Marker::Get));

        let attr: Attribute = parse_quote!(#[body]);
        assert_eq!(helper_marker(&attr), Some(Marker::Body));
    }

    #[test]
    fn qualified_helpers_must_come_from_the_vocabulary() {
        let attr: Attribute = parse_quote!(#[restgen::post("/users")]);
        assert_eq!(helper_marker(&attr), Some(Marker::Post));

        let attr: Attribute = parse_quote!(#[rocket::post("/users")]);
        assert_eq!(helper_marker(&attr), None);
    }

    #[test]
    fn hosts_are_not_helpers() {
        let attr: Attribute = parse_quote!(#[api_client]);
        assert_eq!(helper_marker(&attr), None);
    }

    #[test]
    fn strip_only_touches_the_requested_target() {
        let mut attrs: Vec<Attribute> = vec![
            parse_quote!(#[doc = "docs"]),
            parse_quote!(#[get("/a")]),
            parse_quote!(#[body]),
        ];
        strip_helpers(&mut attrs, MarkerTarget::Method);
        assert_eq!(attrs.len(), 2);
        assert!(attrs[0].path().is_ident("doc"));
        assert!(attrs[1].path().is_ident("body"));
    }

    #[test]
    fn client_args_accept_name() {
        let args: ApiClientArgs = syn::parse2(quote! { name = "Octocat" }).unwrap();
        assert_eq!(args.name.unwrap().value(), "Octocat");
    }

    #[test]
    fn client_args_reject_unknown_keys() {
        let result: Result<ApiClientArgs> = syn::parse2(quote! { base_url = "x" });
        assert!(result.is_err());
    }

    #[test]
    fn client_args_reject_invalid_identifiers() {
        let result: Result<ApiClientArgs> = syn::parse2(quote! { name = "not an ident" });
        assert!(result.is_err());
    }
}
