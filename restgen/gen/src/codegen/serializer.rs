//! Serializers for aliased enums.
//!
//! An enum is written and read as its alias string. Besides the serde impls
//! the enum gets an alias table and lookups in both directions, plus a
//! `QueryValue` impl so it can be used as a query parameter directly.

use proc_macro2::TokenStream;
use quote::quote;
use tracing::debug;

use super::EmitContext;
use crate::ir::Enumeration;

/// Generates the alias table, serde impls and query rendering for an enum.
pub fn generate_serializer(enumeration: &Enumeration, ctx: &EmitContext) -> TokenStream {
    let rt = ctx.runtime();
    let name = &enumeration.ident;
    let variants: Vec<_> = enumeration.members.iter().map(|m| &m.ident).collect();
    let aliases: Vec<&str> = enumeration
        .members
        .iter()
        .map(|m| m.alias.as_str())
        .collect();

    debug!(
        enumeration = %enumeration.identity,
        members = variants.len(),
        "emitted serializer"
    );

    quote! {
        impl #name {
            /// Every variant with its wire name, in declaration order.
            pub const ALIASES: &'static [(Self, &'static str)] = &[
                #((Self::#variants, #aliases)),*
            ];

            /// The wire name of this variant.
            pub fn alias(&self) -> &'static str {
                match *self {
                    #(Self::#variants => #aliases,)*
                }
            }

            /// Looks up a variant by its wire name. Matching is exact.
            pub fn from_alias(alias: &str) -> ::core::option::Option<Self> {
                match alias {
                    #(#aliases => ::core::option::Option::Some(Self::#variants),)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #rt::serde::Serialize for #name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: #rt::serde::Serializer,
            {
                serializer.serialize_str(self.alias())
            }
        }

        impl<'de> #rt::serde::Deserialize<'de> for #name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: #rt::serde::Deserializer<'de>,
            {
                let alias = <::std::string::String as #rt::serde::Deserialize>::deserialize(deserializer)?;
                Self::from_alias(&alias).ok_or_else(|| {
                    <D::Error as #rt::serde::de::Error>::unknown_variant(&alias, &[#(#aliases),*])
                })
            }
        }

        impl #rt::QueryValue for #name {
            fn to_query(&self) -> ::core::option::Option<::std::string::String> {
                ::core::option::Option::Some(::std::string::String::from(self.alias()))
            }

            fn is_default(&self) -> bool {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::validate_code;
    use crate::ir::{EnumerationMember, QualifiedName};
    use proc_macro2::{Ident, Span};

    fn enumeration(members: &[(&str, &str)]) -> Enumeration {
        Enumeration {
            identity: QualifiedName::new(vec!["models".into()], "State"),
            ident: Ident::new("State", Span::call_site()),
            members: members
                .iter()
                .map(|(variant, alias)| EnumerationMember {
                    ident: Ident::new(variant, Span::call_site()),
                    alias: alias.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn emits_table_lookups_and_impls() {
        let tokens = generate_serializer(
            &enumeration(&[("Open", "open"), ("Closed", "closed")]),
            &EmitContext::default(),
        );
        let file = validate_code(&tokens).unwrap();
        assert_eq!(file.items.len(), 4);

        let code = tokens.to_string();
        assert!(code.contains("(Self :: Open , \"open\") , (Self :: Closed , \"closed\")"));
        assert!(code.contains("Self :: Closed => \"closed\""));
        assert!(code.contains("\"open\" => :: core :: option :: Option :: Some (Self :: Open)"));
        assert!(code.contains("impl :: restgen :: serde :: Serialize for State"));
        assert!(code.contains("unknown_variant (& alias , & [\"open\" , \"closed\"])"));
        assert!(code.contains("impl :: restgen :: QueryValue for State"));
    }

    #[test]
    fn empty_enum_still_renders() {
        let tokens = generate_serializer(&enumeration(&[]), &EmitContext::default());
        assert!(validate_code(&tokens).is_ok());
        assert!(tokens.to_string().contains("match * self { }"));
    }
}
