//! Lowering `#[generate_serializer]` enums.

use restgen_define::Marker;
use syn::ext::IdentExt;
use syn::{Fields, ItemEnum, LitStr};

use super::{Helper, Parsed, helper};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::errors::GeneratorError;
use crate::ir::{Enumeration, EnumerationMember};
use crate::scanner::Candidate;

/// Lowers an enum into its member/alias IR.
///
/// Every variant is checked before giving up, so one run reports all the
/// variants that need fixing. Alias uniqueness is left to validation.
///
/// ## Errors
///
/// Returns an error only if the candidate's source text fails to parse.
pub fn parse_enumeration(candidate: &Candidate) -> Result<Parsed<Enumeration>, GeneratorError> {
    let item: ItemEnum =
        syn::parse_str(&candidate.source).map_err(|e| GeneratorError::ParseError {
            path: candidate.identity.to_string(),
            message: e.to_string(),
        })?;
    let identity = &candidate.identity;

    if !item.generics.params.is_empty() {
        return Ok(Parsed {
            definition: None,
            diagnostics: vec![Diagnostic::declaration(
                identity,
                DiagnosticKind::GenericDeclaration,
            )],
        });
    }

    let mut members = Vec::new();
    let mut diagnostics = Vec::new();

    for variant in &item.variants {
        let name = variant.ident.unraw().to_string();
        if !matches!(variant.fields, Fields::Unit) {
            diagnostics.push(Diagnostic::member(
                identity,
                name.clone(),
                DiagnosticKind::NonUnitVariant { variant: name },
            ));
            continue;
        }

        let aliases: Vec<_> = variant
            .attrs
            .iter()
            .filter(|attr| helper(&candidate.scope, attr) == Helper::Marker(Marker::Alias))
            .collect();

        let alias = match aliases.as_slice() {
            [] => Some(name.clone()),
            [attr] => attr
                .parse_args::<LitStr>()
                .ok()
                .map(|lit| lit.value())
                .filter(|alias| !alias.is_empty()),
            _ => None,
        };

        match alias {
            Some(alias) => members.push(EnumerationMember {
                ident: variant.ident.clone(),
                alias,
            }),
            None => diagnostics.push(Diagnostic::member(
                identity,
                name.clone(),
                DiagnosticKind::InvalidAlias { variant: name },
            )),
        }
    }

    let definition = diagnostics.is_empty().then(|| Enumeration {
        identity: identity.clone(),
        ident: item.ident.clone(),
        members,
    });

    Ok(Parsed {
        definition,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::first_candidate;

    fn parse(src: &str) -> Parsed<Enumeration> {
        parse_enumeration(&first_candidate("models", src)).unwrap()
    }

    #[test]
    fn aliases_default_to_variant_names() {
        let parsed = parse(
            r#"
            use restgen::prelude::*;

            #[generate_serializer]
            pub enum State {
                #[alias("open")]
                Open,
                Closed,
                r#Type,
            }
            "#,
        );
        let enumeration = parsed.definition.unwrap();
        let aliases: Vec<&str> = enumeration
            .members
            .iter()
            .map(|m| m.alias.as_str())
            .collect();
        assert_eq!(aliases, vec!["open", "Closed", "Type"]);
        assert_eq!(enumeration.identity.to_string(), "models::State");
    }

    #[test]
    fn data_variants_and_bad_aliases_reject_the_enum() {
        let parsed = parse(
            r#"
            #[restgen::generate_serializer]
            pub enum State {
                Open(u32),
                #[alias("")]
                Closed,
                #[alias = "x"]
                Merged,
                Draft,
            }
            "#,
        );
        assert!(parsed.definition.is_none());
        let kinds: Vec<_> = parsed.diagnostics.iter().map(|d| d.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::NonUnitVariant {
                    variant: "Open".into()
                },
                DiagnosticKind::InvalidAlias {
                    variant: "Closed".into()
                },
                DiagnosticKind::InvalidAlias {
                    variant: "Merged".into()
                },
            ]
        );
    }

    #[test]
    fn generic_enums_are_rejected() {
        let parsed = parse("#[restgen::generate_serializer] pub enum Wrap<T> { A }");
        assert_eq!(
            parsed.diagnostics[0].kind,
            DiagnosticKind::GenericDeclaration
        );
    }
}
