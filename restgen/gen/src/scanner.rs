//! Finding the declarations to generate for.
//!
//! The scan is two-staged: a cheap syntactic filter (a trait or enum with at
//! least one attribute) and a confirmation that one of the attributes
//! resolves, through the module's imports, to the vocabulary marker.
//! `#[api_client]` imported from some other crate is not ours.

use std::collections::HashSet;
use std::sync::Arc;

use quote::ToTokens;
use restgen_define::Marker;
use serde::Serialize;
use syn::{Attribute, Item};
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::ir::QualifiedName;
use crate::resolve::ImportScope;
use crate::source::SourceUnit;

/// What a candidate declaration will be generated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    /// A trait carrying `#[api_client]`.
    Client,
    /// An enum carrying `#[generate_serializer]`.
    Serializer,
}

impl CandidateKind {
    /// Returns the last segment of hint names for this kind.
    pub fn hint_suffix(&self) -> &'static str {
        match self {
            CandidateKind::Client => "client",
            CandidateKind::Serializer => "serializer",
        }
    }
}

/// A confirmed declaration.
///
/// The item travels as source text: syn trees cannot cross threads, so each
/// worker re-parses its own copy.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Qualified identity of the item.
    pub identity: QualifiedName,
    /// Client or serializer.
    pub kind: CandidateKind,
    /// The item's tokens.
    pub source: String,
    /// Imports of the declaring module.
    pub scope: Arc<ImportScope>,
}

/// Candidates and the declaration-level problems found while scanning.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Confirmed, deduplicated candidates in source order.
    pub candidates: Vec<Candidate>,
    /// Declarations that were found but cannot be generated.
    pub diagnostics: Vec<Diagnostic>,
}

/// Scans every unit, inline modules included.
pub fn scan(units: &[SourceUnit]) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    let mut seen = HashSet::new();
    for unit in units {
        scan_items(&unit.module, &unit.file.items, &mut seen, &mut outcome);
    }
    outcome
}

fn scan_items(
    module: &[String],
    items: &[Item],
    seen: &mut HashSet<(CandidateKind, QualifiedName)>,
    outcome: &mut ScanOutcome,
) {
    let scope = Arc::new(ImportScope::from_items(module, items));

    for item in items {
        let (kind, ident, attrs, tokens) = match item {
            Item::Trait(item) if !item.attrs.is_empty() => (
                CandidateKind::Client,
                &item.ident,
                &item.attrs,
                item.to_token_stream(),
            ),
            Item::Enum(item) if !item.attrs.is_empty() => (
                CandidateKind::Serializer,
                &item.ident,
                &item.attrs,
                item.to_token_stream(),
            ),
            Item::Mod(item_mod) => {
                if let Some((_, nested)) = &item_mod.content {
                    let mut inner = module.to_vec();
                    inner.push(item_mod.ident.to_string());
                    scan_items(&inner, nested, seen, outcome);
                }
                continue;
            }
            _ => continue,
        };

        let wanted = match kind {
            CandidateKind::Client => Marker::ApiClient,
            CandidateKind::Serializer => Marker::GenerateSerializer,
        };
        let hits = count_markers(&scope, attrs, wanted);
        if hits == 0 {
            continue;
        }

        let identity = QualifiedName::new(module.to_vec(), ident.to_string());
        if !seen.insert((kind, identity.clone())) {
            debug!(%identity, "declaration already scanned");
            continue;
        }

        if hits > 1 && kind == CandidateKind::Client {
            outcome.diagnostics.push(Diagnostic::declaration(
                &identity,
                DiagnosticKind::DuplicateClientMarker,
            ));
            continue;
        }

        outcome.candidates.push(Candidate {
            identity,
            kind,
            source: tokens.to_string(),
            scope: Arc::clone(&scope),
        });
    }
}

/// Counts attributes that resolve to `wanted`.
fn count_markers(scope: &ImportScope, attrs: &[Attribute], wanted: Marker) -> usize {
    attrs
        .iter()
        .filter(|attr| {
            scope
                .resolve(attr.path())
                .and_then(|path| Marker::from_qualified(path.as_slice()))
                == Some(wanted)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::unit;

    fn scan_source(src: &str) -> ScanOutcome {
        scan(&[unit("api", src)])
    }

    fn names(outcome: &ScanOutcome) -> Vec<String> {
        outcome
            .candidates
            .iter()
            .map(|c| c.identity.to_string())
            .collect()
    }

    #[test]
    fn confirms_imported_marker() {
        let outcome = scan_source(
            r#"
            use restgen::api_client;

            #[api_client]
            pub trait Users {}

            #[derive(Debug)]
            pub trait NotAClient {}
            "#,
        );
        assert_eq!(names(&outcome), vec!["api::Users"]);
        assert_eq!(outcome.candidates[0].kind, CandidateKind::Client);
    }

    #[test]
    fn rejects_same_named_marker_from_another_crate() {
        let outcome = scan_source(
            r#"
            use other_crate::api_client;

            #[api_client]
            pub trait Users {}
            "#,
        );
        assert!(outcome.candidates.is_empty());
    }

    #[test]
    fn rejects_unimported_bare_marker() {
        let outcome = scan_source("#[api_client] pub trait Users {}");
        assert!(outcome.candidates.is_empty());
    }

    #[test]
    fn accepts_fully_qualified_marker() {
        let outcome = scan_source("#[restgen_macros::api_client] pub trait Users {}");
        assert_eq!(names(&outcome), vec!["api::Users"]);
    }

    #[test]
    fn finds_enums_and_inline_modules() {
        let outcome = scan_source(
            r#"
            mod v2 {
                use restgen::prelude::*;

                #[generate_serializer]
                pub enum State { Open, Closed }
            }
            "#,
        );
        assert_eq!(names(&outcome), vec!["api::v2::State"]);
        assert_eq!(outcome.candidates[0].kind, CandidateKind::Serializer);
    }

    #[test]
    fn inline_modules_do_not_inherit_imports() {
        let outcome = scan_source(
            r#"
            use restgen::prelude::*;

            mod inner {
                #[api_client]
                pub trait Hidden {}
            }
            "#,
        );
        assert!(outcome.candidates.is_empty());
    }

    #[test]
    fn duplicate_client_marker_is_reported_once() {
        let outcome = scan_source(
            r#"
            use restgen::api_client;

            #[api_client]
            #[restgen::api_client]
            pub trait Users {}
            "#,
        );
        assert!(outcome.candidates.is_empty());
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(
            outcome.diagnostics[0].kind,
            DiagnosticKind::DuplicateClientMarker
        );
    }

    #[test]
    fn same_file_twice_is_deduplicated() {
        let src = "#[restgen::api_client] pub trait Users {}";
        let a = SourceUnit::parse("a.rs", vec![], src).unwrap();
        let b = SourceUnit::parse("b.rs", vec![], src).unwrap();
        assert_eq!(scan(&[a, b]).candidates.len(), 1);
    }
}
