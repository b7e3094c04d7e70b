//! Rendering validated IR into Rust source.
//!
//! Emission is a pure function of the IR and the [`EmitContext`]: the same
//! declaration always renders to the same bytes. Every generator returns a
//! `proc_macro2::TokenStream`, which is then:
//! - validated with `syn::parse2` so a broken unit never reaches disk
//! - formatted with `prettyplease`
//! - prefixed with a fixed header naming the source declaration
//!
//! ## Submodules
//!
//! - [`client`] - the client struct, its constructors and the trait impl
//! - [`method`] - one trait method body per endpoint
//! - [`serializer`] - alias tables and serde impls for enums

pub mod client;
pub mod method;
pub mod serializer;

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use restgen_define::QueryPolicy;
use serde::Serialize;

use crate::config::GeneratorConfig;
use crate::errors::GeneratorError;
use crate::ir::QualifiedName;
use crate::scanner::CandidateKind;

pub use client::generate_client;
pub use serializer::generate_serializer;

/// First line of every emitted unit.
pub const HEADER: &str =
    "// This code was automatically generated by restgen-gen. Do not edit manually.";

/// Settings that shape emitted code.
#[derive(Debug, Clone)]
pub struct EmitContext {
    runtime: Ident,
    query: QueryPolicy,
}

impl EmitContext {
    /// Creates a context for the given runtime crate name and query policy.
    pub fn new(runtime_crate: &str, query: QueryPolicy) -> Self {
        Self {
            runtime: format_ident!("{}", runtime_crate),
            query,
        }
    }

    /// Creates a context from a validated config.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(&config.runtime_crate, config.query)
    }

    /// The absolute path of the runtime crate (`::restgen`).
    pub fn runtime(&self) -> TokenStream {
        let runtime = &self.runtime;
        quote!(::#runtime)
    }

    /// The query policy in effect.
    pub fn query(&self) -> QueryPolicy {
        self.query
    }
}

impl Default for EmitContext {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}

/// One emitted source unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedUnit {
    /// Unique hint name, e.g. `github.GithubApi.client`.
    pub hint: String,
    /// Client or serializer.
    pub kind: CandidateKind,
    /// The declaration the unit was generated from.
    pub source: QualifiedName,
    /// Formatted Rust source.
    #[serde(skip)]
    pub code: String,
}

impl GeneratedUnit {
    /// The file name the unit is written to.
    pub fn file_name(&self) -> String {
        format!("{}.rs", self.hint)
    }
}

/// Validates generated code by parsing it with syn.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the tokens are not a valid file.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {}", e)))
}

/// Formats a parsed file and prepends the header.
pub fn format_code(file: &syn::File, source: &QualifiedName) -> String {
    let formatted = prettyplease::unparse(file);
    format!("{HEADER}\n// Source: {source}\n\n{formatted}")
}

/// Validates, formats and wraps tokens as a [`GeneratedUnit`].
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the tokens do not re-parse.
pub fn render_unit(
    tokens: TokenStream,
    hint: String,
    kind: CandidateKind,
    source: &QualifiedName,
) -> Result<GeneratedUnit, GeneratorError> {
    let file = validate_code(&tokens)?;
    Ok(GeneratedUnit {
        hint,
        kind,
        source: source.clone(),
        code: format_code(&file, source),
    })
}
