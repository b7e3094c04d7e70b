//! restgen code generator library.
//!
//! Reads Rust source files, finds traits marked `#[api_client]` and enums
//! marked `#[generate_serializer]`, and writes one formatted unit per
//! declaration:
//!
//! - a client struct implementing the trait, one method per endpoint,
//!   built on the `restgen` runtime
//! - an alias table plus `Serialize`/`Deserialize` for each enum
//!
//! Problems with a method or declaration become [`Diagnostic`]s and leave
//! everything else untouched. Only tool-level failures (unreadable input,
//! bad config, failed writes) are [`GeneratorError`]s.
//!
//! ## Modules
//!
//! - [`source`] / [`resolve`] / [`symbols`] - parsed inputs, import scopes,
//!   the struct table used for composite query parameters
//! - [`scanner`] - confirms candidate declarations
//! - [`parser`] - lowers declarations into the [`ir`]
//! - [`validation`] - structural invariants per method and enum
//! - [`codegen`] - renders IR into formatted source
//! - [`naming`] - hint names and the cache that keeps them unique
//! - [`pipeline`] - parallel orchestration and the [`GenerationReport`]
//! - [`debug`] / [`output`] - the debug side channel and file writing
//! - [`builder`] - build-script entry point
//! - [`config`] / [`errors`] / [`diagnostics`]
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use restgen_gen::config::GeneratorConfig;
//! use restgen_gen::naming::NameCache;
//! use restgen_gen::pipeline::Generator;
//! use restgen_gen::source::SourceUnit;
//!
//! let source = r#"
//!     use restgen::prelude::*;
//!
//!     #[api_client]
//!     pub trait PingApi {
//!         #[get("/ping")]
//!         fn ping(&self) -> Task<'_>;
//!     }
//! "#;
//! let unit = SourceUnit::parse("src/lib.rs", vec![], source).unwrap();
//!
//! let report = Generator::new(GeneratorConfig::default())
//!     .unwrap()
//!     .with_name_cache(Arc::new(NameCache::new()))
//!     .generate(&[unit])
//!     .unwrap();
//!
//! assert_eq!(report.units[0].hint, "PingApi.client");
//! assert!(report.units[0].code.contains("impl<T: ::restgen::Transport> PingApiClient<T>"));
//! ```

pub mod builder;
pub mod codegen;
pub mod config;
pub mod debug;
pub mod diagnostics;
pub mod errors;
pub mod ir;
pub mod naming;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod resolve;
pub mod scanner;
pub mod source;
pub mod symbols;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_utils;

pub use builder::Builder;
pub use config::GeneratorConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use errors::GeneratorError;
pub use pipeline::{GenerationReport, Generator};
