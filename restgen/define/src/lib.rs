//! Restgen Vocabulary
//!
//! This crate is the single source of truth for the markers that restgen
//! declarations may carry and for the handful of well-known types the
//! generator recognizes without any marker at all.
//!
//! ## Core Types
//!
//! - [`Verb`] - HTTP verbs an endpoint may be bound to (GET, POST, PUT, DELETE)
//! - [`Marker`] - Attribute markers (`api_client`, `get`, `body`, `alias`, ...)
//! - [`MarkerTarget`] - The kind of declaration a marker may be attached to
//! - [`WellKnownType`] - Types recognized by identity (`Task`, `CancellationToken`)
//! - [`ValuePolicy`] / [`QueryPolicy`] - When query values are written or omitted
//!
//! The vocabulary is pure data. Both the attribute macros in `restgen-macros`
//! and the resolver in `restgen-gen` consume it, so a marker renamed here is
//! renamed everywhere.
//!
//! ## Examples
//!
//! ```
//! use restgen_define::{Marker, Verb};
//!
//! let marker = Marker::from_qualified(&["restgen", "get"]).unwrap();
//! assert_eq!(marker, Marker::Get);
//! assert_eq!(marker.verb(), Some(Verb::Get));
//!
//! // Same short name, unrelated crate
//! assert!(Marker::from_qualified(&["warp", "get"]).is_none());
//! ```

pub mod identity;
pub mod markers;
pub mod policy;
pub mod prelude;
pub mod verb;

pub use identity::{VOCABULARY_CRATES, WellKnownType, glob_provides, is_vocabulary_module};
pub use markers::{Marker, MarkerTarget};
pub use policy::{QueryPolicy, ValuePolicy};
pub use verb::Verb;
