//! Convenient re-exports for working with the restgen vocabulary.

pub use crate::identity::{VOCABULARY_CRATES, WellKnownType, glob_provides, is_vocabulary_module};
pub use crate::markers::{Marker, MarkerTarget};
pub use crate::policy::{QueryPolicy, ValuePolicy};
pub use crate::verb::Verb;
