//! HTTP verbs an endpoint method can be bound to.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// HTTP verbs supported by endpoint declarations.
///
/// The set is closed: every endpoint method carries exactly one verb
/// marker, and each marker maps to exactly one of these variants.
///
/// ## Examples
///
/// Parse from string:
///
/// ```
/// use std::str::FromStr;
/// use restgen_define::Verb;
///
/// let verb = Verb::from_str("GET").unwrap();
/// assert_eq!(verb, Verb::Get);
/// ```
///
/// Display as uppercase:
///
/// ```
/// use restgen_define::Verb;
///
/// assert_eq!(Verb::Delete.to_string(), "DELETE");
/// ```
///
/// Iterate over all verbs:
///
/// ```
/// use restgen_define::Verb;
/// use strum::IntoEnumIterator;
///
/// assert_eq!(Verb::iter().count(), 4);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Verb {
    /// HTTP GET - Retrieve a resource
    Get,
    /// HTTP POST - Create a new resource
    Post,
    /// HTTP PUT - Replace a resource entirely
    Put,
    /// HTTP DELETE - Remove a resource
    Delete,
}

impl Verb {
    /// Returns the uppercase method name as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }

    /// Returns the variant identifier (`Get`, `Post`, ...) used in generated code.
    pub fn ident(&self) -> &'static str {
        match self {
            Verb::Get => "Get",
            Verb::Post => "Post",
            Verb::Put => "Put",
            Verb::Delete => "Delete",
        }
    }
}
