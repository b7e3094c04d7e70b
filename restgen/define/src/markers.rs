//! Attribute markers recognized on declarations.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::identity::is_vocabulary_module;
use crate::verb::Verb;

/// A marker attribute that may appear on a declaration.
///
/// Markers are identified by their fully qualified path, never by their
/// short name alone: `#[get]` only counts when it resolves to one of the
/// vocabulary crates (see [`Marker::from_qualified`]).
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use restgen_define::{Marker, MarkerTarget};
///
/// let marker = Marker::from_str("api_client").unwrap();
/// assert_eq!(marker.target(), MarkerTarget::Declaration);
/// assert_eq!(marker.to_string(), "api_client");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Marker {
    /// Marks a trait as an endpoint group to generate a client for.
    ApiClient,
    /// Binds a method to `GET` and a route template.
    Get,
    /// Binds a method to `POST` and a route template.
    Post,
    /// Binds a method to `PUT` and a route template.
    Put,
    /// Binds a method to `DELETE` and a route template.
    Delete,
    /// Marks the parameter that becomes the request payload.
    Body,
    /// Renames a struct field (query key) or an enum variant (wire name).
    Alias,
    /// Marks an enum to receive an alias-aware serializer.
    GenerateSerializer,
}

/// The kind of item a marker may be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum MarkerTarget {
    /// A trait declaring an endpoint group.
    Declaration,
    /// A method inside an endpoint group.
    Method,
    /// A method parameter.
    Parameter,
    /// A struct field or enum variant.
    Member,
    /// An enum declaration.
    Enumeration,
}

impl Marker {
    /// Returns the attribute name as written in source (`api_client`, `get`, ...).
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Returns the kind of item this marker applies to.
    pub fn target(&self) -> MarkerTarget {
        match self {
            Marker::ApiClient => MarkerTarget::Declaration,
            Marker::Get | Marker::Post | Marker::Put | Marker::Delete => MarkerTarget::Method,
            Marker::Body => MarkerTarget::Parameter,
            Marker::Alias => MarkerTarget::Member,
            Marker::GenerateSerializer => MarkerTarget::Enumeration,
        }
    }

    /// Returns the verb bound by this marker, if it is a verb marker.
    pub fn verb(&self) -> Option<Verb> {
        match self {
            Marker::Get => Some(Verb::Get),
            Marker::Post => Some(Verb::Post),
            Marker::Put => Some(Verb::Put),
            Marker::Delete => Some(Verb::Delete),
            _ => None,
        }
    }

    /// Returns `true` for markers consumed by an enclosing host marker.
    ///
    /// Helpers (`get`, `body`, `alias`, ...) are stripped by `api_client`,
    /// `generate_serializer` or `derive(QueryParams)` before the compiler
    /// ever resolves them, so inside a confirmed host they may appear
    /// unimported.
    pub fn is_helper(&self) -> bool {
        !matches!(self, Marker::ApiClient | Marker::GenerateSerializer)
    }

    /// Returns the marker named by a fully qualified path.
    ///
    /// The path must point into a vocabulary module: `restgen::get`,
    /// `restgen::prelude::get` or `restgen_macros::get`.
    pub fn from_qualified<S: AsRef<str>>(path: &[S]) -> Option<Self> {
        let (name, module) = path.split_last()?;
        if !is_vocabulary_module(module) {
            return None;
        }
        name.as_ref().parse().ok()
    }

    /// Returns the marker for a short name, without any identity check.
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn names_round_trip() {
        for marker in Marker::iter() {
            assert_eq!(Marker::from_name(marker.name()), Some(marker));
        }
    }

    #[test]
    fn qualified_lookup_accepts_vocabulary_modules() {
        assert_eq!(
            Marker::from_qualified(&["restgen", "api_client"]),
            Some(Marker::ApiClient)
        );
        assert_eq!(
            Marker::from_qualified(&["restgen", "prelude", "body"]),
            Some(Marker::Body)
        );
        assert_eq!(
            Marker::from_qualified(&["restgen_macros", "generate_serializer"]),
            Some(Marker::GenerateSerializer)
        );
    }

    #[test]
    fn qualified_lookup_rejects_foreign_crates() {
        assert_eq!(Marker::from_qualified(&["actix_web", "get"]), None);
        assert_eq!(Marker::from_qualified(&["get"]), None);
        assert_eq!(Marker::from_qualified::<&str>(&[]), None);
    }

    #[test]
    fn only_verb_markers_carry_a_verb() {
        let verbs: Vec<_> = Marker::iter().filter_map(|m| m.verb()).collect();
        assert_eq!(verbs, vec![Verb::Get, Verb::Post, Verb::Put, Verb::Delete]);
    }

    #[test]
    fn hosts_are_not_helpers() {
        assert!(!Marker::ApiClient.is_helper());
        assert!(!Marker::GenerateSerializer.is_helper());
        assert!(Marker::Alias.is_helper());
        assert!(Marker::Get.is_helper());
    }
}
