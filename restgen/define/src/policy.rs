//! Query value policies.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Decides whether a query value is written to the query string.
///
/// A value is *null* when it is absent (`None`), and *default* when it
/// equals its type's default (`0`, `false`, `""`, an empty list).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ValuePolicy {
    /// Always write the key; a null value is written as `key=`.
    Always,
    /// Skip null values.
    OmitNull,
    /// Skip null values and values equal to their default.
    #[default]
    OmitNullOrDefault,
}

impl ValuePolicy {
    /// Returns the variant identifier used in generated code.
    pub fn ident(&self) -> &'static str {
        match self {
            ValuePolicy::Always => "Always",
            ValuePolicy::OmitNull => "OmitNull",
            ValuePolicy::OmitNullOrDefault => "OmitNullOrDefault",
        }
    }
}

/// The policies applied to the two kinds of query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryPolicy {
    /// Policy for parameters bound directly as one query key.
    pub scalars: ValuePolicy,
    /// Policy for the fields of a composite query parameter.
    pub composite_fields: ValuePolicy,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self {
            scalars: ValuePolicy::OmitNullOrDefault,
            composite_fields: ValuePolicy::Always,
        }
    }
}
