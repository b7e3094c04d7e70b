//! Per-declaration diagnostics.
//!
//! A diagnostic never stops the run: the offending method, declaration or
//! enumeration is left out and everything else is generated.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::ir::QualifiedName;

/// What went wrong with a declaration or one of its members.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    #[error("trait carries #[api_client] more than once")]
    DuplicateClientMarker,

    #[error("generic traits are not supported")]
    GenericDeclaration,

    #[error("trait item `{item}` cannot be implemented by a generated client")]
    UnsupportedTraitItem { item: String },

    #[error("client name `{name}` is already generated in this module by `{owner}`")]
    ClientNameCollision { name: String, owner: String },

    #[error("invalid #[api_client] arguments: {message}")]
    InvalidClientArguments { message: String },

    #[error("method has no verb marker (#[get], #[post], #[put] or #[delete])")]
    MissingVerb,

    #[error("method has more than one verb marker: {verbs}")]
    DuplicateVerb { verbs: String },

    #[error("`{path}` is not a restgen marker")]
    ForeignMarker { path: String },

    #[error("route of #[{marker}] must be a single string literal")]
    InvalidRouteArgument { marker: String },

    #[error("malformed route template `{route}`: {reason}")]
    MalformedRoute { route: String, reason: String },

    #[error("method needs a `self` receiver")]
    MissingReceiver,

    #[error("parameter `{parameter}` must be a plain identifier")]
    UnsupportedParameter { parameter: String },

    #[error("placeholder `{{{placeholder}}}` has no matching parameter")]
    UnboundPlaceholder { placeholder: String },

    #[error("route parameter `{parameter}` has no matching placeholder")]
    UnusedRouteParameter { parameter: String },

    #[error("more than one #[body] parameter (`{first}` and `{second}`)")]
    DuplicateBody { first: String, second: String },

    #[error("parameter `{parameter}` names a route placeholder and is marked #[body]")]
    ConflictingRoles { parameter: String },

    #[error("more than one cancellation parameter")]
    DuplicateCancellation,

    #[error("cancellation parameter `{parameter}` must be the last parameter")]
    CancellationNotTrailing { parameter: String },

    #[error("query key `{key}` is produced more than once")]
    DuplicateQueryKey { key: String },

    #[error("unsupported return type: {reason}")]
    IllDefinedReturn { reason: String },

    #[error("method returns a value but has no error channel; return `Result<_, E>` or `Task`")]
    MissingErrorChannel,

    #[error("variant `{variant}` carries data; only unit variants can be aliased")]
    NonUnitVariant { variant: String },

    #[error("variant `{variant}` has an empty or malformed alias")]
    InvalidAlias { variant: String },

    #[error("alias `{alias}` is used by more than one variant")]
    DuplicateAlias { alias: String },
}

/// A diagnostic attached to a declaration and, optionally, one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The declaration the diagnostic belongs to.
    pub subject: QualifiedName,
    /// The method or variant, when the problem is local to it.
    pub member: Option<String>,
    /// What went wrong.
    #[serde(flatten)]
    pub kind: DiagnosticKind,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// A diagnostic about a whole declaration.
    pub fn declaration(subject: &QualifiedName, kind: DiagnosticKind) -> Self {
        Self::build(subject, None, kind)
    }

    /// A diagnostic about one member of a declaration.
    pub fn member(subject: &QualifiedName, member: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self::build(subject, Some(member.into()), kind)
    }

    fn build(subject: &QualifiedName, member: Option<String>, kind: DiagnosticKind) -> Self {
        Self {
            subject: subject.clone(),
            member,
            message: kind.to_string(),
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.member {
            Some(member) => write!(f, "{}::{}: {}", self.subject, member, self.kind),
            None => write!(f, "{}: {}", self.subject, self.kind),
        }
    }
}
