//! The intermediate representation of parsed declarations.
//!
//! Everything here is built once by the parser, filtered by the validator
//! and read by the emitter. Nothing is mutated after construction.

use std::fmt;

use restgen_define::Verb;
use serde::{Serialize, Serializer};
use syn::ext::IdentExt;
use syn::{Ident, Signature, Type};

/// A crate-relative item identity: module path plus item name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    /// Module path segments, outermost first.
    pub module: Vec<String>,
    /// Item name.
    pub name: String,
}

impl QualifiedName {
    /// Creates a qualified name.
    pub fn new(module: Vec<String>, name: impl Into<String>) -> Self {
        Self {
            module,
            name: name.into(),
        }
    }

    /// Returns the dotted hint prefix (`a.b.Name`).
    pub fn dotted(&self) -> String {
        self.module
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.module {
            write!(f, "{segment}::")?;
        }
        f.write_str(&self.name)
    }
}

impl Serialize for QualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One piece of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSegment {
    /// Text copied into the path as written.
    Literal(String),
    /// A `{name}` token replaced by a route parameter.
    Placeholder(String),
}

/// A parsed route template such as `/repos/{owner}/{repo}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    /// The template as written.
    pub raw: String,
    /// Literal and placeholder segments in order.
    pub segments: Vec<RouteSegment>,
}

impl RouteTemplate {
    /// Returns each distinct placeholder name in first-occurrence order.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let RouteSegment::Placeholder(name) = segment
                && !names.contains(&name.as_str())
            {
                names.push(name);
            }
        }
        names
    }
}

/// How a query key reads its value from the parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryAccess {
    /// The parameter itself.
    Direct,
    /// A field of a composite parameter.
    Field(Ident),
    /// A field of an `Option` composite; absent when the parameter is `None`.
    OptionalField(Ident),
}

/// One key written to the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryKey {
    /// The key as written to the query string.
    pub key: String,
    /// Where the value comes from.
    pub access: QueryAccess,
}

/// The role a method parameter plays in the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterBinding {
    /// Substituted into the route template.
    Route { ident: Ident, placeholder: String },
    /// Written to the query string, one key per scalar or per public field.
    Query {
        ident: Ident,
        keys: Vec<QueryKey>,
        composite: bool,
    },
    /// Encoded as the request payload.
    Body { ident: Ident },
    /// Cancels the request when triggered.
    Cancellation { ident: Ident, optional: bool },
}

impl ParameterBinding {
    /// Returns the parameter identifier.
    pub fn ident(&self) -> &Ident {
        match self {
            ParameterBinding::Route { ident, .. }
            | ParameterBinding::Query { ident, .. }
            | ParameterBinding::Body { ident }
            | ParameterBinding::Cancellation { ident, .. } => ident,
        }
    }

    /// Returns the parameter name without any `r#` prefix.
    pub fn name(&self) -> String {
        self.ident().unraw().to_string()
    }
}

/// What a method produces once the request completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnTypeDescriptor {
    /// A blocking call without a response value.
    Void,
    /// A blocking call decoding the response into the type.
    SyncWithResult(Box<Type>),
    /// An asynchronous call without a response value.
    AsyncVoid,
    /// An asynchronous call decoding the response into the type.
    AsyncWithResult(Box<Type>),
}

impl ReturnTypeDescriptor {
    /// Returns the decoded response type, if the method produces one.
    pub fn value(&self) -> Option<&Type> {
        match self {
            ReturnTypeDescriptor::SyncWithResult(ty)
            | ReturnTypeDescriptor::AsyncWithResult(ty) => Some(ty),
            ReturnTypeDescriptor::Void | ReturnTypeDescriptor::AsyncVoid => None,
        }
    }

    /// Returns `true` for the asynchronous descriptors.
    pub fn is_async(&self) -> bool {
        matches!(
            self,
            ReturnTypeDescriptor::AsyncVoid | ReturnTypeDescriptor::AsyncWithResult(_)
        )
    }
}

/// How the method body reaches its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapper {
    /// A plain `fn`; the request is driven by `block_on`.
    Blocking,
    /// An `async fn`.
    AsyncFn,
    /// `-> Task<'_, T>`, a boxed future.
    Task,
    /// `-> impl Future<Output = ..>`.
    ImplFuture,
}

/// Where request failures go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorChannel {
    /// Nowhere: failures are logged.
    None,
    /// `Result<_, E>` with `E: From<ClientError>`.
    Result(Box<Type>),
    /// The wrapper already carries `ClientError`.
    Builtin,
}

/// The classified return type of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnShape {
    pub descriptor: ReturnTypeDescriptor,
    pub wrapper: Wrapper,
    pub error: ErrorChannel,
}

/// One endpoint method.
#[derive(Debug, Clone)]
pub struct ApiMethodDefinition {
    /// Method name.
    pub name: String,
    /// HTTP verb.
    pub verb: Verb,
    /// Route template.
    pub route: RouteTemplate,
    /// Parameters in declaration order.
    pub bindings: Vec<ParameterBinding>,
    /// Classified return type.
    pub returns: ReturnShape,
    /// Declared signature with marker attributes removed.
    pub signature: Signature,
}

/// An endpoint group and the client to generate for it.
#[derive(Debug, Clone)]
pub struct ApiClientDefinition {
    /// Identity of the declaring trait.
    pub identity: QualifiedName,
    /// Trait identifier as written.
    pub trait_ident: Ident,
    /// Name of the generated client struct.
    pub client_name: Ident,
    /// Visibility copied from the trait.
    pub visibility: syn::Visibility,
    /// `unsafe trait` requires `unsafe impl`.
    pub is_unsafe: bool,
    /// Methods in declaration order.
    pub methods: Vec<ApiMethodDefinition>,
}

/// One variant of an aliased enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationMember {
    /// Variant identifier.
    pub ident: Ident,
    /// Wire name; the variant name when no alias is given.
    pub alias: String,
}

/// An enumeration to generate a serializer for.
#[derive(Debug, Clone)]
pub struct Enumeration {
    /// Identity of the enum.
    pub identity: QualifiedName,
    /// Enum identifier as written.
    pub ident: Ident,
    /// Variants in declaration order.
    pub members: Vec<EnumerationMember>,
}
