//! Lowering confirmed declarations into the IR.
//!
//! Each declaration is parsed on its own from the candidate's source text;
//! nothing here touches shared state, so declarations can be lowered on any
//! thread in any order. A method that cannot be lowered is left out with a
//! [`Diagnostic`]; only declaration-level problems (generic traits, items a
//! client cannot implement, bad `#[api_client]` arguments) reject the whole
//! declaration.

pub mod enumeration;
pub mod returns;
pub mod route;

use proc_macro2::{Ident, Span};
use quote::{ToTokens, format_ident};
use restgen_define::{Marker, Verb, WellKnownType};
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{
    Attribute, Expr, ExprLit, FnArg, ItemTrait, Lit, LitStr, Meta, MetaNameValue, Pat, PatIdent,
    Path, Token, TraitItem, TraitItemFn, Type, TypePath,
};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::errors::GeneratorError;
use crate::ir::{
    ApiClientDefinition, ApiMethodDefinition, ParameterBinding, QueryAccess, QueryKey,
    RouteTemplate,
};
use crate::resolve::ImportScope;
use crate::scanner::Candidate;
use crate::symbols::{StructSymbol, SymbolTable};

pub use enumeration::parse_enumeration;

/// A lowered declaration, or `None` when the whole declaration was rejected,
/// plus everything that was left out along the way.
#[derive(Debug)]
pub struct Parsed<T> {
    pub definition: Option<T>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Parsed<T> {
    fn rejected(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            definition: None,
            diagnostics,
        }
    }
}

/// What an attribute on a nested item turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Helper {
    /// A vocabulary helper marker.
    Marker(Marker),
    /// A helper-named attribute imported from somewhere else.
    Foreign { marker: Marker, path: String },
    /// Anything else (`doc`, `serde`, ...).
    Unrelated,
}

/// Classifies an attribute found inside a confirmed host.
///
/// Helpers resolve through the module's imports like any other path. A bare
/// helper name that nothing imports is still the helper: the host strips it
/// before the compiler ever resolves it.
pub(crate) fn helper(scope: &ImportScope, attr: &Attribute) -> Helper {
    let path = attr.path();
    match scope.resolve(path) {
        Some(resolved) => {
            if let Some(marker) = Marker::from_qualified(resolved.as_slice()) {
                return if marker.is_helper() {
                    Helper::Marker(marker)
                } else {
                    Helper::Unrelated
                };
            }
            match resolved.last().and_then(|name| Marker::from_name(name)) {
                Some(marker) if marker.is_helper() => Helper::Foreign {
                    marker,
                    path: resolved.join("::"),
                },
                _ => Helper::Unrelated,
            }
        }
        None => match path.get_ident().and_then(|i| Marker::from_name(&i.to_string())) {
            Some(marker) if marker.is_helper() => Helper::Marker(marker),
            _ => Helper::Unrelated,
        },
    }
}

/// Builds an identifier from its written form, keeping a raw prefix.
pub(crate) fn ident(written: &str) -> Ident {
    match written.strip_prefix("r#") {
        Some(raw) => Ident::new_raw(raw, Span::call_site()),
        None => Ident::new(written, Span::call_site()),
    }
}

/// Lowers an `#[api_client]` trait.
///
/// ## Errors
///
/// Returns an error only if the candidate's own source text fails to parse,
/// which means the scanner handed over something that is not a trait.
pub fn parse_client(
    candidate: &Candidate,
    symbols: &SymbolTable,
    config: &GeneratorConfig,
) -> Result<Parsed<ApiClientDefinition>, GeneratorError> {
    let item: ItemTrait =
        syn::parse_str(&candidate.source).map_err(|e| GeneratorError::ParseError {
            path: candidate.identity.to_string(),
            message: e.to_string(),
        })?;
    let identity = &candidate.identity;
    let scope = candidate.scope.as_ref();

    if !item.generics.params.is_empty() || item.generics.where_clause.is_some() {
        return Ok(Parsed::rejected(vec![Diagnostic::declaration(
            identity,
            DiagnosticKind::GenericDeclaration,
        )]));
    }

    let client_name = match client_name_argument(&item, scope) {
        Ok(Some(name)) => ident(&name),
        Ok(None) => format_ident!("{}{}", item.ident.unraw(), config.client_suffix),
        Err(message) => {
            return Ok(Parsed::rejected(vec![Diagnostic::declaration(
                identity,
                DiagnosticKind::InvalidClientArguments { message },
            )]));
        }
    };

    let unsupported: Vec<Diagnostic> = item
        .items
        .iter()
        .filter_map(|trait_item| match trait_item {
            TraitItem::Fn(_) => None,
            TraitItem::Const(c) => Some(c.ident.to_string()),
            TraitItem::Type(t) => Some(t.ident.to_string()),
            other => Some(other.to_token_stream().to_string()),
        })
        .map(|item| {
            Diagnostic::declaration(identity, DiagnosticKind::UnsupportedTraitItem { item })
        })
        .collect();
    if !unsupported.is_empty() {
        return Ok(Parsed::rejected(unsupported));
    }

    let mut methods = Vec::new();
    let mut diagnostics = Vec::new();
    for trait_item in &item.items {
        let TraitItem::Fn(method) = trait_item else {
            continue;
        };
        let name = method.sig.ident.unraw().to_string();
        if method.default.is_some() {
            debug!(%identity, method = %name, "skipping method with a default body");
            continue;
        }
        match parse_method(method, scope, symbols) {
            Ok(definition) => methods.push(definition),
            Err(kind) => diagnostics.push(Diagnostic::member(identity, name, kind)),
        }
    }

    Ok(Parsed {
        definition: Some(ApiClientDefinition {
            identity: identity.clone(),
            trait_ident: item.ident.clone(),
            client_name,
            visibility: item.vis.clone(),
            is_unsafe: item.unsafety.is_some(),
            methods,
        }),
        diagnostics,
    })
}

/// Reads `name = ".."` from the declaration's `#[api_client(..)]`.
fn client_name_argument(item: &ItemTrait, scope: &ImportScope) -> Result<Option<String>, String> {
    let Some(attr) = item.attrs.iter().find(|attr| {
        scope
            .resolve(attr.path())
            .and_then(|path| Marker::from_qualified(path.as_slice()))
            == Some(Marker::ApiClient)
    }) else {
        return Ok(None);
    };

    let list = match &attr.meta {
        Meta::Path(_) => return Ok(None),
        Meta::List(list) => list,
        Meta::NameValue(_) => {
            return Err("expected `#[api_client]` or `#[api_client(name = \"..\")]`".into());
        }
    };

    let pairs = list
        .parse_args_with(Punctuated::<MetaNameValue, Token![,]>::parse_terminated)
        .map_err(|e| e.to_string())?;

    let mut name = None;
    for pair in pairs {
        if !pair.path.is_ident("name") {
            return Err(format!(
                "unknown argument `{}`, expected `name`",
                pair.path.to_token_stream()
            ));
        }
        let Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) = &pair.value
        else {
            return Err("`name` must be a string literal".into());
        };
        let value = value.value();
        if syn::parse_str::<Ident>(&value).is_err() {
            return Err(format!("`{value}` is not a valid client name"));
        }
        name = Some(value);
    }
    Ok(name)
}

/// Lowers one endpoint method.
fn parse_method(
    method: &TraitItemFn,
    scope: &ImportScope,
    symbols: &SymbolTable,
) -> Result<ApiMethodDefinition, DiagnosticKind> {
    let (verb, route) = verb_and_route(&method.attrs, scope)?;

    if method.sig.receiver().is_none() {
        return Err(DiagnosticKind::MissingReceiver);
    }

    let bindings = parse_parameters(method, &route, scope, symbols)?;
    let returns = returns::classify(&method.sig, scope)
        .map_err(|reason| DiagnosticKind::IllDefinedReturn { reason })?;

    let mut signature = method.sig.clone();
    for input in signature.inputs.iter_mut() {
        if let FnArg::Typed(arg) = input {
            arg.attrs
                .retain(|attr| !matches!(helper(scope, attr), Helper::Marker(Marker::Body)));
        }
    }

    Ok(ApiMethodDefinition {
        name: method.sig.ident.unraw().to_string(),
        verb,
        route,
        bindings,
        returns,
        signature,
    })
}

/// Finds the single verb marker and parses its route template.
fn verb_and_route(
    attrs: &[Attribute],
    scope: &ImportScope,
) -> Result<(Verb, RouteTemplate), DiagnosticKind> {
    let mut found: Vec<(Marker, Verb, &Attribute)> = Vec::new();
    let mut foreign = None;

    for attr in attrs {
        match helper(scope, attr) {
            Helper::Marker(marker) => {
                if let Some(verb) = marker.verb() {
                    found.push((marker, verb, attr));
                }
            }
            Helper::Foreign { marker, path } if marker.verb().is_some() => {
                foreign.get_or_insert(path);
            }
            _ => {}
        }
    }

    let (marker, verb, attr) = match found.as_slice() {
        [] => {
            return Err(match foreign {
                Some(path) => DiagnosticKind::ForeignMarker { path },
                None => DiagnosticKind::MissingVerb,
            });
        }
        [single] => *single,
        many => {
            let verbs = many
                .iter()
                .map(|(_, verb, _)| verb.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(DiagnosticKind::DuplicateVerb { verbs });
        }
    };

    let raw = attr
        .parse_args::<LitStr>()
        .map_err(|_| DiagnosticKind::InvalidRouteArgument {
            marker: marker.name().to_string(),
        })?
        .value();
    let route = route::parse_route(&raw)
        .map_err(|reason| DiagnosticKind::MalformedRoute { route: raw, reason })?;

    Ok((verb, route))
}

/// Partitions the typed parameters into bindings.
///
/// Order of precedence: a placeholder name makes a route parameter, then
/// `#[body]`, then a cancellation token type; everything else is query.
/// A placeholder name carrying `#[body]` is rejected.
fn parse_parameters(
    method: &TraitItemFn,
    route: &RouteTemplate,
    scope: &ImportScope,
    symbols: &SymbolTable,
) -> Result<Vec<ParameterBinding>, DiagnosticKind> {
    let placeholders = route.placeholders();
    let mut bindings = Vec::new();
    let mut body: Option<String> = None;

    for input in &method.sig.inputs {
        let FnArg::Typed(arg) = input else {
            continue;
        };
        let Pat::Ident(PatIdent {
            ident,
            by_ref: None,
            subpat: None,
            ..
        }) = arg.pat.as_ref()
        else {
            return Err(DiagnosticKind::UnsupportedParameter {
                parameter: arg.pat.to_token_stream().to_string(),
            });
        };
        let name = ident.unraw().to_string();

        let is_body = arg
            .attrs
            .iter()
            .any(|attr| helper(scope, attr) == Helper::Marker(Marker::Body));

        let binding = if placeholders.contains(&name.as_str()) {
            if is_body {
                return Err(DiagnosticKind::ConflictingRoles { parameter: name });
            }
            ParameterBinding::Route {
                ident: ident.clone(),
                placeholder: name,
            }
        } else if is_body {
            if let Some(first) = body {
                return Err(DiagnosticKind::DuplicateBody {
                    first,
                    second: name,
                });
            }
            body = Some(name);
            ParameterBinding::Body {
                ident: ident.clone(),
            }
        } else if let Some(optional) = cancellation_type(&arg.ty, scope) {
            ParameterBinding::Cancellation {
                ident: ident.clone(),
                optional,
            }
        } else {
            query_binding(ident, name, &arg.ty, scope, symbols)
        };
        bindings.push(binding);
    }

    Ok(bindings)
}

fn query_binding(
    ident: &Ident,
    name: String,
    ty: &Type,
    scope: &ImportScope,
    symbols: &SymbolTable,
) -> ParameterBinding {
    let composite = match strip_references(ty) {
        Type::Path(TypePath { qself: None, path }) => match option_argument(path) {
            Some(inner) => composite_symbol(inner, scope, symbols).map(|symbol| (symbol, true)),
            None => composite_symbol(ty, scope, symbols).map(|symbol| (symbol, false)),
        },
        _ => None,
    };

    match composite {
        Some((symbol, optional)) => ParameterBinding::Query {
            ident: ident.clone(),
            keys: symbol
                .fields
                .iter()
                .map(|field| {
                    let member = self::ident(&field.field);
                    QueryKey {
                        key: field.key.clone(),
                        access: if optional {
                            QueryAccess::OptionalField(member)
                        } else {
                            QueryAccess::Field(member)
                        },
                    }
                })
                .collect(),
            composite: true,
        },
        None => ParameterBinding::Query {
            ident: ident.clone(),
            keys: vec![QueryKey {
                key: name,
                access: QueryAccess::Direct,
            }],
            composite: false,
        },
    }
}

/// Looks up `ty`, behind references, as a named-field struct.
fn composite_symbol<'a>(
    ty: &Type,
    scope: &ImportScope,
    symbols: &'a SymbolTable,
) -> Option<&'a StructSymbol> {
    match strip_references(ty) {
        Type::Path(TypePath { qself: None, path }) => symbols.find(&scope.type_candidates(path)),
        _ => None,
    }
}

/// Returns `Some(optional)` if `ty` is a cancellation token, by value or
/// reference, optionally inside `Option`.
fn cancellation_type(ty: &Type, scope: &ImportScope) -> Option<bool> {
    let ty = strip_references(ty);
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return None;
    };
    if let Some(inner) = option_argument(path) {
        return is_cancellation_token(strip_references(inner), scope).then_some(true);
    }
    is_cancellation_token(ty, scope).then_some(false)
}

fn is_cancellation_token(ty: &Type, scope: &ImportScope) -> bool {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return false;
    };
    scope
        .resolve(path)
        .and_then(|resolved| WellKnownType::from_qualified(resolved.as_slice()))
        == Some(WellKnownType::CancellationToken)
}

/// Returns `T` for `Option<T>` (bare or through `std`/`core`).
fn option_argument(path: &Path) -> Option<&Type> {
    let names: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
    let is_option = match names.as_slice() {
        [name] => name == "Option",
        [root, module, name] => {
            (root == "std" || root == "core") && module == "option" && name == "Option"
        }
        _ => false,
    };
    if !is_option {
        return None;
    }
    let syn::PathArguments::AngleBracketed(arguments) = &path.segments.last()?.arguments else {
        return None;
    };
    match arguments.args.first()? {
        syn::GenericArgument::Type(inner) if arguments.args.len() == 1 => Some(inner),
        _ => None,
    }
}

fn strip_references(ty: &Type) -> &Type {
    match ty {
        Type::Reference(reference) => strip_references(&reference.elem),
        Type::Group(group) => strip_references(&group.elem),
        Type::Paren(paren) => strip_references(&paren.elem),
        _ => ty,
    }
}
