//! Invariant checks on lowered declarations.
//!
//! The parser already refuses what it cannot lower; validation looks at each
//! method as a whole and removes those whose parts do not fit together:
//!
//! - every placeholder is bound by exactly one route parameter and every
//!   route parameter names a placeholder
//! - at most one body
//! - at most one cancellation token, and it comes last
//! - query keys are unique across all query parameters of the method
//! - a method producing a value has somewhere to report failures
//!
//! A removed method never affects its siblings.

use std::collections::HashSet;

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::ir::{
    ApiClientDefinition, ApiMethodDefinition, Enumeration, ErrorChannel, ParameterBinding,
};

/// Removes the methods of `client` that break an invariant.
///
/// ## Examples
///
/// ```
/// use restgen_gen::ir::{ApiClientDefinition, QualifiedName};
/// use restgen_gen::validation::validate_client;
///
/// let client = ApiClientDefinition {
///     identity: QualifiedName::new(vec![], "Api"),
///     trait_ident: syn::parse_quote!(Api),
///     client_name: syn::parse_quote!(ApiClient),
///     visibility: syn::parse_quote!(pub),
///     is_unsafe: false,
///     methods: vec![],
/// };
/// let (client, diagnostics) = validate_client(client);
/// assert!(client.methods.is_empty());
/// assert!(diagnostics.is_empty());
/// ```
pub fn validate_client(mut client: ApiClientDefinition) -> (ApiClientDefinition, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let identity = client.identity.clone();

    client.methods.retain(|method| match validate_method(method) {
        Ok(()) => true,
        Err(kind) => {
            diagnostics.push(Diagnostic::member(&identity, method.name.clone(), kind));
            false
        }
    });

    (client, diagnostics)
}

/// Checks one method.
///
/// ## Errors
///
/// Returns the first invariant the method breaks.
pub fn validate_method(method: &ApiMethodDefinition) -> Result<(), DiagnosticKind> {
    check_route(method)?;
    check_body(method)?;
    check_cancellation(method)?;
    check_query_keys(method)?;
    check_error_channel(method)
}

fn check_route(method: &ApiMethodDefinition) -> Result<(), DiagnosticKind> {
    let placeholders = method.route.placeholders();
    let bound: Vec<&str> = method
        .bindings
        .iter()
        .filter_map(|binding| match binding {
            ParameterBinding::Route { placeholder, .. } => Some(placeholder.as_str()),
            _ => None,
        })
        .collect();

    if let Some(unbound) = placeholders.iter().find(|p| !bound.contains(*p)) {
        return Err(DiagnosticKind::UnboundPlaceholder {
            placeholder: unbound.to_string(),
        });
    }

    let mut seen = HashSet::new();
    for binding in &method.bindings {
        if let ParameterBinding::Route { placeholder, .. } = binding
            && (!placeholders.contains(&placeholder.as_str()) || !seen.insert(placeholder))
        {
            return Err(DiagnosticKind::UnusedRouteParameter {
                parameter: binding.name(),
            });
        }
    }
    Ok(())
}

fn check_body(method: &ApiMethodDefinition) -> Result<(), DiagnosticKind> {
    let bodies: Vec<String> = method
        .bindings
        .iter()
        .filter(|b| matches!(b, ParameterBinding::Body { .. }))
        .map(ParameterBinding::name)
        .collect();
    match bodies.as_slice() {
        [first, second, ..] => Err(DiagnosticKind::DuplicateBody {
            first: first.clone(),
            second: second.clone(),
        }),
        _ => Ok(()),
    }
}

fn check_cancellation(method: &ApiMethodDefinition) -> Result<(), DiagnosticKind> {
    let positions: Vec<usize> = method
        .bindings
        .iter()
        .enumerate()
        .filter(|(_, b)| matches!(b, ParameterBinding::Cancellation { .. }))
        .map(|(index, _)| index)
        .collect();
    match positions.as_slice() {
        [] => Ok(()),
        [index] if *index + 1 == method.bindings.len() => Ok(()),
        [index] => Err(DiagnosticKind::CancellationNotTrailing {
            parameter: method.bindings[*index].name(),
        }),
        _ => Err(DiagnosticKind::DuplicateCancellation),
    }
}

fn check_query_keys(method: &ApiMethodDefinition) -> Result<(), DiagnosticKind> {
    let mut seen = HashSet::new();
    for binding in &method.bindings {
        if let ParameterBinding::Query { keys, .. } = binding {
            for key in keys {
                if !seen.insert(key.key.as_str()) {
                    return Err(DiagnosticKind::DuplicateQueryKey {
                        key: key.key.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

fn check_error_channel(method: &ApiMethodDefinition) -> Result<(), DiagnosticKind> {
    if method.returns.descriptor.value().is_some() && method.returns.error == ErrorChannel::None {
        return Err(DiagnosticKind::MissingErrorChannel);
    }
    Ok(())
}

/// Checks that every alias of `enumeration` is non-empty and unique.
///
/// ## Errors
///
/// Returns one diagnostic per offending variant.
pub fn validate_enumeration(enumeration: &Enumeration) -> Result<(), Vec<Diagnostic>> {
    let mut seen = HashSet::new();
    let mut diagnostics = Vec::new();

    for member in &enumeration.members {
        let variant = member.ident.to_string();
        let kind = if member.alias.is_empty() {
            DiagnosticKind::InvalidAlias {
                variant: variant.clone(),
            }
        } else if !seen.insert(member.alias.as_str()) {
            DiagnosticKind::DuplicateAlias {
                alias: member.alias.clone(),
            }
        } else {
            continue;
        };
        diagnostics.push(Diagnostic::member(&enumeration.identity, variant, kind));
    }

    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(diagnostics)
    }
}
