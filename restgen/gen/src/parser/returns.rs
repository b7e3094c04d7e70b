//! Return type classification.
//!
//! | Declared                         | Descriptor              | Error channel |
//! |----------------------------------|-------------------------|---------------|
//! | nothing, `()`                    | `Void`                  | none          |
//! | `Result<(), E>`                  | `Void`                  | `E`           |
//! | `Result<T, E>`                   | `SyncWithResult(T)`     | `E`           |
//! | `T`                              | `SyncWithResult(T)`     | none          |
//! | `async fn`, `impl Future<Output = O>` | as above on `O`, async | as above  |
//! | `Task<'a>`, `Task<'a, ()>`       | `AsyncVoid`             | built in      |
//! | `Task<'a, T>`                    | `AsyncWithResult(T)`    | built in      |

use restgen_define::WellKnownType;
use syn::{
    GenericArgument, PathArguments, ReturnType, Signature, Type, TypeParamBound, TypePath,
};

use crate::ir::{ErrorChannel, ReturnShape, ReturnTypeDescriptor, Wrapper};
use crate::resolve::ImportScope;

/// Classifies the return type of `sig`.
///
/// ## Errors
///
/// Returns the reason when the shape is ill-defined: a `Task` with more
/// than one type argument, a single-argument `Result` alias, an
/// `impl Trait` that is not a future, or an `async fn` returning a `Task`.
pub fn classify(sig: &Signature, scope: &ImportScope) -> Result<ReturnShape, String> {
    let declared = match &sig.output {
        ReturnType::Default => None,
        ReturnType::Type(_, ty) => Some(peel_group(ty)),
    };

    if sig.asyncness.is_some() {
        if declared.is_some_and(|ty| task_arguments(ty, scope).is_some()) {
            return Err("an async fn cannot return a Task".into());
        }
        return asynchronous(declared, Wrapper::AsyncFn);
    }

    let Some(ty) = declared else {
        return Ok(ReturnShape {
            descriptor: ReturnTypeDescriptor::Void,
            wrapper: Wrapper::Blocking,
            error: ErrorChannel::None,
        });
    };

    if let Some(output) = future_output(ty)? {
        return asynchronous(Some(output), Wrapper::ImplFuture);
    }
    if let Some(arguments) = task_arguments(ty, scope) {
        return task(&arguments);
    }
    synchronous(ty)
}

fn synchronous(ty: &Type) -> Result<ReturnShape, String> {
    let (value, error) = peel_result(ty)?;
    let descriptor = match value {
        Some(value) => ReturnTypeDescriptor::SyncWithResult(Box::new(value.clone())),
        None => ReturnTypeDescriptor::Void,
    };
    Ok(ReturnShape {
        descriptor,
        wrapper: Wrapper::Blocking,
        error,
    })
}

fn asynchronous(output: Option<&Type>, wrapper: Wrapper) -> Result<ReturnShape, String> {
    let (value, error) = match output {
        Some(ty) => peel_result(ty)?,
        None => (None, ErrorChannel::None),
    };
    let descriptor = match value {
        Some(value) => ReturnTypeDescriptor::AsyncWithResult(Box::new(value.clone())),
        None => ReturnTypeDescriptor::AsyncVoid,
    };
    Ok(ReturnShape {
        descriptor,
        wrapper,
        error,
    })
}

fn task(arguments: &[&Type]) -> Result<ReturnShape, String> {
    let descriptor = match arguments {
        [] => ReturnTypeDescriptor::AsyncVoid,
        [ty] if is_unit(ty) => ReturnTypeDescriptor::AsyncVoid,
        [ty] => ReturnTypeDescriptor::AsyncWithResult(Box::new((*ty).clone())),
        _ => {
            return Err(format!(
                "Task takes at most one type argument, found {}",
                arguments.len()
            ));
        }
    };
    Ok(ReturnShape {
        descriptor,
        wrapper: Wrapper::Task,
        error: ErrorChannel::Builtin,
    })
}

/// Splits `Result<T, E>` into its value (`None` for unit) and error channel.
fn peel_result(ty: &Type) -> Result<(Option<&Type>, ErrorChannel), String> {
    let ty = peel_group(ty);
    let Some(arguments) = result_arguments(ty) else {
        return Ok(((!is_unit(ty)).then_some(ty), ErrorChannel::None));
    };
    match arguments.as_slice() {
        [value, error] => {
            let value = peel_group(value);
            Ok((
                (!is_unit(value)).then_some(value),
                ErrorChannel::Result(Box::new((*error).clone())),
            ))
        }
        [_] => Err(
            "a single-argument `Result` alias hides the error type; spell out `Result<T, E>`"
                .into(),
        ),
        _ => Err("`Result` needs exactly a value and an error type".into()),
    }
}

/// Returns the type arguments of a `Result` path.
fn result_arguments(ty: &Type) -> Option<Vec<&Type>> {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return None;
    };
    let names: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
    let is_result = match names.as_slice() {
        [last] => last == "Result",
        [.., module, last] => {
            last == "Result" && matches!(module.as_str(), "result" | "io" | "fmt")
        }
        [] => false,
    };
    if !is_result {
        return None;
    }
    path.segments.last().map(|segment| type_arguments(&segment.arguments))
}

/// Returns the type arguments of a `restgen::Task` path.
fn task_arguments<'a>(ty: &'a Type, scope: &ImportScope) -> Option<Vec<&'a Type>> {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return None;
    };
    let resolved = scope.resolve(path)?;
    if WellKnownType::from_qualified(resolved.as_slice()) != Some(WellKnownType::Task) {
        return None;
    }
    path.segments.last().map(|segment| type_arguments(&segment.arguments))
}

/// Returns the `Output` of an `impl Future<Output = O>` return type.
fn future_output(ty: &Type) -> Result<Option<&Type>, String> {
    let Type::ImplTrait(impl_trait) = ty else {
        return Ok(None);
    };
    for bound in &impl_trait.bounds {
        let TypeParamBound::Trait(bound) = bound else {
            continue;
        };
        let Some(segment) = bound.path.segments.last() else {
            continue;
        };
        if segment.ident != "Future" {
            continue;
        }
        if let PathArguments::AngleBracketed(arguments) = &segment.arguments {
            for argument in &arguments.args {
                if let GenericArgument::AssocType(assoc) = argument
                    && assoc.ident == "Output"
                {
                    return Ok(Some(peel_group(&assoc.ty)));
                }
            }
        }
        return Err("`impl Future` must name its `Output` type".into());
    }
    Err("only `impl Future<Output = ..>` is supported as an `impl Trait` return".into())
}

fn type_arguments(arguments: &PathArguments) -> Vec<&Type> {
    match arguments {
        PathArguments::AngleBracketed(arguments) => arguments
            .args
            .iter()
            .filter_map(|argument| match argument {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn peel_group(ty: &Type) -> &Type {
    match ty {
        Type::Group(group) => peel_group(&group.elem),
        Type::Paren(paren) => peel_group(&paren.elem),
        _ => ty,
    }
}

/// Returns `true` for `()`.
pub(crate) fn is_unit(ty: &Type) -> bool {
    matches!(peel_group(ty), Type::Tuple(tuple) if tuple.elems.is_empty())
}
