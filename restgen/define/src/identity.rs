//! Qualified identities of the vocabulary and of well-known types.

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::markers::Marker;

/// Crates that export the marker vocabulary.
pub const VOCABULARY_CRATES: &[&str] = &["restgen", "restgen_macros"];

/// Modules (as path segments) that export the full vocabulary.
const VOCABULARY_MODULES: &[&[&str]] = &[&["restgen"], &["restgen", "prelude"], &["restgen_macros"]];

/// Returns `true` if `module` exports the marker vocabulary.
///
/// ```
/// use restgen_define::is_vocabulary_module;
///
/// assert!(is_vocabulary_module(&["restgen", "prelude"]));
/// assert!(!is_vocabulary_module(&["serde"]));
/// ```
pub fn is_vocabulary_module<S: AsRef<str>>(module: &[S]) -> bool {
    VOCABULARY_MODULES.iter().any(|known| same_path(known, module))
}

/// Types the generator recognizes by identity, without a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum WellKnownType {
    /// The task-like wrapper `restgen::Task<'a, T = ()>`.
    Task,
    /// The cancellation channel `tokio_util::sync::CancellationToken`.
    CancellationToken,
}

impl WellKnownType {
    /// Returns the short type name.
    pub fn name(&self) -> &'static str {
        match self {
            WellKnownType::Task => "Task",
            WellKnownType::CancellationToken => "CancellationToken",
        }
    }

    /// Returns the modules that export this type.
    fn modules(&self) -> &'static [&'static [&'static str]] {
        match self {
            WellKnownType::Task => &[&["restgen"], &["restgen", "prelude"]],
            WellKnownType::CancellationToken => &[
                &["restgen"],
                &["restgen", "prelude"],
                &["tokio_util", "sync"],
            ],
        }
    }

    /// Returns the well-known type named by a fully qualified path.
    ///
    /// ```
    /// use restgen_define::WellKnownType;
    ///
    /// assert_eq!(
    ///     WellKnownType::from_qualified(&["tokio_util", "sync", "CancellationToken"]),
    ///     Some(WellKnownType::CancellationToken)
    /// );
    /// assert_eq!(WellKnownType::from_qualified(&["my_crate", "Task"]), None);
    /// ```
    pub fn from_qualified<S: AsRef<str>>(path: &[S]) -> Option<Self> {
        let (name, module) = path.split_last()?;
        WellKnownType::iter().find(|ty| {
            ty.name() == name.as_ref() && ty.modules().iter().any(|m| same_path(m, module))
        })
    }
}

/// Returns `true` if a glob import of `module` brings `name` into scope.
///
/// Only modules the vocabulary knows about are answered; a glob from any
/// other module is assumed not to provide vocabulary names.
pub fn glob_provides<S: AsRef<str>>(module: &[S], name: &str) -> bool {
    if is_vocabulary_module(module) && Marker::from_name(name).is_some() {
        return true;
    }
    WellKnownType::iter()
        .any(|ty| ty.name() == name && ty.modules().iter().any(|m| same_path(m, module)))
}

fn same_path<S: AsRef<str>>(known: &[&str], path: &[S]) -> bool {
    known.len() == path.len() && known.iter().zip(path).all(|(a, b)| *a == b.as_ref())
}
