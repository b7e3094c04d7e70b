//! Loading Rust source files as compilation units.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::errors::GeneratorError;

/// A parsed source file and the module path it defines.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// Where the file was read from (display only).
    pub path: PathBuf,
    /// Crate-relative module path, e.g. `["api", "github"]`.
    pub module: Vec<String>,
    /// The parsed file.
    pub file: syn::File,
}

impl SourceUnit {
    /// Reads and parses `path`, deriving its module path from `src_root`.
    ///
    /// ## Errors
    ///
    /// Returns an error if the file cannot be read or is not valid Rust.
    pub fn load(path: &Path, src_root: Option<&Path>) -> Result<Self, GeneratorError> {
        let text = fs::read_to_string(path).map_err(|e| GeneratorError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        let module = module_path_for(path, src_root);
        Self::parse(path, module, &text)
    }

    /// Parses source text that lives at `module`.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::ParseError` if `text` is not valid Rust.
    pub fn parse(
        path: impl Into<PathBuf>,
        module: Vec<String>,
        text: &str,
    ) -> Result<Self, GeneratorError> {
        let path = path.into();
        let file = syn::parse_file(text).map_err(|e| GeneratorError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { path, module, file })
    }
}

/// Derives the crate-relative module path of a file.
///
/// `lib.rs` and `main.rs` are the crate root, `mod.rs` names its directory,
/// anything else names itself. Files outside `src_root` (or with no root)
/// are treated as direct children of the crate root.
///
/// ```
/// use std::path::Path;
/// use restgen_gen::source::module_path_for;
///
/// let root = Path::new("src");
/// assert_eq!(module_path_for(Path::new("src/lib.rs"), Some(root)), Vec::<String>::new());
/// assert_eq!(module_path_for(Path::new("src/api/github.rs"), Some(root)), vec!["api", "github"]);
/// assert_eq!(module_path_for(Path::new("src/api/mod.rs"), Some(root)), vec!["api"]);
/// ```
pub fn module_path_for(path: &Path, src_root: Option<&Path>) -> Vec<String> {
    let relative = src_root
        .and_then(|root| path.strip_prefix(root).ok())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.file_name().map(PathBuf::from).unwrap_or_default());

    let mut segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let Some(last) = segments.pop() else {
        return segments;
    };
    let stem = Path::new(&last)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or(last);

    let at_root = segments.is_empty();
    match stem.as_str() {
        "lib" | "main" if at_root => {}
        "mod" => {}
        _ => segments.push(stem),
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_lib_rs_is_a_module() {
        let root = Path::new("src");
        assert_eq!(
            module_path_for(Path::new("src/tools/lib.rs"), Some(root)),
            vec!["tools", "lib"]
        );
    }

    #[test]
    fn files_outside_the_root_use_their_stem() {
        assert_eq!(
            module_path_for(Path::new("/tmp/decl/github.rs"), Some(Path::new("src"))),
            vec!["github"]
        );
        assert_eq!(module_path_for(Path::new("lib.rs"), None), Vec::<String>::new());
    }

    #[test]
    fn parse_reports_invalid_rust() {
        let result = SourceUnit::parse("broken.rs", vec![], "pub trait {");
        assert!(matches!(result, Err(GeneratorError::ParseError { .. })));
    }

    #[test]
    fn load_reports_missing_files() {
        let result = SourceUnit::load(Path::new("/definitely/not/here.rs"), None);
        assert!(matches!(result, Err(GeneratorError::ReadError { .. })));
    }
}
