//! Writing generated units to disk.
//!
//! Files are written atomically through a temp file and only when their
//! content changed, so an unchanged declaration leaves the file (and its
//! mtime) untouched between builds. Units from earlier runs that are no
//! longer produced are removed, but only files that start with the
//! generated-code header are ever deleted.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codegen::{GeneratedUnit, HEADER};
use crate::errors::GeneratorError;

/// Writes content to a file atomically.
///
/// The content goes to a temp file next to `path`, which is then renamed
/// over it. Parent directories are created as needed.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if:
/// - Parent directories cannot be created
/// - The temp file cannot be written
/// - The rename operation fails
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Writes `content` unless the file already holds exactly that.
///
/// Returns `true` if the file was written.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if writing fails.
pub fn write_if_changed(path: &Path, content: &str) -> Result<bool, GeneratorError> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == content) {
        debug!(path = %path.display(), "unchanged");
        return Ok(false);
    }
    write_atomic(path, content)?;
    Ok(true)
}

/// Writes every unit to `dir` as `{hint}.rs` and removes stale generated
/// files.
///
/// Returns the paths of all units, written or not, in unit order.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` on the first file that cannot be
/// written or removed.
pub fn write_units(dir: &Path, units: &[GeneratedUnit]) -> Result<Vec<PathBuf>, GeneratorError> {
    let mut paths = Vec::with_capacity(units.len());
    let mut written = 0usize;

    for unit in units {
        let path = dir.join(unit.file_name());
        if write_if_changed(&path, &unit.code)? {
            written += 1;
        }
        paths.push(path);
    }

    let removed = remove_stale(dir, &paths)?;
    info!(
        dir = %dir.display(),
        units = units.len(),
        written,
        removed,
        "wrote generated units"
    );
    Ok(paths)
}

/// Deletes generated `.rs` files in `dir` that are not in `keep`.
fn remove_stale(dir: &Path, keep: &[PathBuf]) -> Result<usize, GeneratorError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(0),
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "rs") || keep.contains(&path) {
            continue;
        }
        let generated = fs::read_to_string(&path).is_ok_and(|text| text.starts_with(HEADER));
        if !generated {
            continue;
        }
        fs::remove_file(&path).map_err(|e| GeneratorError::WriteError {
            path: path.display().to_string(),
            source: e,
        })?;
        debug!(path = %path.display(), "removed stale unit");
        removed += 1;
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::QualifiedName;
    use crate::scanner::CandidateKind;
    use std::fs;
    use tempfile::TempDir;

    fn unit(hint: &str, body: &str) -> GeneratedUnit {
        GeneratedUnit {
            hint: hint.into(),
            kind: CandidateKind::Client,
            source: QualifiedName::new(vec![], "Api"),
            code: format!("{HEADER}\n{body}\n"),
        }
    }

    #[test]
    fn write_atomic_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.rs");

        let content = "// Test content";
        let result = write_atomic(&file_path, content);

        assert!(result.is_ok());
        assert_eq!(fs::read_to_string(&file_path).unwrap(), content);
    }

    #[test]
    fn write_atomic_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested/deep/test.rs");

        assert!(write_atomic(&file_path, "// Nested content").is_ok());
        assert!(file_path.exists());
    }

    #[test]
    fn write_atomic_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("existing.rs");
        fs::write(&file_path, "// Old content").unwrap();

        write_atomic(&file_path, "// New content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "// New content");
        assert!(!file_path.with_extension("tmp").exists());
    }

    #[test]
    fn unchanged_content_is_not_rewritten() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("same.rs");

        assert!(write_if_changed(&file_path, "a").unwrap());
        assert!(!write_if_changed(&file_path, "a").unwrap());
        assert!(write_if_changed(&file_path, "b").unwrap());
    }

    #[test]
    fn write_units_names_files_by_hint() {
        let temp_dir = TempDir::new().unwrap();
        let units = vec![unit("github.GithubApi.client", "struct A;"), unit("State.serializer", "")];

        let paths = write_units(temp_dir.path(), &units).unwrap();

        assert_eq!(paths[0], temp_dir.path().join("github.GithubApi.client.rs"));
        assert_eq!(paths[1], temp_dir.path().join("State.serializer.rs"));
        assert!(fs::read_to_string(&paths[0]).unwrap().contains("struct A;"));
    }

    #[test]
    fn stale_generated_files_are_removed_and_others_kept() {
        let temp_dir = TempDir::new().unwrap();
        write_units(temp_dir.path(), &[unit("old.client", ""), unit("kept.client", "")]).unwrap();
        fs::write(temp_dir.path().join("handwritten.rs"), "fn main() {}").unwrap();

        write_units(temp_dir.path(), &[unit("kept.client", "")]).unwrap();

        assert!(!temp_dir.path().join("old.client.rs").exists());
        assert!(temp_dir.path().join("kept.client.rs").exists());
        assert!(temp_dir.path().join("handwritten.rs").exists());
    }
}
