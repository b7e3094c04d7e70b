//! Shared fixtures for unit tests.

use crate::scanner::{Candidate, scan};
use crate::source::SourceUnit;

/// Parses `src` as the file of module `module` (`"api::github"`, or `""`
/// for the crate root).
pub fn unit(module: &str, src: &str) -> SourceUnit {
    let module: Vec<String> = module
        .split("::")
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .collect();
    let path = if module.is_empty() {
        "src/lib.rs".to_string()
    } else {
        format!("src/{}.rs", module.join("/"))
    };
    SourceUnit::parse(path, module, src).unwrap()
}

/// The first confirmed candidate in `src`.
pub fn first_candidate(module: &str, src: &str) -> Candidate {
    let outcome = scan(&[unit(module, src)]);
    outcome
        .candidates
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no candidate in:\n{src}"))
}
