//! Path resolution through a module's `use` imports.
//!
//! Marker identity is never decided by short name. Every attribute and type
//! path is first turned into a fully qualified path using the imports of the
//! module it appears in, then compared with the vocabulary in
//! `restgen-define`:
//!
//! ```
//! use restgen_gen::resolve::ImportScope;
//!
//! let file: syn::File = syn::parse_quote! {
//!     use restgen::{api_client, get as fetch};
//!     use warp::post;
//! };
//! let scope = ImportScope::from_items(&[], &file.items);
//!
//! let path: syn::Path = syn::parse_quote!(fetch);
//! assert_eq!(scope.resolve(&path).unwrap(), vec!["restgen", "get"]);
//!
//! let path: syn::Path = syn::parse_quote!(post);
//! assert_eq!(scope.resolve(&path).unwrap(), vec!["warp", "post"]);
//! ```
//!
//! Paths into the current crate are rooted at `crate`.

use std::collections::HashMap;

use restgen_define::glob_provides;
use syn::{Item, Path, UseTree};

/// The names a module imports, by local alias.
#[derive(Debug, Clone, Default)]
pub struct ImportScope {
    /// The module the scope belongs to (crate-relative).
    module: Vec<String>,
    /// Local name -> fully qualified path.
    aliases: HashMap<String, Vec<String>>,
    /// Modules imported with `*`, fully qualified.
    globs: Vec<Vec<String>>,
}

impl ImportScope {
    /// Collects the `use` items among `items` of the module at `module`.
    pub fn from_items(module: &[String], items: &[Item]) -> Self {
        let mut scope = Self {
            module: module.to_vec(),
            ..Self::default()
        };
        for item in items {
            if let Item::Use(item_use) = item {
                let rooted = item_use.leading_colon.is_some();
                scope.collect(&item_use.tree, Vec::new(), rooted);
            }
        }
        scope
    }

    /// Returns the module path this scope belongs to.
    pub fn module(&self) -> &[String] {
        &self.module
    }

    fn collect(&mut self, tree: &UseTree, mut prefix: Vec<String>, rooted: bool) {
        match tree {
            UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.collect(&path.tree, prefix, rooted);
            }
            UseTree::Name(name) => {
                let local = name.ident.to_string();
                if local == "self" {
                    // `use a::b::{self}` imports `b`
                    if let Some(last) = prefix.last().cloned() {
                        let full = self.absolute(prefix, rooted);
                        self.aliases.insert(last, full);
                    }
                    return;
                }
                prefix.push(local.clone());
                let full = self.absolute(prefix, rooted);
                self.aliases.insert(local, full);
            }
            UseTree::Rename(rename) => {
                let original = rename.ident.to_string();
                let local = rename.rename.to_string();
                if local == "_" {
                    return;
                }
                if original != "self" {
                    prefix.push(original);
                }
                let full = self.absolute(prefix, rooted);
                self.aliases.insert(local, full);
            }
            UseTree::Glob(_) => {
                let full = self.absolute(prefix, rooted);
                self.globs.push(full);
            }
            UseTree::Group(group) => {
                for item in &group.items {
                    self.collect(item, prefix.clone(), rooted);
                }
            }
        }
    }

    /// Turns a `use` path into a fully qualified one.
    fn absolute(&self, path: Vec<String>, rooted: bool) -> Vec<String> {
        if rooted {
            return path;
        }
        self.anchor(path)
    }

    /// Expands `self`, `super` and `crate` at the head of `path`.
    fn anchor(&self, path: Vec<String>) -> Vec<String> {
        let Some(head) = path.first() else {
            return path;
        };
        match head.as_str() {
            "crate" => path,
            "self" => self.crate_path(&self.module, &path[1..]),
            "super" => {
                let mut module = self.module.clone();
                let mut rest = &path[..];
                while rest.first().map(String::as_str) == Some("super") {
                    module.pop();
                    rest = &rest[1..];
                }
                self.crate_path(&module, rest)
            }
            _ => path,
        }
    }

    fn crate_path(&self, module: &[String], rest: &[String]) -> Vec<String> {
        std::iter::once("crate".to_string())
            .chain(module.iter().cloned())
            .chain(rest.iter().cloned())
            .collect()
    }

    /// Resolves `path` to a fully qualified path, or `None` for a bare name
    /// that nothing in scope provides.
    ///
    /// Globs only answer for modules whose exports the vocabulary knows.
    pub fn resolve(&self, path: &Path) -> Option<Vec<String>> {
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        if path.leading_colon.is_some() {
            return Some(segments);
        }

        let (head, rest) = segments.split_first()?;
        if let Some(full) = self.aliases.get(head) {
            let mut resolved = full.clone();
            resolved.extend(rest.iter().cloned());
            return Some(resolved);
        }

        match head.as_str() {
            "crate" | "self" | "super" => return Some(self.anchor(segments)),
            _ => {}
        }

        if rest.is_empty() {
            let module = self.globs.iter().find(|m| glob_provides(m, head))?;
            let mut resolved = module.clone();
            resolved.push(head.clone());
            return Some(resolved);
        }

        Some(segments)
    }

    /// Returns the candidate qualified paths a type path may name, most
    /// specific first: the import-resolved path, then the path taken as
    /// relative to this module, then every crate-local glob.
    pub fn type_candidates(&self, path: &Path) -> Vec<Vec<String>> {
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        let mut candidates = Vec::new();

        if let Some(resolved) = self.resolve(path) {
            candidates.push(resolved);
        }
        if path.leading_colon.is_none() && !self.aliases.contains_key(&segments[0]) {
            candidates.push(self.crate_path(&self.module, &segments));
            for glob in self.globs.iter().filter(|g| g.first().map(String::as_str) == Some("crate")) {
                let mut candidate = glob.clone();
                candidate.extend(segments.iter().cloned());
                candidates.push(candidate);
            }
        }
        candidates.dedup();
        candidates
    }
}
