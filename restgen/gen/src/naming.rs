//! Unit hint names and the cache that keeps them unique.
//!
//! A hint is `{module.path.}{Name}.{kind}` (`github.GithubApi.client`) and
//! becomes the file name `{hint}.rs`. Two identities can still collide,
//! either exactly or on a case-insensitive filesystem
//! (`api.Users.client` vs `api.users.client`), so every hint is reserved
//! here first; the later owner gets a numeric suffix
//! (`api.users_2.client`).
//!
//! Lookups vastly outnumber inserts, so the table sits behind a
//! `parking_lot::RwLock`: a read lock answers known owners, an upgradable
//! read covers the check-then-insert of a new one.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use tracing::debug;

use crate::ir::QualifiedName;
use crate::scanner::CandidateKind;

type Owner = (CandidateKind, QualifiedName);

#[derive(Debug, Default)]
struct Table {
    /// Owner -> reserved hint.
    by_owner: HashMap<Owner, String>,
    /// Lowercased hint -> owner.
    by_hint: HashMap<String, Owner>,
}

/// Reserved hint names, by owning identity.
#[derive(Debug, Default)]
pub struct NameCache {
    table: RwLock<Table>,
}

static GLOBAL: LazyLock<Arc<NameCache>> = LazyLock::new(|| Arc::new(NameCache::new()));

impl NameCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache, shared by every run in the process.
    pub fn global() -> Arc<NameCache> {
        Arc::clone(&GLOBAL)
    }

    /// Returns the hint for `identity`, reserving one on first use.
    ///
    /// ```
    /// use restgen_gen::ir::QualifiedName;
    /// use restgen_gen::naming::NameCache;
    /// use restgen_gen::scanner::CandidateKind;
    ///
    /// let cache = NameCache::new();
    /// let api = QualifiedName::new(vec!["github".into()], "GithubApi");
    /// assert_eq!(cache.reserve(&api, CandidateKind::Client), "github.GithubApi.client");
    /// assert_eq!(cache.reserve(&api, CandidateKind::Client), "github.GithubApi.client");
    /// ```
    pub fn reserve(&self, identity: &QualifiedName, kind: CandidateKind) -> String {
        let owner = (kind, identity.clone());
        if let Some(hint) = self.table.read().by_owner.get(&owner) {
            return hint.clone();
        }

        let table = self.table.upgradable_read();
        if let Some(hint) = table.by_owner.get(&owner) {
            return hint.clone();
        }

        let stem = identity.dotted();
        let suffix = kind.hint_suffix();
        let mut hint = format!("{stem}.{suffix}");
        let mut n = 2;
        while table.by_hint.contains_key(&hint.to_lowercase()) {
            hint = format!("{stem}_{n}.{suffix}");
            n += 1;
        }
        if n > 2 {
            debug!(%identity, %hint, "hint collided, using suffix");
        }

        let mut table = RwLockUpgradableReadGuard::upgrade(table);
        table.by_hint.insert(hint.to_lowercase(), owner.clone());
        table.by_owner.insert(owner, hint.clone());
        hint
    }

    /// Returns the hint already reserved for `identity`, if any.
    pub fn get(&self, identity: &QualifiedName, kind: CandidateKind) -> Option<String> {
        self.table
            .read()
            .by_owner
            .get(&(kind, identity.clone()))
            .cloned()
    }

    /// Number of reserved hints.
    pub fn len(&self) -> usize {
        self.table.read().by_owner.len()
    }

    /// Returns `true` if nothing is reserved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
