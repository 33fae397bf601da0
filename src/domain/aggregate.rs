use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::domain::identity::{CommitRecord, IdentityKey};

/// Identities already printed during one run. Only ever grows.
#[derive(Debug, Default)]
pub struct IdentitySet(HashSet<IdentityKey>);

impl IdentitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as seen; `true` if it was new.
    pub fn insert(&mut self, key: IdentityKey) -> bool {
        self.0.insert(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitPolicy {
    /// Emit every commit, duplicates included.
    pub show_all: bool,
    /// Append the commit URL to each line.
    pub include_source: bool,
}

/// One output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Emitted {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_url: Option<String>,
    #[serde(skip)]
    identity: IdentityKey,
}

impl Emitted {
    #[cfg(test)]
    pub fn identity(&self) -> &IdentityKey {
        &self.identity
    }
}

impl fmt::Display for Emitted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.commit_url {
            Some(url) => write!(f, "{} - {}", self.identity, url),
            None => write!(f, "{}", self.identity),
        }
    }
}

/// Decide whether `commit` produces a line.
///
/// With `show_all` the set is neither read nor written.
pub fn observe(commit: &CommitRecord, policy: EmitPolicy, seen: &mut IdentitySet) -> Option<Emitted> {
    let identity = commit.identity();
    if !policy.show_all && !seen.insert(identity.clone()) {
        return None;
    }

    Some(Emitted {
        name: commit.author_name.clone(),
        email: commit.author_email.clone(),
        commit_url: policy.include_source.then(|| commit.commit_url.clone()),
        identity,
    })
}
