use std::fmt;

/// A GitHub account: the handle typed by the user and the node id it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub handle: String,
    pub opaque_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub name: String,
    pub owner_login: String,
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner_login, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub name: String,
}

impl BranchRef {
    /// Fully qualified ref name, e.g. `refs/heads/main`.
    pub fn qualified(&self) -> String {
        format!("refs/heads/{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub commit_url: String,
    pub author_name: String,
    pub author_email: String,
}

impl CommitRecord {
    pub fn identity(&self) -> IdentityKey {
        IdentityKey::new(&self.author_name, &self.author_email)
    }
}

/// Dedup key in its canonical `Name <email>` form. Compared byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn new(name: &str, email: &str) -> Self {
        Self(format!("{name} <{email}>"))
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
