use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::domain::identity::{Account, BranchRef, CommitRecord, RepositoryRef};
use crate::domain::page::{Level, PageInfo, PageOutcome, PageQuery};

pub const REPO_PAGE_SIZE: u32 = 50;
pub const BRANCH_PAGE_SIZE: u32 = 10;
pub const COMMIT_PAGE_SIZE: u32 = 50;

/// `nodes` is nullable and so are its entries.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default)]
    pub page_info: PageInfo,
    pub nodes: Option<Vec<Option<T>>>,
}

fn connection_outcome<T, U>(conn: Option<Connection<T>>, f: impl FnMut(T) -> U) -> PageOutcome<U> {
    match conn {
        Some(c) => PageOutcome::from_nodes(c.nodes, c.page_info).map(f),
        None => PageOutcome::Absent,
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

// --- repositories --------------------------------------------------------

/// Repositories the account committed to, own repositories included.
#[derive(Debug, Clone)]
pub struct ContributedRepos {
    pub login: String,
}

impl ContributedRepos {
    pub fn new(account: &Account) -> Self {
        Self { login: account.handle.clone() }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReposData {
    user: Option<ReposUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReposUser {
    repositories_contributed_to: Option<Connection<RepoNode>>,
}

#[derive(Debug, Deserialize)]
struct RepoNode {
    name: String,
    owner: Owner,
}

#[derive(Debug, Deserialize)]
struct Owner {
    login: String,
}

impl PageQuery for ContributedRepos {
    type Item = RepositoryRef;
    type Data = ReposData;

    const LEVEL: Level = Level::Repositories;
    const TEMPLATE: &'static str = r#"
query ($login: String!, $first: Int!, $cursor: String) {
  user(login: $login) {
    repositoriesContributedTo(
      includeUserRepositories: true
      contributionTypes: [COMMIT]
      first: $first
      after: $cursor
    ) {
      pageInfo { hasNextPage endCursor }
      nodes { name owner { login } }
    }
  }
}"#;

    fn variables(&self) -> Map<String, Value> {
        object(json!({ "login": self.login, "first": REPO_PAGE_SIZE }))
    }

    fn extract(data: ReposData) -> PageOutcome<RepositoryRef> {
        let conn = data.user.and_then(|u| u.repositories_contributed_to);
        connection_outcome(conn, |n| RepositoryRef {
            name: n.name,
            owner_login: n.owner.login,
        })
    }
}

// --- branches ------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BranchRefs {
    pub repo: RepositoryRef,
}

#[derive(Debug, Deserialize)]
pub struct BranchesData {
    repository: Option<BranchesRepo>,
}

#[derive(Debug, Deserialize)]
struct BranchesRepo {
    refs: Option<Connection<RefNode>>,
}

#[derive(Debug, Deserialize)]
struct RefNode {
    name: String,
}

impl PageQuery for BranchRefs {
    type Item = BranchRef;
    type Data = BranchesData;

    const LEVEL: Level = Level::Branches;
    const TEMPLATE: &'static str = r#"
query ($owner: String!, $name: String!, $first: Int!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    refs(first: $first, refPrefix: "refs/heads/", after: $cursor) {
      pageInfo { hasNextPage endCursor }
      nodes { name }
    }
  }
}"#;

    fn variables(&self) -> Map<String, Value> {
        object(json!({
            "owner": self.repo.owner_login,
            "name": self.repo.name,
            "first": BRANCH_PAGE_SIZE,
        }))
    }

    fn extract(data: BranchesData) -> PageOutcome<BranchRef> {
        let conn = data.repository.and_then(|r| r.refs);
        connection_outcome(conn, |n| BranchRef { name: n.name })
    }
}

// --- commit history ------------------------------------------------------

/// History of one branch, restricted to commits authored by the account.
#[derive(Debug, Clone)]
pub struct CommitHistory {
    pub repo: RepositoryRef,
    pub branch: BranchRef,
    pub author_id: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryData {
    repository: Option<HistoryRepo>,
}

#[derive(Debug, Deserialize)]
struct HistoryRepo {
    #[serde(rename = "ref")]
    git_ref: Option<HistoryRef>,
}

#[derive(Debug, Deserialize)]
struct HistoryRef {
    target: Option<HistoryTarget>,
}

/// Non-commit targets (annotated tags) come back as `{}`.
#[derive(Debug, Deserialize)]
struct HistoryTarget {
    #[serde(default)]
    history: Option<Connection<CommitNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitNode {
    commit_url: String,
    #[serde(default)]
    author: Option<GitActor>,
}

#[derive(Debug, Default, Deserialize)]
struct GitActor {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl PageQuery for CommitHistory {
    type Item = CommitRecord;
    type Data = HistoryData;

    const LEVEL: Level = Level::Commits;
    const TEMPLATE: &'static str = r#"
query ($owner: String!, $name: String!, $qualifiedName: String!, $authorId: ID!, $first: Int!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    ref(qualifiedName: $qualifiedName) {
      target {
        ... on Commit {
          history(author: {id: $authorId}, first: $first, after: $cursor) {
            pageInfo { hasNextPage endCursor }
            nodes {
              commitUrl
              author { name email }
            }
          }
        }
      }
    }
  }
}"#;

    fn variables(&self) -> Map<String, Value> {
        object(json!({
            "owner": self.repo.owner_login,
            "name": self.repo.name,
            "qualifiedName": self.branch.qualified(),
            "authorId": self.author_id,
            "first": COMMIT_PAGE_SIZE,
        }))
    }

    fn extract(data: HistoryData) -> PageOutcome<CommitRecord> {
        let conn = data
            .repository
            .and_then(|r| r.git_ref)
            .and_then(|r| r.target)
            .and_then(|t| t.history);
        connection_outcome(conn, |n| {
            let author = n.author.unwrap_or_default();
            CommitRecord {
                commit_url: n.commit_url,
                author_name: author.name.unwrap_or_default(),
                author_email: author.email.unwrap_or_default(),
            }
        })
    }
}
