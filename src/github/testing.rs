//! In-memory transport that replays scripted GraphQL `data` payloads.

use std::collections::VecDeque;

use serde_json::{json, Value};

use crate::domain::page::{Level, PageQuery};
use crate::error::Error;
use crate::github::client::Transport;
use crate::github::queries::{BranchRefs, CommitHistory, ContributedRepos};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub level: Level,
    pub variables: Value,
}

/// Answers requests strictly in the order they were scripted.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: VecDeque<Result<Value, Error>>,
    pub calls: Vec<RecordedCall>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, data: Value) -> Self {
        self.responses.push_back(Ok(data));
        self
    }

    pub fn then_fail(mut self, msg: &str) -> Self {
        self.responses.push_back(Err(Error::Query(msg.to_string())));
        self
    }

    pub fn calls_at(&self, level: Level) -> usize {
        self.calls.iter().filter(|c| c.level == level).count()
    }
}

fn level_of(query: &str) -> Level {
    if query == ContributedRepos::TEMPLATE {
        Level::Repositories
    } else if query == BranchRefs::TEMPLATE {
        Level::Branches
    } else if query == CommitHistory::TEMPLATE {
        Level::Commits
    } else {
        panic!("unknown query template: {query}")
    }
}

impl Transport for ScriptedTransport {
    fn execute(&mut self, query: &str, variables: Value) -> Result<Value, Error> {
        self.calls.push(RecordedCall {
            level: level_of(query),
            variables,
        });
        self.responses
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted request #{}", self.calls.len()))
    }
}

fn page_info(next: Option<&str>) -> Value {
    json!({ "hasNextPage": next.is_some(), "endCursor": next })
}

/// `data` for a repository page; `next` is the end cursor when more pages follow.
pub fn repos_page(repos: &[(&str, &str)], next: Option<&str>) -> Value {
    let nodes: Vec<_> = repos
        .iter()
        .map(|(owner, name)| json!({ "name": name, "owner": { "login": owner } }))
        .collect();
    json!({ "user": { "repositoriesContributedTo": { "pageInfo": page_info(next), "nodes": nodes } } })
}

pub fn branches_page(branches: &[&str], next: Option<&str>) -> Value {
    let nodes: Vec<_> = branches.iter().map(|b| json!({ "name": b })).collect();
    json!({ "repository": { "refs": { "pageInfo": page_info(next), "nodes": nodes } } })
}

/// Commits are `(name, email, url)`.
pub fn commits_page(commits: &[(&str, &str, &str)], next: Option<&str>) -> Value {
    let nodes: Vec<_> = commits
        .iter()
        .map(|(name, email, url)| json!({ "commitUrl": url, "author": { "name": name, "email": email } }))
        .collect();
    json!({ "repository": { "ref": { "target": { "history": { "pageInfo": page_info(next), "nodes": nodes } } } } })
}

/// The branch points at something without history for this author.
pub fn no_history() -> Value {
    json!({ "repository": { "ref": { "target": { "history": { "pageInfo": page_info(None), "nodes": null } } } } })
}
