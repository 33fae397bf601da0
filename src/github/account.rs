use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::domain::identity::Account;
use crate::error::Error;
use crate::github::client::endpoint;

/// Maps a login to the node id used to filter commit history by author.
pub trait AccountResolver {
    fn resolve(&self, handle: &str) -> Result<Account, Error>;
}

/// `GET /users/{handle}` on the REST API.
pub struct RestResolver {
    http: Client,
    api_url: Url,
}

impl RestResolver {
    pub fn new(http: Client, api_url: Url) -> Self {
        Self { http, api_url }
    }

    /// `handle` is always a single path segment, whatever it contains.
    pub fn user_url(&self, handle: &str) -> Url {
        endpoint(&self.api_url, &["users", handle])
    }
}

impl AccountResolver for RestResolver {
    fn resolve(&self, handle: &str) -> Result<Account, Error> {
        let url = self.user_url(handle);
        debug!(%url, "resolving account");

        let res = self
            .http
            .get(url)
            .send()
            .map_err(|e| Error::Lookup(e.to_string()))?;
        let status = res.status();
        let body = res.text().map_err(|e| Error::Lookup(e.to_string()))?;
        account_from_response(handle, status, &body)
    }
}

#[derive(Debug, Deserialize)]
struct UserBody {
    #[serde(default)]
    node_id: String,
}

fn account_from_response(handle: &str, status: StatusCode, body: &str) -> Result<Account, Error> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Auth);
    }
    if !status.is_success() {
        return Err(Error::Lookup(format!("{handle}: server returned {status}")));
    }

    let user: UserBody = serde_json::from_str(body)
        .map_err(|e| Error::Lookup(format!("parsing github api response: {e}")))?;
    if user.node_id.is_empty() {
        return Err(Error::Lookup(format!("{handle}: response has no node_id")));
    }

    Ok(Account {
        handle: handle.to_string(),
        opaque_id: user.node_id,
    })
}
