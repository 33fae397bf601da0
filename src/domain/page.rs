use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Error;
use crate::github::client::Transport;

/// Continuation metadata GitHub returns with every connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// What one page request produced.
///
/// `Absent` means the collection itself is missing (no such ref, no history
/// for this author, ...). That ends the level without error and is kept apart
/// from a present-but-empty page, which still carries pagination info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome<T> {
    Absent,
    Empty(PageInfo),
    Page { items: Vec<T>, info: PageInfo },
}

impl<T> PageOutcome<T> {
    pub fn from_nodes(nodes: Option<Vec<Option<T>>>, info: PageInfo) -> Self {
        match nodes {
            None => Self::Absent,
            Some(nodes) if nodes.is_empty() => Self::Empty(info),
            Some(nodes) => Self::Page {
                items: nodes.into_iter().flatten().collect(),
                info,
            },
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageOutcome<U> {
        match self {
            Self::Absent => PageOutcome::Absent,
            Self::Empty(info) => PageOutcome::Empty(info),
            Self::Page { items, info } => PageOutcome::Page {
                items: items.into_iter().map(f).collect(),
                info,
            },
        }
    }
}

/// Position of one pagination level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    Start,
    HasMore(String),
    Done,
}

impl PageState {
    /// Cursor to send with the next request; `None` asks for the first page.
    pub fn cursor(&self) -> Option<&str> {
        match self {
            Self::HasMore(c) => Some(c),
            Self::Start | Self::Done => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Transition after a page has been fully consumed.
    pub fn advance(&self, info: &PageInfo) -> Result<PageState, Error> {
        if !info.has_next_page {
            return Ok(Self::Done);
        }
        match &info.end_cursor {
            Some(c) if !c.is_empty() => Ok(Self::HasMore(c.clone())),
            // Sending no cursor would restart the collection from the top.
            _ => Err(Error::Query(
                "page reported more results but no end cursor".into(),
            )),
        }
    }
}

/// Nesting level a query belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Repositories,
    Branches,
    Commits,
}

/// One of the fixed paginated query shapes.
pub trait PageQuery {
    type Item;
    type Data: DeserializeOwned;

    const LEVEL: Level;
    const TEMPLATE: &'static str;

    /// Bound variables, without the cursor.
    fn variables(&self) -> Map<String, Value>;

    /// Pull the connection out of the decoded `data` member.
    fn extract(data: Self::Data) -> PageOutcome<Self::Item>;
}

/// Executes single page requests over a [`Transport`].
pub struct Fetcher<T> {
    transport: T,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn fetch_page<Q: PageQuery>(
        &mut self,
        query: &Q,
        cursor: Option<&str>,
    ) -> Result<PageOutcome<Q::Item>, Error> {
        let mut vars = query.variables();
        if let Some(c) = cursor {
            vars.insert("cursor".into(), Value::String(c.to_string()));
        }
        debug!(level = ?Q::LEVEL, ?cursor, "fetching page");

        let data = self.transport.execute(Q::TEMPLATE, Value::Object(vars))?;
        let decoded: Q::Data = serde_json::from_value(data)
            .map_err(|e| Error::Query(format!("unexpected {:?} response: {e}", Q::LEVEL)))?;
        Ok(Q::extract(decoded))
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
