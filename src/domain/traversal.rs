use std::time::Instant;

use tracing::{debug, info};

use crate::domain::aggregate::{observe, EmitPolicy, Emitted, IdentitySet};
use crate::domain::identity::{Account, BranchRef, RepositoryRef};
use crate::domain::page::{Fetcher, Level, PageOutcome, PageQuery, PageState};
use crate::domain::pacing::RateLimiter;
use crate::error::Error;
use crate::github::client::Transport;
use crate::github::queries::{BranchRefs, CommitHistory, ContributedRepos};

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    pub repo_pages: usize,
    pub branch_pages: usize,
    pub commit_pages: usize,
    pub repositories: usize,
    pub branches: usize,
    pub commits: usize,
    pub emitted: usize,
}

impl TraversalStats {
    fn page(&mut self, level: Level) {
        match level {
            Level::Repositories => self.repo_pages += 1,
            Level::Branches => self.branch_pages += 1,
            Level::Commits => self.commit_pages += 1,
        }
    }
}

/// Walks repositories → branches → commit history, one request at a time.
pub struct Traversal<T, L> {
    fetcher: Fetcher<T>,
    limiter: L,
    deadline: Option<Instant>,
    stats: TraversalStats,
}

impl<T: Transport, L: RateLimiter> Traversal<T, L> {
    pub fn new(transport: T, limiter: L) -> Self {
        Self {
            fetcher: Fetcher::new(transport),
            limiter,
            deadline: None,
            stats: TraversalStats::default(),
        }
    }

    /// Abort with [`Error::Cancelled`] once `deadline` passes; checked before every request.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Runs the full walk, passing every emitted line to `sink` as soon as it is found.
    ///
    /// The first error at any level ends the run; lines already handed to
    /// `sink` stay emitted.
    pub fn run<S>(
        &mut self,
        account: &Account,
        policy: EmitPolicy,
        seen: &mut IdentitySet,
        mut sink: S,
    ) -> Result<TraversalStats, Error>
    where
        S: FnMut(&Emitted) -> Result<(), Error>,
    {
        self.stats = TraversalStats::default();
        let repos = ContributedRepos::new(account);

        self.walk(&repos, |this, repo| {
            this.stats.repositories += 1;
            this.walk_branches(account, repo, policy, seen, &mut sink)
        })?;

        info!(
            repositories = self.stats.repositories,
            branches = self.stats.branches,
            commits = self.stats.commits,
            emitted = self.stats.emitted,
            "traversal finished"
        );
        Ok(self.stats)
    }

    fn walk_branches<S>(
        &mut self,
        account: &Account,
        repo: RepositoryRef,
        policy: EmitPolicy,
        seen: &mut IdentitySet,
        sink: &mut S,
    ) -> Result<(), Error>
    where
        S: FnMut(&Emitted) -> Result<(), Error>,
    {
        debug!(%repo, "walking branches");
        let query = BranchRefs { repo };

        self.walk(&query, |this, branch| {
            this.stats.branches += 1;
            this.walk_history(account, &query.repo, branch, policy, seen, sink)
        })
    }

    fn walk_history<S>(
        &mut self,
        account: &Account,
        repo: &RepositoryRef,
        branch: BranchRef,
        policy: EmitPolicy,
        seen: &mut IdentitySet,
        sink: &mut S,
    ) -> Result<(), Error>
    where
        S: FnMut(&Emitted) -> Result<(), Error>,
    {
        debug!(%repo, branch = %branch.name, "walking history");
        let query = CommitHistory {
            repo: repo.clone(),
            branch,
            author_id: account.opaque_id.clone(),
        };

        self.walk(&query, |this, commit| {
            this.stats.commits += 1;
            if let Some(line) = observe(&commit, policy, seen) {
                this.stats.emitted += 1;
                sink(&line)?;
            }
            Ok(())
        })
    }

    /// One pagination level: fetch, visit every item, then move the cursor.
    fn walk<Q, F>(&mut self, query: &Q, mut visit: F) -> Result<(), Error>
    where
        Q: PageQuery,
        F: FnMut(&mut Self, Q::Item) -> Result<(), Error>,
    {
        let mut state = PageState::Start;
        while !state.is_done() {
            self.check_deadline()?;
            let outcome = self.fetcher.fetch_page(query, state.cursor())?;
            self.stats.page(Q::LEVEL);

            let info = match outcome {
                PageOutcome::Absent => {
                    debug!(level = ?Q::LEVEL, "collection absent");
                    return Ok(());
                }
                PageOutcome::Empty(info) => info,
                PageOutcome::Page { items, info } => {
                    for item in items {
                        visit(self, item)?;
                    }
                    info
                }
            };

            state = state.advance(&info)?;
            if !state.is_done() {
                self.limiter.wait_between_pages();
            }
        }
        Ok(())
    }

    fn check_deadline(&self) -> Result<(), Error> {
        match self.deadline {
            Some(d) if Instant::now() >= d => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }

    #[cfg(test)]
    fn transport(&self) -> &T {
        self.fetcher.transport()
    }
}
