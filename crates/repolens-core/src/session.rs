//! The repository session: a facade bound to one repo and branch.
//!
//! Which sub-resources are eagerly preloaded (readme, commits) is fixed at
//! construction and never changes for the lifetime of the session; the
//! preloaded values live as embedded state, everything else delegates live
//! to the provider adapter.

use serde::Serialize;
use tracing::warn;

use crate::config::{self, AuthConfig};
use crate::error::{Error, Result};
use crate::model::{
    Branch, BranchLookup, Commit, CommitQuery, DirectoryListing, Issue, IssueQuery, OrgRepoQuery,
    PageQuery, ReadmeDocument, RepoMetadata,
};
use crate::providers::Provider;
use crate::reference::{self, GitSource, RepoRef};
use crate::sitemap::{Sitemap, SitemapOptions};
use crate::transport::{Transport, TransportConfig};

/// Options for constructing a [`RepoSession`].
#[derive(Debug, Clone, Default)]
pub struct RepoOptions {
    /// Branch to bind the session to. Defaults to the repository's default
    /// branch.
    pub branch: Option<String>,
    /// Explicit credentials; anything absent falls back to the environment
    /// and then the config file.
    pub auth: AuthConfig,
    /// Preload the root README at construction.
    pub with_readme: bool,
    /// Preload commits at construction using the given query.
    pub with_commits: Option<CommitQuery>,
}

impl RepoOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth.token = Some(token.into());
        self
    }

    pub fn with_readme(mut self) -> Self {
        self.with_readme = true;
        self
    }

    pub fn with_commits(mut self, query: CommitQuery) -> Self {
        self.with_commits = Some(query);
        self
    }
}

/// Values fetched ahead of session assembly. `readme`/`commits` are `Some`
/// exactly when the corresponding preload was requested.
#[derive(Debug, Clone)]
pub struct RepoCache {
    pub meta: RepoMetadata,
    pub branches: BranchLookup,
    pub readme: Option<ReadmeDocument>,
    pub commits: Option<Vec<Commit>>,
}

/// Commits surface of a session: either an embedded page that
/// [`RepoSession::get_more_commits`] advances, or fully on-demand.
#[derive(Debug, Clone)]
pub enum CommitsState {
    Preloaded {
        commits: Vec<Commit>,
        query: CommitQuery,
    },
    Lazy,
}

/// Readme surface of a session: embedded at construction or fetched on
/// demand.
#[derive(Debug, Clone)]
pub enum ReadmeState {
    Preloaded(ReadmeDocument),
    Lazy,
}

/// One page of commits as returned by [`RepoSession::get_more_commits`].
#[derive(Debug, Clone, Serialize)]
pub struct CommitPage {
    pub page: u32,
    pub commits: Vec<Commit>,
}

/// A read-only session over one repository, bound to one branch.
#[derive(Debug, Clone)]
pub struct RepoSession {
    repo: RepoRef,
    branch: String,
    source: GitSource,
    provider: Provider,
    meta: RepoMetadata,
    branches: BranchLookup,
    commits: CommitsState,
    readme: ReadmeState,
}

/// Resolve a repository reference and build a session for it.
///
/// Metadata and the branch list are always fetched (concurrently); readme
/// and commits are additionally fetched when the options ask for them.
/// With no resolvable token the calls proceed anonymously, subject to much
/// lower host rate limits.
pub async fn repo_info(reference: &str, options: RepoOptions) -> Result<RepoSession> {
    let (repo, source) = reference::resolve(reference)?;

    let file = match config::config_path() {
        Some(path) => config::load_config_file(&path)?,
        None => None,
    };
    let auth = config::resolve_auth(&options.auth, &config::env_snapshot(), file.as_ref());
    if auth.is_anonymous() {
        warn!(
            "no auth token found in options, environment or config file; \
             anonymous rate limits will apply"
        );
    }

    let transport = Transport::new(TransportConfig {
        token: auth.token.clone(),
        qp: Vec::new(),
    })?;
    let provider = Provider::new(source, transport)?;

    let page_query = PageQuery::default();
    let (meta, branches) = tokio::join!(
        provider.get_repo_meta(&repo),
        provider.get_repo_branches(&repo, &page_query)
    );
    let (meta, branches) = (meta?, branches?);

    let branch = options
        .branch
        .clone()
        .unwrap_or_else(|| meta.default_branch.clone());

    let readme = if options.with_readme {
        Some(provider.get_readme(&repo, &branch).await?)
    } else {
        None
    };
    let commits = match &options.with_commits {
        Some(query) => Some(provider.get_commits(&repo, query).await?),
        None => None,
    };

    let cache = RepoCache {
        meta,
        branches,
        readme,
        commits,
    };
    Ok(RepoSession::assemble(
        repo, branch, source, provider, cache, &options,
    ))
}

impl RepoSession {
    /// Assemble a session from already-fetched values. [`repo_info`] is the
    /// usual entry point; this is the seam for callers that manage their
    /// own fetching.
    pub fn assemble(
        repo: RepoRef,
        branch: String,
        source: GitSource,
        provider: Provider,
        cache: RepoCache,
        options: &RepoOptions,
    ) -> Self {
        let commits = match cache.commits {
            Some(commits) => CommitsState::Preloaded {
                commits,
                query: options.with_commits.clone().unwrap_or_default(),
            },
            None => CommitsState::Lazy,
        };
        let readme = match cache.readme {
            Some(readme) => ReadmeState::Preloaded(readme),
            None => ReadmeState::Lazy,
        };

        Self {
            repo,
            branch,
            source,
            provider,
            meta: cache.meta,
            branches: cache.branches,
            commits,
            readme,
        }
    }

    // --- core surface -----------------------------------------------------

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    /// The owning user or organization, from the `owner/name` pair.
    pub fn organization(&self) -> &str {
        &self.repo.owner
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn source(&self) -> GitSource {
        self.source
    }

    pub fn default_branch(&self) -> &str {
        &self.meta.default_branch
    }

    pub fn meta(&self) -> &RepoMetadata {
        &self.meta
    }

    pub fn list_of_branches(&self) -> Vec<&str> {
        self.branches.keys().map(String::as_str).collect()
    }

    /// Name-keyed branch lookup.
    pub fn branch_info(&self, name: &str) -> Option<&Branch> {
        self.branches.get(name)
    }

    // --- always-fetch surface ---------------------------------------------

    pub async fn get_file_content(&self, filepath: &str) -> Result<String> {
        self.provider
            .get_file_content(&self.repo, &self.branch, filepath)
            .await
    }

    pub async fn get_repos_in_org(&self, query: &OrgRepoQuery) -> Result<Vec<RepoMetadata>> {
        self.provider
            .get_repos_in_org(self.organization(), query)
            .await
    }

    pub async fn get_content_in_repo(&self, path: &str) -> Result<DirectoryListing> {
        self.provider
            .get_content_in_repo(&self.repo, &self.branch, path)
            .await
    }

    pub async fn build_sitemap(&self, root: &str, options: &SitemapOptions) -> Result<Sitemap> {
        self.provider
            .build_sitemap(&self.repo, &self.branch, root, options)
            .await
    }

    pub async fn get_issues(&self, query: &IssueQuery) -> Result<Vec<Issue>> {
        self.provider.get_issues(&self.repo, query).await
    }

    // --- commits surface ----------------------------------------------------

    /// The embedded commits, when commits were preloaded at construction.
    pub fn commits(&self) -> Option<&[Commit]> {
        match &self.commits {
            CommitsState::Preloaded { commits, .. } => Some(commits),
            CommitsState::Lazy => None,
        }
    }

    /// Fetch commits on demand. Page 1 unless the query says otherwise.
    pub async fn get_commits(&self, query: &CommitQuery) -> Result<Vec<Commit>> {
        self.provider.get_commits(&self.repo, query).await
    }

    /// Fetch the next page of commits and replace the embedded page with
    /// it. The first call after construction requests page 2, the next
    /// page 3, and so on. Only valid when commits were preloaded.
    ///
    /// Takes `&mut self`: overlapping calls on one session cannot race on
    /// the embedded page.
    pub async fn get_more_commits(&mut self) -> Result<CommitPage> {
        match &mut self.commits {
            CommitsState::Preloaded { commits, query } => {
                let page = query.advance_page();
                let more = self.provider.get_commits(&self.repo, query).await?;
                *commits = more;
                Ok(CommitPage {
                    page,
                    commits: commits.clone(),
                })
            }
            CommitsState::Lazy => Err(Error::CommitsNotPreloaded),
        }
    }

    // --- readme surface -----------------------------------------------------

    /// The embedded readme, when it was preloaded at construction.
    pub fn readme(&self) -> Option<&ReadmeDocument> {
        match &self.readme {
            ReadmeState::Preloaded(readme) => Some(readme),
            ReadmeState::Lazy => None,
        }
    }

    /// Fetch the readme on demand. Never errors on a missing README; that
    /// case comes back as `exists: false`.
    pub async fn get_readme(&self) -> Result<ReadmeDocument> {
        self.provider.get_readme(&self.repo, &self.branch).await
    }

    // --- branch switching ---------------------------------------------------

    /// Produce a new session bound to `branch`, sharing this session's
    /// provider and preload policy. Branch-scoped preloads (readme,
    /// commits) are fetched afresh for the new branch.
    pub async fn switch_branch(&self, branch: impl Into<String>) -> Result<RepoSession> {
        let branch = branch.into();

        let readme = match &self.readme {
            ReadmeState::Preloaded(_) => {
                ReadmeState::Preloaded(self.provider.get_readme(&self.repo, &branch).await?)
            }
            ReadmeState::Lazy => ReadmeState::Lazy,
        };
        let commits = match &self.commits {
            CommitsState::Preloaded { query, .. } => CommitsState::Preloaded {
                commits: self.provider.get_commits(&self.repo, query).await?,
                query: query.clone(),
            },
            CommitsState::Lazy => CommitsState::Lazy,
        };

        Ok(RepoSession {
            repo: self.repo.clone(),
            branch,
            source: self.source,
            provider: self.provider.clone(),
            meta: self.meta.clone(),
            branches: self.branches.clone(),
            commits,
            readme,
        })
    }
}
