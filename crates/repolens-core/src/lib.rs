//! Repolens Core Library
//!
//! A unified read-only client over Git hosting APIs: repository metadata,
//! branches, file and README content, commit history, issues, and a
//! recursively-crawled directory sitemap, all normalized into one
//! provider-neutral model. GitHub is implemented; Bitbucket and GitLab
//! expose the same operation set as not-yet-implemented stubs.

pub mod config;
pub mod content;
pub mod error;
pub mod model;
pub mod providers;
pub mod reference;
pub mod session;
pub mod sitemap;
pub mod transport;

pub use error::{Error, Result};
pub use session::{RepoOptions, RepoSession, repo_info};

/// Re-exports of commonly used types
pub mod prelude {
    // Session
    pub use crate::session::{
        CommitPage, CommitsState, ReadmeState, RepoCache, RepoOptions, RepoSession, repo_info,
    };

    // Reference resolution
    pub use crate::reference::{GitSource, RepoRef, resolve};

    // Neutral model
    pub use crate::model::{
        Branch, BranchLookup, Commit, CommitQuery, DirectoryListing, Issue, IssueQuery,
        OrgRepoQuery, OtherAsset, PageQuery, ReadmeDocument, RepoFileEntry, RepoMetadata,
    };

    // Sitemap
    pub use crate::sitemap::{
        DirectorySource, FlatSitemap, Sitemap, SitemapDirectory, SitemapOptions,
    };

    // Providers
    pub use crate::providers::{BitbucketProvider, GithubProvider, GitlabProvider, Provider};

    // Transport & config
    pub use crate::config::AuthConfig;
    pub use crate::error::{Error, Result};
    pub use crate::transport::{FetchOptions, Transport, TransportConfig};
}
