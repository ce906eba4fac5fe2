//! Provider adapters, one per Git hosting service.
//!
//! [`Provider`] is an enum over the concrete adapters rather than a trait
//! object, so the fixed operation set stays host-agnostic without dynamic
//! dispatch. The Bitbucket and GitLab variants are stubs whose operations
//! uniformly answer not-implemented.

pub mod bitbucket;
pub mod github;
pub mod gitlab;

pub use bitbucket::BitbucketProvider;
pub use github::GithubProvider;
pub use gitlab::GitlabProvider;

use crate::error::{Error, Result};
use crate::model::{
    BranchLookup, Commit, CommitQuery, DirectoryListing, Issue, IssueQuery, OrgRepoQuery,
    PageQuery, ReadmeDocument, RepoMetadata,
};
use crate::reference::{GitSource, RepoRef};
use crate::sitemap::{Sitemap, SitemapOptions};
use crate::transport::Transport;

/// Concrete provider with enum dispatch. Stateless and reentrant: the repo
/// is passed into every operation.
#[derive(Debug, Clone)]
pub enum Provider {
    Github(GithubProvider),
    Bitbucket(BitbucketProvider),
    Gitlab(GitlabProvider),
}

impl Provider {
    /// Construct the adapter matching `source`. An unknown source is
    /// terminal and never reaches a provider.
    pub fn new(source: GitSource, transport: Transport) -> Result<Self> {
        match source {
            GitSource::Github => Ok(Self::Github(GithubProvider::new(transport))),
            GitSource::Bitbucket => Ok(Self::Bitbucket(BitbucketProvider::new(transport))),
            GitSource::Gitlab => Ok(Self::Gitlab(GitlabProvider::new(transport))),
            GitSource::Unknown => Err(Error::Resolution {
                reference: "cannot construct a provider for an unknown git source".to_string(),
            }),
        }
    }

    pub async fn get_repo_meta(&self, repo: &RepoRef) -> Result<RepoMetadata> {
        match self {
            Self::Github(p) => p.get_repo_meta(repo).await,
            Self::Bitbucket(p) => p.get_repo_meta(repo).await,
            Self::Gitlab(p) => p.get_repo_meta(repo).await,
        }
    }

    pub async fn get_repo_branches(
        &self,
        repo: &RepoRef,
        query: &PageQuery,
    ) -> Result<BranchLookup> {
        match self {
            Self::Github(p) => p.get_repo_branches(repo, query).await,
            Self::Bitbucket(p) => p.get_repo_branches(repo, query).await,
            Self::Gitlab(p) => p.get_repo_branches(repo, query).await,
        }
    }

    pub async fn get_file_content(
        &self,
        repo: &RepoRef,
        branch: &str,
        filepath: &str,
    ) -> Result<String> {
        match self {
            Self::Github(p) => p.get_file_content(repo, branch, filepath).await,
            Self::Bitbucket(p) => p.get_file_content(repo, branch, filepath).await,
            Self::Gitlab(p) => p.get_file_content(repo, branch, filepath).await,
        }
    }

    pub async fn get_readme(&self, repo: &RepoRef, branch: &str) -> Result<ReadmeDocument> {
        match self {
            Self::Github(p) => p.get_readme(repo, branch).await,
            Self::Bitbucket(p) => p.get_readme(repo, branch).await,
            Self::Gitlab(p) => p.get_readme(repo, branch).await,
        }
    }

    pub async fn get_commits(&self, repo: &RepoRef, query: &CommitQuery) -> Result<Vec<Commit>> {
        match self {
            Self::Github(p) => p.get_commits(repo, query).await,
            Self::Bitbucket(p) => p.get_commits(repo, query).await,
            Self::Gitlab(p) => p.get_commits(repo, query).await,
        }
    }

    pub async fn get_repos_in_org(
        &self,
        org: &str,
        query: &OrgRepoQuery,
    ) -> Result<Vec<RepoMetadata>> {
        match self {
            Self::Github(p) => p.get_repos_in_org(org, query).await,
            Self::Bitbucket(p) => p.get_repos_in_org(org, query).await,
            Self::Gitlab(p) => p.get_repos_in_org(org, query).await,
        }
    }

    pub async fn get_content_in_repo(
        &self,
        repo: &RepoRef,
        branch: &str,
        path: &str,
    ) -> Result<DirectoryListing> {
        match self {
            Self::Github(p) => p.get_content_in_repo(repo, branch, path).await,
            Self::Bitbucket(p) => p.get_content_in_repo(repo, branch, path).await,
            Self::Gitlab(p) => p.get_content_in_repo(repo, branch, path).await,
        }
    }

    pub async fn get_issues(&self, repo: &RepoRef, query: &IssueQuery) -> Result<Vec<Issue>> {
        match self {
            Self::Github(p) => p.get_issues(repo, query).await,
            Self::Bitbucket(p) => p.get_issues(repo, query).await,
            Self::Gitlab(p) => p.get_issues(repo, query).await,
        }
    }

    pub async fn build_sitemap(
        &self,
        repo: &RepoRef,
        branch: &str,
        root: &str,
        options: &SitemapOptions,
    ) -> Result<Sitemap> {
        match self {
            Self::Github(p) => p.build_sitemap(repo, branch, root, options).await,
            Self::Bitbucket(p) => p.build_sitemap(repo, branch, root, options).await,
            Self::Gitlab(p) => p.build_sitemap(repo, branch, root, options).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportConfig;

    #[tokio::test]
    async fn stub_providers_answer_not_implemented() {
        let transport = Transport::new(TransportConfig::default()).unwrap();
        let provider = Provider::new(GitSource::Bitbucket, transport).unwrap();
        let repo = RepoRef::new("org", "example");

        let err = provider.get_repo_meta(&repo).await.unwrap_err();
        assert!(matches!(
            err,
            Error::NotImplemented {
                provider: "bitbucket",
                operation: "get_repo_meta"
            }
        ));
    }

    #[test]
    fn unknown_source_never_becomes_a_provider() {
        let transport = Transport::new(TransportConfig::default()).unwrap();
        assert!(Provider::new(GitSource::Unknown, transport).is_err());
    }
}
