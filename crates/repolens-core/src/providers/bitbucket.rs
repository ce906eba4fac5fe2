//! Bitbucket provider stub.
//!
//! Exposes the full operation set so the session facade stays
//! host-agnostic; every operation currently fails with a not-implemented
//! error.

use crate::error::{Error, Result};
use crate::model::{
    BranchLookup, Commit, CommitQuery, DirectoryListing, Issue, IssueQuery, OrgRepoQuery,
    PageQuery, ReadmeDocument, RepoMetadata,
};
use crate::reference::RepoRef;
use crate::sitemap::{Sitemap, SitemapOptions};
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct BitbucketProvider {
    _transport: Transport,
}

impl BitbucketProvider {
    pub fn new(transport: Transport) -> Self {
        Self {
            _transport: transport,
        }
    }

    fn unimplemented<T>(operation: &'static str) -> Result<T> {
        Err(Error::NotImplemented {
            provider: "bitbucket",
            operation,
        })
    }

    pub async fn get_repo_meta(&self, _repo: &RepoRef) -> Result<RepoMetadata> {
        Self::unimplemented("get_repo_meta")
    }

    pub async fn get_repo_branches(
        &self,
        _repo: &RepoRef,
        _query: &PageQuery,
    ) -> Result<BranchLookup> {
        Self::unimplemented("get_repo_branches")
    }

    pub async fn get_file_content(
        &self,
        _repo: &RepoRef,
        _branch: &str,
        _filepath: &str,
    ) -> Result<String> {
        Self::unimplemented("get_file_content")
    }

    pub async fn get_readme(&self, _repo: &RepoRef, _branch: &str) -> Result<ReadmeDocument> {
        Self::unimplemented("get_readme")
    }

    pub async fn get_commits(&self, _repo: &RepoRef, _query: &CommitQuery) -> Result<Vec<Commit>> {
        Self::unimplemented("get_commits")
    }

    pub async fn get_repos_in_org(
        &self,
        _org: &str,
        _query: &OrgRepoQuery,
    ) -> Result<Vec<RepoMetadata>> {
        Self::unimplemented("get_repos_in_org")
    }

    pub async fn get_content_in_repo(
        &self,
        _repo: &RepoRef,
        _branch: &str,
        _path: &str,
    ) -> Result<DirectoryListing> {
        Self::unimplemented("get_content_in_repo")
    }

    pub async fn get_issues(&self, _repo: &RepoRef, _query: &IssueQuery) -> Result<Vec<Issue>> {
        Self::unimplemented("get_issues")
    }

    pub async fn build_sitemap(
        &self,
        _repo: &RepoRef,
        _branch: &str,
        _root: &str,
        _options: &SitemapOptions,
    ) -> Result<Sitemap> {
        Self::unimplemented("build_sitemap")
    }
}
