//! GitHub provider adapter.
//!
//! Every operation builds a host URL, calls the shared [`Transport`] and
//! maps the GitHub wire shape into the neutral model.

use async_trait::async_trait;

use crate::content::normalize_listing;
use crate::error::{Error, Result};
use crate::model::{
    Branch, BranchLookup, Commit, CommitQuery, DirectoryListing, GithubBranch, GithubCommit,
    GithubContentEntry, GithubIssue, GithubRepoMeta, Issue, IssueQuery, OrgRepoQuery, PageQuery,
    ReadmeDocument, RepoMetadata,
};
use crate::reference::RepoRef;
use crate::sitemap::{DirectorySource, Sitemap, SitemapOptions, crawl};
use crate::transport::{FetchOptions, Transport};

const GITHUB_API_BASE: &str = "https://api.github.com";

/// Raw content URL for a file, e.g.
/// `https://raw.githubusercontent.com/org/repo/main/src/lib.rs`.
fn raw_url(repo: &RepoRef, branch: &str, filepath: &str) -> String {
    format!(
        "https://raw.githubusercontent.com/{}/{}/{}",
        repo.full_name(),
        branch,
        filepath.trim_start_matches('/')
    )
}

/// Browsable URL for a file. Derived from a string template, never fetched.
fn editor_url(repo: &RepoRef, branch: &str, filepath: &str) -> String {
    format!(
        "https://github.com/{}/blob/{}/{}",
        repo.full_name(),
        branch,
        filepath.trim_start_matches('/')
    )
}

#[derive(Debug, Clone)]
pub struct GithubProvider {
    transport: Transport,
}

impl GithubProvider {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub async fn get_repo_meta(&self, repo: &RepoRef) -> Result<RepoMetadata> {
        let url = format!("{GITHUB_API_BASE}/repos/{}", repo.full_name());
        let options =
            FetchOptions::new().with_err_text(format!("problems getting meta data on {repo}"));
        let raw: GithubRepoMeta = self.transport.get_json(&url, &options).await?;
        Ok(raw.into())
    }

    pub async fn get_repo_branches(&self, repo: &RepoRef, query: &PageQuery) -> Result<BranchLookup> {
        let url = format!("{GITHUB_API_BASE}/repos/{}/branches", repo.full_name());
        let options = FetchOptions::new()
            .with_qp(query.qp())
            .with_err_text(format!("problems getting branches for {repo}"));
        let raw: Vec<GithubBranch> = self.transport.get_json(&url, &options).await?;
        Ok(raw
            .into_iter()
            .map(|branch| (branch.name.clone(), Branch::from(branch)))
            .collect())
    }

    pub async fn get_file_content(
        &self,
        repo: &RepoRef,
        branch: &str,
        filepath: &str,
    ) -> Result<String> {
        let url = raw_url(repo, branch, filepath);
        let options = FetchOptions::new()
            .with_err_text(format!("problems getting file content for \"{filepath}\""));
        self.transport.get_text(&url, &options).await
    }

    /// Fetch the root `README.md`. A 404 is the one expected-and-recovered
    /// condition: it yields `exists: false` with the URLs still filled in
    /// from their templates.
    pub async fn get_readme(&self, repo: &RepoRef, branch: &str) -> Result<ReadmeDocument> {
        let document = ReadmeDocument {
            exists: false,
            content: None,
            raw_url: raw_url(repo, branch, "README.md"),
            editor_url: editor_url(repo, branch, "README.md"),
        };

        match self.get_file_content(repo, branch, "README.md").await {
            Ok(content) => Ok(ReadmeDocument {
                exists: true,
                content: Some(content),
                ..document
            }),
            Err(Error::Transport { status: 404, .. }) => Ok(document),
            Err(err) => Err(err),
        }
    }

    pub async fn get_commits(&self, repo: &RepoRef, query: &CommitQuery) -> Result<Vec<Commit>> {
        let url = format!("{GITHUB_API_BASE}/repos/{}/commits", repo.full_name());
        let options = FetchOptions::new()
            .with_qp(query.qp())
            .with_err_text(format!("problems getting commits from {repo}"));
        let raw: Vec<GithubCommit> = self.transport.get_json(&url, &options).await?;
        Ok(raw.into_iter().map(Into::into).collect())
    }

    pub async fn get_repos_in_org(
        &self,
        org: &str,
        query: &OrgRepoQuery,
    ) -> Result<Vec<RepoMetadata>> {
        let url = format!("{GITHUB_API_BASE}/orgs/{org}/repos");
        let options = FetchOptions::new()
            .with_qp(query.qp())
            .with_err_text(format!("problems getting repos in the \"{org}\" organization"));
        let raw: Vec<GithubRepoMeta> = self.transport.get_json(&url, &options).await?;
        Ok(raw.into_iter().map(Into::into).collect())
    }

    pub async fn get_content_in_repo(
        &self,
        repo: &RepoRef,
        branch: &str,
        path: &str,
    ) -> Result<DirectoryListing> {
        let url = format!(
            "{GITHUB_API_BASE}/repos/{}/contents/{}",
            repo.full_name(),
            path.trim_start_matches('/')
        );
        let options = FetchOptions::new()
            .with_qp(vec![("ref".to_string(), branch.to_string())])
            .with_err_text(format!("problems getting content at \"{path}\" in {repo}"));
        let raw: Vec<GithubContentEntry> = self.transport.get_json(&url, &options).await?;
        Ok(normalize_listing(path, raw))
    }

    pub async fn get_issues(&self, repo: &RepoRef, query: &IssueQuery) -> Result<Vec<Issue>> {
        let url = format!("{GITHUB_API_BASE}/repos/{}/issues", repo.full_name());
        let options = FetchOptions::new()
            .with_qp(query.qp())
            .with_err_text(format!("problems getting issues for {repo}"));
        let raw: Vec<GithubIssue> = self.transport.get_json(&url, &options).await?;
        Ok(raw.into_iter().map(Into::into).collect())
    }

    pub async fn build_sitemap(
        &self,
        repo: &RepoRef,
        branch: &str,
        root: &str,
        options: &SitemapOptions,
    ) -> Result<Sitemap> {
        let source = GithubDirectorySource {
            provider: self,
            repo,
            branch,
        };
        let tree = crawl(&source, root, options).await?;
        Ok(Sitemap {
            repo: repo.full_name(),
            branch: branch.to_string(),
            path: root.to_string(),
            root: tree,
        })
    }
}

/// Binds the provider to one repo/branch so the crawler can fetch listings
/// by path alone.
struct GithubDirectorySource<'a> {
    provider: &'a GithubProvider,
    repo: &'a RepoRef,
    branch: &'a str,
}

#[async_trait]
impl DirectorySource for GithubDirectorySource<'_> {
    async fn listing(&self, path: &str) -> Result<DirectoryListing> {
        self.provider
            .get_content_in_repo(self.repo, self.branch, path)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_templates() {
        let repo = RepoRef::new("org", "example");
        assert_eq!(
            raw_url(&repo, "main", "src/lib.rs"),
            "https://raw.githubusercontent.com/org/example/main/src/lib.rs"
        );
        assert_eq!(
            editor_url(&repo, "main", "README.md"),
            "https://github.com/org/example/blob/main/README.md"
        );
    }

    #[test]
    fn url_templates_strip_leading_slash() {
        let repo = RepoRef::new("org", "example");
        assert_eq!(
            raw_url(&repo, "dev", "/.github/ci.yml"),
            "https://raw.githubusercontent.com/org/example/dev/.github/ci.yml"
        );
    }
}
