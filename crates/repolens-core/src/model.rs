//! Host-neutral data model plus the GitHub wire shapes it is mapped from.
//!
//! The `Github*` structs mirror the JSON the GitHub REST API returns and are
//! only ever deserialized. Everything else is the provider-neutral
//! projection handed to consumers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Host-neutral repository metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub name: String,
    /// Login of the owning user or organization.
    pub owner: String,
    pub full_name: String,
    pub description: Option<String>,
    pub default_branch: String,
    pub html_url: String,
    pub private: bool,
    pub fork: bool,
    pub archived: bool,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
}

/// A branch with its host-specific ref info.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub commit: BranchTarget,
    pub protected: bool,
}

/// The commit a branch points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchTarget {
    pub sha: String,
    pub url: Option<String>,
}

/// A repository's branch set, keyed by branch name. Lookup is by name;
/// insertion order is irrelevant.
pub type BranchLookup = BTreeMap<String, Branch>;

/// A single file found in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoFileEntry {
    pub filename: String,
    /// The directory path which holds the file.
    pub filepath: String,
    pub sha: String,
    pub size: u64,
    /// Raw content URL; absent when the host omits it.
    pub raw_url: Option<String>,
    /// Browsable URL; absent when the host omits it.
    pub url: Option<String>,
}

/// Non-file, non-directory entries in a listing. Informational only and
/// never traversed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OtherAsset {
    Symlink { sha: String },
    Submodule { sha: String, name: String },
}

/// One level of a repository's directory tree. Unlike the sitemap tree,
/// sub-directories are known by name only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryListing {
    pub dir: String,
    pub files: Vec<RepoFileEntry>,
    pub sub_directories: Vec<String>,
    pub other_assets: Vec<OtherAsset>,
}

/// The repository README, constructible even when no README exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadmeDocument {
    pub exists: bool,
    pub content: Option<String>,
    /// Raw content URL, computed from a string template.
    pub raw_url: String,
    /// Browsable/editor URL, computed from a string template.
    pub editor_url: String,
}

/// Host-neutral commit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub author: Option<CommitSignature>,
    pub committer: Option<CommitSignature>,
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitSignature {
    pub name: String,
    pub email: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Host-neutral issue record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub body: Option<String>,
    pub user: Option<String>,
    pub labels: Vec<String>,
    pub comments: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub html_url: Option<String>,
}

/// Plain pagination, for endpoints with no other knobs.
#[derive(Debug, Clone, Default)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub(crate) fn qp(&self) -> Vec<(String, String)> {
        let mut qp = Vec::new();
        if let Some(page) = self.page {
            qp.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            qp.push(("per_page".to_string(), per_page.to_string()));
        }
        qp
    }
}

/// Query parameters for commit listings.
#[derive(Debug, Clone, Default)]
pub struct CommitQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// SHA or branch to start listing commits from.
    pub sha: Option<String>,
    /// Only commits touching this path.
    pub path: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl CommitQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    /// Advance to the next page, starting at page 2 when no page had been
    /// requested yet. Returns the page number now set.
    pub fn advance_page(&mut self) -> u32 {
        let next = self.page.unwrap_or(1) + 1;
        self.page = Some(next);
        next
    }

    pub(crate) fn qp(&self) -> Vec<(String, String)> {
        let mut qp = Vec::new();
        if let Some(page) = self.page {
            qp.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            qp.push(("per_page".to_string(), per_page.to_string()));
        }
        if let Some(sha) = &self.sha {
            qp.push(("sha".to_string(), sha.clone()));
        }
        if let Some(path) = &self.path {
            qp.push(("path".to_string(), path.clone()));
        }
        if let Some(since) = &self.since {
            qp.push(("since".to_string(), since.to_rfc3339()));
        }
        if let Some(until) = &self.until {
            qp.push(("until".to_string(), until.to_rfc3339()));
        }
        qp
    }
}

/// Query parameters for issue listings.
#[derive(Debug, Clone, Default)]
pub struct IssueQuery {
    /// `open`, `closed` or `all`.
    pub state: Option<String>,
    /// Comma-separated label names.
    pub labels: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub since: Option<DateTime<Utc>>,
}

impl IssueQuery {
    pub(crate) fn qp(&self) -> Vec<(String, String)> {
        let mut qp = Vec::new();
        if let Some(state) = &self.state {
            qp.push(("state".to_string(), state.clone()));
        }
        if let Some(labels) = &self.labels {
            qp.push(("labels".to_string(), labels.clone()));
        }
        if let Some(page) = self.page {
            qp.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            qp.push(("per_page".to_string(), per_page.to_string()));
        }
        if let Some(since) = &self.since {
            qp.push(("since".to_string(), since.to_rfc3339()));
        }
        qp
    }
}

/// Query parameters for organization repo listings.
#[derive(Debug, Clone, Default)]
pub struct OrgRepoQuery {
    /// `created`, `updated`, `pushed` or `full_name`.
    pub sort: Option<String>,
    /// `asc` or `desc`.
    pub direction: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl OrgRepoQuery {
    pub(crate) fn qp(&self) -> Vec<(String, String)> {
        let mut qp = Vec::new();
        if let Some(sort) = &self.sort {
            qp.push(("sort".to_string(), sort.clone()));
        }
        if let Some(direction) = &self.direction {
            qp.push(("direction".to_string(), direction.clone()));
        }
        if let Some(page) = self.page {
            qp.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            qp.push(("per_page".to_string(), per_page.to_string()));
        }
        qp
    }
}

// ---------------------------------------------------------------------------
// GitHub wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct GithubAccount {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubRepoMeta {
    pub name: String,
    pub full_name: String,
    pub owner: GithubAccount,
    pub default_branch: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
}

impl From<GithubRepoMeta> for RepoMetadata {
    fn from(raw: GithubRepoMeta) -> Self {
        Self {
            name: raw.name,
            owner: raw.owner.login,
            full_name: raw.full_name,
            description: raw.description,
            default_branch: raw.default_branch,
            html_url: raw.html_url,
            private: raw.private,
            fork: raw.fork,
            archived: raw.archived,
            language: raw.language,
            stargazers_count: raw.stargazers_count,
            forks_count: raw.forks_count,
            open_issues_count: raw.open_issues_count,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            pushed_at: raw.pushed_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubBranch {
    pub name: String,
    pub commit: GithubBranchTarget,
    #[serde(default)]
    pub protected: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubBranchTarget {
    pub sha: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl From<GithubBranch> for Branch {
    fn from(raw: GithubBranch) -> Self {
        Self {
            name: raw.name,
            commit: BranchTarget {
                sha: raw.commit.sha,
                url: raw.commit.url,
            },
            protected: raw.protected,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubCommit {
    pub sha: String,
    pub commit: GithubCommitDetail,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubCommitDetail {
    pub message: String,
    #[serde(default)]
    pub author: Option<GithubCommitSignature>,
    #[serde(default)]
    pub committer: Option<GithubCommitSignature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubCommitSignature {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl From<GithubCommitSignature> for CommitSignature {
    fn from(raw: GithubCommitSignature) -> Self {
        Self {
            name: raw.name,
            email: raw.email,
            date: raw.date,
        }
    }
}

impl From<GithubCommit> for Commit {
    fn from(raw: GithubCommit) -> Self {
        Self {
            sha: raw.sha,
            message: raw.commit.message,
            author: raw.commit.author.map(Into::into),
            committer: raw.commit.committer.map(Into::into),
            html_url: raw.html_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubIssue {
    pub number: u64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub user: Option<GithubAccount>,
    #[serde(default)]
    pub labels: Vec<GithubLabel>,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubLabel {
    pub name: String,
}

impl From<GithubIssue> for Issue {
    fn from(raw: GithubIssue) -> Self {
        Self {
            number: raw.number,
            title: raw.title,
            state: raw.state,
            body: raw.body,
            user: raw.user.map(|u| u.login),
            labels: raw.labels.into_iter().map(|l| l.name).collect(),
            comments: raw.comments,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            html_url: raw.html_url,
        }
    }
}

/// One entry of the GitHub contents API. The `entry_type` stays a plain
/// string so unrecognized types can be dropped instead of failing the
/// whole listing.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubContentEntry {
    #[serde(rename = "type")]
    pub entry_type: String,
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_page_starts_at_two() {
        let mut query = CommitQuery::default();
        assert_eq!(query.advance_page(), 2);
        assert_eq!(query.advance_page(), 3);
        assert_eq!(query.page, Some(3));
    }

    #[test]
    fn advance_page_continues_from_requested_page() {
        let mut query = CommitQuery::page(5);
        assert_eq!(query.advance_page(), 6);
    }

    #[test]
    fn commit_query_serializes_present_fields_only() {
        let query = CommitQuery {
            page: Some(2),
            per_page: Some(30),
            ..CommitQuery::default()
        };
        assert_eq!(
            query.qp(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("per_page".to_string(), "30".to_string()),
            ]
        );
        assert!(CommitQuery::default().qp().is_empty());
    }

    #[test]
    fn github_commit_flattens_into_neutral_commit() {
        let raw: GithubCommit = serde_json::from_value(serde_json::json!({
            "sha": "abc123",
            "html_url": "https://github.com/org/repo/commit/abc123",
            "commit": {
                "message": "fix parser",
                "author": { "name": "Dee", "email": "dee@example.com", "date": "2024-03-01T12:00:00Z" }
            }
        }))
        .unwrap();

        let commit = Commit::from(raw);
        assert_eq!(commit.sha, "abc123");
        assert_eq!(commit.message, "fix parser");
        assert_eq!(commit.author.unwrap().name, "Dee");
        assert!(commit.committer.is_none());
    }

    #[test]
    fn github_issue_maps_labels_to_names() {
        let raw: GithubIssue = serde_json::from_value(serde_json::json!({
            "number": 7,
            "title": "crash on empty path",
            "state": "open",
            "user": { "login": "dee" },
            "labels": [{ "name": "bug" }, { "name": "p1" }]
        }))
        .unwrap();

        let issue = Issue::from(raw);
        assert_eq!(issue.labels, vec!["bug", "p1"]);
        assert_eq!(issue.user.as_deref(), Some("dee"));
    }
}
