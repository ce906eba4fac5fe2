//! Repository reference resolution.
//!
//! A reference is either an `owner/name` shorthand or a full URL on one of
//! the recognized hosts. Both forms reduce to a [`RepoRef`] plus a
//! [`GitSource`] tag before any network call is made.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// The Git hosting service a repository lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitSource {
    Github,
    Bitbucket,
    Gitlab,
    /// A host that could not be recognized. Terminal: no operation may
    /// proceed against an unknown source.
    Unknown,
}

impl fmt::Display for GitSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GitSource::Github => "github",
            GitSource::Bitbucket => "bitbucket",
            GitSource::Gitlab => "gitlab",
            GitSource::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

impl FromStr for GitSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "github" => GitSource::Github,
            "bitbucket" => GitSource::Bitbucket,
            "gitlab" => GitSource::Gitlab,
            _ => GitSource::Unknown,
        })
    }
}

/// An `owner/name` repository pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// The canonical `owner/name` form used in host URL templates.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Reduce a reference string to a repository pair and its source host.
///
/// Accepted forms:
/// - `owner/name` shorthand (resolves to GitHub)
/// - `https://github.com/owner/name`
/// - `https://bitbucket.org/owner/name` (also `.com`)
/// - `https://gitlab.com/owner/name`
///
/// A trailing `.git` on the repo name is tolerated. URLs on any other host
/// fail with [`Error::UnknownSource`]; anything else fails with
/// [`Error::Resolution`]. Both failures happen before any network call.
pub fn resolve(reference: &str) -> Result<(RepoRef, GitSource)> {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return resolve_url(reference);
    }

    // Shorthand: exactly one separator, both segments non-empty.
    let mut parts = reference.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
            Ok((RepoRef::new(owner, strip_git_suffix(name)), GitSource::Github))
        }
        _ => Err(Error::Resolution {
            reference: reference.to_string(),
        }),
    }
}

fn resolve_url(reference: &str) -> Result<(RepoRef, GitSource)> {
    let url = Url::parse(reference).map_err(|_| Error::Resolution {
        reference: reference.to_string(),
    })?;

    let source = match url.host_str() {
        Some("github.com") | Some("www.github.com") => GitSource::Github,
        Some("bitbucket.org") | Some("bitbucket.com") => GitSource::Bitbucket,
        Some("gitlab.com") => GitSource::Gitlab,
        _ => {
            return Err(Error::UnknownSource {
                url: reference.to_string(),
            });
        }
    };

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        [owner, name, ..] => Ok((RepoRef::new(*owner, strip_git_suffix(name)), source)),
        _ => Err(Error::Resolution {
            reference: reference.to_string(),
        }),
    }
}

fn strip_git_suffix(name: &str) -> &str {
    name.strip_suffix(".git").unwrap_or(name)
}
