//! Recursive directory-tree crawler and the sitemap it produces.
//!
//! The crawler walks one directory level at a time: it fetches the listing,
//! applies the file and directory filters, then recurses into every
//! surviving sub-directory concurrently. Siblings at a level are awaited
//! together, so a parent node only resolves once all of its children have.
//! A failure in any branch aborts the whole crawl; partial trees are never
//! returned.

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, try_join_all};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::model::{DirectoryListing, RepoFileEntry};

/// Predicate deciding whether a file is kept in the sitemap. Receives the
/// filename and the full file entry.
pub type FileFilter = Box<dyn Fn(&str, &RepoFileEntry) -> bool + Send + Sync>;

/// Predicate deciding whether a sub-directory is recursed into. Receives
/// the directory name and the unfiltered listing it was found in. Rejected
/// directories are never fetched.
pub type DirectoryFilter = Box<dyn Fn(&str, &DirectoryListing) -> bool + Send + Sync>;

/// Options for [`crawl`] and `build_sitemap`.
#[derive(Default)]
pub struct SitemapOptions {
    pub file_filter: Option<FileFilter>,
    pub directory_filter: Option<DirectoryFilter>,
    /// Maximum depth below the crawl root. `Some(0)` stops at the root
    /// listing; `None` traverses without bound.
    pub depth: Option<usize>,
}

impl SitemapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_filter(
        mut self,
        filter: impl Fn(&str, &RepoFileEntry) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.file_filter = Some(Box::new(filter));
        self
    }

    pub fn with_directory_filter(
        mut self,
        filter: impl Fn(&str, &DirectoryListing) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.directory_filter = Some(Box::new(filter));
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }
}

/// Anything that can produce one directory level on demand. Implemented by
/// the provider adapters; test fixtures implement it over in-memory trees.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    async fn listing(&self, path: &str) -> Result<DirectoryListing>;
}

/// A directory node in the sitemap tree. Each parent exclusively owns its
/// children; there are no back-references.
#[derive(Debug, Clone, Serialize)]
pub struct SitemapDirectory {
    pub dir: String,
    pub files: Vec<RepoFileEntry>,
    pub sub_directories: Vec<SitemapDirectory>,
}

/// The hierarchical sitemap built from a repository, plus its flattened
/// view.
#[derive(Debug, Clone, Serialize)]
pub struct Sitemap {
    pub repo: String,
    pub branch: String,
    /// The root filepath the crawl began at.
    pub path: String,
    pub root: SitemapDirectory,
}

/// The depth-first union of every file in a sitemap.
#[derive(Debug, Clone, Serialize)]
pub struct FlatSitemap {
    pub repo: String,
    pub branch: String,
    pub path: String,
    pub files: Vec<RepoFileEntry>,
}

impl Sitemap {
    /// Flatten the tree into the union of every node's files. Pure derived
    /// view: calling it twice yields equal results and never mutates the
    /// tree.
    pub fn flatten(&self) -> FlatSitemap {
        FlatSitemap {
            repo: self.repo.clone(),
            branch: self.branch.clone(),
            path: self.path.clone(),
            files: flatten_directory(&self.root),
        }
    }
}

fn flatten_directory(dir: &SitemapDirectory) -> Vec<RepoFileEntry> {
    let mut flat = dir.files.clone();
    for child in &dir.sub_directories {
        flat.extend(flatten_directory(child));
    }
    flat
}

/// Crawl the directory tree under `path`.
pub async fn crawl<S: DirectorySource>(
    source: &S,
    path: &str,
    options: &SitemapOptions,
) -> Result<SitemapDirectory> {
    crawl_dir(source, path.to_string(), options, options.depth).await
}

fn crawl_dir<'a, S: DirectorySource>(
    source: &'a S,
    path: String,
    options: &'a SitemapOptions,
    depth: Option<usize>,
) -> BoxFuture<'a, Result<SitemapDirectory>> {
    async move {
        debug!("crawling directory: {:?}", path);
        let listing = source.listing(&path).await?;

        let files: Vec<RepoFileEntry> = listing
            .files
            .iter()
            .filter(|file| match &options.file_filter {
                Some(filter) => filter(&file.filename, file),
                None => true,
            })
            .cloned()
            .collect();

        // The directory filter observes the unfiltered listing as context.
        let survivors: Vec<String> = listing
            .sub_directories
            .iter()
            .filter(|name| match &options.directory_filter {
                Some(filter) => filter(name, &listing),
                None => true,
            })
            .cloned()
            .collect();

        let mut node = SitemapDirectory {
            dir: path.clone(),
            files,
            sub_directories: Vec::new(),
        };

        let descend = depth.is_none_or(|remaining| remaining > 0);
        if descend && !survivors.is_empty() {
            let next_depth = depth.map(|remaining| remaining - 1);
            let children = survivors
                .iter()
                .map(|child| crawl_dir(source, join_path(&path, child), options, next_depth));
            node.sub_directories = try_join_all(children).await?;
        }

        Ok(node)
    }
    .boxed()
}

/// Join a directory path and a child name. The crawl root joins to
/// `/child` so that sub-directory paths are always absolute within the
/// repository.
fn join_path(parent: &str, child: &str) -> String {
    format!("{}/{}", parent.trim_end_matches('/'), child)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_path_handles_root_and_nested() {
        assert_eq!(join_path("", ".github"), "/.github");
        assert_eq!(join_path("/.github", "workflows"), "/.github/workflows");
        assert_eq!(join_path("/src/", "providers"), "/src/providers");
    }

    fn file(name: &str) -> RepoFileEntry {
        RepoFileEntry {
            filename: name.to_string(),
            filepath: String::new(),
            sha: format!("sha-{name}"),
            size: 1,
            raw_url: None,
            url: None,
        }
    }

    #[test]
    fn flatten_unions_every_level() {
        let sitemap = Sitemap {
            repo: "org/example".to_string(),
            branch: "main".to_string(),
            path: String::new(),
            root: SitemapDirectory {
                dir: String::new(),
                files: vec![file("a.yml")],
                sub_directories: vec![SitemapDirectory {
                    dir: "/.github".to_string(),
                    files: vec![file("ci.yml")],
                    sub_directories: vec![SitemapDirectory {
                        dir: "/.github/workflows".to_string(),
                        files: vec![file("release.yml")],
                        sub_directories: Vec::new(),
                    }],
                }],
            },
        };

        let flat = sitemap.flatten();
        let names: Vec<&str> = flat.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a.yml", "ci.yml", "release.yml"]);

        // Idempotent: a second flatten sees the same tree.
        assert_eq!(sitemap.flatten().files, flat.files);
        assert_eq!(sitemap.root.files.len(), 1);
    }
}
