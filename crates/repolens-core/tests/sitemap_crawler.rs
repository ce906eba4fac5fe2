//! Crawler behavior over an in-memory directory tree.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use repolens_core::error::{Error, Result};
use repolens_core::model::{DirectoryListing, RepoFileEntry};
use repolens_core::sitemap::{DirectorySource, Sitemap, SitemapOptions, crawl};

fn file(name: &str, dir: &str) -> RepoFileEntry {
    RepoFileEntry {
        filename: name.to_string(),
        filepath: if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        },
        sha: format!("sha-{name}"),
        size: 10,
        raw_url: None,
        url: None,
    }
}

fn listing(dir: &str, files: &[&str], sub_dirs: &[&str]) -> DirectoryListing {
    DirectoryListing {
        dir: dir.to_string(),
        files: files.iter().map(|name| file(name, dir)).collect(),
        sub_directories: sub_dirs.iter().map(|s| s.to_string()).collect(),
        other_assets: Vec::new(),
    }
}

/// Serves listings from a map and records every path it was asked for.
struct FixtureSource {
    listings: HashMap<String, DirectoryListing>,
    fetched: Mutex<Vec<String>>,
}

impl FixtureSource {
    fn new(listings: Vec<DirectoryListing>) -> Self {
        Self {
            listings: listings
                .into_iter()
                .map(|listing| (listing.dir.clone(), listing))
                .collect(),
            fetched: Mutex::new(Vec::new()),
        }
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectorySource for FixtureSource {
    async fn listing(&self, path: &str) -> Result<DirectoryListing> {
        self.fetched.lock().unwrap().push(path.to_string());
        self.listings
            .get(path)
            .cloned()
            .ok_or_else(|| Error::Transport {
                status: 404,
                url: format!("fixture://{path}"),
                message: "no such directory".to_string(),
            })
    }
}

/// The fixture from the reference scenario: a root with `a.yml`, `b.txt`
/// and a `.github` directory containing `ci.yml`.
fn example_tree() -> FixtureSource {
    FixtureSource::new(vec![
        listing("", &["a.yml", "b.txt"], &[".github"]),
        listing("/.github", &["ci.yml"], &[]),
    ])
}

#[tokio::test]
async fn yml_filter_keeps_matching_files_and_still_traverses() {
    let source = example_tree();
    let options = SitemapOptions::new()
        .with_file_filter(|name, _| name.ends_with(".yml") && !name.starts_with('.'));

    let root = crawl(&source, "", &options).await.unwrap();

    let names: Vec<&str> = root.files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["a.yml"]);
    assert_eq!(root.sub_directories.len(), 1);
    assert_eq!(root.sub_directories[0].dir, "/.github");
    assert_eq!(root.sub_directories[0].files[0].filename, "ci.yml");
}

#[tokio::test]
async fn flatten_is_complete_and_idempotent() {
    let source = example_tree();
    let options =
        SitemapOptions::new().with_file_filter(|name, _| name.ends_with(".yml"));
    let root = crawl(&source, "", &options).await.unwrap();

    let sitemap = Sitemap {
        repo: "org/example".to_string(),
        branch: "main".to_string(),
        path: String::new(),
        root,
    };

    let flat = sitemap.flatten();
    let mut names: Vec<&str> = flat.files.iter().map(|f| f.filename.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["a.yml", "ci.yml"]);

    let again = sitemap.flatten();
    assert_eq!(again.files, flat.files);
    assert_eq!(sitemap.root.files.len(), 1);
}

#[tokio::test]
async fn file_filter_matching_nothing_empties_every_level() {
    let source = example_tree();
    let options = SitemapOptions::new().with_file_filter(|_, _| false);

    let root = crawl(&source, "", &options).await.unwrap();

    assert!(root.files.is_empty());
    assert_eq!(root.sub_directories.len(), 1);
    assert!(root.sub_directories[0].files.is_empty());
}

#[tokio::test]
async fn rejected_directories_are_never_fetched() {
    let source = FixtureSource::new(vec![
        listing("", &["readme.md"], &["kept", "skipped"]),
        listing("/kept", &["inner.txt"], &[]),
        listing("/skipped", &["never.txt"], &[]),
    ]);
    let options = SitemapOptions::new().with_directory_filter(|name, _| name != "skipped");

    let root = crawl(&source, "", &options).await.unwrap();

    assert_eq!(root.sub_directories.len(), 1);
    assert_eq!(root.sub_directories[0].dir, "/kept");
    let fetched = source.fetched();
    assert!(fetched.contains(&"/kept".to_string()));
    assert!(!fetched.contains(&"/skipped".to_string()));
}

#[tokio::test]
async fn directory_filter_observes_the_unfiltered_listing() {
    let source = example_tree();
    let options = SitemapOptions::new()
        .with_file_filter(|_, _| false)
        .with_directory_filter(|_, listing| {
            // Files are still visible here even though the file filter
            // drops all of them from the sitemap.
            listing.files.iter().any(|f| f.filename == "a.yml")
        });

    let root = crawl(&source, "", &options).await.unwrap();
    assert_eq!(root.sub_directories.len(), 1);
}

#[tokio::test]
async fn depth_zero_stops_at_the_root_listing() {
    let source = example_tree();
    let options = SitemapOptions::new().with_depth(0);

    let root = crawl(&source, "", &options).await.unwrap();

    assert_eq!(root.files.len(), 2);
    assert!(root.sub_directories.is_empty());
    assert_eq!(source.fetched(), vec![""]);
}

#[tokio::test]
async fn depth_truncates_deeper_levels_only() {
    let source = FixtureSource::new(vec![
        listing("", &[], &["a"]),
        listing("/a", &["mid.txt"], &["b"]),
        listing("/a/b", &["deep.txt"], &[]),
    ]);
    let options = SitemapOptions::new().with_depth(1);

    let root = crawl(&source, "", &options).await.unwrap();

    assert_eq!(root.sub_directories.len(), 1);
    let child = &root.sub_directories[0];
    assert_eq!(child.files[0].filename, "mid.txt");
    assert!(child.sub_directories.is_empty());
    assert!(!source.fetched().contains(&"/a/b".to_string()));
}

#[tokio::test]
async fn any_branch_failure_aborts_the_whole_crawl() {
    // "/broken" has no listing in the fixture, so its fetch fails.
    let source = FixtureSource::new(vec![listing("", &[], &["ok", "broken"]), listing(
        "/ok",
        &["fine.txt"],
        &[],
    )]);

    let err = crawl(&source, "", &SitemapOptions::new()).await.unwrap_err();
    assert!(matches!(err, Error::Transport { status: 404, .. }));
}
