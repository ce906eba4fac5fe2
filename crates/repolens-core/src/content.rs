//! Normalizes raw directory listings into the neutral [`DirectoryListing`].

use crate::model::{DirectoryListing, GithubContentEntry, OtherAsset, RepoFileEntry};

/// Classify the raw entries of one directory level into files,
/// sub-directory names and other assets.
///
/// Classification is per entry and order-preserving within each bucket:
/// files keep their containing-directory path, directories contribute their
/// bare name only, symlinks and submodules land in `other_assets`.
/// Unrecognized entry types are silently dropped.
pub fn normalize_listing(dir: &str, entries: Vec<GithubContentEntry>) -> DirectoryListing {
    let mut listing = DirectoryListing {
        dir: dir.to_string(),
        ..DirectoryListing::default()
    };

    for entry in entries {
        match entry.entry_type.as_str() {
            "file" => {
                let filepath = entry
                    .path
                    .strip_suffix(&entry.name)
                    .unwrap_or("")
                    .to_string();
                listing.files.push(RepoFileEntry {
                    filename: entry.name,
                    filepath,
                    sha: entry.sha,
                    size: entry.size,
                    raw_url: entry.download_url,
                    url: entry.html_url,
                });
            }
            "dir" => listing.sub_directories.push(entry.name),
            "symlink" => listing.other_assets.push(OtherAsset::Symlink { sha: entry.sha }),
            "submodule" => listing.other_assets.push(OtherAsset::Submodule {
                sha: entry.sha,
                name: entry.name,
            }),
            _ => {}
        }
    }

    listing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(entry_type: &str, name: &str, path: &str) -> GithubContentEntry {
        serde_json::from_value(serde_json::json!({
            "type": entry_type,
            "name": name,
            "path": path,
            "sha": format!("sha-{name}"),
            "size": 42,
            "html_url": format!("https://github.com/org/repo/blob/main/{path}"),
            "download_url": format!("https://raw.githubusercontent.com/org/repo/main/{path}"),
        }))
        .unwrap()
    }

    #[test]
    fn classifies_entries_into_buckets() {
        let listing = normalize_listing(
            "src",
            vec![
                entry("file", "lib.rs", "src/lib.rs"),
                entry("dir", "providers", "src/providers"),
                entry("symlink", "latest", "src/latest"),
                entry("submodule", "vendored", "src/vendored"),
            ],
        );

        assert_eq!(listing.dir, "src");
        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.sub_directories, vec!["providers"]);
        assert_eq!(
            listing.other_assets,
            vec![
                OtherAsset::Symlink {
                    sha: "sha-latest".to_string()
                },
                OtherAsset::Submodule {
                    sha: "sha-vendored".to_string(),
                    name: "vendored".to_string()
                },
            ]
        );
    }

    #[test]
    fn file_keeps_containing_directory_path() {
        let listing = normalize_listing("src", vec![entry("file", "lib.rs", "src/lib.rs")]);
        assert_eq!(listing.files[0].filepath, "src/");
        assert_eq!(listing.files[0].filename, "lib.rs");

        let root = normalize_listing("", vec![entry("file", "README.md", "README.md")]);
        assert_eq!(root.files[0].filepath, "");
    }

    #[test]
    fn unrecognized_types_are_dropped_silently() {
        let listing = normalize_listing("", vec![entry("wormhole", "x", "x")]);
        assert!(listing.files.is_empty());
        assert!(listing.sub_directories.is_empty());
        assert!(listing.other_assets.is_empty());
    }

    #[test]
    fn bucket_order_matches_input_order() {
        let listing = normalize_listing(
            "",
            vec![
                entry("dir", "b", "b"),
                entry("file", "z.txt", "z.txt"),
                entry("dir", "a", "a"),
                entry("file", "a.txt", "a.txt"),
            ],
        );
        assert_eq!(listing.sub_directories, vec!["b", "a"]);
        let names: Vec<&str> = listing.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["z.txt", "a.txt"]);
    }
}
