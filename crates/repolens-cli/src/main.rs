//! Repolens - read-only Git hosting client
//!
//! Usage:
//!   repolens --repo owner/name meta
//!   repolens --repo owner/name branches
//!   repolens --repo https://github.com/owner/name sitemap --ext yml
//!   repolens --repo owner/name file src/lib.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repolens_core::model::{CommitQuery, IssueQuery, OrgRepoQuery};
use repolens_core::sitemap::SitemapOptions;
use repolens_core::{RepoOptions, repo_info};

#[derive(Parser)]
#[command(name = "repolens")]
#[command(about = "Read-only client for Git hosting APIs", long_about = None)]
struct Cli {
    /// Repository reference: `owner/name` or a host URL
    #[arg(long, short)]
    repo: String,

    /// Branch to bind (defaults to the repository's default branch)
    #[arg(long, short)]
    branch: Option<String>,

    /// API token (overrides the environment and the config file)
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show repository metadata
    Meta,

    /// List branches, keyed by name
    Branches,

    /// Show the root README
    Readme,

    /// Print the raw content of a file
    File {
        /// Path of the file within the repository
        path: String,
    },

    /// List commits
    Commits {
        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        per_page: Option<u32>,
    },

    /// List issues
    Issues {
        /// Filter by state: open, closed or all
        #[arg(long)]
        state: Option<String>,
    },

    /// List the files and sub-directories of one directory level
    Ls {
        /// Directory path ("" is the repository root)
        #[arg(default_value = "")]
        path: String,
    },

    /// Build a recursive sitemap of the repository
    Sitemap {
        /// Root path to start the crawl from
        #[arg(default_value = "")]
        root: String,

        /// Keep only files with this extension
        #[arg(long)]
        ext: Option<String>,

        /// Skip dotfiles and dot-directories
        #[arg(long)]
        no_dotfiles: bool,

        /// Maximum depth below the root
        #[arg(long)]
        depth: Option<usize>,

        /// Print the flattened file list instead of the tree
        #[arg(long)]
        flat: bool,
    },

    /// List repositories in the owning organization
    OrgRepos {
        /// Sort order: created, updated, pushed or full_name
        #[arg(long)]
        sort: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut options = RepoOptions::new();
    if let Some(branch) = &cli.branch {
        options = options.with_branch(branch.clone());
    }
    if let Some(token) = &cli.token {
        options = options.with_token(token.clone());
    }
    if matches!(cli.command, Commands::Readme) {
        options = options.with_readme();
    }

    let session = repo_info(&cli.repo, options).await?;
    debug!(
        "session bound to {} on branch {}",
        session.repo(),
        session.branch()
    );

    match cli.command {
        Commands::Meta => {
            println!("{}", serde_json::to_string_pretty(session.meta())?);
        }
        Commands::Branches => {
            let lookup: std::collections::BTreeMap<&str, _> = session
                .list_of_branches()
                .into_iter()
                .filter_map(|name| session.branch_info(name).map(|branch| (name, branch)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&lookup)?);
        }
        Commands::Readme => {
            // Preloaded above, so the embedded value is always present.
            println!("{}", serde_json::to_string_pretty(&session.readme())?);
        }
        Commands::File { path } => {
            print!("{}", session.get_file_content(&path).await?);
        }
        Commands::Commits { page, per_page } => {
            let query = CommitQuery {
                page,
                per_page,
                ..CommitQuery::default()
            };
            let commits = session.get_commits(&query).await?;
            println!("{}", serde_json::to_string_pretty(&commits)?);
        }
        Commands::Issues { state } => {
            let query = IssueQuery {
                state,
                ..IssueQuery::default()
            };
            let issues = session.get_issues(&query).await?;
            println!("{}", serde_json::to_string_pretty(&issues)?);
        }
        Commands::Ls { path } => {
            let listing = session.get_content_in_repo(&path).await?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Commands::Sitemap {
            root,
            ext,
            no_dotfiles,
            depth,
            flat,
        } => {
            let mut sitemap_options = SitemapOptions::new();

            let suffix = ext.map(|ext| format!(".{}", ext.trim_start_matches('.')));
            sitemap_options = sitemap_options.with_file_filter(move |name, _| {
                if no_dotfiles && name.starts_with('.') {
                    return false;
                }
                match &suffix {
                    Some(suffix) => name.ends_with(suffix.as_str()),
                    None => true,
                }
            });
            if no_dotfiles {
                sitemap_options =
                    sitemap_options.with_directory_filter(|name, _| !name.starts_with('.'));
            }
            if let Some(depth) = depth {
                sitemap_options = sitemap_options.with_depth(depth);
            }

            let sitemap = session.build_sitemap(&root, &sitemap_options).await?;
            if flat {
                println!("{}", serde_json::to_string_pretty(&sitemap.flatten())?);
            } else {
                println!("{}", serde_json::to_string_pretty(&sitemap)?);
            }
        }
        Commands::OrgRepos { sort } => {
            let query = OrgRepoQuery {
                sort,
                ..OrgRepoQuery::default()
            };
            let repos = session.get_repos_in_org(&query).await?;
            println!("{}", serde_json::to_string_pretty(&repos)?);
        }
    }

    Ok(())
}
