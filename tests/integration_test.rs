//! Integration tests for Repolens

#[test]
fn test_workspace_builds() {
    // Basic smoke test to ensure the workspace compiles
    assert!(true);
}

#[test]
fn test_git_sources() {
    use repolens_core::reference::GitSource;

    // Test that all recognized sources can be instantiated
    let _ = GitSource::Github;
    let _ = GitSource::Bitbucket;
    let _ = GitSource::Gitlab;
    let _ = GitSource::Unknown;
}
