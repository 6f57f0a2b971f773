use coherent_preact::setup::{GitInitializer, VersionControl};
use git2::Repository;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_git_initializer_commits_every_file() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("package.json"), "{}").unwrap();
    fs::write(dir.path().join("src/index.js"), "export default 1;\n").unwrap();

    GitInitializer.init(dir.path()).unwrap();

    let repo = Repository::open(dir.path()).unwrap();
    let commit = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(commit.message(), Some("initial commit from coherent-preact"));
    assert_eq!(commit.parent_count(), 0);

    let tree = commit.tree().unwrap();
    assert!(tree.get_name("package.json").is_some());
    assert!(tree.get_path(std::path::Path::new("src/index.js")).is_ok());
}
