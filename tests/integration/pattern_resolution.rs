//! Integration tests for pattern resolution against a real directory tree

use super::test_utils::{fixture, strings};
use cartographer::tree::{ResolvedScope, Resolver, ResolverConfig};
use cartographer::CartographyError;
use std::path::Path;

fn resolve(root: &Path, include: &[&str], exclude: &[&str]) -> ResolvedScope {
    let config = ResolverConfig::new(strings(include), strings(exclude));
    Resolver::new(root, &config).unwrap().resolve().unwrap()
}

fn files(scope: &ResolvedScope) -> Vec<&str> {
    scope.files.iter().map(String::as_str).collect()
}

fn project() -> tempfile::TempDir {
    fixture(&[
        ("package.json", "{}"),
        ("src/index.ts", "index"),
        ("src/index.test.ts", "test"),
        ("src/util/strings.ts", "strings"),
        ("src/util/strings.d.ts", "decl"),
        ("vendor/src/lib.ts", "vendored"),
        ("node_modules/pkg/index.js", "dep"),
        ("build/out.js", "out"),
        ("logs/access.log", "log"),
        ("error.log", "log"),
    ])
}

#[test]
fn test_include_and_exclude() {
    let temp_dir = project();
    let scope = resolve(
        temp_dir.path(),
        &["/src/**/*.ts", "package.json"],
        &["**/*.test.ts", "*.d.ts"],
    );
    assert_eq!(
        files(&scope),
        vec!["package.json", "src/index.ts", "src/util/strings.ts"]
    );
    assert_eq!(
        scope.folders.iter().map(String::as_str).collect::<Vec<_>>(),
        vec![".", "src", "src/util"]
    );
}

#[test]
fn test_unanchored_pattern_matches_at_any_depth() {
    let temp_dir = project();
    let scope = resolve(temp_dir.path(), &["*.log"], &[]);
    assert_eq!(files(&scope), vec!["error.log", "logs/access.log"]);

    let scope = resolve(temp_dir.path(), &["src/**/*.ts"], &["**/*.test.ts", "**/*.d.ts"]);
    assert_eq!(
        files(&scope),
        vec!["src/index.ts", "src/util/strings.ts", "vendor/src/lib.ts"]
    );
}

#[test]
fn test_anchored_pattern_matches_only_at_root() {
    let temp_dir = project();
    let scope = resolve(temp_dir.path(), &["/*.log"], &[]);
    assert_eq!(files(&scope), vec!["error.log"]);
}

#[test]
fn test_directory_pattern_excludes_subtree() {
    let temp_dir = project();
    let scope = resolve(temp_dir.path(), &["**/*"], &["node_modules/", "build/", "src/"]);
    assert_eq!(
        files(&scope),
        vec!["error.log", "logs/access.log", "package.json"]
    );
}

#[test]
fn test_gitignore_is_respected() {
    let temp_dir = project();
    std::fs::write(
        temp_dir.path().join(".gitignore"),
        "node_modules/\nbuild\n*.log\n",
    )
    .unwrap();

    let scope = resolve(temp_dir.path(), &["**/*"], &[]);
    assert!(!scope.files.iter().any(|f| f.starts_with("node_modules/")));
    assert!(!scope.files.iter().any(|f| f.starts_with("build/")));
    assert!(!scope.files.iter().any(|f| f.ends_with(".log")));
    assert!(!scope.files.contains(".gitignore"));
    assert!(scope.files.contains("package.json"));

    let config = ResolverConfig {
        respect_gitignore: false,
        ..ResolverConfig::new(strings(&["**/*"]), vec![])
    };
    let scope = Resolver::new(temp_dir.path(), &config)
        .unwrap()
        .resolve()
        .unwrap();
    assert!(scope.files.contains("node_modules/pkg/index.js"));
    assert!(scope.files.contains("error.log"));
}

#[test]
fn test_hidden_entries_and_state_dir() {
    let temp_dir = fixture(&[
        ("src/a.ts", "a"),
        (".env", "secret"),
        (".github/workflows/ci.yml", "ci"),
        (".slim/cartography.json", "{}"),
        ("src/codemap.md", "# src/"),
    ]);

    let scope = resolve(temp_dir.path(), &["**/*"], &[]);
    assert_eq!(files(&scope), vec!["src/a.ts"]);

    let config = ResolverConfig {
        skip_hidden: false,
        ..ResolverConfig::new(strings(&["**/*"]), vec![])
    };
    let scope = Resolver::new(temp_dir.path(), &config)
        .unwrap()
        .resolve()
        .unwrap();
    assert!(scope.files.contains(".env"));
    assert!(scope.files.contains(".github/workflows/ci.yml"));
    assert!(!scope.files.contains(".slim/cartography.json"));
    assert!(!scope.files.contains("src/codemap.md"));
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_followed() {
    let temp_dir = fixture(&[("real/a.txt", "a")]);
    std::os::unix::fs::symlink(temp_dir.path().join("real"), temp_dir.path().join("link"))
        .unwrap();
    std::os::unix::fs::symlink(
        temp_dir.path().join("real/a.txt"),
        temp_dir.path().join("b.txt"),
    )
    .unwrap();

    let scope = resolve(temp_dir.path(), &["**/*"], &[]);
    assert_eq!(files(&scope), vec!["real/a.txt"]);
}

#[test]
fn test_invalid_inputs() {
    let temp_dir = project();

    let err = Resolver::new(
        &temp_dir.path().join("package.json"),
        &ResolverConfig::new(strings(&["**/*"]), vec![]),
    )
    .err()
    .unwrap();
    assert!(matches!(err, CartographyError::InvalidRoot(_)));

    let err = Resolver::new(temp_dir.path(), &ResolverConfig::new(vec![], vec![]))
        .err()
        .unwrap();
    assert!(matches!(err, CartographyError::NoIncludePatterns));

    let err = Resolver::new(
        temp_dir.path(),
        &ResolverConfig::new(strings(&["src/[unclosed"]), vec![]),
    )
    .err()
    .unwrap();
    assert!(matches!(err, CartographyError::InvalidPattern { .. }));
}
