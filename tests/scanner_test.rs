use std::path::Path;
use tempfile::TempDir;

use devcycle::common::config::{Config, ExclusionSet};
use devcycle::scanner::{self, EntryKind, LanguageStats};

/// Project with src/app.js (5 lines), README.md and a populated node_modules
fn sample_project(dir: &Path) -> std::path::PathBuf {
    let root = dir.join("app");
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::write(root.join("src/app.js"), "a\nb\nc\nd\ne\n").unwrap();
    std::fs::write(root.join("README.md"), "# app\n").unwrap();

    let pkg = root.join("node_modules/left-pad");
    std::fs::create_dir_all(&pkg).unwrap();
    for i in 0..50 {
        std::fs::write(pkg.join(format!("f{}.js", i)), "x\n").unwrap();
    }
    root
}

// ─── Rendering ───────────────────────────────────────────────────────────────

#[test]
fn test_tree_excludes_node_modules() {
    let dir = TempDir::new().unwrap();
    let root = sample_project(dir.path());

    let tree = scanner::scan(&root, &Config::default().exclusions());

    assert_eq!(
        tree.to_plain_string(),
        "app/\n\
         ├── src/\n\
         │   └── app.js :: 5 lines\n\
         └── README.md :: 1 lines"
    );
    assert!(!tree.to_plain_string().contains("node_modules"));
}

#[test]
fn test_tree_stats_ignore_excluded_files() {
    let dir = TempDir::new().unwrap();
    let root = sample_project(dir.path());

    let tree = scanner::scan(&root, &Config::default().exclusions());

    assert_eq!(tree.stats.folders, 1);
    assert_eq!(tree.stats.files.total, 2);
    assert_eq!(tree.stats.files.by_type.len(), 1);
    assert_eq!(
        tree.stats.files.by_type["JavaScript"],
        LanguageStats { files: 1, lines: 5 }
    );
}

#[test]
fn test_directories_before_files_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("proj");
    std::fs::create_dir_all(root.join("b_dir")).unwrap();
    std::fs::create_dir_all(root.join("a_dir")).unwrap();
    std::fs::write(root.join("Z.txt"), "").unwrap();
    std::fs::write(root.join("a.txt"), "").unwrap();
    std::fs::write(root.join("B.txt"), "").unwrap();

    let tree = scanner::scan(&root, &ExclusionSet::default());
    let names: Vec<&str> = tree.lines.iter().map(|l| l.name.as_str()).collect();

    assert_eq!(names, vec!["a_dir", "b_dir", "a.txt", "B.txt", "Z.txt"]);
    assert_eq!(tree.lines[0].kind, EntryKind::Directory);
    assert_eq!(tree.lines[4].connector, "└── ");
}

#[test]
fn test_nested_prefixes() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("proj");
    std::fs::create_dir_all(root.join("outer/inner")).unwrap();
    std::fs::write(root.join("outer/inner/deep.rs"), "fn main() {}\n").unwrap();
    std::fs::write(root.join("outer/mid.ts"), "").unwrap();
    std::fs::write(root.join("top.sh"), "echo hi\n").unwrap();

    let tree = scanner::scan(&root, &ExclusionSet::default());

    assert_eq!(
        tree.to_plain_string(),
        "proj/\n\
         ├── outer/\n\
         │   ├── inner/\n\
         │   │   └── deep.rs :: 1 lines\n\
         │   └── mid.ts :: 0 lines\n\
         └── top.sh :: 1 lines"
    );
    assert_eq!(tree.stats.folders, 2);
    assert_eq!(tree.stats.files.by_type["TypeScript"], LanguageStats { files: 1, lines: 0 });
    assert_eq!(tree.stats.files.by_type["Shell Script"].lines, 1);
}

#[test]
fn test_empty_root() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("empty");
    std::fs::create_dir_all(&root).unwrap();

    let tree = scanner::scan(&root, &ExclusionSet::default());

    assert_eq!(tree.to_plain_string(), "empty/");
    assert_eq!(tree.stats.folders, 0);
    assert_eq!(tree.stats.files.total, 0);
}

// ─── Determinism ─────────────────────────────────────────────────────────────

#[test]
fn test_scan_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let root = sample_project(dir.path());
    std::fs::create_dir_all(root.join("src/lib")).unwrap();
    std::fs::write(root.join("src/lib/util.ts"), "export {}\n").unwrap();
    std::fs::write(root.join("src/App.svelte"), "<main></main>\n").unwrap();

    let exclusions = Config::default().exclusions();
    let first = scanner::scan(&root, &exclusions);
    let second = scanner::scan(&root, &exclusions);

    assert_eq!(first.to_plain_string(), second.to_plain_string());
    assert_eq!(first.stats, second.stats);
    assert_eq!(first.stats_json().unwrap(), second.stats_json().unwrap());
}

#[test]
fn test_stats_json_shape() {
    let dir = TempDir::new().unwrap();
    let root = sample_project(dir.path());

    let tree = scanner::scan(&root, &Config::default().exclusions());
    let json: serde_json::Value = serde_json::from_str(&tree.stats_json().unwrap()).unwrap();

    assert_eq!(json["folders"], 1);
    assert_eq!(json["files"]["total"], 2);
    assert_eq!(json["files"]["by_type"]["JavaScript"]["lines"], 5);
}
