// tests/fs_abstraction.rs

mod common;
use crate::common::builders::{BlockBuilder, ConfigBuilder};
use crate::common::runner_with;

use std::path::Path;
use std::sync::Arc;

use prepwatch::engine::{plan_batch, plan_initial, RunnerOptions};
use prepwatch::notifier::Notifiers;
use prepwatch_test_utils::fake_executor::FakeExecutor;
use prepwatch::fs::mock::MockFileSystem;
use prepwatch::fs::FileSystem;
use prepwatch::watch::{initial_batch, list_files, ChangeBatch, WatchFilter};

fn sample_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("./src/main.rs");
    fs.add_file("./src/lib.rs");
    fs.add_file("./src/bin/tool.rs");
    fs.add_file("./README.md");
    fs.add_file("./.git/HEAD");
    fs.add_file("./web/node_modules/dep/index.js");
    fs.add_file("./web/app.js");
    fs.add_dir("./empty");
    fs
}

#[test]
fn test_mock_fs_tree() {
    let fs = sample_fs();
    assert!(fs.is_dir(Path::new("src")));
    assert!(fs.is_dir(Path::new("./src/bin")));
    assert!(fs.is_file(Path::new("src/main.rs")));
    assert!(fs.exists(Path::new("./README.md")));
    assert!(!fs.exists(Path::new("nope")));
    assert!(fs.read_dir(Path::new("src/main.rs")).is_err());

    fs.remove("src/lib.rs");
    assert!(!fs.exists(Path::new("src/lib.rs")));
    let children = fs.read_dir(Path::new("src")).unwrap();
    assert!(!children.iter().any(|p| p.ends_with("lib.rs")));
}

#[test]
fn test_listing_only_keeps_relevant_files() {
    let fs = sample_fs();
    let cfg = ConfigBuilder::new()
        .with_block(BlockBuilder::new("src/**/*.rs").prep("cargo build").build())
        .with_block(BlockBuilder::new("**/*.js").prep("npm test").build())
        .build();
    let filter = WatchFilter::from_config(&cfg).unwrap();

    let files = list_files(&fs, Path::new("."), &filter).unwrap();
    assert_eq!(
        files,
        vec!["src/bin/tool.rs", "src/lib.rs", "src/main.rs", "web/app.js"]
    );
}

#[test]
fn test_listing_without_common_excludes_descends_everywhere() {
    let fs = sample_fs();
    let cfg = ConfigBuilder::new()
        .with_common_excludes(false)
        .with_block(BlockBuilder::new("**").prep("true").build())
        .build();
    let filter = WatchFilter::from_config(&cfg).unwrap();

    let files = list_files(&fs, Path::new("."), &filter).unwrap();
    assert!(files.contains(&".git/HEAD".to_string()));
    assert!(files.contains(&"web/node_modules/dep/index.js".to_string()));
}

#[test]
fn test_initial_plan_runs_every_block_with_its_existing_files() {
    let fs = sample_fs();
    let cfg = ConfigBuilder::new()
        .with_block(BlockBuilder::new("src/*.rs").prep("build @mods").build())
        .with_block(BlockBuilder::new("docs/**").prep("docs").build())
        .with_block(BlockBuilder::new("*.md").prep("lint @mods").build())
        .build();
    let filter = WatchFilter::from_config(&cfg).unwrap();
    let listing = initial_batch(&fs, Path::new("."), &filter).unwrap();

    let plan = plan_initial(&cfg, &listing);
    assert!(plan.initial);
    assert_eq!(plan.block_indices(), vec![0, 1, 2]);
    assert_eq!(plan.runs[0].batch.all(), vec!["src/lib.rs", "src/main.rs"]);
    assert!(plan.runs[1].batch.is_empty());
    assert_eq!(plan.runs[2].batch.all(), vec!["README.md"]);
}

#[test]
fn test_batch_plan_skips_blocks_without_matches() {
    let cfg = ConfigBuilder::new()
        .with_block(BlockBuilder::new("src/*.rs").prep("build").build())
        .with_block(BlockBuilder::new("docs/**").prep("docs").build())
        .with_block(BlockBuilder::new("**").exclude("**/*.md").prep("all").build())
        .build();

    let batch = ChangeBatch::new(["docs/intro.md"], Vec::<String>::new(), Vec::<String>::new());
    let plan = plan_batch(&cfg, &batch);
    assert!(!plan.initial);
    assert_eq!(plan.block_indices(), vec![1]);

    let empty = plan_batch(&cfg, &ChangeBatch::default());
    assert!(empty.is_empty());
}

#[test]
fn test_unreadable_subdirectory_is_skipped() {
    let fs = sample_fs();
    fs.add_file("./private/secret.rs");
    fs.deny_read("private");
    let cfg = ConfigBuilder::new()
        .with_block(BlockBuilder::new("**/*.rs").prep("true").build())
        .build();
    let filter = WatchFilter::from_config(&cfg).unwrap();

    let files = list_files(&fs, Path::new("."), &filter).unwrap();
    assert_eq!(files, vec!["src/bin/tool.rs", "src/lib.rs", "src/main.rs"]);
}

#[test]
fn test_unreadable_root_is_an_error() {
    let fs = MockFileSystem::new();
    fs.deny_read(".");
    let cfg = ConfigBuilder::new()
        .with_block(BlockBuilder::new("**").prep("true").build())
        .build();
    let filter = WatchFilter::from_config(&cfg).unwrap();

    assert!(list_files(&fs, Path::new("."), &filter).is_err());
}

#[tokio::test]
async fn test_runner_survives_unreadable_subdirectory() {
    let fs = sample_fs();
    fs.deny_read("src/bin");
    let cfg = ConfigBuilder::new()
        .with_block(BlockBuilder::new("src/**/*.rs").prep("build @mods").build())
        .build();
    let exec = FakeExecutor::new();
    let (runner, _tx, _log) = runner_with(
        cfg,
        Path::new("."),
        Arc::new(exec.clone()),
        Arc::new(fs),
        Notifiers::new(),
        RunnerOptions { prep_only: true },
    );

    runner.run().await.unwrap();

    assert_eq!(
        exec.executed(),
        vec![r#"build "./src/lib.rs" "./src/main.rs""#.to_string()]
    );
}

#[cfg(unix)]
#[test]
fn test_symlinked_directories_are_not_followed() {
    use prepwatch::fs::RealFileSystem;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("a")).unwrap();
    std::fs::write(root.join("a/file"), "x").unwrap();
    std::os::unix::fs::symlink("..", root.join("a/loop")).unwrap();

    let outside = tempfile::tempdir().unwrap();
    std::fs::write(outside.path().join("elsewhere"), "y").unwrap();
    std::os::unix::fs::symlink(outside.path(), root.join("out")).unwrap();

    let cfg = ConfigBuilder::new()
        .with_block(BlockBuilder::new("**").prep("true").build())
        .build();
    let filter = WatchFilter::from_config(&cfg).unwrap();

    let fs = RealFileSystem;
    assert!(fs.is_symlink(&root.join("a/loop")));
    assert!(!fs.is_symlink(&root.join("a")));

    let batch = initial_batch(&fs, root, &filter).unwrap();
    assert_eq!(batch.all(), vec!["a/file".to_string()]);
}
