//! Integration tests for converting a vault on disk

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use wikipress_core::{BuildError, Config, SiteBuilder};

fn config_for(root: &Path) -> Config {
    let mut config = Config::default();
    config.paths.vault = root.join("vault");
    config.paths.output = root.join("out");
    config
}

/// Vault with one post, one draft, and a series with an index and a member
fn sample_vault() -> TempDir {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    let posts = vault.join("Blog posts");
    let series = posts.join("Go Internals");
    fs::create_dir_all(posts.join("drafts")).unwrap();
    fs::create_dir_all(&series).unwrap();

    fs::write(vault.join("diagram v1.png"), b"png-bytes").unwrap();
    fs::write(vault.join("cover.png"), b"cover-bytes").unwrap();

    fs::write(
        posts.join("Hello World.md"),
        "Intro ![[diagram v1.png]]\n\nSee [[Scheduler Notes]].\n",
    )
    .unwrap();
    fs::write(posts.join("notes.txt"), "not markdown").unwrap();
    fs::write(posts.join("drafts").join("Idea.md"), "Rough idea").unwrap();
    fs::write(
        series.join("_index.md"),
        "---\ntitle: Old\nimage: ![[cover.png]]\n---\nAll about Go.\n",
    )
    .unwrap();
    fs::write(series.join("Part 1.md"), "The scheduler ![[diagram v1.png]]").unwrap();

    dir
}

fn read(path: PathBuf) -> String {
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {:?}: {}", path, e))
}

#[test]
fn test_converts_sample_vault() {
    let dir = sample_vault();
    let report = SiteBuilder::new(config_for(dir.path())).build().unwrap();
    let out = dir.path().join("out");

    assert_eq!(report.posts, 1);
    assert_eq!(report.drafts, 1);
    assert_eq!(report.series_members, 1);
    assert_eq!(report.series_indexes, 1);
    assert_eq!(report.images, 2);
    assert!(report.skipped.is_empty());

    assert_eq!(
        read(out.join("content/posts/Hello-World.md")),
        "---\ntitle: Hello World\ndraft: false\n---\n\n\
         Intro ![diagram-v1.png](/img/diagram-v1.png)\n\n\
         See [Scheduler Notes]({{<ref \"Scheduler-Notes\">}}).\n"
    );
    assert!(read(out.join("content/posts/Idea.md")).starts_with("---\ntitle: Idea\ndraft: true\n---"));

    let member = read(out.join("content/series/Go Internals/Part-1.md"));
    assert!(member.contains("series: [\"Go Internals\"]"));
    assert!(member.contains("![diagram-v1.png](/img/diagram-v1.png)"));

    assert_eq!(
        read(out.join("content/series-descriptions/Go Internals.md")),
        "---\ntitle: Go Internals\nimage: /img/cover.png\nseriesdesc: [\"Go Internals\"]\n---\nAll about Go."
    );

    assert_eq!(fs::read(out.join("img/diagram-v1.png")).unwrap(), b"png-bytes");
    assert_eq!(fs::read(out.join("img/cover.png")).unwrap(), b"cover-bytes");
    assert!(!out.join("content/posts/notes.md").exists());
}

#[test]
fn test_rebuild_is_idempotent() {
    let dir = sample_vault();
    let builder = SiteBuilder::new(config_for(dir.path()));
    let post = dir.path().join("out/content/posts/Hello-World.md");

    builder.build().unwrap();
    let first = read(post.clone());
    builder.build().unwrap();

    assert_eq!(read(post), first);
}

#[test]
fn test_missing_drafts_dir_is_fatal() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("vault/Blog posts")).unwrap();

    let err = SiteBuilder::new(config_for(dir.path())).build().unwrap_err();
    match err {
        BuildError::MissingDirectory(path) => assert!(path.ends_with("drafts")),
        other => panic!("Expected MissingDirectory, got {other:?}"),
    }
}

#[test]
fn test_missing_posts_dir_is_fatal() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("vault")).unwrap();

    assert!(matches!(
        SiteBuilder::new(config_for(dir.path())).build(),
        Err(BuildError::MissingDirectory(_))
    ));
}

#[test]
fn test_missing_image_is_skipped() {
    let dir = sample_vault();
    fs::write(
        dir.path().join("vault/Blog posts/Broken.md"),
        "![[nowhere.png]]",
    )
    .unwrap();

    let report = SiteBuilder::new(config_for(dir.path())).build().unwrap();

    assert_eq!(report.posts, 2);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].path.ends_with("nowhere.png"));
    assert!(dir.path().join("out/content/posts/Broken.md").exists());
}

#[test]
fn test_unreadable_file_is_skipped() {
    let dir = sample_vault();
    fs::write(dir.path().join("vault/Blog posts/Binary.md"), [0xff, 0xfe, 0x00]).unwrap();

    let report = SiteBuilder::new(config_for(dir.path())).build().unwrap();

    assert_eq!(report.posts, 1);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].path.ends_with("Binary.md"));
}

#[test]
fn test_image_outside_vault_is_not_copied() {
    let dir = sample_vault();
    fs::write(dir.path().join("secret.png"), b"secret").unwrap();
    fs::write(
        dir.path().join("vault/Blog posts/Leak.md"),
        "![[../secret.png]]",
    )
    .unwrap();

    let report = SiteBuilder::new(config_for(dir.path())).build().unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].path.ends_with("secret.png"));
    assert!(!dir.path().join("out/img/..secret.png").exists());
    assert!(dir.path().join("out/content/posts/Leak.md").exists());
}

#[cfg(unix)]
#[test]
fn test_dangling_entry_is_reported() {
    let dir = sample_vault();
    let posts = dir.path().join("vault/Blog posts");
    std::os::unix::fs::symlink(posts.join("gone"), posts.join("Dangling.md")).unwrap();

    let report = SiteBuilder::new(config_for(dir.path())).build().unwrap();

    assert_eq!(report.posts, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, posts.join("Dangling.md"));
}

#[test]
fn test_title_collision_is_fatal() {
    let dir = sample_vault();
    fs::write(dir.path().join("vault/Blog posts/Hello World!.md"), "dup").unwrap();

    let err = SiteBuilder::new(config_for(dir.path())).build().unwrap_err();
    assert!(matches!(err, BuildError::DuplicateDestination { .. }));
}

#[test]
fn test_image_collision_is_fatal() {
    let dir = sample_vault();
    fs::write(dir.path().join("vault/diagram-v1.png"), b"other").unwrap();
    fs::write(
        dir.path().join("vault/Blog posts/Another.md"),
        "![[diagram-v1.png]]",
    )
    .unwrap();

    let err = SiteBuilder::new(config_for(dir.path())).build().unwrap_err();
    assert!(matches!(err, BuildError::DuplicateDestination { .. }));
}

#[cfg(unix)]
mod search {
    use super::*;

    fn vault_with_search() -> TempDir {
        let dir = sample_vault();
        fs::write(
            dir.path().join("vault/Blog posts/Go Internals/Part 2.md"),
            "Search:\n{{< search index \"go runtime\" >}}\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_search_shortcode_invokes_builder() {
        let dir = vault_with_search();
        let mut config = config_for(dir.path());
        config.search.program = "true".to_string();

        let report = SiteBuilder::new(config).build().unwrap();
        assert_eq!(report.search_pages, 1);

        let member = read(dir.path().join("out/content/series/Go Internals/Part-2.md"));
        assert!(member.contains("{{<iframe src=\"html/"));
        assert!(!member.contains("{{< search"));
        assert!(dir.path().join("out/html").is_dir());
    }

    #[test]
    fn test_search_builder_failure_is_fatal() {
        let dir = vault_with_search();
        let mut config = config_for(dir.path());
        config.search.program = "false".to_string();

        let err = SiteBuilder::new(config).build().unwrap_err();
        assert!(matches!(err, BuildError::SearchBuilder { .. }));
    }

    #[test]
    fn test_missing_search_program_is_fatal() {
        let dir = vault_with_search();
        let mut config = config_for(dir.path());
        config.search.program = "wikipress-no-such-program".to_string();

        assert!(matches!(
            SiteBuilder::new(config).build(),
            Err(BuildError::SearchBuilder { .. })
        ));
    }
}
