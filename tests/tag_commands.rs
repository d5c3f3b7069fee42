use assert_fs::TempDir;
use common::command::{
    caf_commit, caf_create_tag, repository_dir, run_caf_command, sample_repository_dir, stdout_of,
};
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

#[rstest]
fn create_tag_for_head(sample_repository_dir: TempDir) {
    let dir = sample_repository_dir.path();
    let head = common::read_head(dir);

    caf_create_tag(dir, "v1.0")
        .assert()
        .success()
        .stdout(format!("Tag \"v1.0\" created for commit {head}\n"));

    let tag_file = dir.join(".caf").join("refs").join("tags").join("v1.0");
    assert_eq!(std::fs::read_to_string(tag_file).unwrap(), head);
}

#[rstest]
fn create_tag_for_explicit_commit(sample_repository_dir: TempDir) {
    let dir = sample_repository_dir.path();
    let first = common::read_head(dir);
    std::fs::write(dir.join("sample.txt"), "changed").unwrap();
    caf_commit(dir, "Second").assert().success();

    run_caf_command(dir, &["create-tag", "first", &first])
        .assert()
        .success()
        .stdout(predicate::str::contains(first.as_str()));
}

#[rstest]
fn create_tag_from_another_tag(sample_repository_dir: TempDir) {
    let dir = sample_repository_dir.path();
    let head = common::read_head(dir);
    caf_create_tag(dir, "v1.0").assert().success();

    run_caf_command(dir, &["create-tag", "stable", "v1.0"])
        .assert()
        .success()
        .stdout(format!("Tag \"stable\" created for commit {head}\n"));
}

#[rstest]
fn create_tag_with_invalid_reference(sample_repository_dir: TempDir) {
    run_caf_command(sample_repository_dir.path(), &["create-tag", "bad", "does-not-exist"])
        .assert()
        .code(255)
        .stdout("")
        .stderr(predicate::str::starts_with("Repository error: "));

    assert!(
        !sample_repository_dir
            .path()
            .join(".caf/refs/tags/bad")
            .exists()
    );
}

#[rstest]
fn create_duplicate_tag(sample_repository_dir: TempDir) {
    let dir = sample_repository_dir.path();
    caf_create_tag(dir, "dup").assert().success();

    caf_create_tag(dir, "dup")
        .assert()
        .code(255)
        .stderr("Repository error: tag dup already exists\n");
}

#[rstest]
fn create_tag_without_repository(repository_dir: TempDir) {
    caf_create_tag(repository_dir.path(), "v1")
        .assert()
        .code(255)
        .stderr(predicate::str::starts_with("No repository found at "));
}

#[rstest]
fn create_tag_before_the_first_commit(repository_dir: TempDir) {
    run_caf_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    caf_create_tag(repository_dir.path(), "v1")
        .assert()
        .code(255)
        .stderr(predicate::str::starts_with("Repository error: invalid reference"));
}

#[rstest]
fn tags_are_listed_by_name(sample_repository_dir: TempDir) {
    let dir = sample_repository_dir.path();
    let head = common::read_head(dir);
    for name in ["v2", "release/1.0", "v1"] {
        caf_create_tag(dir, name).assert().success();
    }

    let output = stdout_of(run_caf_command(dir, &["tags"]));

    pretty_assertions::assert_eq!(
        output,
        format!("Tags:\n  release/1.0: {head}\n  v1: {head}\n  v2: {head}\n")
    );
}

#[rstest]
fn tags_without_any_tag(sample_repository_dir: TempDir) {
    run_caf_command(sample_repository_dir.path(), &["tags"])
        .assert()
        .success()
        .stdout("No tags found\n");
}

#[rstest]
fn tags_without_repository(repository_dir: TempDir) {
    run_caf_command(repository_dir.path(), &["tags"])
        .assert()
        .code(255)
        .stderr(predicate::str::starts_with("No repository found at "));
}

#[rstest]
fn delete_existing_tag(sample_repository_dir: TempDir) {
    let dir = sample_repository_dir.path();
    let head = common::read_head(dir);
    caf_create_tag(dir, "release").assert().success();

    run_caf_command(dir, &["delete-tag", "release"])
        .assert()
        .success()
        .stdout(format!("Tag \"release\" deleted (was {})\n", &head[..7]));

    run_caf_command(dir, &["tags"])
        .assert()
        .success()
        .stdout("No tags found\n");
}

#[rstest]
fn delete_nested_tag_prunes_empty_directories(sample_repository_dir: TempDir) {
    let dir = sample_repository_dir.path();
    caf_create_tag(dir, "release/2024/q1").assert().success();

    run_caf_command(dir, &["delete-tag", "release/2024/q1"])
        .assert()
        .success();

    let tags_dir = dir.join(".caf").join("refs").join("tags");
    assert!(tags_dir.is_dir());
    assert!(!tags_dir.join("release").exists());
}

#[rstest]
fn delete_missing_tag(sample_repository_dir: TempDir) {
    run_caf_command(sample_repository_dir.path(), &["delete-tag", "ghost"])
        .assert()
        .code(255)
        .stderr("Repository error: tag ghost not found\n");
}

#[rstest]
fn delete_tag_without_repository(repository_dir: TempDir) {
    run_caf_command(repository_dir.path(), &["delete-tag", "ghost"])
        .assert()
        .code(255)
        .stderr(predicate::str::starts_with("No repository found at "));
}

#[rstest]
fn tag_scenario(sample_repository_dir: TempDir) {
    let dir = sample_repository_dir.path();
    let head = common::read_head(dir);

    // same file, author and date as git would record
    assert_eq!(head, "bb1698ae23d2f640ad075561ba15d843b967de7c");

    caf_create_tag(dir, "v1.0").assert().success();
    run_caf_command(dir, &["tags"])
        .assert()
        .success()
        .stdout(format!("Tags:\n  v1.0: {head}\n"));

    run_caf_command(dir, &["delete-tag", "v1.0"])
        .assert()
        .success();
    caf_create_tag(dir, "v1.0").assert().success();
}
