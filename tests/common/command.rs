use crate::common::file::{FileSpec, write_file};
use crate::common::{AUTHOR_DATE, AUTHOR_NAME};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with `1.txt`, `a/2.txt` and `a/b/3.txt` committed once
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_caf_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let file1 = FileSpec::new(repository_dir.path().join("1.txt"), "one".to_string());
    write_file(file1);

    let file2 = FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    );
    write_file(file2);

    let file3 = FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    );
    write_file(file3);

    caf_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

/// A repository holding a single commit of `sample.txt`
#[fixture]
pub fn sample_repository_dir(repository_dir: TempDir) -> TempDir {
    run_caf_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("sample.txt"),
        "sample content".to_string(),
    ));

    caf_commit(repository_dir.path(), "Message")
        .assert()
        .success();

    repository_dir
}

pub fn run_caf_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("caf").expect("Failed to find caf binary");
    cmd.envs(vec![("NO_COLOR", "1")]);
    cmd.env_remove("CAF_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn caf_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_caf_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("CAF_AUTHOR_NAME", AUTHOR_NAME),
        ("CAF_AUTHOR_DATE", AUTHOR_DATE),
    ]);
    cmd
}

pub fn caf_create_tag(dir: &Path, name: &str) -> Command {
    run_caf_command(dir, &["create-tag", name])
}

/// Run a command that must succeed and return its stdout
pub fn stdout_of(mut cmd: Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("stdout is not valid UTF-8")
}
