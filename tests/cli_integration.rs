use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn study(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("study").unwrap();
    cmd.env("STUDYHALL_HOME", home);
    cmd
}

#[test]
fn test_create_and_list() {
    let temp_dir = tempfile::tempdir().unwrap();

    study(temp_dir.path())
        .arg("create")
        .arg("--no-editor")
        .arg("Intro to Botany")
        .arg("Plants and how they work")
        .assert()
        .success()
        .stdout(predicates::str::contains("Intro to Botany"));

    study(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("Intro to Botany"))
        .stdout(predicates::str::contains("Plants and how they work"));
}

#[test]
fn test_step_add_and_view() {
    let temp_dir = tempfile::tempdir().unwrap();

    study(temp_dir.path())
        .args(["create", "--no-editor", "Course"])
        .assert()
        .success();

    study(temp_dir.path())
        .args([
            "step",
            "video",
            "1",
            "Watch the intro",
            "https://example.com/intro",
            "--duration",
            "12",
        ])
        .assert()
        .success()
        .stdout(predicates::str::contains("video"));

    study(temp_dir.path())
        .args(["step", "quiz", "1", "Checkpoint", "-q", "What is 2+2?|3|4|2"])
        .assert()
        .success();

    study(temp_dir.path())
        .args(["view", "1"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Watch the intro"))
        .stdout(predicates::str::contains("https://example.com/intro"))
        .stdout(predicates::str::contains("Checkpoint"));

    // step count shows in the list line
    study(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("(2 steps)"));
}

#[test]
fn test_publish_and_buckets() {
    let temp_dir = tempfile::tempdir().unwrap();

    study(temp_dir.path())
        .args(["create", "--no-editor", "First"])
        .assert()
        .success();
    study(temp_dir.path())
        .args(["create", "--no-editor", "Second"])
        .assert()
        .success();

    study(temp_dir.path())
        .args(["publish", "2"])
        .assert()
        .success();

    // Published modules keep their regular slot and gain a p-slot
    study(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("p1."))
        .stdout(predicates::str::contains("First"))
        .stdout(predicates::str::contains("Second"));

    study(temp_dir.path())
        .args(["unpublish", "p1"])
        .assert()
        .success();

    study(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("p1.").not());
}

#[test]
fn test_complete_and_progress() {
    let temp_dir = tempfile::tempdir().unwrap();

    study(temp_dir.path())
        .args(["create", "--no-editor", "Course"])
        .assert()
        .success();
    study(temp_dir.path())
        .args(["step", "video", "1", "Watch", "https://example.com/v"])
        .assert()
        .success();
    study(temp_dir.path())
        .args(["step", "quiz", "1", "Quiz", "-q", "Q?|a|b|1"])
        .assert()
        .success();

    study(temp_dir.path())
        .args(["--user", "sam", "complete", "1", "1"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Completed step 1"));

    study(temp_dir.path())
        .args(["--user", "sam", "complete", "1", "2", "--score", "1/1"])
        .assert()
        .success()
        .stdout(predicates::str::contains("1/1"));

    study(temp_dir.path())
        .args(["--user", "sam", "progress", "1"])
        .assert()
        .success()
        .stdout(predicates::str::contains("2/2"))
        .stdout(predicates::str::contains("100%"));

    // a different user starts from zero
    study(temp_dir.path())
        .args(["--user", "kim", "progress", "1"])
        .assert()
        .success()
        .stdout(predicates::str::contains("0/2"));
}

#[test]
fn test_delete_restore_purge() {
    let temp_dir = tempfile::tempdir().unwrap();

    study(temp_dir.path())
        .args(["create", "--no-editor", "Doomed"])
        .assert()
        .success();

    study(temp_dir.path())
        .args(["delete", "1"])
        .assert()
        .success();

    study(temp_dir.path())
        .args(["list", "--deleted"])
        .assert()
        .success()
        .stdout(predicates::str::contains("d1."))
        .stdout(predicates::str::contains("Doomed"));

    study(temp_dir.path())
        .args(["restore", "d1"])
        .assert()
        .success();

    study(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("Doomed"));

    study(temp_dir.path())
        .args(["delete", "1"])
        .assert()
        .success();
    study(temp_dir.path())
        .args(["purge", "d1", "--yes"])
        .assert()
        .success();

    study(temp_dir.path())
        .args(["list", "--all"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Doomed").not());
}

#[test]
fn test_journal_roundtrip() {
    let temp_dir = tempfile::tempdir().unwrap();

    study(temp_dir.path())
        .args(["--user", "sam", "journal", "add", "Learned about xylem today"])
        .assert()
        .success();

    study(temp_dir.path())
        .args(["--user", "sam", "journal", "list"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Learned about xylem"));

    // module-linked entries are read-only
    study(temp_dir.path())
        .args(["create", "--no-editor", "Course"])
        .assert()
        .success();
    study(temp_dir.path())
        .args(["--user", "sam", "journal", "add", "Reflection", "-m", "1"])
        .assert()
        .success();
    study(temp_dir.path())
        .args(["--user", "sam", "journal", "edit", "1", "rewrite"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("read-only"));

    study(temp_dir.path())
        .args(["--user", "sam", "journal", "remove", "1"])
        .assert()
        .success();
}

#[test]
fn test_config_roundtrip() {
    let temp_dir = tempfile::tempdir().unwrap();

    study(temp_dir.path())
        .args(["config", "default_user", "ada"])
        .assert()
        .success();

    study(temp_dir.path())
        .args(["config", "default_user"])
        .assert()
        .success()
        .stdout(predicates::str::contains("ada"));

    study(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicates::str::contains("default_user = ada"));
}

#[test]
fn test_import_deck() {
    let temp_dir = tempfile::tempdir().unwrap();

    study(temp_dir.path())
        .args(["create", "--no-editor", "Biology"])
        .assert()
        .success();

    let deck = temp_dir.path().join("plants.md");
    std::fs::write(
        &deck,
        "# Plant Cells\n\n## chloroplast\n\nWhere photosynthesis happens.\n\n## vacuole\n\nStorage compartment.\n",
    )
    .unwrap();

    study(temp_dir.path())
        .arg("import")
        .arg("1")
        .arg(deck.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicates::str::contains("2 card(s)"));

    study(temp_dir.path())
        .args(["view", "1"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Plant Cells"));
}

#[test]
fn test_doctor_reports_clean_store() {
    let temp_dir = tempfile::tempdir().unwrap();

    study(temp_dir.path())
        .args(["create", "--no-editor", "Course"])
        .assert()
        .success();

    study(temp_dir.path())
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicates::str::contains("No inconsistencies found"));
}

#[test]
fn test_export_creates_archive() {
    let temp_dir = tempfile::tempdir().unwrap();

    study(temp_dir.path())
        .args(["create", "--no-editor", "Course"])
        .assert()
        .success();

    study(temp_dir.path())
        .current_dir(temp_dir.path())
        .arg("export")
        .assert()
        .success()
        .stdout(predicates::str::contains("Exported 1 module(s)"));

    let archives: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tar.gz"))
        .collect();
    assert_eq!(archives.len(), 1);
}

#[test]
fn test_title_selector() {
    let temp_dir = tempfile::tempdir().unwrap();

    study(temp_dir.path())
        .args(["create", "--no-editor", "Intro to Rust"])
        .assert()
        .success();

    study(temp_dir.path())
        .args(["view", "rust"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Intro to Rust"));
}
