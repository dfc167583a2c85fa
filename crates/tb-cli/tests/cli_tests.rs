//! Tests that exercise the compiled `tbstats` binary using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tb_test_utils::{FlashImageBuilder, LedgerBuilder, LedgerRow, TestTree};

const LOG: &str = "0r0032c012pS15d02h44m41s297/221/209V:PLAY TB0003a2_2156B516 @VOL=03 @Volt=221\n";
const SYNC: &str = "2014y05m02d10h11m12s-9d8839de";

fn tbstats() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tbstats"));
    cmd.env_remove("TBSTATS_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// An archive tree with one sync directory whose ledger row names `ledger_village`.
fn archive_tree(ledger_village: &str) -> TestTree {
    let tree = TestTree::new();
    let sync = tree.archive_sync_dir("laptop", "2014-02", "Wa", "A-0001", &format!("{SYNC}-laptop"));
    tree.add_log(&sync, LOG);
    LedgerBuilder::headed()
        .row(LedgerRow::update(SYNC, "A-0001", "2014-02", ledger_village))
        .write_to(
            &tree.archive_ledger_dir("laptop"),
            "tbData-v03-2014y05m02d-9d8839de.csv",
        );
    tree
}

#[test]
fn test_help_lists_commands() {
    tbstats()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("summarize"));
}

#[test]
fn test_version_output() {
    tbstats()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tbstats"));
}

#[test]
fn test_validate_clean_tree_succeeds() {
    let tree = archive_tree("Wa");
    tbstats()
        .args(["validate", "--format", "archive"])
        .arg(tree.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("No problems found"));
}

#[test]
fn test_validate_reports_findings_and_fails() {
    let tree = archive_tree("Jirapa");
    tbstats()
        .args(["validate", "--format", "archive"])
        .arg(tree.root())
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid-sync-dir-path"))
        .stderr(predicate::str::contains("1 finding(s) outstanding"));
}

#[test]
fn test_validate_json_output() {
    let tree = archive_tree("Jirapa");
    let output = tbstats()
        .args(["validate", "--format", "archive", "--json"])
        .arg(tree.root())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let findings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(findings[0]["kind"], "invalid-sync-dir-path");
    assert_eq!(findings[0]["diffs"][0]["field"], "Village");
}

#[test]
fn test_fix_moves_the_directory() {
    let tree = archive_tree("Jirapa");
    tbstats()
        .args(["fix", "--format", "archive"])
        .arg(tree.root())
        .assert()
        .success();

    tree.assert_exists(&format!(
        "TalkingBookData/2014-02/laptop/Jirapa/A-0001/{SYNC}-laptop/log/log.txt"
    ));
    tbstats()
        .args(["validate", "--format", "archive"])
        .arg(tree.root())
        .assert()
        .success();
}

#[test]
fn test_strict_mode_without_format_fails() {
    let tree = archive_tree("Wa");
    tbstats()
        .args(["validate", "--strict"])
        .arg(tree.root())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_config_file_supplies_the_format() {
    let tree = archive_tree("Wa");
    let config = tree.write(&tree.path("stats.toml"), "format = \"archive\"\n");
    tbstats()
        .arg("validate")
        .arg(tree.root())
        .arg("--config")
        .arg(&config)
        .assert()
        .success();
}

#[test]
fn test_manifest_write_creates_file() {
    let tree = archive_tree("Wa");
    tbstats()
        .args(["manifest", "--format", "archive", "--write", "--json"])
        .arg(tree.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"formatVersion\": 2"));
    tree.assert_exists("StatsPackageManifest.json");
}

#[test]
fn test_manifest_without_write_leaves_tree_alone() {
    let tree = archive_tree("Wa");
    tbstats()
        .args(["manifest", "--format", "archive"])
        .arg(tree.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("laptop"));
    tree.assert_missing("StatsPackageManifest.json");
}

#[test]
fn test_summarize_reports_events_per_device() {
    let tree = archive_tree("Wa");
    let output = tbstats()
        .args(["summarize", "--format", "archive", "--json"])
        .arg(tree.root())
        .output()
        .unwrap();

    assert!(output.status.success());
    let tally: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tally["devices"]["laptop"]["events"]["play"], 1);
    assert_eq!(tally["devices"]["laptop"]["talking_books"], 1);
}

#[test]
fn test_summarize_finds_a_tree_wrapped_in_collected_data() {
    let tree = TestTree::new();
    let sync = tree.sync_dir("collected-data/laptop", "2013-05", "Jirapa", "A-0001", "5m2d10h11m12s");
    tree.add_log(&sync, LOG);

    let output = tbstats()
        .args(["summarize", "--format", "sync", "--json"])
        .arg(tree.root())
        .output()
        .unwrap();

    assert!(output.status.success());
    let tally: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tally["devices"]["laptop"]["events"]["play"], 1);
}

#[test]
fn test_manifest_write_lands_in_the_detected_root() {
    let tree = TestTree::new();
    let sync = tree.sync_dir("collected-data/laptop", "2013-05", "Jirapa", "A-0001", "5m2d10h11m12s");
    tree.add_log(&sync, LOG);

    tbstats()
        .args(["manifest", "--format", "sync", "--write"])
        .arg(tree.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("laptop"));
    tree.assert_exists("collected-data/StatsPackageManifest.json");
    tree.assert_missing("StatsPackageManifest.json");
}

#[test]
fn test_flash_decodes_an_image() {
    let tree = TestTree::new();
    let image = tree.write(
        &tree.path("flashData.bin"),
        FlashImageBuilder::new().serial("A-0003a2").build(),
    );
    tbstats()
        .arg("flash")
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("A-0003a2"))
        .stdout(predicate::str::contains("Image is valid"));
}

#[test]
fn test_flash_reports_truncated_image() {
    let tree = TestTree::new();
    let image = FlashImageBuilder::new().build();
    let path = tree.write(&tree.path("flashData.bin"), &image[..100]);
    tbstats()
        .arg("flash")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("flashData.bin"));
}

#[test]
fn test_merge_then_validate_archive() {
    let src = TestTree::new();
    let sync = src.sync_dir("laptop", "2014-02", "Wa", "A-0001", &format!("{SYNC}-laptop"));
    src.add_log(&sync, LOG);
    LedgerBuilder::headed()
        .row(LedgerRow::update(SYNC, "A-0001", "2014-02", "Wa"))
        .write_to(&src.sync_ledger_dir("laptop"), "tbData-v03-2014y05m02d-9d8839de.csv");
    let dest = TestTree::new();

    tbstats()
        .args(["merge", "--format", "sync"])
        .arg(src.root())
        .arg(dest.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged"));

    tbstats().arg("validate").arg(dest.root()).assert().success();
}

#[test]
fn test_roots_lists_side_by_side_trees() {
    let tree = TestTree::new();
    tree.mkdir("r1/TalkingBookData/2014-02");
    tree.mkdir("r2/TalkingBookData/2014-02");
    tbstats()
        .arg("roots")
        .arg(tree.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("r1").and(predicate::str::contains("r2")));
}
