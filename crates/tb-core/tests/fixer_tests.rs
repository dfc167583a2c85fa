//! Repairing what validation finds.

use pretty_assertions::assert_eq;
use tb_core::validation::{self, DirectoryCorruptionFixer};
use tb_core::{DirectoryFormat, StatsConfig, ValidationError};
use tb_test_utils::{LedgerBuilder, LedgerRow, TestTree};

const LOG: &str = "0r0032c012pS15d02h44m41s297/221/209V:SHUTTING DOWN\n";
const SYNC: &str = "2014y05m02d10h11m12s-9d8839de";

fn archive_config() -> StatsConfig {
    StatsConfig {
        format: Some(DirectoryFormat::Archive),
        ..StatsConfig::default()
    }
}

/// A sync directory filed under Wa whose ledger row says Jirapa.
fn misplaced_tree() -> TestTree {
    let tree = TestTree::new();
    let sync = tree.archive_sync_dir("laptop", "2014-02", "Wa", "A-0001", &format!("{SYNC}-laptop"));
    tree.add_log(&sync, LOG);
    LedgerBuilder::headed()
        .row(LedgerRow::update(SYNC, "A-0001", "2014-02", "Jirapa"))
        .write_to(
            &tree.archive_ledger_dir("laptop"),
            "tbData-v03-2014y05m02d-9d8839de.csv",
        );
    tree
}

#[test]
fn test_misplaced_dir_is_moved_to_its_ledger_location() {
    let tree = misplaced_tree();

    let remaining = validation::fix_up(tree.root(), Some(DirectoryFormat::Archive), false).unwrap();
    assert!(remaining.is_empty(), "{remaining:?}");

    tree.assert_missing(&format!("TalkingBookData/2014-02/laptop/Wa/A-0001/{SYNC}-laptop"));
    tree.assert_exists(&format!(
        "TalkingBookData/2014-02/laptop/Jirapa/A-0001/{SYNC}-laptop/log/log.txt"
    ));

    let errors = validation::validate(tree.root(), &archive_config()).unwrap();
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn test_fixing_the_same_findings_twice_resolves_the_same_set() {
    let tree = misplaced_tree();
    let errors = validation::validate(tree.root(), &archive_config()).unwrap();
    let fixer = DirectoryCorruptionFixer::new();

    let first = fixer.fix(errors.clone());
    let second = fixer.fix(errors);
    assert!(first.is_empty());
    assert!(second.is_empty());
}

#[test]
fn test_empty_sync_dirs_are_removed() {
    let tree = TestTree::new();
    let keep = tree.sync_dir("laptop", "2013-05", "Jirapa", "A-0001", "5m2d10h11m12s");
    tree.add_log(&keep, LOG);
    tree.sync_dir("laptop", "2013-05", "Jirapa", "A-0001", "5m2d09h00m00s");
    LedgerBuilder::positional()
        .row(LedgerRow::update("5m2d10h13m00s", "A-0001", "2013-05", "Jirapa"))
        .write_to(&tree.sync_ledger_dir("laptop"), "tbData-2013-05-02.csv");

    let remaining = validation::fix_up(tree.root(), Some(DirectoryFormat::Sync), false).unwrap();
    assert!(remaining.is_empty(), "{remaining:?}");
    tree.assert_missing("laptop/collected-data/2013-05/Jirapa/A-0001/5m2d09h00m00s");
    tree.assert_exists("laptop/collected-data/2013-05/Jirapa/A-0001/5m2d10h11m12s");
}

#[test]
fn test_occupied_destination_is_left_unresolved() {
    let tree = misplaced_tree();
    let occupied = tree.archive_sync_dir(
        "laptop",
        "2014-02",
        "Jirapa",
        "A-0001",
        &format!("{SYNC}-laptop"),
    );
    tree.add_log(&occupied, "different\n");

    let errors = validation::validate(tree.root(), &archive_config()).unwrap();
    let path_findings = errors
        .iter()
        .filter(|e| matches!(e, ValidationError::InvalidSyncDirPath { .. }))
        .count();
    let remaining = DirectoryCorruptionFixer::new().fix(errors);

    assert_eq!(
        remaining
            .iter()
            .filter(|e| matches!(e, ValidationError::InvalidSyncDirPath { .. }))
            .count(),
        path_findings
    );
    tree.assert_exists(&format!("TalkingBookData/2014-02/laptop/Wa/A-0001/{SYNC}-laptop/log/log.txt"));
}

#[test]
fn test_reformat_recovery_destination_counts_as_resolved() {
    let tree = misplaced_tree();
    let recovered = tree.archive_sync_dir(
        "laptop",
        "2014-02",
        "Jirapa",
        "A-0001",
        &format!("{SYNC}-laptop"),
    );
    tree.add_chkdsk_marker(&recovered);

    let source = tree.path(&format!("TalkingBookData/2014-02/laptop/Wa/A-0001/{SYNC}-laptop"));
    let finding = ValidationError::InvalidSyncDirPath {
        path: source.clone(),
        expected: recovered,
        diffs: Vec::new(),
    };

    assert!(DirectoryCorruptionFixer::new().fix(vec![finding]).is_empty());
    assert!(source.exists());
}

#[test]
fn test_findings_without_a_repair_are_returned() {
    let finding = ValidationError::ManifestMissingDevice {
        device: "laptop".to_string(),
    };
    let remaining = DirectoryCorruptionFixer::new().fix(vec![finding]);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name(), "manifest-missing-device");
}
