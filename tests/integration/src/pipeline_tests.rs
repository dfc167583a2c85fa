//! End-to-end scenarios across the filesystem, codec and traversal crates.
//!
//! Each scenario builds a package the way field loaders leave it, then runs
//! the steps an operator would: find the roots, validate, repair, merge and
//! decode.

use std::fs;

use pretty_assertions::assert_eq;
use tb_core::merge::merge_into;
use tb_core::navigator::detect_roots;
use tb_core::validation::{self, DirectoryCorruptionFixer};
use tb_core::{
    DirectoryFormat, DirectoryNavigator, EventTally, FilteringVisitor, StatsConfig,
    StatsPackageManifest, SyncDirProcessor, ValidatingVisitor, ValidationError,
};
use tb_formats::{CategoryMap, Fanout, LogEventKind, RecordingSink};
use tb_test_utils::{FlashImageBuilder, LedgerBuilder, LedgerRow, TestTree};

const PLAY: &str = "0r0032c012pS15d02h44m41s297/221/209V:PLAY TB0003a2_2156B516 @VOL=03 @Volt=221\n";
const PAUSE: &str = "0r0032c012pS15d02h44m50s297/221/209V:PAUSED\n";

/// Two loaders, each of which synced one talking book.
const LOADERS: [(&str, &str, &str); 2] = [("laptop", "Jirapa", "A-0001"), ("tablet", "Wa", "A-0002")];

const MODERN_SYNC: &str = "2014y05m02d10h11m12s-9d8839de";
const MODERN_LEDGER: &str = "tbData-v03-2014y05m02d-9d8839de.csv";

fn config(format: DirectoryFormat) -> StatsConfig {
    StatsConfig {
        format: Some(format),
        ..StatsConfig::default()
    }
}

fn names(errors: &[ValidationError]) -> Vec<&'static str> {
    errors.iter().map(ValidationError::name).collect()
}

/// A sync tree as the loaders export it, under `prefix` inside `tree`.
fn field_export(tree: &TestTree, prefix: &str) {
    for (device, village, talking_book) in LOADERS {
        let device_dir = format!("{prefix}{device}");
        let sync = tree.sync_dir(&device_dir, "2013-05", village, talking_book, "5m2d10h11m12s");
        tree.add_log(&sync, &format!("{PLAY}{PAUSE}"));
        tree.add_flash(&sync, &FlashImageBuilder::new().serial(talking_book).build());
        LedgerBuilder::positional()
            .row(LedgerRow::update("5m2d10h13m00s", talking_book, "2013-05", village))
            .write_to(&tree.sync_ledger_dir(&device_dir), "tbData-2013-05-02.csv");
    }
}

/// A sync export with current-format directory names, ready to archive.
fn modern_export() -> TestTree {
    let tree = TestTree::new();
    for (device, village, talking_book) in LOADERS {
        let sync = tree.sync_dir(device, "2014-02", village, talking_book, &format!("{MODERN_SYNC}-{device}"));
        tree.add_log(&sync, PLAY);
        LedgerBuilder::headed()
            .row(LedgerRow::update(MODERN_SYNC, talking_book, "2014-02", village))
            .write_to(&tree.sync_ledger_dir(device), MODERN_LEDGER);
    }
    tree
}

// =============================================================================
// Discovery and validation
// =============================================================================

#[test]
fn test_wrapped_package_is_found_and_validates_cleanly() {
    let tree = TestTree::new();
    field_export(&tree, "collected-data/");

    let roots = detect_roots(tree.root()).unwrap();
    assert_eq!(roots, vec![tree.path("collected-data")]);

    let errors = validation::validate(&roots[0], &config(DirectoryFormat::Sync)).unwrap();
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn test_persisted_manifest_stands_in_for_the_format_next_time() {
    let tree = TestTree::new();
    field_export(&tree, "");
    let persisting = StatsConfig {
        persist_generated_manifest: true,
        ..config(DirectoryFormat::Sync)
    };

    assert!(validation::validate(tree.root(), &persisting).unwrap().is_empty());
    let manifest = StatsPackageManifest::load(tree.root()).unwrap().unwrap();
    assert_eq!(manifest.devices.keys().collect::<Vec<_>>(), vec!["laptop", "tablet"]);

    let strict = StatsConfig {
        strict: true,
        ..StatsConfig::default()
    };
    let errors = validation::validate(tree.root(), &strict).unwrap();
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn test_findings_serialize_with_their_kind() {
    let tree = TestTree::new();
    field_export(&tree, "");
    tree.sync_dir("tablet", "2013-05", "Wa", "A-0002", "5m3d08h00m00s");

    let errors = validation::validate(tree.root(), &config(DirectoryFormat::Sync)).unwrap();
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json[0]["kind"], "empty-sync-directory");
}

// =============================================================================
// Merge, then repair
// =============================================================================

#[test]
fn test_archived_exports_validate_cleanly() {
    let export = modern_export();
    let archive = TestTree::new();

    let summary = merge_into(export.root(), archive.root(), &config(DirectoryFormat::Sync)).unwrap();
    assert_eq!((summary.deployments, summary.ledgers), (2, 2));

    for (device, village, talking_book) in LOADERS {
        archive.assert_exists(&format!(
            "TalkingBookData/2014-02/{device}/{village}/{talking_book}/{MODERN_SYNC}-{device}/log/log.txt"
        ));
    }

    let errors = validation::validate(archive.root(), &StatsConfig::default()).unwrap();
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn test_misfiled_archive_dir_is_repaired_in_place() {
    let export = modern_export();
    let archive = TestTree::new();
    merge_into(export.root(), archive.root(), &config(DirectoryFormat::Sync)).unwrap();

    // Someone dragged the tablet's talking book into the wrong village.
    let filed = archive.path("TalkingBookData/2014-02/tablet/Wa/A-0002");
    let misfiled = archive.mkdir("TalkingBookData/2014-02/tablet/Jirapa").join("A-0002");
    fs::rename(&filed, &misfiled).unwrap();

    let errors = validation::validate(archive.root(), &StatsConfig::default()).unwrap();
    assert_eq!(names(&errors), vec!["invalid-sync-dir-path"]);

    let remaining = DirectoryCorruptionFixer::new().fix(errors);
    assert!(remaining.is_empty(), "{remaining:?}");
    archive.assert_exists(&format!(
        "TalkingBookData/2014-02/tablet/Wa/A-0002/{MODERN_SYNC}-tablet/log/log.txt"
    ));
    assert!(validation::validate(archive.root(), &StatsConfig::default()).unwrap().is_empty());
}

// =============================================================================
// Decoding
// =============================================================================

#[test]
fn test_one_walk_feeds_several_sinks() {
    let tree = TestTree::new();
    field_export(&tree, "");

    let mut recording = RecordingSink::default();
    let mut tally = EventTally::new();
    {
        let fanout = Fanout::new().with(&mut recording).with(&mut tally);
        let mut processor = SyncDirProcessor::new(fanout, CategoryMap::default());
        DirectoryNavigator::new(tree.root(), Some(DirectoryFormat::Sync), false)
            .walk(&mut processor)
            .unwrap();
    }

    assert_eq!(recording.flash.len(), 2);
    assert_eq!(recording.events.len(), 4);
    assert_eq!(tally.total_events("pause"), 2);
    assert_eq!(tally.device("tablet").unwrap().flash_images, 1);
}

#[test]
fn test_pause_is_attributed_to_the_content_playing() {
    let tree = TestTree::new();
    field_export(&tree, "");

    let mut processor = FilteringVisitor::new(SyncDirProcessor::new(
        RecordingSink::default(),
        CategoryMap::default(),
    ))
    .devices(["laptop"]);
    DirectoryNavigator::new(tree.root(), Some(DirectoryFormat::Sync), false)
        .walk(&mut processor)
        .unwrap();
    let sink = processor.into_inner().into_sink();

    assert_eq!(sink.events.len(), 2);
    assert_eq!(
        sink.events[1].kind,
        LogEventKind::Pause {
            content_id: "TB0003a2_2156B516".to_string()
        }
    );
    assert_eq!(sink.events[1].context.sync.device, "laptop");
}

#[test]
fn test_validation_and_processing_share_one_walk_order() {
    let tree = TestTree::new();
    field_export(&tree, "");
    let navigator = DirectoryNavigator::new(tree.root(), Some(DirectoryFormat::Sync), false);

    let mut validator = ValidatingVisitor::new();
    navigator.walk(&mut validator).unwrap();
    let mut processor = SyncDirProcessor::new(RecordingSink::default(), CategoryMap::default());
    navigator.walk(&mut processor).unwrap();

    assert!(validator.errors().is_empty(), "{:?}", validator.errors());
    let talking_books: Vec<_> = processor
        .sink()
        .talking_books
        .iter()
        .map(|c| c.talking_book.as_str())
        .collect();
    assert_eq!(talking_books, vec!["A-0001", "A-0002"]);
}
