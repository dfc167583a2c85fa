//! Walk order, pruning and structural checks of the directory navigator.

use std::path::Path;

use pretty_assertions::assert_eq;
use tb_core::navigator::{DirectoryVisitor, FilteringVisitor, WalkContext, detect_roots};
use tb_core::{
    DeploymentPerDevice, DirectoryFormat, DirectoryNavigator, Error, Result, StatsConfig,
    StatsPackageManifest, SyncDirId,
};
use tb_fs::dir;
use tb_test_utils::{LedgerBuilder, LedgerRow, TestTree};

/// Records every callback as a line of text.
#[derive(Debug, Default)]
struct Trace {
    calls: Vec<String>,
    skip_village: Option<String>,
}

impl DirectoryVisitor for Trace {
    fn start_processing(&mut self, ctx: &WalkContext) -> Result<bool> {
        self.calls.push(format!("start {}", ctx.format));
        Ok(true)
    }

    fn end_processing(&mut self, _ctx: &WalkContext) -> Result<()> {
        self.calls.push("end".to_string());
        Ok(())
    }

    fn start_device_operational_data(&mut self, _ctx: &WalkContext, device: &str) -> Result<bool> {
        self.calls.push(format!("ops {device}"));
        Ok(true)
    }

    fn process_ledger_file(
        &mut self,
        _ctx: &WalkContext,
        path: &Path,
        includes_headers: bool,
    ) -> Result<()> {
        self.calls
            .push(format!("ledger {} {includes_headers}", dir::file_name(path)));
        Ok(())
    }

    fn process_tbloader_log_file(&mut self, _ctx: &WalkContext, path: &Path) -> Result<()> {
        self.calls.push(format!("tblog {}", dir::file_name(path)));
        Ok(())
    }

    fn end_device_operational_data(&mut self, _ctx: &WalkContext) -> Result<()> {
        self.calls.push("/ops".to_string());
        Ok(())
    }

    fn start_device_deployment(
        &mut self,
        _ctx: &WalkContext,
        deployment: &DeploymentPerDevice,
    ) -> Result<bool> {
        self.calls
            .push(format!("deployment {}/{}", deployment.device, deployment.deployment));
        Ok(true)
    }

    fn end_device_deployment(&mut self, _ctx: &WalkContext) -> Result<()> {
        self.calls.push("/deployment".to_string());
        Ok(())
    }

    fn start_village(&mut self, _ctx: &WalkContext, village: &str) -> Result<bool> {
        if self.skip_village.as_deref() == Some(village) {
            return Ok(false);
        }
        self.calls.push(format!("village {village}"));
        Ok(true)
    }

    fn end_village(&mut self, _ctx: &WalkContext) -> Result<()> {
        self.calls.push("/village".to_string());
        Ok(())
    }

    fn start_talking_book(&mut self, _ctx: &WalkContext, talking_book: &str) -> Result<bool> {
        self.calls.push(format!("tb {talking_book}"));
        Ok(true)
    }

    fn end_talking_book(&mut self, _ctx: &WalkContext) -> Result<()> {
        self.calls.push("/tb".to_string());
        Ok(())
    }

    fn process_sync_dir(&mut self, ctx: &WalkContext, id: &SyncDirId, _path: &Path) -> Result<()> {
        self.calls.push(format!(
            "sync {} {}/{}/{}",
            id.dir_name,
            ctx.device(),
            ctx.village(),
            ctx.talking_book()
        ));
        Ok(())
    }
}

fn sync_tree() -> TestTree {
    let tree = TestTree::new();
    tree.sync_dir("b-laptop", "2013-05", "Wa", "T1", "5m3d10h00m00s");
    tree.sync_dir("b-laptop", "2013-05", "Wa", "T1", "5m2d10h11m12s");
    tree.sync_dir("b-laptop", "2013-05", "Wa", "T1", "not-a-sync");
    tree.sync_dir("A-laptop", "2013-04", "Jirapa", "T2", "4m1d09h00m00s");

    LedgerBuilder::positional()
        .row(LedgerRow::update("5m2d10h13m00s", "T1", "2013-05", "Wa"))
        .write_to(&tree.sync_ledger_dir("b-laptop"), "tbData-2013-05-02.csv");
    tree.write(&tree.path("b-laptop/collected-data/notes.csv"), "ignored");
    tree.write(&tree.path("b-laptop/collected-data/logs/tbl.log"), "loader log");

    LedgerBuilder::positional().write_to(&tree.sync_ledger_dir("c-tablet"), "tbData-2013-06-01.csv");
    tree
}

fn walk(root: &Path, format: Option<DirectoryFormat>) -> Vec<String> {
    let mut trace = Trace::default();
    DirectoryNavigator::new(root, format, false)
        .walk(&mut trace)
        .unwrap();
    trace.calls
}

#[test]
fn test_sync_tree_is_visited_in_documented_order() {
    let tree = sync_tree();

    assert_eq!(
        walk(tree.root(), Some(DirectoryFormat::Sync)),
        vec![
            "start sync",
            "ops A-laptop",
            "/ops",
            "ops b-laptop",
            "ledger tbData-2013-05-02.csv false",
            "tblog tbl.log",
            "/ops",
            "ops c-tablet",
            "ledger tbData-2013-06-01.csv false",
            "/ops",
            "deployment A-laptop/2013-04",
            "village Jirapa",
            "tb T2",
            "sync 4m1d09h00m00s A-laptop/Jirapa/T2",
            "/tb",
            "/village",
            "/deployment",
            "deployment b-laptop/2013-05",
            "village Wa",
            "tb T1",
            "sync 5m2d10h11m12s b-laptop/Wa/T1",
            "sync 5m3d10h00m00s b-laptop/Wa/T1",
            "/tb",
            "/village",
            "/deployment",
            "end",
        ]
    );
}

#[test]
fn test_archive_tree_reads_only_versioned_ledgers_with_headers() {
    let tree = TestTree::new();
    tree.archive_sync_dir("laptop", "2014-02", "Wa", "T1", "2014y05m02d10h11m12s-abc-laptop");
    let ledgers = tree.archive_ledger_dir("laptop");
    LedgerBuilder::headed().write_to(&ledgers, "tbData-v03-2014y05m02d-abc.csv");
    LedgerBuilder::positional().write_to(&ledgers, "tbData-2014-05-02.csv");

    let calls = walk(tree.root(), Some(DirectoryFormat::Archive));
    assert_eq!(
        &calls[..4],
        &["start archive", "ops laptop", "ledger tbData-v03-2014y05m02d-abc.csv true", "/ops"]
    );
    assert!(calls.contains(&"sync 2014y05m02d10h11m12s-abc-laptop laptop/Wa/T1".to_string()));
}

#[test]
fn test_archive_ledgers_fall_back_to_older_operations_dir() {
    let tree = TestTree::new();
    tree.archive_sync_dir("laptop", "2014-02", "Wa", "T1", "2014y05m02d10h11m12s-abc-laptop");
    LedgerBuilder::headed().write_to(
        &tree.mkdir("operations/tbdata/laptop"),
        "tbData-v03-2014y05m02d-abc.csv",
    );

    let calls = walk(tree.root(), Some(DirectoryFormat::Archive));
    assert!(calls.contains(&"ledger tbData-v03-2014y05m02d-abc.csv true".to_string()));
}

#[test]
fn test_pruned_village_skips_its_subtree_and_end_call() {
    let tree = sync_tree();
    let mut trace = Trace {
        skip_village: Some("Wa".to_string()),
        ..Trace::default()
    };
    DirectoryNavigator::new(tree.root(), Some(DirectoryFormat::Sync), false)
        .walk(&mut trace)
        .unwrap();

    let b_laptop: Vec<_> = trace
        .calls
        .iter()
        .skip_while(|c| *c != "deployment b-laptop/2013-05")
        .cloned()
        .collect();
    assert_eq!(b_laptop, vec!["deployment b-laptop/2013-05", "/deployment", "end"]);
}

#[test]
fn test_filtering_visitor_admits_names_case_insensitively() {
    let tree = sync_tree();
    let mut visitor = FilteringVisitor::new(Trace::default())
        .devices(["B-LAPTOP"])
        .talking_books(["t1"]);
    DirectoryNavigator::new(tree.root(), Some(DirectoryFormat::Sync), false)
        .walk(&mut visitor)
        .unwrap();

    let calls = visitor.into_inner().calls;
    assert!(calls.contains(&"ops b-laptop".to_string()));
    assert!(!calls.iter().any(|c| c.contains("A-laptop") || c.contains("c-tablet")));
    assert_eq!(calls.iter().filter(|c| c.starts_with("sync")).count(), 2);
}

#[test]
fn test_generated_manifest_spans_each_devices_syncs() {
    let tree = sync_tree();
    let navigator = DirectoryNavigator::new(tree.root(), Some(DirectoryFormat::Sync), false);
    let manifest = navigator.generate_manifest(DirectoryFormat::Sync).unwrap();

    assert_eq!(manifest.format_version, 1);
    let range = manifest.range("b-laptop").unwrap();
    assert_eq!(range.start_time.to_string(), "2013-05-02 10:11:12");
    assert_eq!(range.end_time.to_string(), "2013-05-03 10:00:00");
    assert!(!range.incomplete);
    assert!(manifest.range("c-tablet").is_none());
}

#[test]
fn test_generated_manifest_is_written_only_when_configured() {
    let tree = sync_tree();
    walk(tree.root(), Some(DirectoryFormat::Sync));
    tree.assert_missing("StatsPackageManifest.json");

    let config = StatsConfig {
        format: Some(DirectoryFormat::Sync),
        persist_generated_manifest: true,
        ..StatsConfig::default()
    };
    DirectoryNavigator::from_config(tree.root(), &config)
        .walk(&mut Trace::default())
        .unwrap();
    let saved = StatsPackageManifest::load(tree.root()).unwrap().unwrap();
    assert_eq!(saved.devices.len(), 2);
}

#[test]
fn test_manifest_format_wins_over_requested_format_when_lenient() {
    let tree = TestTree::new();
    tree.archive_sync_dir("laptop", "2014-02", "Wa", "T1", "2014y05m02d10h11m12s-abc-laptop");
    tree.write_manifest(r#"{"formatVersion":2,"devices":{}}"#);

    assert_eq!(walk(tree.root(), Some(DirectoryFormat::Sync))[0], "start archive");
    assert_eq!(walk(tree.root(), None)[0], "start archive");
}

#[test]
fn test_missing_root_is_skipped_unless_strict() {
    let tree = TestTree::new();
    let missing = tree.path("nowhere");

    assert!(walk(&missing, Some(DirectoryFormat::Sync)).is_empty());

    let err = DirectoryNavigator::new(&missing, Some(DirectoryFormat::Sync), true)
        .walk(&mut Trace::default())
        .unwrap_err();
    assert!(matches!(err, Error::MissingRoot { .. }));
}

#[test]
fn test_strict_mode_rejects_structural_problems() {
    let strict = |root: &Path, format| {
        DirectoryNavigator::new(root, format, true)
            .walk(&mut Trace::default())
            .unwrap_err()
    };

    let sync = sync_tree();
    assert!(matches!(strict(sync.root(), None), Error::MissingFormat { .. }));

    let empty = TestTree::new();
    assert!(matches!(
        strict(empty.root(), Some(DirectoryFormat::Sync)),
        Error::NoDeployments { .. }
    ));

    let mismatched = TestTree::new();
    mismatched.archive_sync_dir("laptop", "2014-02", "Wa", "T1", "2014y05m02d10h11m12s-a");
    mismatched.write_manifest(r#"{"formatVersion":2,"devices":{}}"#);
    assert!(matches!(
        strict(mismatched.root(), Some(DirectoryFormat::Sync)),
        Error::FormatMismatch { .. }
    ));

    let unknown = TestTree::new();
    unknown.archive_sync_dir("laptop", "UNKNOWN", "Wa", "T1", "2014y05m02d10h11m12s-a");
    assert!(matches!(
        strict(unknown.root(), Some(DirectoryFormat::Archive)),
        Error::InvalidDeployment { .. }
    ));

    let legacy = TestTree::new();
    legacy.archive_sync_dir("laptop", "2014-02", "Wa", "T1", "5m2d10h11m12s");
    assert!(matches!(
        strict(legacy.root(), Some(DirectoryFormat::Archive)),
        Error::LegacySyncDirInArchive { .. }
    ));
}

#[test]
fn test_lenient_mode_walks_trees_without_deployments() {
    let empty = TestTree::new();
    assert_eq!(walk(empty.root(), Some(DirectoryFormat::Sync)), vec!["start sync", "end"]);
}

#[test]
fn test_detect_roots_unwraps_collected_data() {
    let tree = TestTree::new();
    tree.mkdir("collected-data/laptop/collected-data/2013-05");
    assert_eq!(
        detect_roots(tree.root()).unwrap(),
        vec![tree.path("collected-data")]
    );
}

#[test]
fn test_detect_roots_descends_into_single_project() {
    let tree = TestTree::new();
    tree.mkdir("account/collected-data/UWR/laptop/collected-data/2013-05");
    assert_eq!(
        detect_roots(tree.root()).unwrap(),
        vec![tree.path("account/collected-data/UWR")]
    );
}

#[test]
fn test_detect_roots_keeps_a_plain_sync_tree() {
    let tree = TestTree::new();
    tree.sync_dir("laptop", "2013-05", "Wa", "T1", "5m2d10h11m12s");
    assert_eq!(detect_roots(tree.root()).unwrap(), vec![tree.root().to_path_buf()]);
}

#[test]
fn test_detect_roots_splits_side_by_side_trees() {
    let tree = TestTree::new();
    tree.mkdir("r2/TalkingBookData/2014-02");
    tree.mkdir("r1/TalkingBookData/2014-02");
    tree.mkdir("_MACOSX");
    assert_eq!(
        detect_roots(tree.root()).unwrap(),
        vec![tree.path("r1"), tree.path("r2")]
    );
}
