//! [`TestTree`] builder for sync and archive directory layouts.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory with helpers for laying out talking-book trees.
///
/// # Example
///
/// ```rust
/// use tb_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// let sync = tree.sync_dir("laptop-1", "2013-03", "Jirapa", "TB000123", "7m15d18h33m52s");
/// tree.add_log(&sync, "0r0001c001p001d01h01m01s300/300/300V:SHUTTING DOWN\n");
/// assert!(sync.join("log/log.txt").is_file());
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Create `relative` and any missing parents.
    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(&path)
            .unwrap_or_else(|e| panic!("TestTree: failed to create {}: {e}", path.display()));
        path
    }

    /// Write `contents` to `path`, creating parents.
    pub fn write(&self, path: &Path, contents: impl AsRef<[u8]>) -> PathBuf {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("TestTree: failed to create {}: {e}", parent.display())
            });
        }
        fs::write(path, contents)
            .unwrap_or_else(|e| panic!("TestTree: failed to write {}: {e}", path.display()));
        path.to_path_buf()
    }

    /// `<device>/collected-data/<deployment>/<village>/<talking_book>/<sync>`
    pub fn sync_dir(
        &self,
        device: &str,
        deployment: &str,
        village: &str,
        talking_book: &str,
        sync: &str,
    ) -> PathBuf {
        self.mkdir(&format!(
            "{device}/collected-data/{deployment}/{village}/{talking_book}/{sync}"
        ))
    }

    /// `TalkingBookData/<deployment>/<device>/<village>/<talking_book>/<sync>`
    pub fn archive_sync_dir(
        &self,
        device: &str,
        deployment: &str,
        village: &str,
        talking_book: &str,
        sync: &str,
    ) -> PathBuf {
        self.mkdir(&format!(
            "TalkingBookData/{deployment}/{device}/{village}/{talking_book}/{sync}"
        ))
    }

    /// Ledger directory of `device` in the sync layout.
    pub fn sync_ledger_dir(&self, device: &str) -> PathBuf {
        self.mkdir(&format!("{device}/collected-data"))
    }

    /// Ledger directory of `device` in the archive layout.
    pub fn archive_ledger_dir(&self, device: &str) -> PathBuf {
        self.mkdir(&format!("OperationalData/{device}/tbdata"))
    }

    pub fn add_log(&self, sync_dir: &Path, contents: &str) -> PathBuf {
        self.write(&sync_dir.join("log").join("log.txt"), contents)
    }

    pub fn add_archived_log(&self, sync_dir: &Path, name: &str, contents: &str) -> PathBuf {
        self.write(&sync_dir.join("log-archive").join(name), contents)
    }

    pub fn add_flash(&self, sync_dir: &Path, image: &[u8]) -> PathBuf {
        self.write(
            &sync_dir.join("statistics").join("stats").join("flashData.bin"),
            image,
        )
    }

    pub fn add_stats_file(&self, sync_dir: &Path, content_id: &str, bytes: &[u8]) -> PathBuf {
        self.write(&sync_dir.join("statistics").join("stats").join(content_id), bytes)
    }

    /// Mark a sync directory as recovered from a reformatted device.
    pub fn add_chkdsk_marker(&self, sync_dir: &Path) -> PathBuf {
        self.write(&sync_dir.join("chkdsk-reformat.txt"), "reformatted\n")
    }

    /// Write a `StatsPackageManifest.json` at the root.
    pub fn write_manifest(&self, json: &str) -> PathBuf {
        self.write(&self.path("StatsPackageManifest.json"), json)
    }

    /// Assert that `relative` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if it does not.
    pub fn assert_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            full_path.exists(),
            "Expected {} to exist",
            full_path.display()
        );
    }

    /// Assert that `relative` does not exist.
    pub fn assert_missing(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            !full_path.exists(),
            "Expected {} not to exist",
            full_path.display()
        );
    }
}
