//! Well-known names inside statistics trees.

use std::path::Path;

/// Fixed directory and file names used by both tree layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreePath {
    /// `StatsPackageManifest.json` at a processing root
    Manifest,
    /// `collected-data` (Sync layout device root, and zip wrappers)
    CollectedData,
    /// `TalkingBookData` (Archive layout marker)
    TalkingBookData,
    /// `OperationalData` (Archive layout ledger root)
    OperationalData,
    /// `operations` (older Archive ledger root)
    Operations,
    /// `tbdata` (ledger directory inside operational data)
    TbData,
    /// `logs` (TB-loader logs inside operational data)
    TbLoaderLogs,
    /// `log` inside a sync directory
    LogDir,
    /// `log.txt`, the in-progress device log
    LogFile,
    /// `log-archive` inside a sync directory
    LogArchive,
    /// `statistics` inside a sync directory
    Statistics,
    /// `stats` inside `statistics`
    Stats,
    /// `flashData.bin` inside `statistics/stats`
    FlashData,
    /// `chkdsk-reformat.txt`, left when a device's disk was repaired
    ChkdskMarker,
}

impl TreePath {
    /// Get the string representation of the name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manifest => "StatsPackageManifest.json",
            Self::CollectedData => "collected-data",
            Self::TalkingBookData => "TalkingBookData",
            Self::OperationalData => "OperationalData",
            Self::Operations => "operations",
            Self::TbData => "tbdata",
            Self::TbLoaderLogs => "logs",
            Self::LogDir => "log",
            Self::LogFile => "log.txt",
            Self::LogArchive => "log-archive",
            Self::Statistics => "statistics",
            Self::Stats => "stats",
            Self::FlashData => "flashData.bin",
            Self::ChkdskMarker => "chkdsk-reformat.txt",
        }
    }
}

impl AsRef<Path> for TreePath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for TreePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for TreePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
