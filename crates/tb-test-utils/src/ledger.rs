//! [`LedgerBuilder`] for the operational `tbData` CSV files a loader writes
//! on every sync.

use std::fs;
use std::path::{Path, PathBuf};

/// Column names of the headed ledger layout, in order.
pub const HEADED_COLUMNS: [&str; 22] = [
    "PROJECT",
    "UPDATE_DATE_TIME",
    "OUT_SYNCH_DIR",
    "LOCATION",
    "ACTION",
    "DURATION_SEC",
    "OUT-SN",
    "OUT-DEPLOYMENT",
    "OUT-IMAGE",
    "OUT-FW-REV",
    "OUT-COMMUNITY",
    "OUT-ROTATION-DATE",
    "IN-SN",
    "IN-DEPLOYMENT",
    "IN-IMAGE",
    "IN-FW-REV",
    "IN-COMMUNITY",
    "IN-LAST-UPDATED",
    "IN-SYNCH-DIR",
    "IN-DISK-LABEL",
    "CHKDSK CORRUPTION?",
    "FLASH-SN",
];

/// One ledger row. `in_*` describes the talking book as found, `out_*` as
/// left after the update.
#[derive(Debug, Clone, Default)]
pub struct LedgerRow {
    pub sync_dir: String,
    pub action: String,
    pub in_sn: String,
    pub out_sn: String,
    pub in_deployment: String,
    pub out_deployment: String,
    pub in_community: String,
    pub out_community: String,
}

impl LedgerRow {
    /// An `update` row for a talking book that stayed in the same village
    /// and deployment.
    pub fn update(sync_dir: &str, talking_book: &str, deployment: &str, village: &str) -> Self {
        Self {
            sync_dir: sync_dir.to_string(),
            action: "update".to_string(),
            in_sn: talking_book.to_string(),
            out_sn: talking_book.to_string(),
            in_deployment: deployment.to_string(),
            out_deployment: deployment.to_string(),
            in_community: village.to_string(),
            out_community: village.to_string(),
        }
    }

    pub fn action(mut self, action: &str) -> Self {
        self.action = action.to_string();
        self
    }

    pub fn in_deployment(mut self, deployment: &str) -> Self {
        self.in_deployment = deployment.to_string();
        self
    }

    pub fn out_sn(mut self, serial: &str) -> Self {
        self.out_sn = serial.to_string();
        self
    }

    fn positional(&self) -> Vec<String> {
        let mut cells = vec![String::new(); 11];
        cells[0].clone_from(&self.sync_dir);
        cells[1] = "laptop".to_string();
        cells[2].clone_from(&self.in_sn);
        cells[3].clone_from(&self.action);
        cells[4].clone_from(&self.in_deployment);
        cells[5].clone_from(&self.in_community);
        cells[8].clone_from(&self.out_sn);
        cells[9].clone_from(&self.out_deployment);
        cells[10].clone_from(&self.out_community);
        cells
    }

    fn headed(&self) -> Vec<String> {
        let mut cells = vec![String::new(); HEADED_COLUMNS.len()];
        cells[0] = "UWR".to_string();
        cells[1].clone_from(&self.sync_dir);
        cells[2].clone_from(&self.sync_dir);
        cells[4].clone_from(&self.action);
        cells[6].clone_from(&self.out_sn);
        cells[7].clone_from(&self.out_deployment);
        cells[10].clone_from(&self.out_community);
        cells[12].clone_from(&self.in_sn);
        cells[13].clone_from(&self.in_deployment);
        cells[16].clone_from(&self.in_community);
        cells[18].clone_from(&self.sync_dir);
        cells
    }
}

/// Builds ledger CSV text in either the positional (no header) or the headed
/// layout.
#[derive(Debug, Clone)]
pub struct LedgerBuilder {
    headed: bool,
    lines: Vec<String>,
}

impl LedgerBuilder {
    /// Eleven positional columns, no header row.
    pub fn positional() -> Self {
        Self {
            headed: false,
            lines: Vec::new(),
        }
    }

    /// Header row naming every column.
    pub fn headed() -> Self {
        Self {
            headed: true,
            lines: vec![HEADED_COLUMNS.join(",")],
        }
    }

    pub fn row(mut self, row: LedgerRow) -> Self {
        let cells = if self.headed {
            row.headed()
        } else {
            row.positional()
        };
        self.lines.push(cells.join(","));
        self
    }

    /// Append a line verbatim, for malformed-input cases.
    pub fn raw_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn to_csv(&self) -> String {
        let mut csv = self.lines.join("\n");
        csv.push('\n');
        csv
    }

    /// Write into `dir`, creating it if needed.
    ///
    /// # Panics
    /// Panics if the filesystem operations fail.
    pub fn write_to(&self, dir: &Path, file_name: &str) -> PathBuf {
        fs::create_dir_all(dir)
            .unwrap_or_else(|e| panic!("LedgerBuilder: failed to create {}: {e}", dir.display()));
        let path = dir.join(file_name);
        fs::write(&path, self.to_csv())
            .unwrap_or_else(|e| panic!("LedgerBuilder: failed to write {}: {e}", path.display()));
        path
    }
}
