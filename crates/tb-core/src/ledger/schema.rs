use std::collections::HashMap;

/// Ledger columns reconciliation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerColumn {
    UpdateDateTime,
    InSyncDir,
    InSerial,
    OutSerial,
    InDeployment,
    OutDeployment,
    InCommunity,
    OutCommunity,
    Action,
}

impl LedgerColumn {
    pub const ALL: [Self; 9] = [
        Self::UpdateDateTime,
        Self::InSyncDir,
        Self::InSerial,
        Self::OutSerial,
        Self::InDeployment,
        Self::OutDeployment,
        Self::InCommunity,
        Self::OutCommunity,
        Self::Action,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Self::UpdateDateTime => "UPDATE_DATE_TIME",
            Self::InSyncDir => "IN-SYNCH-DIR",
            Self::InSerial => "IN-SN",
            Self::OutSerial => "OUT-SN",
            Self::InDeployment => "IN-DEPLOYMENT",
            Self::OutDeployment => "OUT-DEPLOYMENT",
            Self::InCommunity => "IN-COMMUNITY",
            Self::OutCommunity => "OUT-COMMUNITY",
            Self::Action => "ACTION",
        }
    }

    pub fn from_header(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|column| column.header().eq_ignore_ascii_case(name.trim()))
    }
}

/// Every column name a headed ledger may start with.
const KNOWN_HEADERS: [&str; 22] = [
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

/// Whether `cell` is the first cell of a header row.
pub fn is_header_cell(cell: &str) -> bool {
    let cell = cell.trim();
    KNOWN_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(cell))
}

/// Positional layouts, one per generation of the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerSchema {
    V0,
    V1,
    V3,
}

impl LedgerSchema {
    pub fn for_version(version: u32) -> Self {
        match version {
            0 => Self::V0,
            1 | 2 => Self::V1,
            _ => Self::V3,
        }
    }

    /// Version marker at characters 8..10 of a ledger file name.
    /// `tbData-v03-...` is 3; anything not numeric there is 1.
    pub fn version_of(file_name: &str) -> u32 {
        match file_name.get(8..10).and_then(|marker| marker.parse().ok()) {
            Some(version) => version,
            None => {
                tracing::warn!(
                    file = file_name,
                    "Ledger name has no version marker; reading it with the version 1 columns"
                );
                1
            }
        }
    }
}

/// Where each [`LedgerColumn`] sits in a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    indexes: HashMap<LedgerColumn, usize>,
}

impl ColumnMap {
    pub fn positional(schema: LedgerSchema) -> Self {
        use LedgerColumn::*;

        let pairs: [(LedgerColumn, usize); 9] = match schema {
            LedgerSchema::V0 => [
                (UpdateDateTime, 0),
                (InSyncDir, 0),
                (InSerial, 9),
                (OutSerial, 3),
                (InDeployment, 10),
                (OutDeployment, 4),
                (InCommunity, 13),
                (OutCommunity, 7),
                (Action, 2),
            ],
            LedgerSchema::V1 => [
                (UpdateDateTime, 0),
                (InSyncDir, 0),
                (InSerial, 2),
                (OutSerial, 8),
                (InDeployment, 4),
                (OutDeployment, 9),
                (InCommunity, 5),
                (OutCommunity, 10),
                (Action, 3),
            ],
            LedgerSchema::V3 => [
                (UpdateDateTime, 1),
                (Action, 4),
                (OutSerial, 6),
                (OutDeployment, 7),
                (OutCommunity, 10),
                (InSerial, 12),
                (InDeployment, 13),
                (InCommunity, 16),
                (InSyncDir, 18),
            ],
        };
        Self {
            indexes: pairs.into_iter().collect(),
        }
    }

    /// Map built from a header row. Unknown names are ignored.
    pub fn from_header(header: &[String]) -> Self {
        let mut indexes = HashMap::new();
        for (index, name) in header.iter().enumerate() {
            if let Some(column) = LedgerColumn::from_header(name) {
                indexes.entry(column).or_insert(index);
            }
        }
        Self { indexes }
    }

    pub fn index(&self, column: LedgerColumn) -> Option<usize> {
        self.indexes.get(&column).copied()
    }

    /// The trimmed cell for `column`, if the map and the row both have it.
    pub fn get<'a>(&self, row: &'a [String], column: LedgerColumn) -> Option<&'a str> {
        row.get(self.index(column)?).map(|cell| cell.trim())
    }
}
