//! Operational ledgers (`tbData` CSV files) the loader writes on every sync.
//!
//! Each `update` row records one sync directory the loader created, the
//! talking book as it was found, and the talking book as it was left.

mod csv;
mod schema;

use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;
use tb_fs::dir;

pub use schema::{ColumnMap, LedgerColumn, LedgerSchema};

use crate::Result;
use crate::model::{DeploymentId, DirectoryFormat, SyncDirId};

const DEPLOYMENT_EXPECTED: &str =
    "YYYY-XX, where YYYY is the year and XX the deployment within that year";
const SYNC_DIR_EXPECTED: &str =
    "a sync directory name such as 2014y05m02d10h11m12s-<id> or 5m2d10h11m12s";

/// Rows shorter than this are corrupt.
const MIN_FIELDS: usize = 11;

/// One ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalInfo {
    pub device: String,
    pub sync_dir_name: String,
    pub date_time: NaiveDateTime,
    pub in_talking_book: String,
    pub out_talking_book: String,
    pub in_deployment: String,
    pub out_deployment: String,
    pub in_village: String,
    pub out_village: String,
}

/// A ledger cell that does not hold what it should.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidProperty {
    pub property: String,
    pub expected: String,
    pub actual: String,
    pub line: usize,
}

impl InvalidProperty {
    fn new(property: &str, expected: &str, actual: &str, line: usize) -> Self {
        Self {
            property: property.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            line,
        }
    }
}

/// A row with a parseable sync directory name.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub id: SyncDirId,
    pub action: String,
    pub info: OperationalInfo,
}

impl LedgerEntry {
    pub fn is_update(&self) -> bool {
        self.action.eq_ignore_ascii_case("update")
    }
}

/// Everything read from one ledger file.
#[derive(Debug, Clone, Default)]
pub struct LedgerFile {
    pub entries: Vec<LedgerEntry>,
    pub invalid: Vec<InvalidProperty>,
}

/// Read the ledger at `path`, written by the loader on `device`.
pub fn read_ledger(
    path: &Path,
    device: &str,
    format: DirectoryFormat,
    includes_headers: bool,
) -> Result<LedgerFile> {
    let bytes = tb_fs::io::read_bytes(path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(parse_ledger(
        &dir::file_name(path),
        &text,
        device,
        format,
        includes_headers,
    ))
}

/// Parse ledger text. `file_name` selects the schema and, for the oldest
/// ledgers, supplies part of each sync directory name.
pub fn parse_ledger(
    file_name: &str,
    text: &str,
    device: &str,
    format: DirectoryFormat,
    includes_headers: bool,
) -> LedgerFile {
    let version = LedgerSchema::version_of(file_name);
    let schema = LedgerSchema::for_version(version);
    let mut columns = ColumnMap::positional(schema);
    let mut ledger = LedgerFile::default();

    for (index, row) in csv::records(text).into_iter().enumerate() {
        let line = index + 1;
        if line == 1
            && includes_headers
            && row.first().is_some_and(|cell| schema::is_header_cell(cell))
        {
            columns = ColumnMap::from_header(&row);
            continue;
        }

        let reader = RowReader {
            file_name,
            device,
            format,
            schema,
            columns: &columns,
        };
        reader.read(&row, line, &mut ledger);
    }

    ledger
}

struct RowReader<'a> {
    file_name: &'a str,
    device: &'a str,
    format: DirectoryFormat,
    schema: LedgerSchema,
    columns: &'a ColumnMap,
}

impl RowReader<'_> {
    fn read(&self, row: &[String], line: usize, ledger: &mut LedgerFile) {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            return;
        }
        if row.len() < MIN_FIELDS {
            tracing::error!(
                file = self.file_name,
                line,
                fields = row.len(),
                "Corrupt ledger row: too few fields"
            );
            return;
        }

        let cell = |column| self.columns.get(row, column);
        let (
            Some(sync_cell),
            Some(in_serial),
            Some(out_serial),
            Some(in_deployment),
            Some(out_deployment),
            Some(in_village),
            Some(out_village),
            Some(action),
        ) = (
            if self.schema == LedgerSchema::V0 {
                cell(LedgerColumn::UpdateDateTime)
            } else {
                cell(LedgerColumn::InSyncDir)
            },
            cell(LedgerColumn::InSerial),
            cell(LedgerColumn::OutSerial),
            cell(LedgerColumn::InDeployment),
            cell(LedgerColumn::OutDeployment),
            cell(LedgerColumn::InCommunity),
            cell(LedgerColumn::OutCommunity),
            cell(LedgerColumn::Action),
        )
        else {
            tracing::error!(file = self.file_name, line, "Corrupt ledger row: missing column");
            return;
        };

        let mut sync_dir_name = if self.schema == LedgerSchema::V0 {
            format!("{sync_cell}{}", self.file_name.get(22..).unwrap_or_default())
        } else {
            sync_cell.to_string()
        };
        if self.format == DirectoryFormat::Archive || !sync_dir_name.contains('-') {
            sync_dir_name = format!("{sync_dir_name}-{}", self.device);
        }

        let out_id = DeploymentId::parse(out_deployment);
        if !out_id.is_valid() {
            ledger.invalid.push(InvalidProperty::new(
                "outDeploymentId",
                DEPLOYMENT_EXPECTED,
                out_deployment,
                line,
            ));
        }

        let mut in_id = DeploymentId::parse(in_deployment);
        if !in_id.is_valid() && !in_id.is_unknown() {
            ledger.invalid.push(InvalidProperty::new(
                "inDeploymentId",
                DEPLOYMENT_EXPECTED,
                in_deployment,
                line,
            ));
            if out_id.is_valid() {
                in_id = out_id.guess_previous();
                tracing::warn!(
                    file = self.file_name,
                    line,
                    guess = %in_id,
                    "Guessing in-deployment from out-deployment"
                );
            } else {
                tracing::error!(file = self.file_name, line, "Unable to resolve a deployment id");
            }
        }

        if !in_serial.eq_ignore_ascii_case(out_serial) && !in_serial.eq_ignore_ascii_case("UNKNOWN")
        {
            ledger.invalid.push(InvalidProperty::new(
                "outTalkingBook",
                in_serial,
                out_serial,
                line,
            ));
        }

        let id = SyncDirId::parse(&in_id, &sync_dir_name);
        let Some(date_time) = id.date_time else {
            tracing::error!(file = self.file_name, line, name = %sync_dir_name, "Corrupt ledger row: bad sync directory");
            ledger.invalid.push(InvalidProperty::new(
                "syncDirName",
                SYNC_DIR_EXPECTED,
                &sync_dir_name,
                line,
            ));
            return;
        };

        ledger.entries.push(LedgerEntry {
            id,
            action: action.to_string(),
            info: OperationalInfo {
                device: self.device.to_string(),
                sync_dir_name,
                date_time,
                in_talking_book: in_serial.to_string(),
                out_talking_book: out_serial.to_string(),
                in_deployment: in_id.id.clone(),
                out_deployment: out_deployment.to_string(),
                in_village: in_village.to_string(),
                out_village: out_village.to_string(),
            },
        });
    }
}
