//! Per-content statistics files (`statistics/stats/<contentId>`).
//!
//! Layout, little-endian:
//!
//! | offset     | field                         |
//! |------------|-------------------------------|
//! | 0          | version, i32, always 0        |
//! | 4          | serial number, 12 UTF-16 units |
//! | 28         | message id, 20 UTF-16 units    |
//! | `len - 24` | six i32 counters               |
//!
//! The counters are located from the end of the file, not from the header.

use serde::Serialize;

use crate::cursor::LeCursor;
use crate::error::CorruptFile;
use crate::firmware::{self, SIZE_OF_CHAR, SIZE_OF_INT};

const SRN_MAX_LENGTH: usize = 12;
const MSG_ID_LENGTH: usize = 20;
const NUMBER_OF_STATS: usize = 6;
const VERSION: i32 = 0;
const MAX_PLAUSIBLE_TOTAL: i64 = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsFile {
    pub serial_number: String,
    pub message_id: String,
    /// Plays of ten seconds or longer.
    pub open_count: i32,
    /// Plays that reached the end of the recording.
    pub completion_count: i32,
    /// Device-to-device copies.
    pub copy_count: i32,
    pub survey_count: i32,
    pub applied_count: i32,
    pub useless_count: i32,
}

impl StatsFile {
    const HEADER_SIZE: usize = SIZE_OF_INT + (SRN_MAX_LENGTH + MSG_ID_LENGTH) * SIZE_OF_CHAR;
    const COUNTERS_SIZE: usize = NUMBER_OF_STATS * SIZE_OF_INT;

    /// Size of a file written by [`StatsFile::encode`].
    pub const ENCODED_SIZE: usize = Self::HEADER_SIZE + Self::COUNTERS_SIZE;

    pub fn decode(bytes: &[u8]) -> Result<Self, CorruptFile> {
        let mut cursor = LeCursor::new(bytes);
        cursor.enter("StatsFile header");
        let version = cursor.i32()?;
        if version != VERSION {
            return Err(CorruptFile::VersionMismatch {
                found: version,
                expected: VERSION,
            });
        }
        let serial_number = cursor.utf16(SRN_MAX_LENGTH)?;
        let message_id = cursor.utf16(MSG_ID_LENGTH)?;

        cursor.enter("StatsFile counters");
        cursor.seek(bytes.len() - Self::COUNTERS_SIZE);
        let stats = Self {
            serial_number,
            message_id,
            open_count: cursor.i32()?,
            completion_count: cursor.i32()?,
            copy_count: cursor.i32()?,
            survey_count: cursor.i32()?,
            applied_count: cursor.i32()?,
            useless_count: cursor.i32()?,
        };

        let total = stats.total();
        if total > MAX_PLAUSIBLE_TOTAL {
            return Err(CorruptFile::ImplausibleCounts {
                total,
                limit: MAX_PLAUSIBLE_TOTAL,
            });
        }
        Ok(stats)
    }

    /// Write the fixed layout. Over-long strings are truncated to their field.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::ENCODED_SIZE);
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend(firmware::encode_string(&self.serial_number, SRN_MAX_LENGTH));
        out.extend(firmware::encode_string(&self.message_id, MSG_ID_LENGTH));
        for counter in self.counters() {
            out.extend_from_slice(&counter.to_le_bytes());
        }
        out
    }

    fn counters(&self) -> [i32; NUMBER_OF_STATS] {
        [
            self.open_count,
            self.completion_count,
            self.copy_count,
            self.survey_count,
            self.applied_count,
            self.useless_count,
        ]
    }

    /// Sum of all six counters.
    pub fn total(&self) -> i64 {
        self.counters().iter().copied().map(i64::from).sum()
    }
}
