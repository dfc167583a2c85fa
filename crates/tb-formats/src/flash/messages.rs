//! Message map and the per-message, per-rotation stats grid.

use serde::Serialize;

use crate::cursor::LeCursor;
use crate::error::CorruptFile;
use crate::firmware::{
    MAX_MESSAGE_ID_LENGTH, MAX_ROTATIONS, MAX_TRACKED_MESSAGES, NOR_STRUCT_ID_MESSAGE_STATS,
    NOR_STRUCT_ID_MSG_MAP, NOR_STRUCT_ID_NO_MESSAGE_STATS, SIZE_OF_CHAR,
};
use crate::tagged::Tagged;

/// Clamp an advertised firmware count into `0..=limit`.
fn clamp_count(advertised: i16, limit: usize) -> usize {
    usize::try_from(advertised).unwrap_or(0).min(limit)
}

/// Content ids indexed by message slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageMap {
    pub total_messages: i16,
    pub content_ids: Vec<String>,
}

impl MessageMap {
    pub const SIZE: usize = 4 + MAX_TRACKED_MESSAGES * MAX_MESSAGE_ID_LENGTH * SIZE_OF_CHAR;

    pub fn decode(cursor: &mut LeCursor<'_>) -> Result<Tagged<Self>, CorruptFile> {
        cursor.enter("NORmsgMap");
        let struct_id = cursor.i16()?;
        let total_messages = cursor.i16()?;
        let keep = clamp_count(total_messages, MAX_TRACKED_MESSAGES);

        let mut content_ids = Vec::with_capacity(keep);
        for slot in 0..MAX_TRACKED_MESSAGES {
            let id = cursor.utf16(MAX_MESSAGE_ID_LENGTH)?;
            if slot < keep {
                content_ids.push(id);
            }
        }

        Ok(Tagged::check(
            "NORmsgMap",
            NOR_STRUCT_ID_MSG_MAP,
            struct_id,
            Self {
                total_messages,
                content_ids,
            },
        ))
    }

    pub fn content_id(&self, slot: usize) -> Option<&str> {
        self.content_ids.get(slot).map(String::as_str)
    }
}

/// Play counters for one message in one rotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageStats {
    /// The slot was never written (or carried an unknown tag).
    pub empty: bool,
    pub content_id: Option<String>,
    pub index_msg: i16,
    pub number_profile: i16,
    pub number_rotation: i16,
    pub count_started: i32,
    pub count_quarter: i32,
    pub count_half: i32,
    pub count_three_quarters: i32,
    pub count_completed: i32,
    pub count_applied: i32,
    pub count_useless: i32,
    pub total_seconds_played: u32,
}

impl MessageStats {
    pub const SIZE: usize = 24;

    pub fn decode(
        content_id: Option<&str>,
        cursor: &mut LeCursor<'_>,
    ) -> Result<Tagged<Self>, CorruptFile> {
        cursor.enter("NORmsgStats");
        let struct_id = cursor.i16()?;
        let stats = Self {
            empty: struct_id != NOR_STRUCT_ID_MESSAGE_STATS,
            content_id: content_id.map(str::to_string),
            index_msg: cursor.i16()?,
            number_profile: cursor.i16()?,
            number_rotation: cursor.i16()?,
            count_started: i32::from(cursor.i16()?),
            count_quarter: i32::from(cursor.i16()?),
            count_half: i32::from(cursor.i16()?),
            count_three_quarters: i32::from(cursor.i16()?),
            count_completed: i32::from(cursor.i16()?),
            count_applied: i32::from(cursor.i16()?),
            count_useless: i32::from(cursor.i16()?),
            total_seconds_played: u32::from(cursor.u16()?),
        };

        // An empty slot is tagged differently but is not suspect.
        let expected = if struct_id == NOR_STRUCT_ID_NO_MESSAGE_STATS {
            NOR_STRUCT_ID_NO_MESSAGE_STATS
        } else {
            NOR_STRUCT_ID_MESSAGE_STATS
        };
        Ok(Tagged::check("NORmsgStats", expected, struct_id, stats))
    }

    /// Add another rotation's counters into this one.
    pub fn accumulate(&mut self, other: &MessageStats) {
        self.count_started = self.count_started.saturating_add(other.count_started);
        self.count_quarter = self.count_quarter.saturating_add(other.count_quarter);
        self.count_half = self.count_half.saturating_add(other.count_half);
        self.count_three_quarters = self
            .count_three_quarters
            .saturating_add(other.count_three_quarters);
        self.count_completed = self.count_completed.saturating_add(other.count_completed);
        self.count_applied = self.count_applied.saturating_add(other.count_applied);
        self.count_useless = self.count_useless.saturating_add(other.count_useless);
        self.total_seconds_played = self
            .total_seconds_played
            .saturating_add(other.total_seconds_played);
    }
}

/// The fixed grid of stats, trimmed to the advertised dimensions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AllMessageStats {
    pub total_messages: i16,
    pub total_rotations: i16,
    /// One row per message slot, one entry per rotation.
    pub stats: Vec<Vec<Tagged<MessageStats>>>,
}

impl AllMessageStats {
    pub const SIZE: usize = 4 + MAX_TRACKED_MESSAGES * MAX_ROTATIONS * MessageStats::SIZE;

    /// Decode the whole grid. Every cell is consumed even when the advertised
    /// counts are smaller.
    pub fn decode(map: &MessageMap, cursor: &mut LeCursor<'_>) -> Result<Self, CorruptFile> {
        cursor.enter("NORallMsgStats");
        let total_messages = cursor.i16()?;
        let total_rotations = cursor.i16()?;
        let rows = clamp_count(total_messages, MAX_TRACKED_MESSAGES);
        let columns = clamp_count(total_rotations, MAX_ROTATIONS);

        let mut stats = Vec::with_capacity(rows);
        for slot in 0..MAX_TRACKED_MESSAGES {
            let mut row = Vec::with_capacity(columns);
            for rotation in 0..MAX_ROTATIONS {
                let cell = MessageStats::decode(map.content_id(slot), cursor)?;
                if rotation < columns {
                    row.push(cell);
                }
            }
            if slot < rows {
                stats.push(row);
            }
        }

        Ok(Self {
            total_messages,
            total_rotations,
            stats,
        })
    }
}
