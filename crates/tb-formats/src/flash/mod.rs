//! Firmware flash image (`flashData.bin`).
//!
//! The image is four fixed-size structures laid end to end, little-endian,
//! with UTF-16LE text fields. Struct-ID mismatches are tolerated and surface
//! as [`Tagged::Suspect`]; a buffer that is too short is a [`CorruptFile`].

mod messages;
mod system;

pub use messages::{AllMessageStats, MessageMap, MessageStats};
pub use system::{NorRotation, SystemCounts, SystemData};

use serde::Serialize;

use crate::cursor::LeCursor;
use crate::error::CorruptFile;
use crate::tagged::Tagged;

/// Rotation number given to stats aggregated across rotations.
pub const NO_SINGLE_ROTATION: i16 = -1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlashData {
    pub system_data: Tagged<SystemData>,
    pub system_counts: Tagged<SystemCounts>,
    pub message_map: Tagged<MessageMap>,
    pub message_stats: AllMessageStats,
}

impl FlashData {
    /// Total size of a complete image.
    pub const SIZE: usize =
        SystemData::SIZE + SystemCounts::SIZE + MessageMap::SIZE + AllMessageStats::SIZE;

    pub fn decode(bytes: &[u8]) -> Result<Self, CorruptFile> {
        let mut cursor = LeCursor::new(bytes);
        let system_data = SystemData::decode(&mut cursor)?;
        let system_counts = SystemCounts::decode(&mut cursor)?;
        let message_map = MessageMap::decode(&mut cursor)?;
        let message_stats = AllMessageStats::decode(message_map.value(), &mut cursor)?;

        if cursor.remaining() > 0 {
            tracing::debug!(
                trailing = cursor.remaining(),
                "flash image has bytes past the stats grid"
            );
        }

        Ok(Self {
            system_data,
            system_counts,
            message_map,
            message_stats,
        })
    }

    pub fn system_data(&self) -> &SystemData {
        self.system_data.value()
    }

    /// One row per message slot with any written rotation, counters summed
    /// over the written rotations.
    pub fn all_stats(&self) -> Vec<MessageStats> {
        let mut rows = Vec::new();
        for rotations in &self.message_stats.stats {
            let mut total: Option<MessageStats> = None;
            for cell in rotations.iter().map(Tagged::value).filter(|c| !c.empty) {
                match total.as_mut() {
                    None => {
                        total = Some(MessageStats {
                            number_rotation: NO_SINGLE_ROTATION,
                            ..cell.clone()
                        });
                    }
                    Some(sum) => {
                        sum.index_msg = cell.index_msg;
                        sum.content_id.clone_from(&cell.content_id);
                        sum.accumulate(cell);
                    }
                }
            }
            rows.extend(total);
        }
        rows
    }

    /// Every cell of the trimmed grid without aggregation.
    pub fn all_stats_per_rotation(&self) -> Vec<MessageStats> {
        self.message_stats
            .stats
            .iter()
            .flatten()
            .map(|cell| cell.value().clone())
            .collect()
    }

    /// Reasons this image should not be trusted. Empty means valid.
    ///
    /// Rotation slots are not considered: unused slots are never written.
    pub fn is_valid(&self) -> Vec<String> {
        let mut reasons = Vec::new();

        let tags = [
            self.system_data.suspect_reason(),
            self.system_counts.suspect_reason(),
            self.message_map.suspect_reason(),
        ];
        reasons.extend(tags.into_iter().flatten().map(str::to_string));

        if self.system_data().serial_number.is_empty() {
            reasons.push("serial number is empty".to_string());
        }

        for cell in self.message_stats.stats.iter().flatten() {
            if let Some(reason) = cell.suspect_reason() {
                reasons.push(reason.to_string());
            }
            let stats = cell.value();
            if !stats.empty && stats.content_id.as_deref().unwrap_or("").is_empty() {
                reasons.push(format!(
                    "content id is empty for message {} in rotation {}",
                    stats.index_msg, stats.number_rotation
                ));
            }
        }
        reasons
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_is_6664_bytes() {
        assert_eq!(SystemData::SIZE, 194);
        assert_eq!(SystemCounts::SIZE, 62);
        assert_eq!(FlashData::SIZE, 6664);
    }

    #[test]
    fn test_empty_buffer_is_truncated_system_data() {
        let err = FlashData::decode(&[]).unwrap_err();
        assert!(matches!(
            err,
            CorruptFile::Truncated {
                structure: "SystemData",
                offset: 0,
                ..
            }
        ));
    }
}
