//! Device identity and power-cycle counters.

use serde::Serialize;

use crate::cursor::LeCursor;
use crate::error::CorruptFile;
use crate::firmware::{
    FIXED_CONTENT_PACKAGE_SIZE, FIXED_LOCATION_SIZE, FIXED_SERIAL_NUMBER_SIZE,
    FIXED_UPDATE_NUMBER_SIZE, MAX_ROTATIONS, NOR_STRUCT_ID_COUNTS, NOR_STRUCT_ID_ROTATION,
    SYSTEM_DATA_ID,
};
use crate::tagged::Tagged;

/// Identity block written when the device was last updated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemData {
    pub reflash_count: i16,
    pub serial_number: String,
    /// Deployment the device was last updated with.
    pub update_number: String,
    /// Village the device was assigned to.
    pub location: String,
    pub content_package: String,
    pub day_last_updated: i16,
    pub month_last_updated: i16,
    pub year_last_updated: i16,
}

impl SystemData {
    pub const SIZE: usize = 194;

    pub fn decode(cursor: &mut LeCursor<'_>) -> Result<Tagged<Self>, CorruptFile> {
        cursor.enter("SystemData");
        let struct_id = cursor.i16()?;
        let data = Self {
            reflash_count: cursor.i16()?,
            serial_number: cursor.utf16(FIXED_SERIAL_NUMBER_SIZE)?,
            update_number: cursor.utf16(FIXED_UPDATE_NUMBER_SIZE)?,
            location: cursor.utf16(FIXED_LOCATION_SIZE)?,
            content_package: cursor.utf16(FIXED_CONTENT_PACKAGE_SIZE)?,
            day_last_updated: cursor.i16()?,
            month_last_updated: cursor.i16()?,
            year_last_updated: cursor.i16()?,
        };
        Ok(Tagged::check("SystemData", SYSTEM_DATA_ID, struct_id, data))
    }
}

/// One rotation slot. The firmware reserves all slots but only writes the
/// ones it has used, so unwritten slots come back suspect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NorRotation {
    pub rotation_number: i16,
    pub period_number: i16,
    pub hours_after_last_update: i16,
    pub init_voltage: i16,
}

impl NorRotation {
    pub const SIZE: usize = 10;

    pub fn decode(cursor: &mut LeCursor<'_>) -> Result<Tagged<Self>, CorruptFile> {
        cursor.enter("NORrotation");
        let struct_id = cursor.i16()?;
        let rotation = Self {
            rotation_number: cursor.i16()?,
            period_number: cursor.i16()?,
            hours_after_last_update: cursor.i16()?,
            init_voltage: cursor.i16()?,
        };
        Ok(Tagged::check(
            "NORrotation",
            NOR_STRUCT_ID_ROTATION,
            struct_id,
            rotation,
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemCounts {
    pub period: i16,
    pub cumulative_days: i16,
    pub corruption_day: i16,
    pub powerups: i16,
    pub last_init_voltage: i16,
    pub rotations: Vec<Tagged<NorRotation>>,
}

impl SystemCounts {
    pub const SIZE: usize = 12 + MAX_ROTATIONS * NorRotation::SIZE;

    pub fn decode(cursor: &mut LeCursor<'_>) -> Result<Tagged<Self>, CorruptFile> {
        cursor.enter("SystemCounts");
        let struct_id = cursor.i16()?;
        let mut counts = Self {
            period: cursor.i16()?,
            cumulative_days: cursor.i16()?,
            corruption_day: cursor.i16()?,
            powerups: cursor.i16()?,
            last_init_voltage: cursor.i16()?,
            rotations: Vec::with_capacity(MAX_ROTATIONS),
        };
        for _ in 0..MAX_ROTATIONS {
            counts.rotations.push(NorRotation::decode(cursor)?);
        }
        Ok(Tagged::check(
            "SystemCounts",
            NOR_STRUCT_ID_COUNTS,
            struct_id,
            counts,
        ))
    }

    /// Rotation slots that carried a valid tag.
    pub fn written_rotations(&self) -> impl Iterator<Item = &NorRotation> {
        self.rotations.iter().filter_map(|slot| match slot {
            Tagged::Decoded { value } => Some(value),
            Tagged::Suspect { .. } => None,
        })
    }
}
