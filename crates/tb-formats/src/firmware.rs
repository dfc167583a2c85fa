//! Firmware layout constants and string codecs.
//!
//! Sizes are in UTF-16 code units unless the name says bytes.

pub const SIZE_OF_INT: usize = 4;
pub const SIZE_OF_CHAR: usize = 2;

pub const SYSTEM_DATA_ID: i16 = 254;
pub const NOR_STRUCT_ID_MSG_MAP: i16 = 1;
pub const NOR_STRUCT_ID_ROTATION: i16 = 9;
pub const NOR_STRUCT_ID_COUNTS: i16 = 10;
pub const NOR_STRUCT_ID_MESSAGE_STATS: i16 = 13;
pub const NOR_STRUCT_ID_ALL_MSGS: i16 = 14;
pub const NOR_STRUCT_ID_NO_MESSAGE_STATS: i16 = -2;

pub const FIXED_IMAGE_NAME_SIZE: usize = 20;
pub const FIXED_SERIAL_NUMBER_SIZE: usize = 12;
pub const FIXED_UPDATE_NUMBER_SIZE: usize = 20;
pub const FIXED_LOCATION_SIZE: usize = 40;
pub const FIXED_CONTENT_PACKAGE_SIZE: usize = 20;
pub const MAX_MESSAGE_ID_LENGTH: usize = 20;
pub const MAX_TRACKED_MESSAGES: usize = 40;
pub const MAX_ROTATIONS: usize = 5;

/// Decode a NUL-padded UTF-16LE field, stopping at the first NUL.
pub fn decode_string(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(SIZE_OF_CHAR)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .collect();
    String::from_utf16_lossy(&units).trim().to_string()
}

/// Encode `value` into a UTF-16LE field of exactly `chars` code units,
/// truncating or NUL-padding as needed.
pub fn encode_string(value: &str, chars: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(chars * SIZE_OF_CHAR);
    for unit in value.encode_utf16().take(chars) {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out.resize(chars * SIZE_OF_CHAR, 0);
    out
}
