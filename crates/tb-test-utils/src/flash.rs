//! [`FlashImageBuilder`] writes firmware images byte by byte, independent of
//! the decoder under test.

const MAX_TRACKED_MESSAGES: usize = 40;
const MAX_ROTATIONS: usize = 5;

/// Counters for one populated stats cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellStats {
    pub started: i16,
    pub quarter: i16,
    pub half: i16,
    pub three_quarters: i16,
    pub completed: i16,
    pub applied: i16,
    pub useless: i16,
    pub seconds: u16,
}

/// Builds a little-endian `flashData.bin` image.
///
/// # Example
///
/// ```rust
/// use tb_test_utils::{CellStats, FlashImageBuilder};
///
/// let image = FlashImageBuilder::new()
///     .serial("A-000123")
///     .message("TB000248_372AB558")
///     .total_rotations(2)
///     .cell(0, 1, CellStats { started: 3, ..Default::default() })
///     .build();
/// assert_eq!(image.len(), 6664);
/// ```
#[derive(Debug, Clone)]
pub struct FlashImageBuilder {
    system_data_id: i16,
    counts_id: i16,
    map_id: i16,
    serial: String,
    update_number: String,
    location: String,
    content_package: String,
    rotations_written: usize,
    messages: Vec<String>,
    total_messages: Option<i16>,
    total_rotations: i16,
    cells: Vec<(usize, usize, i16, CellStats)>,
}

impl Default for FlashImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashImageBuilder {
    pub fn new() -> Self {
        Self {
            system_data_id: 254,
            counts_id: 10,
            map_id: 1,
            serial: "A-000000".to_string(),
            update_number: "2013-03".to_string(),
            location: String::new(),
            content_package: String::new(),
            rotations_written: 1,
            messages: Vec::new(),
            total_messages: None,
            total_rotations: 1,
            cells: Vec::new(),
        }
    }

    pub fn serial(mut self, serial: &str) -> Self {
        self.serial = serial.to_string();
        self
    }

    pub fn update_number(mut self, update: &str) -> Self {
        self.update_number = update.to_string();
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.location = location.to_string();
        self
    }

    pub fn content_package(mut self, package: &str) -> Self {
        self.content_package = package.to_string();
        self
    }

    /// Overwrite the SystemData struct id.
    pub fn system_data_id(mut self, id: i16) -> Self {
        self.system_data_id = id;
        self
    }

    pub fn counts_id(mut self, id: i16) -> Self {
        self.counts_id = id;
        self
    }

    pub fn map_id(mut self, id: i16) -> Self {
        self.map_id = id;
        self
    }

    /// Number of rotation slots carrying a valid tag.
    pub fn rotations_written(mut self, count: usize) -> Self {
        self.rotations_written = count.min(MAX_ROTATIONS);
        self
    }

    /// Add a content id to the message map.
    pub fn message(mut self, content_id: &str) -> Self {
        self.messages.push(content_id.to_string());
        self
    }

    /// Advertise a message count different from the number of messages added.
    pub fn total_messages(mut self, count: i16) -> Self {
        self.total_messages = Some(count);
        self
    }

    pub fn total_rotations(mut self, count: i16) -> Self {
        self.total_rotations = count;
        self
    }

    /// Populate the stats cell at `slot`, `rotation`.
    pub fn cell(self, slot: usize, rotation: usize, stats: CellStats) -> Self {
        self.cell_with_id(slot, rotation, 13, stats)
    }

    /// Populate a cell with an arbitrary struct id.
    pub fn cell_with_id(mut self, slot: usize, rotation: usize, id: i16, stats: CellStats) -> Self {
        self.cells.push((slot, rotation, id, stats));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(6664);

        // SystemData
        put_i16(&mut out, self.system_data_id);
        put_i16(&mut out, 3);
        put_utf16(&mut out, &self.serial, 12);
        put_utf16(&mut out, &self.update_number, 20);
        put_utf16(&mut out, &self.location, 40);
        put_utf16(&mut out, &self.content_package, 20);
        put_i16(&mut out, 15);
        put_i16(&mut out, 3);
        put_i16(&mut out, 2013);

        // SystemCounts
        put_i16(&mut out, self.counts_id);
        for value in [2, 40, 0, 12, 310] {
            put_i16(&mut out, value);
        }
        for slot in 0..MAX_ROTATIONS {
            let id = if slot < self.rotations_written { 9 } else { -1 };
            put_i16(&mut out, id);
            for value in [slot as i16, 1, 24, 300] {
                put_i16(&mut out, value);
            }
        }

        // NORmsgMap
        let total_messages = self
            .total_messages
            .unwrap_or(self.messages.len() as i16);
        put_i16(&mut out, self.map_id);
        put_i16(&mut out, total_messages);
        for slot in 0..MAX_TRACKED_MESSAGES {
            let id = self.messages.get(slot).map(String::as_str).unwrap_or("");
            put_utf16(&mut out, id, 20);
        }

        // NORallMsgStats
        put_i16(&mut out, total_messages);
        put_i16(&mut out, self.total_rotations);
        for slot in 0..MAX_TRACKED_MESSAGES {
            for rotation in 0..MAX_ROTATIONS {
                let populated = self
                    .cells
                    .iter()
                    .find(|(s, r, _, _)| *s == slot && *r == rotation);
                match populated {
                    Some((_, _, id, stats)) => {
                        put_i16(&mut out, *id);
                        put_i16(&mut out, slot as i16);
                        put_i16(&mut out, 0);
                        put_i16(&mut out, rotation as i16);
                        for value in [
                            stats.started,
                            stats.quarter,
                            stats.half,
                            stats.three_quarters,
                            stats.completed,
                            stats.applied,
                            stats.useless,
                        ] {
                            put_i16(&mut out, value);
                        }
                        out.extend_from_slice(&stats.seconds.to_le_bytes());
                    }
                    None => {
                        put_i16(&mut out, -2);
                        out.extend_from_slice(&[0u8; 22]);
                    }
                }
            }
        }
        out
    }
}

fn put_i16(out: &mut Vec<u8>, value: i16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_utf16(out: &mut Vec<u8>, value: &str, chars: usize) {
    let mut units: Vec<u16> = value.encode_utf16().take(chars).collect();
    units.resize(chars, 0);
    for unit in units {
        out.extend_from_slice(&unit.to_le_bytes());
    }
}
