use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tb_formats::{
    CorruptFile, FlashData, LogEvent, ProcessingContext, StatsFile, SyncProcessingContext,
    TalkingBookDataSink,
};

/// Counts for one device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceTally {
    pub talking_books: usize,
    pub log_files: usize,
    pub events: BTreeMap<String, usize>,
    pub flash_images: usize,
    pub corrupt_flash_images: usize,
    pub stats_files: usize,
    pub corrupt_stats_files: usize,
}

/// Summarises a processing pass per device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventTally {
    pub devices: BTreeMap<String, DeviceTally>,
    #[serde(skip)]
    current_device: String,
}

impl EventTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device(&self, device: &str) -> Option<&DeviceTally> {
        self.devices.get(device)
    }

    /// Events of `kind` across every device.
    pub fn total_events(&self, kind: &str) -> usize {
        self.devices
            .values()
            .filter_map(|d| d.events.get(kind))
            .sum()
    }

    fn entry(&mut self, device: &str) -> &mut DeviceTally {
        self.devices.entry(device.to_string()).or_default()
    }
}

impl TalkingBookDataSink for EventTally {
    fn on_talking_book_start(&mut self, context: &ProcessingContext) {
        self.current_device.clone_from(&context.device);
        self.entry(&context.device).talking_books += 1;
    }

    fn process_flash_data(&mut self, context: &SyncProcessingContext, _flash: &FlashData) {
        self.entry(&context.device).flash_images += 1;
    }

    fn process_corrupt_flash_data(
        &mut self,
        context: &SyncProcessingContext,
        _path: &Path,
        _reason: &CorruptFile,
    ) {
        self.entry(&context.device).corrupt_flash_images += 1;
    }

    fn on_log_file_start(&mut self, _file_name: &str) {
        let device = self.current_device.clone();
        self.entry(&device).log_files += 1;
    }

    fn on_log_event(&mut self, event: &LogEvent) {
        *self
            .entry(&event.context.sync.device)
            .events
            .entry(event.kind.name().to_string())
            .or_default() += 1;
    }

    fn process_stats_file(
        &mut self,
        context: &SyncProcessingContext,
        _content_id: &str,
        _stats: &StatsFile,
    ) {
        self.entry(&context.device).stats_files += 1;
    }

    fn mark_stats_file_corrupted(
        &mut self,
        context: &SyncProcessingContext,
        _content_id: &str,
        _reason: &CorruptFile,
    ) {
        self.entry(&context.device).corrupt_stats_files += 1;
    }
}
