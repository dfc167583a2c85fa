//! Receivers for decoded talking-book telemetry.

use std::path::Path;

use crate::context::{ProcessingContext, SyncProcessingContext};
use crate::error::CorruptFile;
use crate::flash::FlashData;
use crate::log::LogEvent;
use crate::stats_file::StatsFile;

/// Callbacks fired while one talking book's sync directories are decoded.
///
/// Every method has a no-op default so a sink only implements what it
/// consumes.
#[allow(unused_variables)]
pub trait TalkingBookDataSink {
    fn on_talking_book_start(&mut self, context: &ProcessingContext) {}

    fn on_talking_book_end(&mut self, context: &ProcessingContext) {}

    fn process_flash_data(&mut self, context: &SyncProcessingContext, flash: &FlashData) {}

    fn process_corrupt_flash_data(
        &mut self,
        context: &SyncProcessingContext,
        path: &Path,
        reason: &CorruptFile,
    ) {
    }

    fn on_log_file_start(&mut self, file_name: &str) {}

    fn on_log_event(&mut self, event: &LogEvent) {}

    fn on_log_file_end(&mut self) {}

    fn process_stats_file(
        &mut self,
        context: &SyncProcessingContext,
        content_id: &str,
        stats: &StatsFile,
    ) {
    }

    fn mark_stats_file_corrupted(
        &mut self,
        context: &SyncProcessingContext,
        content_id: &str,
        reason: &CorruptFile,
    ) {
    }
}

impl<T: TalkingBookDataSink + ?Sized> TalkingBookDataSink for &mut T {
    fn on_talking_book_start(&mut self, context: &ProcessingContext) {
        (**self).on_talking_book_start(context);
    }

    fn on_talking_book_end(&mut self, context: &ProcessingContext) {
        (**self).on_talking_book_end(context);
    }

    fn process_flash_data(&mut self, context: &SyncProcessingContext, flash: &FlashData) {
        (**self).process_flash_data(context, flash);
    }

    fn process_corrupt_flash_data(
        &mut self,
        context: &SyncProcessingContext,
        path: &Path,
        reason: &CorruptFile,
    ) {
        (**self).process_corrupt_flash_data(context, path, reason);
    }

    fn on_log_file_start(&mut self, file_name: &str) {
        (**self).on_log_file_start(file_name);
    }

    fn on_log_event(&mut self, event: &LogEvent) {
        (**self).on_log_event(event);
    }

    fn on_log_file_end(&mut self) {
        (**self).on_log_file_end();
    }

    fn process_stats_file(
        &mut self,
        context: &SyncProcessingContext,
        content_id: &str,
        stats: &StatsFile,
    ) {
        (**self).process_stats_file(context, content_id, stats);
    }

    fn mark_stats_file_corrupted(
        &mut self,
        context: &SyncProcessingContext,
        content_id: &str,
        reason: &CorruptFile,
    ) {
        (**self).mark_stats_file_corrupted(context, content_id, reason);
    }
}

/// Forwards every callback to each registered sink, in registration order.
#[derive(Default)]
pub struct Fanout<'a> {
    sinks: Vec<&'a mut dyn TalkingBookDataSink>,
}

impl<'a> Fanout<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: &'a mut dyn TalkingBookDataSink) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn push(&mut self, sink: &'a mut dyn TalkingBookDataSink) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl TalkingBookDataSink for Fanout<'_> {
    fn on_talking_book_start(&mut self, context: &ProcessingContext) {
        for sink in &mut self.sinks {
            sink.on_talking_book_start(context);
        }
    }

    fn on_talking_book_end(&mut self, context: &ProcessingContext) {
        for sink in &mut self.sinks {
            sink.on_talking_book_end(context);
        }
    }

    fn process_flash_data(&mut self, context: &SyncProcessingContext, flash: &FlashData) {
        for sink in &mut self.sinks {
            sink.process_flash_data(context, flash);
        }
    }

    fn process_corrupt_flash_data(
        &mut self,
        context: &SyncProcessingContext,
        path: &Path,
        reason: &CorruptFile,
    ) {
        for sink in &mut self.sinks {
            sink.process_corrupt_flash_data(context, path, reason);
        }
    }

    fn on_log_file_start(&mut self, file_name: &str) {
        for sink in &mut self.sinks {
            sink.on_log_file_start(file_name);
        }
    }

    fn on_log_event(&mut self, event: &LogEvent) {
        for sink in &mut self.sinks {
            sink.on_log_event(event);
        }
    }

    fn on_log_file_end(&mut self) {
        for sink in &mut self.sinks {
            sink.on_log_file_end();
        }
    }

    fn process_stats_file(
        &mut self,
        context: &SyncProcessingContext,
        content_id: &str,
        stats: &StatsFile,
    ) {
        for sink in &mut self.sinks {
            sink.process_stats_file(context, content_id, stats);
        }
    }

    fn mark_stats_file_corrupted(
        &mut self,
        context: &SyncProcessingContext,
        content_id: &str,
        reason: &CorruptFile,
    ) {
        for sink in &mut self.sinks {
            sink.mark_stats_file_corrupted(context, content_id, reason);
        }
    }
}

/// Records every callback for inspection. Useful in tests and for dumping
/// a decode pass.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub files_started: Vec<String>,
    pub files_ended: usize,
    pub events: Vec<LogEvent>,
    pub talking_books: Vec<ProcessingContext>,
    pub flash: Vec<(SyncProcessingContext, FlashData)>,
    pub corrupt_flash: Vec<(String, CorruptFile)>,
    pub stats: Vec<(String, StatsFile)>,
    pub corrupt_stats: Vec<(String, CorruptFile)>,
}

impl TalkingBookDataSink for RecordingSink {
    fn on_talking_book_start(&mut self, context: &ProcessingContext) {
        self.talking_books.push(context.clone());
    }

    fn process_flash_data(&mut self, context: &SyncProcessingContext, flash: &FlashData) {
        self.flash.push((context.clone(), flash.clone()));
    }

    fn process_corrupt_flash_data(
        &mut self,
        context: &SyncProcessingContext,
        _path: &Path,
        reason: &CorruptFile,
    ) {
        self.corrupt_flash
            .push((context.sync_dir.clone(), reason.clone()));
    }

    fn on_log_file_start(&mut self, file_name: &str) {
        self.files_started.push(file_name.to_string());
    }

    fn on_log_event(&mut self, event: &LogEvent) {
        self.events.push(event.clone());
    }

    fn on_log_file_end(&mut self) {
        self.files_ended += 1;
    }

    fn process_stats_file(
        &mut self,
        _context: &SyncProcessingContext,
        content_id: &str,
        stats: &StatsFile,
    ) {
        self.stats.push((content_id.to_string(), stats.clone()));
    }

    fn mark_stats_file_corrupted(
        &mut self,
        _context: &SyncProcessingContext,
        content_id: &str,
        reason: &CorruptFile,
    ) {
        self.corrupt_stats
            .push((content_id.to_string(), reason.clone()));
    }
}
