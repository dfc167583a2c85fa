//! Decoding every payload of every sync directory, once per talking book.

mod tally;

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tb_fs::{TreePath, dir};
use tb_formats::{
    CategoryMap, FlashData, LogFileParser, ProcessingContext, StatsFile, SyncProcessingContext,
    TalkingBookDataSink,
};

pub use tally::{DeviceTally, EventTally};

use crate::Result;
use crate::config::StatsConfig;
use crate::model::SyncDirId;
use crate::navigator::{DirectoryVisitor, WalkContext};

static ARCHIVED_LOG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^log_(.*)\.txt$").unwrap());

/// Per-content stats files have no extension.
static STATS_FILE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^.]+$").unwrap());

/// Navigator visitor that decodes sync directories into a
/// [`TalkingBookDataSink`].
///
/// Consecutive syncs of one talking book often carry copies of the same
/// archived log; each is parsed once per talking book.
pub struct SyncDirProcessor<S> {
    sink: S,
    categories: CategoryMap,
    firmware_first_wins: bool,
    processed_logs: HashSet<PathBuf>,
    firmware: Option<FlashData>,
    context: ProcessingContext,
}

impl<S: TalkingBookDataSink> SyncDirProcessor<S> {
    pub fn new(sink: S, categories: CategoryMap) -> Self {
        Self {
            sink,
            categories,
            firmware_first_wins: true,
            processed_logs: HashSet::new(),
            firmware: None,
            context: ProcessingContext::default(),
        }
    }

    pub fn from_config(sink: S, config: &StatsConfig) -> Self {
        Self::new(sink, config.categories.clone()).firmware_first_wins(config.firmware_first_wins)
    }

    /// Decode a talking book's firmware image from its first sync only.
    pub fn firmware_first_wins(mut self, first_wins: bool) -> Self {
        self.firmware_first_wins = first_wins;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn reset_talking_book(&mut self) {
        self.processed_logs.clear();
        self.firmware = None;
    }

    /// The firmware image to describe this sync with, decoding and reporting
    /// it when it has not been seen yet.
    fn firmware_for(&mut self, base: &SyncProcessingContext, sync_dir: &Path) -> Option<FlashData> {
        if self.firmware_first_wins && self.firmware.is_some() {
            return self.firmware.clone();
        }

        let path = dir::resolve_ignore_case(
            sync_dir,
            &[
                TreePath::Statistics.as_str(),
                TreePath::Stats.as_str(),
                TreePath::FlashData.as_str(),
            ],
        );
        if !path.is_file() {
            return None;
        }

        let bytes = match tb_fs::io::read_bytes(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot read firmware image");
                return None;
            }
        };

        match FlashData::decode(&bytes) {
            Ok(flash) => {
                for reason in flash.is_valid() {
                    tracing::warn!(path = %path.display(), "Firmware image is suspect: {reason}");
                }
                let context = with_firmware(base.clone(), &flash);
                self.sink.process_flash_data(&context, &flash);
                if self.firmware_first_wins {
                    self.firmware = Some(flash.clone());
                }
                Some(flash)
            }
            Err(reason) => {
                tracing::warn!(path = %path.display(), %reason, "Corrupt firmware image");
                self.sink.process_corrupt_flash_data(base, &path, &reason);
                None
            }
        }
    }

    fn process_logs(&mut self, context: &Arc<SyncProcessingContext>, sync_dir: &Path) {
        let mut parser = LogFileParser::new(Arc::clone(context), &self.categories);

        let current = dir::resolve_ignore_case(
            sync_dir,
            &[TreePath::LogDir.as_str(), TreePath::LogFile.as_str()],
        );
        if current.is_file()
            && !self.processed_logs.contains(&current)
            && parse_log(&mut parser, &mut self.sink, &current)
        {
            self.processed_logs.insert(current);
        }

        let archive = dir::child_ignore_case(sync_dir, TreePath::LogArchive.as_str());
        if !archive.is_dir() {
            return;
        }
        let archived = match dir::list_files_where(&archive, |name| ARCHIVED_LOG.is_match(name)) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(path = %archive.display(), error = %e, "Cannot list archived logs");
                return;
            }
        };

        for path in archived {
            let key = Path::new(TreePath::LogArchive.as_str()).join(dir::file_name(&path));
            if self.processed_logs.contains(&key) {
                tracing::debug!(path = %path.display(), "Archived log already processed");
                continue;
            }
            if parse_log(&mut parser, &mut self.sink, &path) {
                self.processed_logs.insert(key);
            }
        }
    }

    fn process_stats(&mut self, context: &SyncProcessingContext, sync_dir: &Path) {
        let stats_dir = dir::resolve_ignore_case(
            sync_dir,
            &[TreePath::Statistics.as_str(), TreePath::Stats.as_str()],
        );
        if !stats_dir.exists() {
            tracing::debug!(path = %stats_dir.display(), "No stats directory");
            return;
        }
        if !stats_dir.is_dir() {
            tracing::warn!(path = %stats_dir.display(), "Stats path is not a directory");
            return;
        }

        let files = match dir::list_files_where(&stats_dir, |name| STATS_FILE.is_match(name)) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(path = %stats_dir.display(), error = %e, "Cannot list stats files");
                return;
            }
        };

        for path in files {
            let content_id = dir::file_name(&path);
            let bytes = match tb_fs::io::read_bytes(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Cannot read stats file");
                    continue;
                }
            };
            match StatsFile::decode(&bytes) {
                Ok(stats) => self.sink.process_stats_file(context, &content_id, &stats),
                Err(reason) => {
                    tracing::warn!(path = %path.display(), %reason, "Corrupt stats file");
                    self.sink
                        .mark_stats_file_corrupted(context, &content_id, &reason);
                }
            }
        }
    }
}

/// Values the device reports about itself win over the directory names.
fn with_firmware(context: SyncProcessingContext, flash: &FlashData) -> SyncProcessingContext {
    let system = flash.system_data();
    context.with_overrides(
        &system.serial_number,
        &system.location,
        &system.content_package,
    )
}

/// Returns whether the whole file was read.
fn parse_log<S: TalkingBookDataSink>(
    parser: &mut LogFileParser<'_>,
    sink: &mut S,
    path: &Path,
) -> bool {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cannot open log");
            return false;
        }
    };

    match parser.parse(&path.display().to_string(), BufReader::new(file), sink) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Log read failed part-way");
            false
        }
    }
}

impl<S: TalkingBookDataSink> DirectoryVisitor for SyncDirProcessor<S> {
    fn start_device_operational_data(&mut self, _ctx: &WalkContext, _device: &str) -> Result<bool> {
        Ok(false)
    }

    fn start_talking_book(&mut self, ctx: &WalkContext, talking_book: &str) -> Result<bool> {
        let deployment = ctx
            .deployment
            .as_ref()
            .map(|d| d.deployment.clone())
            .unwrap_or_default();
        self.context = ProcessingContext {
            talking_book: talking_book.to_string(),
            village: ctx.village().to_string(),
            content_package: deployment.clone(),
            deployment,
            device: ctx.device().to_string(),
        };
        self.reset_talking_book();
        self.sink.on_talking_book_start(&self.context);
        Ok(true)
    }

    fn end_talking_book(&mut self, _ctx: &WalkContext) -> Result<()> {
        self.sink.on_talking_book_end(&self.context);
        self.reset_talking_book();
        Ok(())
    }

    fn process_sync_dir(&mut self, _ctx: &WalkContext, id: &SyncDirId, path: &Path) -> Result<()> {
        let base = SyncProcessingContext::new(&id.dir_name, id.date_time, &self.context);
        let context = match self.firmware_for(&base, path) {
            Some(flash) => with_firmware(base, &flash),
            None => base,
        };

        let context = Arc::new(context);
        self.process_logs(&context, path);
        self.process_stats(&context, path);
        Ok(())
    }
}
