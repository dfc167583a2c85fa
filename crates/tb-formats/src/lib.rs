//! Decoders for talking-book telemetry
//!
//! Pure functions over bytes and text: the firmware flash image, per-content
//! stats files and device logs. Nothing here touches the directory layout;
//! callers hand in buffers and readers and receive values or callbacks
//! through [`TalkingBookDataSink`].

pub mod context;
pub mod cursor;
pub mod error;
pub mod firmware;
pub mod flash;
pub mod log;
pub mod sink;
pub mod stats_file;
pub mod tagged;

pub use context::{ProcessingContext, SyncProcessingContext};
pub use error::{CorruptFile, Error, Result};
pub use flash::FlashData;
pub use log::{CategoryMap, LogAction, LogEvent, LogEventKind, LogFileParser};
pub use sink::{Fanout, RecordingSink, TalkingBookDataSink};
pub use stats_file::StatsFile;
pub use tagged::Tagged;
