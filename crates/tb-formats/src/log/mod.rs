//! Device log decoding
//!
//! Lines look like
//! `2r0096c008p023d18h18m53s401/314/314V:PLAY TB000248_372AB558 @VOL=03 @Volt=314`:
//! a prelude describing the device clock and battery, an action word, then
//! action-specific arguments.

mod action;
mod category;
mod event;
mod line;
mod parser;

pub use action::LogAction;
pub use category::CategoryMap;
pub use event::{LogEvent, LogEventKind};
pub use line::{LogFilePosition, LogLineContext, LogLineInfo};
pub use parser::LogFileParser;
