use serde::Serialize;

use super::action::LogAction;
use super::line::LogLineContext;

/// One event decoded from a log line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEvent {
    pub context: LogLineContext,
    pub kind: LogEventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEventKind {
    Play {
        content_id: String,
        volume: u32,
        voltage: f64,
    },
    Played {
        content_id: String,
        seconds_played: u32,
        seconds_length: u32,
        volume: u32,
        voltage: f64,
        /// The recording played to its end.
        ended: bool,
    },
    Category {
        category: String,
    },
    Record {
        content_id: String,
        slot: u32,
    },
    Recorded {
        seconds: u32,
    },
    Pause {
        content_id: String,
    },
    Unpause {
        content_id: String,
    },
    Survey {
        content_id: String,
    },
    SurveyCompleted {
        content_id: String,
        useful: bool,
    },
    ShuttingDown,
    VoltageDrop {
        action: LogAction,
        voltage_dropped: f64,
        seconds: u32,
    },
}

impl LogEventKind {
    /// Stable name used when tallying events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Play { .. } => "play",
            Self::Played { .. } => "played",
            Self::Category { .. } => "category",
            Self::Record { .. } => "record",
            Self::Recorded { .. } => "recorded",
            Self::Pause { .. } => "pause",
            Self::Unpause { .. } => "unpause",
            Self::Survey { .. } => "survey",
            Self::SurveyCompleted { .. } => "survey_completed",
            Self::ShuttingDown => "shutting_down",
            Self::VoltageDrop { .. } => "voltage_drop",
        }
    }
}
