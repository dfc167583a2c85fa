use serde::Serialize;

/// The action word of a log line, matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    Play,
    Played,
    Category,
    Record,
    TimeRecorded,
    Paused,
    Unpaused,
    Survey,
    ShuttingDown,
}

impl LogAction {
    pub fn lookup(word: &str) -> Option<Self> {
        let action = match word.to_ascii_lowercase().as_str() {
            "play" | "playing" => Self::Play,
            "played" => Self::Played,
            "category" => Self::Category,
            "record" => Self::Record,
            "time" => Self::TimeRecorded,
            "paused" => Self::Paused,
            "unpaused" => Self::Unpaused,
            "survey" => Self::Survey,
            "shutting" => Self::ShuttingDown,
            _ => return None,
        };
        Some(action)
    }
}
