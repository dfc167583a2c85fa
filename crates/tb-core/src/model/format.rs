use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Physical layout of a statistics tree.
///
/// The discriminant doubles as the manifest `formatVersion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryFormat {
    /// `<device>/collected-data/<deployment>` as written by a loader
    Sync = 1,
    /// `TalkingBookData/<deployment>/<device>` after consolidation
    Archive = 2,
}

impl DirectoryFormat {
    pub fn version(self) -> u8 {
        self as u8
    }

    pub fn from_version(version: u8) -> Option<Self> {
        match version {
            1 => Some(Self::Sync),
            2 => Some(Self::Archive),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Archive => "archive",
        }
    }
}

impl fmt::Display for DirectoryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DirectoryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sync" | "1" => Ok(Self::Sync),
            "archive" | "2" => Ok(Self::Archive),
            other => Err(format!("unknown directory format: {other}")),
        }
    }
}
