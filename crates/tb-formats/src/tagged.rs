//! Struct-ID checking for firmware sub-structures.

use serde::Serialize;

/// A firmware sub-structure together with the verdict on its struct-ID tag.
///
/// The firmware reserves the full size of every structure even when a slot
/// is unused or scribbled over, so a bad tag never changes how many bytes
/// are consumed. It only marks the decoded value as untrustworthy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Tagged<T> {
    Decoded { value: T },
    Suspect { value: T, reason: String },
}

impl<T> Tagged<T> {
    /// Compare a struct-ID read from the buffer against the expected one.
    pub fn check(structure: &str, expected: i16, found: i16, value: T) -> Self {
        if expected == found {
            Self::Decoded { value }
        } else {
            let reason = format!(
                "invalid struct id for {structure}: expected {expected}, found {found}"
            );
            tracing::warn!("{reason}");
            Self::Suspect { value, reason }
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Decoded { value } | Self::Suspect { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Decoded { value } | Self::Suspect { value, .. } => value,
        }
    }

    pub fn is_suspect(&self) -> bool {
        matches!(self, Self::Suspect { .. })
    }

    pub fn suspect_reason(&self) -> Option<&str> {
        match self {
            Self::Decoded { .. } => None,
            Self::Suspect { reason, .. } => Some(reason),
        }
    }
}
