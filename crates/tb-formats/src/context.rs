//! Where a piece of telemetry came from.

use chrono::NaiveDateTime;
use serde::Serialize;

/// Talking-book level context, independent of any particular sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ProcessingContext {
    pub talking_book: String,
    pub village: String,
    pub content_package: String,
    pub deployment: String,
    /// Device the talking book was synced onto.
    pub device: String,
}

/// Context for one sync directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SyncProcessingContext {
    pub sync_dir: String,
    pub sync_time: Option<NaiveDateTime>,
    pub talking_book: String,
    pub village: String,
    pub content_package: String,
    pub deployment: String,
    pub device: String,
}

impl SyncProcessingContext {
    pub fn new(
        sync_dir: impl Into<String>,
        sync_time: Option<NaiveDateTime>,
        base: &ProcessingContext,
    ) -> Self {
        Self {
            sync_dir: sync_dir.into(),
            sync_time,
            talking_book: base.talking_book.clone(),
            village: base.village.clone(),
            content_package: base.content_package.clone(),
            deployment: base.deployment.clone(),
            device: base.device.clone(),
        }
    }

    /// Replace path-derived values with ones reported by the device itself.
    /// Empty overrides are ignored.
    pub fn with_overrides(mut self, talking_book: &str, village: &str, content_package: &str) -> Self {
        if !talking_book.is_empty() {
            self.talking_book = talking_book.to_string();
        }
        if !village.is_empty() {
            self.village = village.to_string();
        }
        if !content_package.is_empty() {
            self.content_package = content_package.to_string();
        }
        self
    }

    pub fn processing(&self) -> ProcessingContext {
        ProcessingContext {
            talking_book: self.talking_book.clone(),
            village: self.village.clone(),
            content_package: self.content_package.clone(),
            deployment: self.deployment.clone(),
            device: self.device.clone(),
        }
    }
}
