//! Filesystem layer for talking-book statistics trees
//!
//! Provides case-insensitive lookup of well-known tree names, sorted
//! directory listings, atomic writes and format-agnostic document storage.

pub mod config;
pub mod constants;
pub mod dir;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::TreePath;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::{NormalizedPath, is_visible_name};
