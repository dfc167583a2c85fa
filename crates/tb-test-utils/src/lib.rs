//! Shared test utilities for the tb-stats workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] builder for sync and archive directory layouts
//! - [`ledger`]: [`LedgerBuilder`] for operational tbData CSV files
//! - [`flash`]: [`FlashImageBuilder`] for firmware `flashData.bin` images

pub mod flash;
pub mod ledger;
pub mod tree;

pub use flash::{CellStats, FlashImageBuilder};
pub use ledger::{LedgerBuilder, LedgerRow};
pub use tree::TestTree;
