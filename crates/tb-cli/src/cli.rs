//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tb_core::DirectoryFormat;

/// Validate, repair and summarise talking-book statistics trees
#[derive(Parser, Debug)]
#[command(name = "tbstats")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every command.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run configuration (TOML, JSON or YAML)
    #[arg(short, long, global = true, env = "TBSTATS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Tree layout to assume when a root has no manifest (sync or archive)
    #[arg(short, long, global = true)]
    pub format: Option<DirectoryFormat>,

    /// Fail on structural problems instead of working around them
    #[arg(long, global = true)]
    pub strict: bool,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Check every sync directory against the loader ledgers
    ///
    /// Exits non-zero when anything is found.
    Validate {
        /// Root of a sync or archive tree
        root: PathBuf,
    },

    /// Validate, then move misplaced and remove empty sync directories
    ///
    /// Prints the findings that could not be repaired.
    Fix {
        /// Root of a sync or archive tree
        root: PathBuf,
    },

    /// Show the root's manifest, generating one if it has none
    Manifest {
        /// Root of a sync or archive tree
        root: PathBuf,

        /// Regenerate the manifest from the tree and write it to the root
        #[arg(long)]
        write: bool,
    },

    /// Decode every sync directory and report counts per device
    Summarize {
        /// Root of a sync or archive tree
        root: PathBuf,
    },

    /// Decode a firmware flash image
    Flash {
        /// Path to a flashData.bin file
        file: PathBuf,
    },

    /// Copy a tree into an archive tree, merging manifests and ledgers
    Merge {
        /// Tree to copy from
        src: PathBuf,

        /// Archive tree to copy into; created if missing
        dest: PathBuf,
    },

    /// List the processing roots inside an unpacked stats package
    Roots {
        /// Directory the package was unpacked into
        dir: PathBuf,
    },
}
