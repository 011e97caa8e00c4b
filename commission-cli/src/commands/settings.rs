//! Settings Commands
//!
//! Commands for managing commission tables.

use clap::Subcommand;
use std::path::PathBuf;

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show the tables currently in effect
    Show,

    /// Replace a category's table
    Set {
        /// Category (affiliate, consumer)
        #[arg(short, long)]
        category: String,

        /// Percentages for levels 1-4, comma separated; prefix with `!` to
        /// mark a level inactive (e.g. `20,10,5,!0`)
        #[arg(short, long, conflicts_with = "file")]
        levels: Option<String>,

        /// JSON file holding a four-element level array
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Restore default tables
    Reset {
        /// Category to reset (both when omitted)
        #[arg(short, long)]
        category: Option<String>,
    },
}
