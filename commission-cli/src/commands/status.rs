//! Status Commands

use clap::Subcommand;

/// Payment status subcommands
#[derive(Subcommand, Debug)]
pub enum StatusCommands {
    /// Set a ledger row's status
    Set {
        /// Ledger ID, e.g. com-acct42-l1
        ledger_id: String,
        /// pending, paid or incomplete
        status: String,
    },

    /// Remove a ledger row's override
    Clear {
        /// Ledger ID
        ledger_id: String,
    },

    /// Remove every override and dashboard flag
    Reset,
}
