//! CLI Commands Module
//!
//! Command definitions for the commission CLI.

pub mod settings;
pub mod status;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Referral commission CLI
#[derive(Parser, Debug)]
#[command(name = "commission")]
#[command(version)]
#[command(about = "Referral commission reports, ledger and settings")]
#[command(long_about = "Computes four-level referral commissions from a JSON snapshot of \
    accounts and packages.\n\nPayment statuses and commission tables are kept in a local \
    data directory so they survive between runs.")]
pub struct Cli {
    /// Snapshot file with accounts and packages (env: COMMISSION_SNAPSHOT)
    #[arg(short, long, env = "COMMISSION_SNAPSHOT", default_value = "snapshot.json")]
    pub snapshot: PathBuf,

    /// Data directory for statuses and settings (env: COMMISSION_DATA_DIR)
    #[arg(short, long, env = "COMMISSION_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Keep statuses and settings in memory for this run only
    #[arg(long, conflicts_with = "data_dir")]
    pub in_memory: bool,

    /// Output format (json, table, plain)
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Table format (human-readable)
    #[default]
    Table,
    /// Plain text
    Plain,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Commissions owed to one account by its downline
    Commissions {
        /// Beneficiary account ID
        account_id: String,
    },

    /// Commissions owed to every account
    Global,

    /// Dashboard totals for one account, or for everyone
    Summary {
        /// Beneficiary account ID (omit for the global view)
        account_id: Option<String>,
    },

    /// Payments ledger for one account, or for everyone
    Ledger {
        /// Beneficiary account ID (omit for the global view)
        account_id: Option<String>,
    },

    /// Payment status overrides
    #[command(subcommand)]
    Status(status::StatusCommands),

    /// Commission table settings
    #[command(subcommand)]
    Settings(settings::SettingsCommands),

    /// Commission and wallet balance of one account
    Balance {
        /// Account ID
        account_id: String,
    },

    /// Move wallet balance between accounts and save the snapshot
    Transfer {
        /// Sending account ID
        #[arg(long)]
        from: String,
        /// Receiving account ID
        #[arg(long)]
        to: String,
        /// Amount, e.g. 12.50
        #[arg(long)]
        amount: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_help() {
        let result = Cli::try_parse_from(["commission", "--help"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_parse_commissions() {
        let cli = Cli::try_parse_from([
            "commission",
            "--snapshot",
            "data.json",
            "--format",
            "json",
            "commissions",
            "acct-1",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.snapshot, PathBuf::from("data.json"));
        assert!(matches!(cli.command, Commands::Commissions { ref account_id } if account_id == "acct-1"));
    }

    #[test]
    fn test_parse_transfer() {
        let cli = Cli::try_parse_from([
            "commission", "transfer", "--from", "a", "--to", "b", "--amount", "12.50",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Transfer { ref amount, .. } if amount == "12.50"));
    }

    #[test]
    fn test_in_memory_conflicts_with_data_dir() {
        let result = Cli::try_parse_from([
            "commission", "--in-memory", "--data-dir", "/tmp/x", "global",
        ]);
        assert!(result.is_err());
    }
}
