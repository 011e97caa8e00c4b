//! Commission CLI - Command Line Interface
//!
//! Reads accounts and packages from a JSON snapshot, computes four-level
//! referral commissions and keeps payment statuses and commission tables
//! in a local data directory.
//!
//! # Usage
//!
//! ```text
//! commission [OPTIONS] <COMMAND>
//!
//! Commands:
//!   commissions  Commissions owed to one account by its downline
//!   global       Commissions owed to every account
//!   summary      Dashboard totals
//!   ledger       Payments ledger
//!   status       Payment status overrides
//!   settings     Commission table settings
//!   balance      Commission and wallet balance of one account
//!   transfer     Move wallet balance between accounts
//!
//! Options:
//!   -s, --snapshot <FILE>  Snapshot file [env: COMMISSION_SNAPSHOT] [default: snapshot.json]
//!   -d, --data-dir <DIR>   Data directory [env: COMMISSION_DATA_DIR]
//!       --in-memory        Keep statuses and settings for this run only
//!   -f, --format <FORMAT>  Output format (json, table, plain) [default: table]
//!   -v, --verbose          Enable verbose output
//! ```
//!
//! # Examples
//!
//! ```text
//! commission commissions acct42
//! commission --format json ledger
//! commission status set com-acct77-l2 paid
//! commission settings set --category consumer --levels 20,10,5,!0
//! ```

pub mod commands;
pub mod error;
pub mod handler;
pub mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use error::{CliError, CliResult};

/// Commission CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
