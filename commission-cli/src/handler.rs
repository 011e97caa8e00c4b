//! Command Handlers
//!
//! Handler functions for CLI commands.

use crate::commands::{
    settings::SettingsCommands, status::StatusCommands, Cli, Commands, OutputFormat,
};
use crate::error::{CliError, CliResult};
use crate::output;
use commission_core::{
    AccountId, CommissionCategory, CommissionLevelSetting, CommissionTable, LedgerId,
    PaymentStatus,
};
use commission_store::{
    open_store, CommissionReport, CommissionService, KeyValueStore, MemoryDirectory,
    ReportScope, Snapshot, StoreConfig, StoreError,
};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Store configuration from the environment, overridden by CLI flags
pub fn store_config(cli: &Cli) -> StoreConfig {
    if cli.in_memory {
        return StoreConfig::test();
    }
    let config = StoreConfig::from_env();
    match &cli.data_dir {
        Some(dir) => config.with_data_dir(dir),
        None => config,
    }
}

/// Run the CLI with parsed arguments
pub async fn run(cli: Cli) -> CliResult<()> {
    let config = store_config(&cli);
    debug!(data_dir = ?config.data_dir, snapshot = %cli.snapshot.display(), "Opening store");
    let kv = open_store(&config)?;
    let store = kv.as_ref();

    match cli.command {
        Commands::Status(cmd) => handle_status(store, cmd, cli.format).await,
        Commands::Settings(cmd) => handle_settings(store, cmd, cli.format).await,
        command => {
            let directory = MemoryDirectory::from_snapshot(Snapshot::load(&cli.snapshot)?);
            let service = CommissionService::new(store, &directory);
            match command {
                Commands::Commissions { account_id } => {
                    let report = report_or_empty(&service, Some(account_id)).await?;
                    output::print_report(&report, cli.format);
                    Ok(())
                }
                Commands::Global => {
                    let report = report_or_empty(&service, None).await?;
                    output::print_report(&report, cli.format);
                    Ok(())
                }
                Commands::Summary { account_id } => {
                    let report = report_or_empty(&service, account_id).await?;
                    output::print_summary(&report.summary, cli.format);
                    Ok(())
                }
                Commands::Ledger { account_id } => {
                    let report = report_or_empty(&service, account_id).await?;
                    output::print_ledger(&report.ledger, cli.format);
                    Ok(())
                }
                Commands::Balance { account_id } => {
                    let sheet = service.balance(&AccountId::new(account_id)).await?;
                    output::print_balance(&sheet, cli.format);
                    Ok(())
                }
                Commands::Transfer { from, to, amount } => {
                    let amount = parse_amount(&amount)?;
                    let plan = service
                        .transfer(&AccountId::new(from), &AccountId::new(to), amount)
                        .await?;
                    directory.to_snapshot().await.save(&cli.snapshot)?;
                    output::print_transfer(&plan, cli.format);
                    Ok(())
                }
                Commands::Status(_) | Commands::Settings(_) => Ok(()),
            }
        }
    }
}

/// Refresh a report.
///
/// Unknown accounts and permission errors are reported; any other failure
/// degrades to an empty report so the output stays usable.
async fn report_or_empty(
    service: &CommissionService<'_>,
    account_id: Option<String>,
) -> CliResult<CommissionReport> {
    let scope = match account_id {
        Some(id) => ReportScope::Beneficiary(AccountId::new(id)),
        None => ReportScope::Global,
    };
    let result = match &scope {
        ReportScope::Beneficiary(id) => service.beneficiary_report(id).await,
        ReportScope::Global => service.global_report().await,
    };

    match result {
        Ok(report) => Ok(report),
        Err(e @ (StoreError::PermissionDenied { .. } | StoreError::NotFound { .. })) => {
            Err(e.into())
        }
        Err(e) => {
            warn!(error = %e, "Commission refresh failed");
            output::print_warning(&format!("Could not refresh commissions: {}", e));
            let tables = service.settings().load_tables_or_default().await;
            Ok(CommissionReport::empty(scope, tables))
        }
    }
}

/// Handle payment status commands
async fn handle_status(
    store: &dyn KeyValueStore,
    cmd: StatusCommands,
    format: OutputFormat,
) -> CliResult<()> {
    let repo = commission_store::PaymentStatusRepository::new(store);
    match cmd {
        StatusCommands::Set { ledger_id, status } => {
            let ledger_id = LedgerId::parse(&ledger_id)?;
            let status = PaymentStatus::from_str(&status)?;
            repo.set(&ledger_id, status).await?;
            output::print_output(
                &serde_json::json!({ "ledger_id": ledger_id, "status": status }),
                format,
            );
        }
        StatusCommands::Clear { ledger_id } => {
            let ledger_id = LedgerId::parse(&ledger_id)?;
            if repo.clear(&ledger_id).await? {
                output::print_success(&format!("Cleared status of {}", ledger_id));
            } else {
                output::print_warning(&format!("{} had no stored status", ledger_id));
            }
        }
        StatusCommands::Reset => {
            let removed = repo.reset_all().await?;
            output::print_success(&format!("Removed {} stored entries", removed));
        }
    }
    Ok(())
}

/// Handle settings commands
async fn handle_settings(
    store: &dyn KeyValueStore,
    cmd: SettingsCommands,
    format: OutputFormat,
) -> CliResult<()> {
    let repo = commission_store::SettingsRepository::new(store);
    match cmd {
        SettingsCommands::Show => {
            output::print_tables(&repo.load_tables().await?, format);
        }
        SettingsCommands::Set {
            category,
            levels,
            file,
        } => {
            let category = CommissionCategory::from_str(&category)?;
            let table = match (levels, file) {
                (Some(levels), _) => parse_levels(&levels)?,
                (None, Some(path)) => read_table_file(&path, category)?,
                (None, None) => {
                    return Err(CliError::invalid_arg("either --levels or --file is required"))
                }
            };
            repo.save_table(category, &table).await?;
            output::print_tables(&repo.load_tables().await?, format);
        }
        SettingsCommands::Reset { category } => {
            let categories = match category {
                Some(name) => vec![CommissionCategory::from_str(&name)?],
                None => CommissionCategory::ALL.to_vec(),
            };
            for category in categories {
                repo.reset_table(category).await?;
            }
            output::print_tables(&repo.load_tables().await?, format);
        }
    }
    Ok(())
}

fn read_table_file(path: &Path, category: CommissionCategory) -> CliResult<CommissionTable> {
    let value: serde_json::Value = serde_json::from_slice(&std::fs::read(path)?)?;
    Ok(CommissionTable::from_json_value(&value, category)?)
}

/// Parse `20,10,5,!0` into a table; `!` marks a level inactive
pub fn parse_levels(input: &str) -> CliResult<CommissionTable> {
    let levels = input
        .split(',')
        .map(|part| {
            let part = part.trim();
            let (active, pct) = match part.strip_prefix('!') {
                Some(rest) => (false, rest.trim()),
                None => (true, part),
            };
            let percentage = Decimal::from_str(pct)
                .map_err(|_| CliError::invalid_arg(format!("bad percentage '{}'", part)))?;
            Ok(if active {
                CommissionLevelSetting::active(percentage)
            } else {
                CommissionLevelSetting::inactive(percentage)
            })
        })
        .collect::<CliResult<Vec<_>>>()?;
    Ok(CommissionTable::from_levels(levels)?)
}

/// Parse a transfer amount
pub fn parse_amount(s: &str) -> CliResult<Decimal> {
    Decimal::from_str(s.trim()).map_err(|_| CliError::invalid_arg(format!("bad amount '{}'", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use commission_core::{Account, CommissionError, CommissionLevel, Handle, Package, PackageId, Role};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_snapshot(dir: &TempDir) -> PathBuf {
        let snapshot = Snapshot {
            accounts: vec![
                Account::new(AccountId::new("B"), Role::Affiliate, Handle::new("bea"))
                    .with_balance(Decimal::new(50, 0)),
                Account::new(AccountId::new("P1"), Role::Consumer, Handle::new("pia"))
                    .with_sponsor(Handle::new("bea"))
                    .with_package(PackageId::new("pro")),
            ],
            packages: vec![Package::new(PackageId::new("pro"), Decimal::new(475, 0), Role::Affiliate)],
        };
        let path = dir.path().join("snapshot.json");
        snapshot.save(&path).unwrap();
        path
    }

    fn cli(snapshot: &Path, data_dir: &Path, args: &[&str]) -> Cli {
        let mut argv = vec![
            "commission".to_string(),
            "--snapshot".to_string(),
            snapshot.display().to_string(),
            "--data-dir".to_string(),
            data_dir.display().to_string(),
            "--format".to_string(),
            "json".to_string(),
        ];
        argv.extend(args.iter().map(|s| s.to_string()));
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_levels() {
        let table = parse_levels("20, 10, 5, !0").unwrap();
        let fourth = table.level(CommissionLevel::new(4).unwrap());
        assert!(!fourth.active);
        assert_eq!(table.level(CommissionLevel::FIRST).percentage, Decimal::new(20, 0));

        assert!(matches!(parse_levels("20,10"), Err(CliError::CoreError(CommissionError::InvalidLevelCount { .. }))));
        assert!(matches!(parse_levels("20,x,5,5"), Err(CliError::InvalidArgument { .. })));
        assert!(matches!(parse_levels("20,10,5,150"), Err(CliError::CoreError(_))));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 12.50 ").unwrap(), Decimal::new(1250, 2));
        assert!(parse_amount("twelve").is_err());
    }

    #[test]
    fn test_in_memory_config() {
        let cli = Cli::try_parse_from(["commission", "--in-memory", "global"]).unwrap();
        assert!(store_config(&cli).is_in_memory());
    }

    #[tokio::test]
    async fn test_transfer_updates_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let snapshot = write_snapshot(&tmp);
        let data = tmp.path().join("data");

        run(cli(&snapshot, &data, &["transfer", "--from", "B", "--to", "P1", "--amount", "20"]))
            .await
            .unwrap();

        let saved = Snapshot::load(&snapshot).unwrap();
        let b = saved.accounts.iter().find(|a| a.account_id.as_str() == "B").unwrap();
        assert_eq!(b.balance, Decimal::new(30, 0));
    }

    #[tokio::test]
    async fn test_unknown_account_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let snapshot = write_snapshot(&tmp);
        let data = tmp.path().join("data");

        let err = run(cli(&snapshot, &data, &["commissions", "nobody"])).await.unwrap_err();
        assert_eq!(err.exit_code(), 21);
    }

    #[tokio::test]
    async fn test_missing_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let data = tmp.path().join("data");
        let missing = tmp.path().join("missing.json");

        let err = run(cli(&missing, &data, &["global"])).await.unwrap_err();
        assert!(matches!(err, CliError::StoreError(StoreError::NotFound { .. })));
    }
}
