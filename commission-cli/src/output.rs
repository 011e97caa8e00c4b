//! Output Formatting
//!
//! Table and plain renderings of reports; JSON everywhere else.

use crate::commands::OutputFormat;
use commission_core::{
    BalanceSheet, CommissionSummary, CommissionTables, PaymentLedger, TransferPlan,
};
use commission_store::{CommissionReport, ReportScope};
use rust_decimal::Decimal;
use serde::Serialize;

/// Format and print data based on output format
pub fn print_output<T: Serialize>(data: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(data),
        // No tabular form for arbitrary data
        OutputFormat::Table | OutputFormat::Plain => print_json(data),
    }
}

/// Print as JSON
fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error formatting JSON: {}", e),
    }
}

/// Two decimal places
pub fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

fn scope_title(scope: &ReportScope) -> String {
    match scope {
        ReportScope::Beneficiary(id) => format!("Commissions for {}", id),
        ReportScope::Global => "Commissions (all accounts)".to_string(),
    }
}

/// Print a report's events
pub fn print_report(report: &CommissionReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            let title = scope_title(&report.scope);
            println!("{}", title);
            println!("{}", "=".repeat(title.len()));
            println!(
                "{:<16} {:<16} {:>5}  {:<18} {:>12}",
                "Beneficiary", "Source", "Level", "Type", "Amount"
            );
            print_separator();
            for event in &report.events {
                println!(
                    "{:<16} {:<16} {:>5}  {:<18} {:>12}",
                    event.beneficiary_id.as_str(),
                    event.source_account_id.as_str(),
                    event.level.get(),
                    event.kind.label(),
                    money(event.amount)
                );
            }
            print_separator();
            println!("{:<59} {:>12}", "Total", money(report.summary.total_revenue));
        }
        OutputFormat::Plain => {
            for event in &report.events {
                println!(
                    "{} {} {} {} {}",
                    event.beneficiary_id,
                    event.source_account_id,
                    event.level,
                    event.kind.label(),
                    money(event.amount)
                );
            }
        }
    }
}

/// Print dashboard totals
pub fn print_summary(summary: &CommissionSummary, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(summary),
        OutputFormat::Table | OutputFormat::Plain => {
            println!("Commission Summary");
            println!("==================");
            print_row("Total revenue", &money(summary.total_revenue));
            print_row(
                "Personal referral",
                &format!(
                    "{} ({} events)",
                    money(summary.personal_referral_total),
                    summary.personal_referral_count
                ),
            );
            print_row(
                "Team bonus",
                &format!(
                    "{} ({} events)",
                    money(summary.team_bonus_total),
                    summary.team_bonus_count
                ),
            );
            println!();
            println!("By level:");
            for level in &summary.level_totals {
                print_row(
                    &format!("  Level {}", level.level),
                    &format!("{} ({})", money(level.total), level.event_count),
                );
            }
            if !summary.by_beneficiary.is_empty() {
                println!();
                println!("By beneficiary:");
                for entry in &summary.by_beneficiary {
                    print_row(&format!("  {}", entry.beneficiary_id), &money(entry.total));
                }
            }
        }
    }
}

/// Print the payments ledger
pub fn print_ledger(ledger: &PaymentLedger, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(ledger),
        OutputFormat::Table => {
            println!(
                "{:<24} {:<16} {:<18} {:>12}  {:<10}",
                "ID", "Beneficiary", "Category", "Amount", "Status"
            );
            print_separator();
            for entry in &ledger.entries {
                println!(
                    "{:<24} {:<16} {:<18} {:>12}  {:<10}",
                    entry.ledger_id.as_str(),
                    entry.beneficiary_id.as_str(),
                    entry.category,
                    money(entry.amount),
                    entry.status.label()
                );
            }
            print_separator();
            for (status, total) in ledger.totals_by_status() {
                print_row(status.label(), &money(total));
            }
        }
        OutputFormat::Plain => {
            for entry in &ledger.entries {
                println!("{} {} {}", entry.ledger_id, money(entry.amount), entry.status);
            }
        }
    }
}

/// Print both commission tables
pub fn print_tables(tables: &CommissionTables, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(tables),
        OutputFormat::Table | OutputFormat::Plain => {
            for (name, table) in [("affiliate", &tables.affiliate), ("consumer", &tables.consumer)] {
                println!("{}:", name);
                for (i, level) in table.levels().iter().enumerate() {
                    let state = if level.active { "active" } else { "inactive" };
                    print_row(
                        &format!("  Level {}", i + 1),
                        &format!("{}% ({})", level.percentage, state),
                    );
                }
            }
        }
    }
}

/// Print one account's balance
pub fn print_balance(sheet: &BalanceSheet, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(sheet),
        OutputFormat::Table | OutputFormat::Plain => {
            println!("Balance for {}", sheet.account_id);
            print_separator();
            print_row("Earned", &money(sheet.earned));
            print_row("Paid", &money(sheet.paid));
            print_row("Pending", &money(sheet.pending));
            print_row("Incomplete", &money(sheet.incomplete));
            print_row("Wallet balance", &money(sheet.wallet_balance));
        }
    }
}

/// Print a completed transfer
pub fn print_transfer(plan: &TransferPlan, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(plan),
        OutputFormat::Table | OutputFormat::Plain => {
            println!(
                "Transferred {} from {} to {}",
                money(plan.amount),
                plan.from_account_id,
                plan.to_account_id
            );
            print_row(plan.from_account_id.as_str(), &money(plan.from_balance_after));
            print_row(plan.to_account_id.as_str(), &money(plan.to_balance_after));
        }
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{}", message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    eprintln!("Warning: {}", message);
}

/// Print a table row
pub fn print_row(key: &str, value: &str) {
    println!("{:<20} {}", key, value);
}

/// Print a separator line
pub fn print_separator() {
    println!("{}", "-".repeat(72));
}
