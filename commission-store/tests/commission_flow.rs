use commission_core::{
    compute_all_commissions, compute_commissions, Account, AccountId, CommissionCategory,
    CommissionKind, CommissionLevel, CommissionLevelSetting, CommissionTable, Handle, Package,
    PackageCatalog, PackageId, PaymentStatus, Role, SponsorIndex,
};
use commission_store::{
    CommissionService, KeyValueStore, MemoryDirectory, MemoryStore, ReportScope, SledStore,
};
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::tempdir;

fn member(id: &str, role: Role, sponsor: Option<&str>, package: Option<&str>) -> Account {
    let mut a = Account::new(AccountId::new(id), role, Handle::new(id));
    if let Some(s) = sponsor {
        a = a.with_sponsor(Handle::new(s));
    }
    if let Some(p) = package {
        a = a.with_package(PackageId::new(p));
    }
    a
}

fn packages() -> Vec<Package> {
    vec![
        Package::new(PackageId::new("pro"), Decimal::new(475, 0), Role::Affiliate),
        Package::new(PackageId::new("basic"), Decimal::new(199, 0), Role::Consumer),
        Package::new(PackageId::new("trial"), Decimal::ZERO, Role::Consumer),
    ]
}

/// Affiliate root with a mixed, wide and deep downline
fn network() -> Vec<Account> {
    let mut accounts = vec![member("root", Role::Affiliate, None, None)];
    for i in 0..40 {
        let role = if i % 2 == 0 { Role::Affiliate } else { Role::Consumer };
        let pkg = match i % 3 {
            0 => Some("pro"),
            1 => Some("basic"),
            _ => Some("trial"),
        };
        accounts.push(member(&format!("a{:02}", i), role, Some("root"), pkg));
    }
    for i in 0..40 {
        accounts.push(member(
            &format!("b{:02}", i),
            Role::Consumer,
            Some(&format!("a{:02}", i)),
            Some("basic"),
        ));
    }
    accounts.push(member("c0", Role::Consumer, Some("b00"), Some("pro")));
    accounts.push(member("d0", Role::Consumer, Some("c0"), Some("pro")));
    accounts.push(member("e0", Role::Consumer, Some("d0"), Some("pro")));
    accounts
}

#[tokio::test]
async fn beneficiary_report_matches_in_memory_aggregation() {
    let accounts = network();
    let dir = MemoryDirectory::new(accounts.clone(), packages());
    let dir_path = tempdir().unwrap();
    let store = SledStore::open(dir_path.path()).unwrap();
    let service = CommissionService::new(&store, &dir);

    let report = service.beneficiary_report(&AccountId::new("root")).await.unwrap();

    let index = SponsorIndex::new(accounts);
    let catalog = PackageCatalog::new(packages());
    let root = index.get(&AccountId::new("root")).unwrap();
    let expected = compute_commissions(root, &index, &catalog, &report.tables);

    assert_eq!(report.events, expected);
    assert!(report.events.iter().all(|e| e.level.get() <= 4));
    assert!(!report.events.iter().any(|e| e.source_account_id.as_str() == "e0"));
    // Trial packages never pay
    assert_eq!(
        report.events.iter().filter(|e| e.level == CommissionLevel::FIRST).count(),
        27
    );
}

#[tokio::test]
async fn stored_settings_drive_the_report() {
    let dir = MemoryDirectory::new(network(), packages());
    let store = MemoryStore::new();
    let service = CommissionService::new(&store, &dir);

    let table = CommissionTable::from_levels(vec![
        CommissionLevelSetting::active(Decimal::new(10, 0)),
        CommissionLevelSetting::inactive(Decimal::new(10, 0)),
        CommissionLevelSetting::inactive(Decimal::new(10, 0)),
        CommissionLevelSetting::inactive(Decimal::new(10, 0)),
    ])
    .unwrap();
    service
        .settings()
        .save_table(CommissionCategory::Affiliate, &table)
        .await
        .unwrap();

    let report = service.beneficiary_report(&AccountId::new("root")).await.unwrap();
    assert!(report
        .events
        .iter()
        .all(|e| e.kind == CommissionKind::PersonalReferral));

    // Malformed value falls back to the default table
    store
        .set("commission_levels:affiliate", json!("not a table"))
        .await
        .unwrap();
    let report = service.beneficiary_report(&AccountId::new("root")).await.unwrap();
    assert!(report.events.iter().any(|e| e.kind == CommissionKind::TeamBonus));
}

#[tokio::test]
async fn global_report_and_ledger_statuses() {
    let accounts = network();
    let dir = MemoryDirectory::new(accounts.clone(), packages());
    let store = MemoryStore::new();
    let service = CommissionService::new(&store, &dir);

    let report = service.global_report().await.unwrap();
    assert_eq!(report.scope, ReportScope::Global);

    let index = SponsorIndex::new(accounts);
    let catalog = PackageCatalog::new(packages());
    assert_eq!(
        report.events,
        compute_all_commissions(&index, &catalog, &report.tables)
    );
    assert!(report
        .ledger
        .entries
        .iter()
        .all(|e| e.status == PaymentStatus::Pending));

    let first = report.ledger.entries[0].ledger_id.clone();
    service
        .set_payment_status(&first, PaymentStatus::Incomplete)
        .await
        .unwrap();
    let report = service.global_report().await.unwrap();
    assert_eq!(
        report.ledger.entry(&first).map(|e| e.status),
        Some(PaymentStatus::Incomplete)
    );
    assert_eq!(
        report.ledger.total_with_status(PaymentStatus::Incomplete),
        report.ledger.entry(&first).map(|e| e.amount).unwrap_or_default()
    );
}
