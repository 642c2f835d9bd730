mod common;

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use common::{household, Household};
use finflow_core::core::services::{RecurringService, TransactionService};
use finflow_core::ledger::{Frequency, RecurringTemplate, Transaction, TransactionKind};
use uuid::Uuid;
use finflow_core::utils::persistence::{load_ledger_from_file, save_ledger_to_file};
use predicates::prelude::*;
use tempfile::TempDir;

fn write_household(dir: &Path) -> (PathBuf, Household) {
    let h = household();
    let path = dir.join("household.json");
    save_ledger_to_file(&h.ledger, &path).unwrap();
    (path, h)
}

fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("finflow_cli").unwrap();
    cmd.env("FINFLOW_HOME", home)
        .env_remove("FINFLOW_LEDGER")
        .env("NO_COLOR", "1")
        .arg("--plain");
    cmd
}

#[test]
fn version_prints_package_version() {
    let temp = TempDir::new().unwrap();
    cli(temp.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn payoff_reports_debt_free_month() {
    let temp = TempDir::new().unwrap();
    let (path, _) = write_household(temp.path());
    cli(temp.path())
        .arg("--ledger")
        .arg(&path)
        .args(["payoff", "--strategy", "snowball", "--start", "2026-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Payoff plan (snowball)"))
        .stdout(predicate::str::contains("Debt free in"));
}

#[test]
fn payoff_json_is_machine_readable() {
    let temp = TempDir::new().unwrap();
    let (path, _) = write_household(temp.path());
    let output = cli(temp.path())
        .arg("--ledger")
        .arg(&path)
        .args(["payoff", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["outcome"]["status"], "paid_off");
    assert!(value["months"].as_u64().unwrap() > 0);
}

#[test]
fn apply_records_transaction_in_snapshot() {
    let temp = TempDir::new().unwrap();
    let (path, h) = write_household(temp.path());
    let expense = Transaction::new(
        common::day(2026, 3, 2),
        50.0,
        TransactionKind::Expense {
            from_account: Some(h.checking),
            envelope_id: Some(h.dining),
            category_id: None,
        },
    )
    .unwrap();
    let txn_path = temp.path().join("expense.json");
    fs::write(&txn_path, serde_json::to_string(&expense).unwrap()).unwrap();

    cli(temp.path())
        .arg("--ledger")
        .arg(&path)
        .arg("apply")
        .arg("--transaction")
        .arg(&txn_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded transaction"))
        .stdout(predicate::str::contains("overdrawn by $15.00"));

    let saved = load_ledger_from_file(&path).unwrap();
    assert_eq!(saved.transactions.len(), 1);
    assert_eq!(saved.account(h.checking).unwrap().balance, 3150.0);

    cli(temp.path())
        .arg("--ledger")
        .arg(&path)
        .args(["delete", "--id", &expense.id.to_string()])
        .assert()
        .success();
    let restored = load_ledger_from_file(&path).unwrap();
    assert!(restored.transactions.is_empty());
    assert_eq!(restored.account(h.checking).unwrap().balance, 3200.0);
}

#[test]
fn net_worth_record_appends_snapshot() {
    let temp = TempDir::new().unwrap();
    let (path, _) = write_household(temp.path());
    cli(temp.path())
        .arg("--ledger")
        .arg(&path)
        .args(["net-worth", "--record", "--date", "2026-03-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Net worth:"));

    let saved = load_ledger_from_file(&path).unwrap();
    assert_eq!(saved.net_worth_history.len(), 1);
    assert_eq!(saved.net_worth_history[0].date, common::day(2026, 3, 31));
}

#[test]
fn missing_ledger_fails_cleanly() {
    let temp = TempDir::new().unwrap();
    cli(temp.path())
        .arg("payoff")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No ledger given"));
}

#[test]
fn recurring_records_due_occurrences_and_saves() {
    let temp = TempDir::new().unwrap();
    let mut h = household();
    let rent = RecurringTemplate::new(
        "Rent",
        1450.0,
        Frequency::Monthly,
        common::day(2026, 1, 31),
        TransactionKind::Expense {
            from_account: Some(h.checking),
            envelope_id: None,
            category_id: None,
        },
    )
    .unwrap();
    RecurringService::add(&mut h.ledger, rent).unwrap();
    let path = temp.path().join("household.json");
    save_ledger_to_file(&h.ledger, &path).unwrap();

    cli(temp.path())
        .arg("--ledger")
        .arg(&path)
        .args(["recurring", "--today", "2026-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded Rent for 2026-02-28"))
        .stdout(predicate::str::contains("Next Rent on 2026-03-31"));

    let saved = load_ledger_from_file(&path).unwrap();
    assert_eq!(saved.transactions.len(), 2);
    assert_eq!(saved.recurring[0].occurrences, 2);
    assert_eq!(saved.account(h.checking).unwrap().balance, 300.0);
}

#[test]
fn reports_cover_accounts_envelopes_and_spending() {
    let temp = TempDir::new().unwrap();
    let mut h = household();
    let groceries = Uuid::new_v4();
    let expense = Transaction::new(
        common::day(2026, 2, 7),
        84.37,
        TransactionKind::Expense {
            from_account: Some(h.checking),
            envelope_id: Some(h.groceries),
            category_id: Some(groceries),
        },
    )
    .unwrap();
    TransactionService::record(&mut h.ledger, expense).unwrap();
    let path = temp.path().join("household.json");
    save_ledger_to_file(&h.ledger, &path).unwrap();

    cli(temp.path())
        .arg("--ledger")
        .arg(&path)
        .arg("accounts")
        .assert()
        .success()
        .stdout(predicate::str::contains("Visa (Credit Card)"))
        .stdout(predicate::str::contains("utilization 40.0%"))
        .stdout(predicate::str::contains("room left $23,000.00"));

    cli(temp.path())
        .arg("--ledger")
        .arg(&path)
        .arg("envelopes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries: $335.63 available, $84.37 spent"))
        .stdout(predicate::str::contains("Monthly targets: $750.00"));

    cli(temp.path())
        .arg("--ledger")
        .arg(&path)
        .args(["spending", "--category", &groceries.to_string(), "--month", "2026-02-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("spent $84.37 in February 2026"));
}
