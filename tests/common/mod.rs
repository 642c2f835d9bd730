#![allow(dead_code)]

use chrono::NaiveDate;
use finflow_core::ledger::{
    Account, AccountCategory, DebtPayoffPlan, Envelope, Frequency, Ledger, PayoffStrategy,
    Transaction, TransactionKind,
};
use uuid::Uuid;

pub const TOLERANCE: f64 = 1e-9;

/// Ids of the records seeded by [`household`].
pub struct Household {
    pub ledger: Ledger,
    pub checking: Uuid,
    pub savings: Uuid,
    pub retirement: Uuid,
    pub card: Uuid,
    pub auto_loan: Uuid,
    pub student_loan: Uuid,
    pub groceries: Uuid,
    pub dining: Uuid,
}

/// A small but realistic household: two cash accounts, a 401k, three debts and envelopes.
pub fn household() -> Household {
    let mut ledger = Ledger::new("Household");
    let checking = ledger.add_account(Account::new("Checking", AccountCategory::Checking, 3200.0));
    let savings = ledger.add_account(Account::new("Savings", AccountCategory::Savings, 8500.0));
    let retirement = ledger.add_account(
        Account::new("401k", AccountCategory::Retirement, 42_000.0)
            .with_contribution_tracking(Some(23_000.0)),
    );
    let card = ledger.add_account(
        Account::new("Visa", AccountCategory::CreditCard, 2400.0)
            .with_terms(22.99, 75.0)
            .with_credit_limit(6000.0),
    );
    let auto_loan = ledger.add_account(
        Account::new("Car loan", AccountCategory::AutoLoan, 14_500.0).with_terms(6.5, 340.0),
    );
    let student_loan = ledger.add_account(
        Account::new("Student loan", AccountCategory::StudentLoan, 800.0).with_terms(4.2, 120.0),
    );
    let groceries = ledger.add_envelope(
        Envelope::new("Groceries", 600.0, Frequency::Monthly).with_balance(420.0),
    );
    let dining = ledger.add_envelope(
        Envelope::new("Dining", 150.0, Frequency::Monthly).with_balance(35.0),
    );
    ledger.debt_plan = Some(DebtPayoffPlan::new(
        PayoffStrategy::Avalanche,
        200.0,
        vec![card, auto_loan, student_loan],
    ));

    Household {
        ledger,
        checking,
        savings,
        retirement,
        card,
        auto_loan,
        student_loan,
        groceries,
        dining,
    }
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

pub fn txn(amount: f64, kind: TransactionKind) -> Transaction {
    Transaction::new(day(2026, 3, 14), amount, kind).expect("valid fixture amount")
}

pub fn balance(ledger: &Ledger, id: Uuid) -> f64 {
    ledger.account(id).expect("fixture account").balance
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

/// Compares balances, spent counters, ytd totals and history lengths.
pub fn assert_same_state(actual: &Ledger, expected: &Ledger) {
    assert_eq!(actual.accounts.len(), expected.accounts.len());
    for (a, e) in actual.accounts.iter().zip(&expected.accounts) {
        assert_eq!(a.id, e.id);
        assert_close(a.balance, e.balance);
        assert_close(a.ytd_contribution.unwrap_or(0.0), e.ytd_contribution.unwrap_or(0.0));
        assert_eq!(a.payments.len(), e.payments.len(), "payments of {}", a.name);
        assert_eq!(a.contributions.len(), e.contributions.len(), "contributions of {}", a.name);
        assert_eq!(a.withdrawals.len(), e.withdrawals.len(), "withdrawals of {}", a.name);
    }
    assert_eq!(actual.envelopes.len(), expected.envelopes.len());
    for (a, e) in actual.envelopes.iter().zip(&expected.envelopes) {
        assert_close(a.balance, e.balance);
        assert_close(a.spent, e.spent);
    }
}
