//! Ledger effect engine: how each transaction type moves account and envelope balances.
//!
//! `apply` and `reverse` are exact inverses. Unknown account or envelope ids are
//! skipped for that slot and reported back rather than failing the call. Balance
//! sufficiency is never checked here; callers decide that before applying.
//!
//! Money drawn out of an account that tracks contributions is logged as a
//! withdrawal under the transaction id, and the entry is dropped on reverse.

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::ensure_positive_amount;
use crate::ledger::{
    Account, AccountKind, ContributionEntry, ContributionType, Ledger, PaymentEntry, Transaction,
    TransactionKind, WithdrawalEntry,
};

use super::ServiceResult;

/// Which reference on a transaction an effect targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectSlot {
    FromAccount,
    ToAccount,
    Envelope,
}

/// A referenced record that could not be used and was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedRef {
    pub slot: EffectSlot,
    pub id: Uuid,
}

/// Raised when an expense leaves an envelope below zero.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeOverdraft {
    pub envelope_id: Uuid,
    pub overdraft: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectReport {
    pub overdraft: Option<EnvelopeOverdraft>,
    pub unresolved: Vec<UnresolvedRef>,
}

impl EffectReport {
    pub fn is_clean(&self) -> bool {
        self.overdraft.is_none() && self.unresolved.is_empty()
    }

    fn skip(&mut self, slot: EffectSlot, id: Uuid) {
        debug!(?slot, %id, "skipping unresolved reference");
        self.unresolved.push(UnresolvedRef { slot, id });
    }
}

pub struct EffectService;

impl EffectService {
    /// Applies the balance effect of `txn` to the ledger.
    pub fn apply(ledger: &mut Ledger, txn: &Transaction) -> ServiceResult<EffectReport> {
        let amount = ensure_positive_amount(txn.amount)?;
        let mut report = EffectReport::default();

        match &txn.kind {
            TransactionKind::Expense {
                from_account,
                envelope_id,
                ..
            } => {
                if let Some(id) = from_account {
                    Self::draw(ledger, txn, *id, amount, &mut report);
                }
                if let Some(id) = envelope_id {
                    Self::spend_envelope(ledger, *id, amount, &mut report);
                }
            }
            TransactionKind::Income { to_account, .. } => {
                Self::inflow(ledger, *to_account, amount, EffectSlot::ToAccount, &mut report);
            }
            TransactionKind::Transfer {
                from_account,
                to_account,
                envelope_id,
            } => {
                Self::draw(ledger, txn, *from_account, amount, &mut report);
                Self::inflow(ledger, *to_account, amount, EffectSlot::ToAccount, &mut report);
                if let Some(id) = envelope_id {
                    Self::spend_envelope(ledger, *id, amount, &mut report);
                }
            }
            TransactionKind::Payment {
                from_account,
                to_account,
            } => {
                if let Some(id) = from_account {
                    Self::draw(ledger, txn, *id, amount, &mut report);
                }
                Self::pay_down(ledger, txn.id, *to_account, amount, txn.date, &mut report);
            }
            TransactionKind::Contribution {
                to_account,
                from_account,
                contrib_type,
            } => {
                Self::contribute(
                    ledger,
                    txn.id,
                    *to_account,
                    amount,
                    txn.date,
                    *contrib_type,
                    &mut report,
                );
                if *contrib_type == ContributionType::Posttax {
                    if let Some(id) = from_account {
                        Self::draw(ledger, txn, *id, amount, &mut report);
                    }
                }
            }
        }

        ledger.touch();
        debug!(
            transaction = %txn.id,
            kind = %txn.transaction_type(),
            amount,
            skipped = report.unresolved.len(),
            "applied transaction effect"
        );
        Ok(report)
    }

    /// Undoes exactly what `apply` did for `txn`, including its history entries.
    pub fn reverse(ledger: &mut Ledger, txn: &Transaction) -> ServiceResult<EffectReport> {
        let amount = ensure_positive_amount(txn.amount)?;
        let mut report = EffectReport::default();

        match &txn.kind {
            TransactionKind::Expense {
                from_account,
                envelope_id,
                ..
            } => {
                if let Some(id) = from_account {
                    Self::undo_draw(ledger, txn.id, *id, amount, &mut report);
                }
                if let Some(id) = envelope_id {
                    Self::refund_envelope(ledger, *id, amount, &mut report);
                }
            }
            TransactionKind::Income { to_account, .. } => {
                Self::outflow(ledger, *to_account, amount, EffectSlot::ToAccount, &mut report);
            }
            TransactionKind::Transfer {
                from_account,
                to_account,
                envelope_id,
            } => {
                Self::undo_draw(ledger, txn.id, *from_account, amount, &mut report);
                Self::outflow(ledger, *to_account, amount, EffectSlot::ToAccount, &mut report);
                if let Some(id) = envelope_id {
                    Self::refund_envelope(ledger, *id, amount, &mut report);
                }
            }
            TransactionKind::Payment {
                from_account,
                to_account,
            } => {
                if let Some(id) = from_account {
                    Self::undo_draw(ledger, txn.id, *id, amount, &mut report);
                }
                Self::undo_payment(ledger, txn.id, *to_account, &mut report);
            }
            TransactionKind::Contribution {
                to_account,
                from_account,
                contrib_type,
            } => {
                Self::undo_contribution(ledger, txn.id, *to_account, amount, &mut report);
                if *contrib_type == ContributionType::Posttax {
                    if let Some(id) = from_account {
                        Self::undo_draw(ledger, txn.id, *id, amount, &mut report);
                    }
                }
            }
        }

        ledger.touch();
        debug!(
            transaction = %txn.id,
            kind = %txn.transaction_type(),
            amount,
            "reversed transaction effect"
        );
        Ok(report)
    }

    /// Debits the source account, logging a withdrawal on contribution-tracked accounts.
    fn draw(
        ledger: &mut Ledger,
        txn: &Transaction,
        id: Uuid,
        amount: f64,
        report: &mut EffectReport,
    ) {
        let Some(account) = ledger.account_mut(id) else {
            report.skip(EffectSlot::FromAccount, id);
            return;
        };
        adjust_signed(account, -amount);
        if account.tracks_contributions() {
            account.withdrawals.record(
                txn.id,
                WithdrawalEntry {
                    amount,
                    date: txn.date,
                },
            );
        }
    }

    fn undo_draw(
        ledger: &mut Ledger,
        txn_id: Uuid,
        id: Uuid,
        amount: f64,
        report: &mut EffectReport,
    ) {
        let Some(account) = ledger.account_mut(id) else {
            report.skip(EffectSlot::FromAccount, id);
            return;
        };
        adjust_signed(account, amount);
        account.withdrawals.remove(txn_id);
    }

    /// Money leaving an account: assets shrink, liabilities grow.
    fn outflow(
        ledger: &mut Ledger,
        id: Uuid,
        amount: f64,
        slot: EffectSlot,
        report: &mut EffectReport,
    ) {
        match ledger.account_mut(id) {
            Some(account) => adjust_signed(account, -amount),
            None => report.skip(slot, id),
        }
    }

    /// Money arriving in an account: assets grow, liabilities shrink.
    fn inflow(
        ledger: &mut Ledger,
        id: Uuid,
        amount: f64,
        slot: EffectSlot,
        report: &mut EffectReport,
    ) {
        match ledger.account_mut(id) {
            Some(account) => adjust_signed(account, amount),
            None => report.skip(slot, id),
        }
    }

    fn spend_envelope(ledger: &mut Ledger, id: Uuid, amount: f64, report: &mut EffectReport) {
        let Some(envelope) = ledger.envelope_mut(id) else {
            report.skip(EffectSlot::Envelope, id);
            return;
        };
        envelope.debit(amount);
        if envelope.is_overdrawn() {
            let overdraft = envelope.overdraft();
            warn!(envelope = %id, name = %envelope.name, overdraft, "envelope overdrawn");
            report.overdraft = Some(EnvelopeOverdraft {
                envelope_id: id,
                overdraft,
            });
        }
    }

    fn refund_envelope(ledger: &mut Ledger, id: Uuid, amount: f64, report: &mut EffectReport) {
        match ledger.envelope_mut(id) {
            Some(envelope) => envelope.credit_back(amount),
            None => report.skip(EffectSlot::Envelope, id),
        }
    }

    fn pay_down(
        ledger: &mut Ledger,
        txn_id: Uuid,
        target: Uuid,
        amount: f64,
        date: NaiveDate,
        report: &mut EffectReport,
    ) {
        let Some(account) = ledger.account_mut(target) else {
            report.skip(EffectSlot::ToAccount, target);
            return;
        };
        if !account.is_liability() {
            debug!(account = %target, "payment target is not a liability");
            report.skip(EffectSlot::ToAccount, target);
            return;
        }

        let interest = if account.category.is_revolving() {
            0.0
        } else {
            account.monthly_interest()
        };
        let principal = (amount - interest).max(0.0);
        let balance_before = account.balance;
        account.balance = (balance_before - principal).max(0.0);
        account.payments.record(
            txn_id,
            PaymentEntry {
                amount,
                principal,
                interest,
                date,
                balance_before,
                balance_after: account.balance,
            },
        );
    }

    fn undo_payment(ledger: &mut Ledger, txn_id: Uuid, target: Uuid, report: &mut EffectReport) {
        let Some(account) = ledger.account_mut(target) else {
            report.skip(EffectSlot::ToAccount, target);
            return;
        };
        // No entry means apply skipped this slot.
        if let Some(entry) = account.payments.remove(txn_id) {
            account.balance += entry.balance_reduction();
        } else {
            report.skip(EffectSlot::ToAccount, target);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn contribute(
        ledger: &mut Ledger,
        txn_id: Uuid,
        target: Uuid,
        amount: f64,
        date: NaiveDate,
        contrib_type: ContributionType,
        report: &mut EffectReport,
    ) {
        let Some(account) = ledger.account_mut(target) else {
            report.skip(EffectSlot::ToAccount, target);
            return;
        };
        adjust_signed(account, amount);
        account.contributions.record(
            txn_id,
            ContributionEntry {
                amount,
                date,
                contrib_type,
            },
        );
        if let Some(ytd) = account.ytd_contribution.as_mut() {
            *ytd += amount;
        }
    }

    fn undo_contribution(
        ledger: &mut Ledger,
        txn_id: Uuid,
        target: Uuid,
        amount: f64,
        report: &mut EffectReport,
    ) {
        let Some(account) = ledger.account_mut(target) else {
            report.skip(EffectSlot::ToAccount, target);
            return;
        };
        adjust_signed(account, -amount);
        if account.contributions.remove(txn_id).is_some() {
            if let Some(ytd) = account.ytd_contribution.as_mut() {
                *ytd -= amount;
            }
        }
    }
}

/// Applies a cash movement from the account holder's perspective.
fn adjust_signed(account: &mut Account, delta: f64) {
    match account.kind {
        AccountKind::Asset => account.balance += delta,
        AccountKind::Liability => account.balance -= delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{AccountCategory, Envelope, Frequency};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 5).unwrap()
    }

    #[test]
    fn expense_on_credit_card_increases_debt() {
        let mut ledger = Ledger::new("Cards");
        let card = ledger.add_account(Account::new("Chase", AccountCategory::CreditCard, 100.0));
        let txn = Transaction::new(
            date(),
            45.20,
            TransactionKind::Expense {
                from_account: Some(card),
                envelope_id: None,
                category_id: None,
            },
        )
        .unwrap();

        let report = EffectService::apply(&mut ledger, &txn).unwrap();
        assert!(report.is_clean());
        assert!((ledger.account(card).unwrap().balance - 145.20).abs() < 1e-9);
    }

    #[test]
    fn overdrawn_envelope_is_signalled_not_blocked() {
        let mut ledger = Ledger::new("Dining");
        let env = ledger.add_envelope(
            Envelope::new("Dining", 150.0, Frequency::Monthly).with_balance(30.0),
        );
        let txn = Transaction::new(
            date(),
            52.90,
            TransactionKind::Expense {
                from_account: None,
                envelope_id: Some(env),
                category_id: None,
            },
        )
        .unwrap();

        let report = EffectService::apply(&mut ledger, &txn).unwrap();
        let overdraft = report.overdraft.expect("overdraft signal");
        assert_eq!(overdraft.envelope_id, env);
        assert!((overdraft.overdraft - 22.90).abs() < 1e-9);
        assert!(ledger.envelope(env).unwrap().is_overdrawn());
    }

    #[test]
    fn payment_to_asset_target_is_skipped() {
        let mut ledger = Ledger::new("Mistake");
        let checking = ledger.add_account(Account::new("Checking", AccountCategory::Checking, 500.0));
        let savings = ledger.add_account(Account::new("Savings", AccountCategory::Savings, 100.0));
        let txn = Transaction::new(
            date(),
            50.0,
            TransactionKind::Payment {
                from_account: Some(checking),
                to_account: savings,
            },
        )
        .unwrap();

        let report = EffectService::apply(&mut ledger, &txn).unwrap();
        assert_eq!(
            report.unresolved,
            vec![UnresolvedRef {
                slot: EffectSlot::ToAccount,
                id: savings
            }]
        );
        assert_eq!(ledger.account(savings).unwrap().balance, 100.0);

        EffectService::reverse(&mut ledger, &txn).unwrap();
        assert!((ledger.account(checking).unwrap().balance - 500.0).abs() < 1e-9);
        assert_eq!(ledger.account(savings).unwrap().balance, 100.0);
    }

    #[test]
    fn rejects_tampered_amounts_before_mutating() {
        let mut ledger = Ledger::new("Guard");
        let checking = ledger.add_account(Account::new("Checking", AccountCategory::Checking, 10.0));
        let mut txn = Transaction::new(
            date(),
            5.0,
            TransactionKind::Income {
                to_account: checking,
                category_id: None,
            },
        )
        .unwrap();
        txn.amount = -5.0;

        assert!(EffectService::apply(&mut ledger, &txn).is_err());
        assert_eq!(ledger.account(checking).unwrap().balance, 10.0);
    }

    #[test]
    fn draws_on_tracked_accounts_are_logged_as_withdrawals() {
        let mut ledger = Ledger::new("Roth");
        let roth = ledger.add_account(
            Account::new("Roth IRA", AccountCategory::Retirement, 5000.0)
                .with_contribution_tracking(Some(7000.0)),
        );
        let checking = ledger.add_account(Account::new("Checking", AccountCategory::Checking, 0.0));
        let txn = Transaction::new(
            date(),
            1200.0,
            TransactionKind::Transfer {
                from_account: roth,
                to_account: checking,
                envelope_id: None,
            },
        )
        .unwrap();

        EffectService::apply(&mut ledger, &txn).unwrap();
        let account = ledger.account(roth).unwrap();
        assert_eq!(account.withdrawals.get(txn.id).map(|entry| entry.amount), Some(1200.0));
        assert!(ledger.account(checking).unwrap().withdrawals.is_empty());

        EffectService::reverse(&mut ledger, &txn).unwrap();
        let account = ledger.account(roth).unwrap();
        assert!(account.withdrawals.is_empty());
        assert!((account.balance - 5000.0).abs() < 1e-9);
    }
}
