use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::errors::ensure_positive_amount;
use crate::ledger::{frequency::month_bounds, Ledger, Transaction, TransactionType};

use super::{EffectReport, EffectService, ServiceError, ServiceResult};

pub struct TransactionService;

impl TransactionService {
    /// Applies a new transaction and appends it to the ledger.
    pub fn record(ledger: &mut Ledger, transaction: Transaction) -> ServiceResult<EffectReport> {
        if ledger.transaction(transaction.id).is_some() {
            return Err(ServiceError::Invalid(format!(
                "Transaction {} is already recorded",
                transaction.id
            )));
        }
        let report = EffectService::apply(ledger, &transaction)?;
        ledger.transactions.push(transaction);
        Ok(report)
    }

    /// Replaces a recorded transaction: reverses the old effect, then applies the new one.
    ///
    /// The replacement keeps the original id so its history entries stay addressable.
    pub fn edit(
        ledger: &mut Ledger,
        id: Uuid,
        mut replacement: Transaction,
    ) -> ServiceResult<EffectReport> {
        // Validate first so the reverse/apply pair cannot stop halfway.
        ensure_positive_amount(replacement.amount)?;
        let index = Self::position(ledger, id)?;
        let previous = ledger.transactions[index].clone();
        replacement.id = id;

        EffectService::reverse(ledger, &previous)?;
        let report = EffectService::apply(ledger, &replacement)?;
        ledger.transactions[index] = replacement;
        info!(transaction = %id, "edited transaction");
        Ok(report)
    }

    /// Reverses a transaction's effect and removes the record.
    pub fn delete(ledger: &mut Ledger, id: Uuid) -> ServiceResult<Transaction> {
        let index = Self::position(ledger, id)?;
        let existing = ledger.transactions[index].clone();
        EffectService::reverse(ledger, &existing)?;
        ledger.transactions.remove(index);
        ledger.touch();
        info!(transaction = %id, "deleted transaction");
        Ok(existing)
    }

    pub fn for_account(ledger: &Ledger, account_id: Uuid) -> Vec<&Transaction> {
        ledger
            .transactions
            .iter()
            .filter(|txn| txn.kind.touches_account(account_id))
            .collect()
    }

    pub fn for_envelope(ledger: &Ledger, envelope_id: Uuid) -> Vec<&Transaction> {
        ledger
            .transactions
            .iter()
            .filter(|txn| txn.kind.envelope_id() == Some(envelope_id))
            .collect()
    }

    /// Expense total for a category between `start` and `end`, both inclusive.
    pub fn category_spending(
        ledger: &Ledger,
        category_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> f64 {
        ledger
            .transactions
            .iter()
            .filter(|txn| txn.transaction_type() == TransactionType::Expense)
            .filter(|txn| txn.kind.category_id() == Some(category_id))
            .filter(|txn| txn.date >= start && txn.date <= end)
            .map(|txn| txn.amount)
            .sum()
    }

    /// Expense total for a category over the calendar month containing `date`.
    pub fn monthly_category_spending(ledger: &Ledger, category_id: Uuid, date: NaiveDate) -> f64 {
        let (first, last) = month_bounds(date);
        Self::category_spending(ledger, category_id, first, last)
    }

    fn position(ledger: &Ledger, id: Uuid) -> ServiceResult<usize> {
        ledger
            .transactions
            .iter()
            .position(|txn| txn.id == id)
            .ok_or_else(|| ServiceError::Invalid(format!("Transaction {id} not found")))
    }
}
