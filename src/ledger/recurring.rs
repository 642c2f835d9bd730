use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    frequency::Frequency,
    transaction::{Transaction, TransactionKind, TransactionType},
};
use crate::errors::{ensure_positive_amount, LedgerError};

/// A bill or paycheck that repeats on a fixed cadence.
///
/// The schedule is anchored at `start_date`; `occurrences` counts how many
/// dates have already been turned into transactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringTemplate {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub frequency: Frequency,
    #[serde(flatten)]
    pub kind: TransactionKind,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub occurrences: u32,
}

impl RecurringTemplate {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        frequency: Frequency,
        start_date: NaiveDate,
        kind: TransactionKind,
    ) -> Result<Self, LedgerError> {
        ensure_positive_amount(amount)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            frequency,
            kind,
            start_date,
            occurrences: 0,
        })
    }

    /// Date of the next occurrence not yet recorded.
    pub fn next_date(&self) -> Option<NaiveDate> {
        self.frequency.occurrence(self.start_date, self.occurrences)
    }

    pub fn is_income(&self) -> bool {
        self.kind.transaction_type() == TransactionType::Income
    }

    pub fn monthly_amount(&self) -> f64 {
        self.frequency.monthly_equivalent(self.amount)
    }

    /// Builds the transaction for one occurrence of this template.
    pub fn transaction_on(&self, date: NaiveDate) -> Result<Transaction, LedgerError> {
        Ok(Transaction::new(date, self.amount, self.kind.clone())?
            .with_description(format!("{} (Recurring)", self.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rent() -> RecurringTemplate {
        RecurringTemplate::new(
            "Rent",
            1450.0,
            Frequency::Monthly,
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            TransactionKind::Expense {
                from_account: Some(Uuid::new_v4()),
                envelope_id: None,
                category_id: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn next_date_follows_recorded_occurrences() {
        let mut template = rent();
        assert_eq!(template.next_date(), Some(template.start_date));
        template.occurrences = 1;
        assert_eq!(template.next_date(), NaiveDate::from_ymd_opt(2026, 2, 28));
        assert!(!template.is_income());
    }

    #[test]
    fn occurrence_transaction_is_labelled() {
        let template = rent();
        let txn = template.transaction_on(template.start_date).unwrap();
        assert_eq!(txn.description.as_deref(), Some("Rent (Recurring)"));
        assert_eq!(txn.amount, 1450.0);
        assert_eq!(txn.kind, template.kind);
    }

    #[test]
    fn rejects_non_positive_amounts() {
        let err = RecurringTemplate::new(
            "Broken",
            0.0,
            Frequency::Weekly,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            TransactionKind::Income {
                to_account: Uuid::new_v4(),
                category_id: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
    }

    #[test]
    fn wire_format_is_flat_with_type_tag() {
        let template = rent();
        let json = serde_json::to_value(&template).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["frequency"], "monthly");
        let back: RecurringTemplate = serde_json::from_value(json).unwrap();
        assert_eq!(back, template);
    }
}
