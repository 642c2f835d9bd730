use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ensure_positive_amount, LedgerError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub kind: TransactionKind,
}

impl Transaction {
    /// Builds a transaction, rejecting non-positive or non-finite amounts.
    pub fn new(date: NaiveDate, amount: f64, kind: TransactionKind) -> Result<Self, LedgerError> {
        Ok(Self {
            id: Uuid::new_v4(),
            date,
            amount: ensure_positive_amount(amount)?,
            description: None,
            kind,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.kind.transaction_type()
    }
}

/// One variant per transaction type, each carrying exactly the fields that type uses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionKind {
    Expense {
        /// Absent when paid from untracked cash.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from_account: Option<Uuid>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        envelope_id: Option<Uuid>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category_id: Option<Uuid>,
    },
    Income {
        to_account: Uuid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category_id: Option<Uuid>,
    },
    Transfer {
        from_account: Uuid,
        to_account: Uuid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        envelope_id: Option<Uuid>,
    },
    Payment {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from_account: Option<Uuid>,
        to_account: Uuid,
    },
    Contribution {
        to_account: Uuid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from_account: Option<Uuid>,
        contrib_type: ContributionType,
    },
}

impl TransactionKind {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TransactionKind::Expense { .. } => TransactionType::Expense,
            TransactionKind::Income { .. } => TransactionType::Income,
            TransactionKind::Transfer { .. } => TransactionType::Transfer,
            TransactionKind::Payment { .. } => TransactionType::Payment,
            TransactionKind::Contribution { .. } => TransactionType::Contribution,
        }
    }

    pub fn from_account(&self) -> Option<Uuid> {
        match self {
            TransactionKind::Expense { from_account, .. }
            | TransactionKind::Payment { from_account, .. }
            | TransactionKind::Contribution { from_account, .. } => *from_account,
            TransactionKind::Transfer { from_account, .. } => Some(*from_account),
            TransactionKind::Income { .. } => None,
        }
    }

    pub fn to_account(&self) -> Option<Uuid> {
        match self {
            TransactionKind::Income { to_account, .. }
            | TransactionKind::Transfer { to_account, .. }
            | TransactionKind::Payment { to_account, .. }
            | TransactionKind::Contribution { to_account, .. } => Some(*to_account),
            TransactionKind::Expense { .. } => None,
        }
    }

    pub fn envelope_id(&self) -> Option<Uuid> {
        match self {
            TransactionKind::Expense { envelope_id, .. }
            | TransactionKind::Transfer { envelope_id, .. } => *envelope_id,
            _ => None,
        }
    }

    pub fn category_id(&self) -> Option<Uuid> {
        match self {
            TransactionKind::Expense { category_id, .. }
            | TransactionKind::Income { category_id, .. } => *category_id,
            _ => None,
        }
    }

    /// True when the transaction references the given account in any slot.
    pub fn touches_account(&self, account_id: Uuid) -> bool {
        self.from_account() == Some(account_id) || self.to_account() == Some(account_id)
    }
}

/// Plain discriminant used when a type arrives as a string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Expense,
    Income,
    Transfer,
    Payment,
    Contribution,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
            TransactionType::Transfer => "transfer",
            TransactionType::Payment => "payment",
            TransactionType::Contribution => "contribution",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            "transfer" => Ok(TransactionType::Transfer),
            "payment" => Ok(TransactionType::Payment),
            "contribution" => Ok(TransactionType::Contribution),
            _ => Err(LedgerError::UnknownTransactionType(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContributionType {
    /// Payroll-deducted before reaching any tracked account.
    Pretax,
    #[default]
    Posttax,
}
