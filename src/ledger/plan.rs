use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LedgerError;

use super::ledger::Ledger;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayoffStrategy {
    /// Highest interest rate first.
    #[default]
    Avalanche,
    /// Smallest balance first.
    Snowball,
}

impl fmt::Display for PayoffStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayoffStrategy::Avalanche => f.write_str("avalanche"),
            PayoffStrategy::Snowball => f.write_str("snowball"),
        }
    }
}

impl FromStr for PayoffStrategy {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "avalanche" => Ok(PayoffStrategy::Avalanche),
            "snowball" => Ok(PayoffStrategy::Snowball),
            _ => Err(LedgerError::UnknownStrategy(value.to_string())),
        }
    }
}

/// The set of liabilities being paid down and how surplus money is directed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebtPayoffPlan {
    pub strategy: PayoffStrategy,
    #[serde(default)]
    pub extra_payment: f64,
    #[serde(default)]
    pub debt_ids: Vec<Uuid>,
}

impl DebtPayoffPlan {
    pub fn new(strategy: PayoffStrategy, extra_payment: f64, debt_ids: Vec<Uuid>) -> Self {
        Self {
            strategy,
            extra_payment,
            debt_ids,
        }
    }

    /// Checks the extra payment and that every listed id is an existing liability.
    pub fn validate(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        if !self.extra_payment.is_finite() || self.extra_payment < 0.0 {
            return Err(LedgerError::InvalidAmount(self.extra_payment));
        }
        for id in &self.debt_ids {
            match ledger.account(*id) {
                Some(account) if account.is_liability() => {}
                Some(account) => {
                    return Err(LedgerError::InvalidRef(format!(
                        "account `{}` is not a liability",
                        account.name
                    )))
                }
                None => {
                    return Err(LedgerError::InvalidRef(format!(
                        "debt {id} does not exist"
                    )))
                }
            }
        }
        Ok(())
    }

    /// Drops ids whose accounts were deleted or are no longer liabilities.
    pub fn prune(&mut self, ledger: &Ledger) -> usize {
        let before = self.debt_ids.len();
        self.debt_ids.retain(|id| {
            ledger
                .account(*id)
                .map(|account| account.is_liability())
                .unwrap_or(false)
        });
        before - self.debt_ids.len()
    }
}
