use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::frequency::Frequency;

/// A named sub-budget earmarking funds for a category or linked account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    pub id: Uuid,
    pub name: String,
    /// Available funds; negative means overdrawn.
    pub balance: f64,
    /// Period-to-date spending, never negative.
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub target_amount: f64,
    #[serde(default)]
    pub target_frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_account_id: Option<Uuid>,
}

impl Envelope {
    pub fn new(name: impl Into<String>, target_amount: f64, target_frequency: Frequency) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            balance: 0.0,
            spent: 0.0,
            target_amount,
            target_frequency,
            linked_category_id: None,
            linked_account_id: None,
        }
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }

    pub fn is_overdrawn(&self) -> bool {
        self.balance < 0.0
    }

    /// Magnitude by which the envelope is overdrawn, zero when funded.
    pub fn overdraft(&self) -> f64 {
        (-self.balance).max(0.0)
    }

    pub fn monthly_target(&self) -> f64 {
        self.target_frequency.monthly_equivalent(self.target_amount)
    }

    /// Funded share of the per-period target; `None` without a target.
    pub fn funded_ratio(&self) -> Option<f64> {
        if self.target_amount > 0.0 {
            Some(self.balance.max(0.0) / self.target_amount)
        } else {
            None
        }
    }

    pub(crate) fn debit(&mut self, amount: f64) {
        self.balance -= amount;
        self.spent += amount;
    }

    pub(crate) fn credit_back(&mut self, amount: f64) {
        self.balance += amount;
        self.spent = (self.spent - amount).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overdraft_is_reported_as_positive_magnitude() {
        let mut dining = Envelope::new("Dining", 150.0, Frequency::Monthly).with_balance(20.0);
        dining.debit(52.90);
        assert!(dining.is_overdrawn());
        assert!((dining.overdraft() - 32.90).abs() < 1e-9);
        assert!((dining.spent - 52.90).abs() < 1e-9);
    }

    #[test]
    fn credit_back_clamps_spent_at_zero() {
        let mut gas = Envelope::new("Gas", 200.0, Frequency::Monthly).with_balance(10.0);
        gas.spent = 5.0;
        gas.credit_back(30.0);
        assert_eq!(gas.spent, 0.0);
        assert!((gas.balance - 40.0).abs() < 1e-9);
    }

    #[test]
    fn yearly_targets_are_spread_monthly() {
        let insurance = Envelope::new("Car Insurance", 1100.0, Frequency::Yearly);
        assert!((insurance.monthly_target() - 1100.0 / 12.0).abs() < 1e-9);
        assert_eq!(insurance.funded_ratio(), Some(0.0));
    }
}
