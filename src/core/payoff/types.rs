use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::Account;

/// Thirty years of monthly steps; the projection never runs longer.
pub const DEFAULT_HORIZON_MONTHS: u32 = 360;
/// Balances at or below this are treated as paid off.
pub const PAID_OFF_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProjectionSettings {
    pub horizon_months: u32,
    pub epsilon: f64,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            horizon_months: DEFAULT_HORIZON_MONTHS,
            epsilon: PAID_OFF_EPSILON,
        }
    }
}

/// Read-only copy of a liability used by the simulation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebtSnapshot {
    pub id: Uuid,
    pub name: String,
    pub balance: f64,
    /// Annual percentage rate.
    pub interest_rate: f64,
    pub min_payment: f64,
}

impl DebtSnapshot {
    pub fn monthly_rate(&self) -> f64 {
        self.interest_rate / 100.0 / 12.0
    }
}

impl From<&Account> for DebtSnapshot {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            balance: account.balance,
            interest_rate: account.interest_rate(),
            min_payment: account.min_payment(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebtBalance {
    pub id: Uuid,
    pub balance: f64,
}

/// End-of-month balances for every debt in the projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEntry {
    pub month: u32,
    pub balances: Vec<DebtBalance>,
}

impl TimelineEntry {
    pub fn total(&self) -> f64 {
        self.balances.iter().map(|debt| debt.balance).sum()
    }

    pub fn balance_of(&self, id: Uuid) -> Option<f64> {
        self.balances
            .iter()
            .find(|debt| debt.id == id)
            .map(|debt| debt.balance)
    }
}

/// Per-debt timing within a projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebtOutcome {
    pub id: Uuid,
    /// Month in which the debt reached zero, if it did within the horizon.
    pub paid_off_month: Option<u32>,
    pub interest_paid: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProjectionOutcome {
    PaidOff,
    /// The horizon ran out with money still owed; no payoff date is implied.
    NotPayableWithinHorizon { remaining: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Projection {
    pub months: u32,
    pub total_interest: f64,
    pub total_paid: f64,
    pub timeline: Vec<TimelineEntry>,
    pub debts: Vec<DebtOutcome>,
    pub outcome: ProjectionOutcome,
}

impl Projection {
    pub fn is_paid_off(&self) -> bool {
        matches!(self.outcome, ProjectionOutcome::PaidOff)
    }

    /// Calendar date of the final payment, counted from `start`.
    pub fn payoff_date(&self, start: NaiveDate) -> Option<NaiveDate> {
        self.is_paid_off()
            .then(|| crate::ledger::frequency::shift_month(start, self.months as i32))
    }
}

/// Result of projecting a single debt on its minimum payment alone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PayoffEstimate {
    PaidOff { date: NaiveDate, months: u32 },
    /// The minimum payment never covers the monthly interest.
    NeverPaysOff,
    BeyondHorizon,
}

impl PayoffEstimate {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            PayoffEstimate::PaidOff { date, .. } => Some(*date),
            _ => None,
        }
    }
}
