use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::errors::LedgerError;
use crate::ledger::frequency::shift_month;

use super::types::{
    DebtBalance, DebtOutcome, DebtSnapshot, PayoffEstimate, Projection, ProjectionOutcome,
    ProjectionSettings, TimelineEntry,
};

pub struct PayoffEngine;

impl PayoffEngine {
    /// Simulates month-by-month payoff of `debts`, which must already be in strategy order.
    ///
    /// Each month every open debt accrues interest and takes its minimum; then the
    /// extra payment plus the minimums freed by debts cleared in earlier months
    /// cascade down the ordered list. Works on copies; nothing in the ledger changes.
    pub fn project(
        debts: &[DebtSnapshot],
        extra_payment: f64,
        settings: &ProjectionSettings,
    ) -> Result<Projection, LedgerError> {
        if !extra_payment.is_finite() || extra_payment < 0.0 {
            return Err(LedgerError::InvalidAmount(extra_payment));
        }
        let epsilon = settings.epsilon;

        let mut balances: Vec<f64> = debts.iter().map(|debt| debt.balance).collect();
        let mut outcomes: Vec<DebtOutcome> = debts
            .iter()
            .map(|debt| DebtOutcome {
                id: debt.id,
                paid_off_month: (debt.balance <= epsilon).then_some(0),
                interest_paid: 0.0,
            })
            .collect();
        for balance in balances.iter_mut().filter(|balance| **balance <= epsilon) {
            *balance = 0.0;
        }

        let mut freed = 0.0;
        let mut total_interest = 0.0;
        let mut total_paid = 0.0;
        let mut timeline = Vec::new();
        let mut month = 0;

        while month < settings.horizon_months && balances.iter().any(|b| *b > epsilon) {
            month += 1;

            for (index, debt) in debts.iter().enumerate() {
                let balance = &mut balances[index];
                if *balance <= epsilon {
                    continue;
                }
                let interest = *balance * debt.monthly_rate();
                *balance += interest;
                total_interest += interest;
                outcomes[index].interest_paid += interest;

                let minimum = debt.min_payment.max(0.0).min(*balance);
                *balance -= minimum;
                total_paid += minimum;
            }

            let mut pool = extra_payment + freed;
            for balance in balances.iter_mut() {
                if pool <= 0.0 {
                    break;
                }
                if *balance > epsilon {
                    let applied = pool.min(*balance);
                    *balance -= applied;
                    pool -= applied;
                    total_paid += applied;
                }
            }

            // Minimums of debts cleared this month join the pool from next month.
            for (index, debt) in debts.iter().enumerate() {
                if outcomes[index].paid_off_month.is_none() && balances[index] <= epsilon {
                    balances[index] = 0.0;
                    outcomes[index].paid_off_month = Some(month);
                    freed += debt.min_payment.max(0.0);
                    debug!(debt = %debt.id, month, "debt paid off in projection");
                }
            }

            timeline.push(TimelineEntry {
                month,
                balances: debts
                    .iter()
                    .zip(&balances)
                    .map(|(debt, balance)| DebtBalance {
                        id: debt.id,
                        balance: *balance,
                    })
                    .collect(),
            });
        }

        let remaining: f64 = balances.iter().filter(|b| **b > epsilon).sum();
        let outcome = if remaining > 0.0 {
            warn!(
                horizon = settings.horizon_months,
                remaining, "debts not payable within projection horizon"
            );
            ProjectionOutcome::NotPayableWithinHorizon { remaining }
        } else {
            ProjectionOutcome::PaidOff
        };

        Ok(Projection {
            months: month,
            total_interest,
            total_paid,
            timeline,
            debts: outcomes,
            outcome,
        })
    }

    /// Payoff date for one debt paying only its minimum, starting from `start`.
    pub fn payoff_date(
        debt: &DebtSnapshot,
        start: NaiveDate,
        settings: &ProjectionSettings,
    ) -> PayoffEstimate {
        let mut balance = debt.balance;
        if balance <= settings.epsilon {
            return PayoffEstimate::PaidOff {
                date: start,
                months: 0,
            };
        }
        let rate = debt.monthly_rate();
        if debt.min_payment - balance * rate <= 0.0 {
            return PayoffEstimate::NeverPaysOff;
        }

        for month in 1..=settings.horizon_months {
            balance += balance * rate;
            balance -= debt.min_payment.min(balance);
            if balance <= settings.epsilon {
                return PayoffEstimate::PaidOff {
                    date: shift_month(start, month as i32),
                    months: month,
                };
            }
        }
        PayoffEstimate::BeyondHorizon
    }
}
