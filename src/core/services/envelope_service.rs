use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::currency::round_cents;
use crate::errors::ensure_positive_amount;
use crate::ledger::Ledger;

use super::{EnvelopeOverdraft, ServiceError, ServiceResult};

/// Slack allowed when comparing an allocation template against the paycheck total.
const ALLOCATION_TOLERANCE: f64 = 0.005;

/// A share of a paycheck earmarked for one envelope.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Allocation {
    pub envelope_id: Uuid,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllocationReport {
    pub applied: Vec<Allocation>,
    pub skipped: Vec<Uuid>,
    pub unallocated: f64,
}

pub struct EnvelopeService;

impl EnvelopeService {
    /// Funds envelopes from a paycheck according to an allocation template.
    pub fn allocate(
        ledger: &mut Ledger,
        allocations: &[Allocation],
        total: f64,
    ) -> ServiceResult<AllocationReport> {
        ensure_positive_amount(total)?;
        let mut requested = 0.0;
        for allocation in allocations {
            requested += ensure_positive_amount(allocation.amount)?;
        }
        if requested > total + ALLOCATION_TOLERANCE {
            return Err(ServiceError::Invalid(format!(
                "Allocations of {requested:.2} exceed paycheck total {total:.2}"
            )));
        }

        let mut report = AllocationReport {
            unallocated: total,
            ..AllocationReport::default()
        };
        for allocation in allocations {
            match ledger.envelope_mut(allocation.envelope_id) {
                Some(envelope) => {
                    envelope.balance += allocation.amount;
                    report.unallocated -= allocation.amount;
                    report.applied.push(*allocation);
                }
                None => {
                    debug!(envelope = %allocation.envelope_id, "allocation target missing");
                    report.skipped.push(allocation.envelope_id);
                }
            }
        }
        report.unallocated = round_cents(report.unallocated);
        ledger.touch();
        info!(
            funded = report.applied.len(),
            unallocated = report.unallocated,
            "allocated paycheck to envelopes"
        );
        Ok(report)
    }

    /// Withdraws previously applied allocations, e.g. when a paycheck is deleted.
    pub fn release(ledger: &mut Ledger, allocations: &[Allocation]) -> ServiceResult<()> {
        for allocation in allocations {
            ensure_positive_amount(allocation.amount)?;
        }
        for allocation in allocations {
            if let Some(envelope) = ledger.envelope_mut(allocation.envelope_id) {
                envelope.balance -= allocation.amount;
            }
        }
        ledger.touch();
        Ok(())
    }

    /// Moves available funds between two envelopes.
    pub fn move_funds(ledger: &mut Ledger, from: Uuid, to: Uuid, amount: f64) -> ServiceResult<()> {
        ensure_positive_amount(amount)?;
        if from == to {
            return Err(ServiceError::Invalid(
                "Source and destination envelopes are the same".into(),
            ));
        }
        if ledger.envelope(from).is_none() || ledger.envelope(to).is_none() {
            return Err(ServiceError::Invalid("Envelope not found".into()));
        }
        if let Some(source) = ledger.envelope_mut(from) {
            source.balance -= amount;
        }
        if let Some(target) = ledger.envelope_mut(to) {
            target.balance += amount;
        }
        ledger.touch();
        Ok(())
    }

    /// Starts a new budgeting period by clearing every envelope's spent counter.
    pub fn start_new_period(ledger: &mut Ledger) -> usize {
        let mut reset = 0;
        for envelope in ledger.envelopes.iter_mut() {
            if envelope.spent != 0.0 {
                envelope.spent = 0.0;
                reset += 1;
            }
        }
        ledger.touch();
        reset
    }

    pub fn overdrawn(ledger: &Ledger) -> Vec<EnvelopeOverdraft> {
        ledger
            .envelopes
            .iter()
            .filter(|envelope| envelope.is_overdrawn())
            .map(|envelope| EnvelopeOverdraft {
                envelope_id: envelope.id,
                overdraft: envelope.overdraft(),
            })
            .collect()
    }

    /// Sum of every envelope's target, normalized to a monthly figure.
    pub fn monthly_target_total(ledger: &Ledger) -> f64 {
        ledger.envelopes.iter().map(|envelope| envelope.monthly_target()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Envelope, Frequency};

    #[test]
    fn allocation_reports_unallocated_remainder() {
        let mut ledger = Ledger::new("Paycheck");
        let rent = ledger.add_envelope(Envelope::new("Rent", 1200.0, Frequency::Monthly));
        let groceries = ledger.add_envelope(Envelope::new("Groceries", 400.0, Frequency::Monthly));
        let template = [
            Allocation {
                envelope_id: rent,
                amount: 553.85,
            },
            Allocation {
                envelope_id: groceries,
                amount: 184.62,
            },
        ];

        let report = EnvelopeService::allocate(&mut ledger, &template, 1642.30).unwrap();
        assert_eq!(report.applied.len(), 2);
        assert_eq!(report.unallocated, 903.83);
        assert!((ledger.envelope(rent).unwrap().balance - 553.85).abs() < 1e-9);

        EnvelopeService::release(&mut ledger, &template).unwrap();
        assert!(ledger.envelope(rent).unwrap().balance.abs() < 1e-9);
    }

    #[test]
    fn allocation_cannot_exceed_total() {
        let mut ledger = Ledger::new("Greedy");
        let rent = ledger.add_envelope(Envelope::new("Rent", 1200.0, Frequency::Monthly));
        let template = [Allocation {
            envelope_id: rent,
            amount: 2000.0,
        }];
        assert!(EnvelopeService::allocate(&mut ledger, &template, 1000.0).is_err());
        assert_eq!(ledger.envelope(rent).unwrap().balance, 0.0);
    }

    #[test]
    fn missing_envelope_keeps_money_unallocated() {
        let mut ledger = Ledger::new("Stale");
        let ghost = Uuid::new_v4();
        let template = [Allocation {
            envelope_id: ghost,
            amount: 50.0,
        }];
        let report = EnvelopeService::allocate(&mut ledger, &template, 100.0).unwrap();
        assert_eq!(report.skipped, vec![ghost]);
        assert_eq!(report.unallocated, 100.0);
    }

    #[test]
    fn new_period_clears_spent_and_move_funds_balances() {
        let mut ledger = Ledger::new("Period");
        let mut dining = Envelope::new("Dining", 150.0, Frequency::Monthly).with_balance(-10.0);
        dining.spent = 160.0;
        let dining = ledger.add_envelope(dining);
        let fun = ledger.add_envelope(Envelope::new("Fun", 75.0, Frequency::Monthly).with_balance(40.0));

        assert_eq!(EnvelopeService::overdrawn(&ledger).len(), 1);
        EnvelopeService::move_funds(&mut ledger, fun, dining, 10.0).unwrap();
        assert!(EnvelopeService::overdrawn(&ledger).is_empty());
        assert_eq!(EnvelopeService::start_new_period(&mut ledger), 1);
        assert_eq!(ledger.envelope(dining).unwrap().spent, 0.0);
    }
}
