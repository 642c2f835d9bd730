//! Turns due recurring templates into recorded transactions.

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::ensure_positive_amount;
use crate::ledger::{Ledger, RecurringTemplate};

use super::{EffectReport, ServiceError, ServiceResult, TransactionService};

/// One occurrence recorded by [`RecurringService::process_due`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringRun {
    pub template_id: Uuid,
    pub transaction_id: Uuid,
    pub date: NaiveDate,
    pub report: EffectReport,
}

/// Recurring amounts normalized to one month.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecurringTotals {
    pub income: f64,
    pub outgoing: f64,
}

impl RecurringTotals {
    pub fn net(&self) -> f64 {
        self.income - self.outgoing
    }
}

pub struct RecurringService;

impl RecurringService {
    pub fn add(ledger: &mut Ledger, template: RecurringTemplate) -> ServiceResult<Uuid> {
        ensure_positive_amount(template.amount)?;
        if ledger.recurring_template(template.id).is_some() {
            return Err(ServiceError::Invalid(format!(
                "Recurring template {} already exists",
                template.id
            )));
        }
        let id = template.id;
        ledger.recurring.push(template);
        ledger.touch();
        Ok(id)
    }

    /// Drops a template; transactions it already produced stay recorded.
    pub fn remove(ledger: &mut Ledger, id: Uuid) -> ServiceResult<RecurringTemplate> {
        let index = ledger
            .recurring
            .iter()
            .position(|template| template.id == id)
            .ok_or_else(|| ServiceError::Invalid(format!("Recurring template {id} not found")))?;
        let removed = ledger.recurring.remove(index);
        ledger.touch();
        Ok(removed)
    }

    /// Records every occurrence dated on or before `today`, catching up missed periods.
    ///
    /// Each occurrence goes through [`TransactionService::record`], so balances
    /// and envelopes move exactly as for a hand-entered transaction.
    pub fn process_due(ledger: &mut Ledger, today: NaiveDate) -> ServiceResult<Vec<RecurringRun>> {
        for template in &ledger.recurring {
            ensure_positive_amount(template.amount)?;
        }

        let mut runs = Vec::new();
        for index in 0..ledger.recurring.len() {
            loop {
                let template = &ledger.recurring[index];
                let Some(date) = template.next_date().filter(|date| *date <= today) else {
                    break;
                };
                let template_id = template.id;
                let transaction = template.transaction_on(date)?;
                let transaction_id = transaction.id;
                let report = TransactionService::record(ledger, transaction)?;
                ledger.recurring[index].occurrences += 1;
                debug!(template = %template_id, %date, "recorded recurring occurrence");
                runs.push(RecurringRun {
                    template_id,
                    transaction_id,
                    date,
                    report,
                });
            }
        }

        if !runs.is_empty() {
            ledger.touch();
            info!(recorded = runs.len(), %today, "processed recurring transactions");
        }
        Ok(runs)
    }

    /// Income versus everything else, each at its monthly equivalent.
    pub fn monthly_totals(ledger: &Ledger) -> RecurringTotals {
        ledger
            .recurring
            .iter()
            .fold(RecurringTotals::default(), |mut totals, template| {
                if template.is_income() {
                    totals.income += template.monthly_amount();
                } else {
                    totals.outgoing += template.monthly_amount();
                }
                totals
            })
    }

    /// The `limit` templates due soonest.
    pub fn upcoming(ledger: &Ledger, limit: usize) -> Vec<(NaiveDate, &RecurringTemplate)> {
        let mut upcoming: Vec<(NaiveDate, &RecurringTemplate)> = ledger
            .recurring
            .iter()
            .filter_map(|template| template.next_date().map(|date| (date, template)))
            .collect();
        upcoming.sort_by_key(|(date, _)| *date);
        upcoming.truncate(limit);
        upcoming
    }
}
