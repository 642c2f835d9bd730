use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::core::payoff::{ordered_snapshots, payoff_order, PayoffEngine, PayoffEstimate, Projection};
use crate::ledger::{DebtPayoffPlan, Ledger};

use super::{ServiceError, ServiceResult};

pub struct PayoffService;

impl PayoffService {
    /// Projects the ledger's debt plan with the configured horizon.
    pub fn plan_projection(ledger: &Ledger, config: &EngineConfig) -> ServiceResult<Projection> {
        let plan = Self::plan(ledger)?;
        Self::project(ledger, plan, config)
    }

    /// Projects an arbitrary plan against the ledger's current balances.
    pub fn project(
        ledger: &Ledger,
        plan: &DebtPayoffPlan,
        config: &EngineConfig,
    ) -> ServiceResult<Projection> {
        plan.validate(ledger)?;
        let debts = ordered_snapshots(plan, &ledger.accounts);
        let projection =
            PayoffEngine::project(&debts, plan.extra_payment, &config.projection_settings())?;
        info!(
            strategy = %plan.strategy,
            debts = debts.len(),
            months = projection.months,
            total_interest = projection.total_interest,
            "projected debt payoff"
        );
        Ok(projection)
    }

    pub fn payoff_order(ledger: &Ledger) -> ServiceResult<Vec<Uuid>> {
        let plan = Self::plan(ledger)?;
        Ok(payoff_order(plan, &ledger.accounts))
    }

    /// Minimum-payment-only estimates for each planned debt, in payoff order.
    pub fn payoff_dates(
        ledger: &Ledger,
        start: NaiveDate,
        config: &EngineConfig,
    ) -> ServiceResult<Vec<(Uuid, PayoffEstimate)>> {
        let plan = Self::plan(ledger)?;
        let settings = config.projection_settings();
        Ok(ordered_snapshots(plan, &ledger.accounts)
            .iter()
            .map(|debt| (debt.id, PayoffEngine::payoff_date(debt, start, &settings)))
            .collect())
    }

    fn plan(ledger: &Ledger) -> ServiceResult<&DebtPayoffPlan> {
        ledger
            .debt_plan
            .as_ref()
            .ok_or_else(|| ServiceError::Invalid("Ledger has no debt payoff plan".into()))
    }
}
