use uuid::Uuid;

use crate::ledger::{Account, DebtPayoffPlan, PayoffStrategy};

use super::types::DebtSnapshot;

/// Liabilities in the plan, in the order the strategy pays them down.
///
/// Recomputed from current balances and rates on every call.
pub fn payoff_order(plan: &DebtPayoffPlan, accounts: &[Account]) -> Vec<Uuid> {
    let mut debts: Vec<&Account> = accounts
        .iter()
        .filter(|account| account.is_liability() && plan.debt_ids.contains(&account.id))
        .collect();
    sort_by_strategy(
        &mut debts,
        plan.strategy,
        |account| account.interest_rate(),
        |account| account.balance,
    );
    debts.into_iter().map(|account| account.id).collect()
}

/// Snapshots of the plan's debts, already in payoff order.
pub fn ordered_snapshots(plan: &DebtPayoffPlan, accounts: &[Account]) -> Vec<DebtSnapshot> {
    payoff_order(plan, accounts)
        .into_iter()
        .filter_map(|id| accounts.iter().find(|account| account.id == id))
        .map(DebtSnapshot::from)
        .collect()
}

/// Stable sort: avalanche by descending rate, snowball by ascending balance.
pub fn sort_by_strategy<T>(
    items: &mut [T],
    strategy: PayoffStrategy,
    rate: impl Fn(&T) -> f64,
    balance: impl Fn(&T) -> f64,
) {
    match strategy {
        PayoffStrategy::Avalanche => items.sort_by(|a, b| rate(b).total_cmp(&rate(a))),
        PayoffStrategy::Snowball => items.sort_by(|a, b| balance(a).total_cmp(&balance(b))),
    }
}
