use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::ledger::{Ledger, NetWorthSnapshot};

pub struct NetWorthService;

impl NetWorthService {
    /// Records today's totals, keeping one snapshot per day inside the retention window.
    pub fn record_snapshot(
        ledger: &mut Ledger,
        date: NaiveDate,
        retention_days: u32,
    ) -> NetWorthSnapshot {
        let snapshot = NetWorthSnapshot::new(date, ledger.total_assets(), ledger.total_liabilities());
        let cutoff = date - Duration::days(i64::from(retention_days));

        ledger
            .net_worth_history
            .retain(|entry| entry.date != date && entry.date >= cutoff);
        ledger.net_worth_history.push(snapshot.clone());
        ledger.net_worth_history.sort_by_key(|entry| entry.date);
        ledger.touch();
        debug!(%date, net_worth = snapshot.net_worth, "recorded net worth snapshot");
        snapshot
    }

    /// The most recent `count` snapshots, oldest first.
    pub fn recent(ledger: &Ledger, count: usize) -> &[NetWorthSnapshot] {
        let history = &ledger.net_worth_history;
        &history[history.len().saturating_sub(count)..]
    }

    /// Change in net worth between the first and last retained snapshots.
    pub fn change(ledger: &Ledger) -> Option<f64> {
        let first = ledger.net_worth_history.first()?;
        let last = ledger.net_worth_history.last()?;
        Some(last.net_worth - first.net_worth)
    }
}
