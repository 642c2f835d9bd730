use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One point in the net-worth time series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetWorthSnapshot {
    pub date: NaiveDate,
    pub assets: f64,
    pub liabilities: f64,
    pub net_worth: f64,
}

impl NetWorthSnapshot {
    pub fn new(date: NaiveDate, assets: f64, liabilities: f64) -> Self {
        Self {
            date,
            assets,
            liabilities,
            net_worth: assets - liabilities,
        }
    }
}
