use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

const WEEKS_PER_MONTH: f64 = 4.33;
const BIWEEKLY_PERIODS_PER_MONTH: f64 = 2.17;

/// Cadence used by envelope targets and recurring amounts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Normalizes an amount paid at this cadence to a per-month figure.
    pub fn monthly_equivalent(&self, amount: f64) -> f64 {
        match self {
            Frequency::Weekly => amount * WEEKS_PER_MONTH,
            Frequency::Biweekly => amount * BIWEEKLY_PERIODS_PER_MONTH,
            Frequency::Monthly => amount,
            Frequency::Quarterly => amount / 3.0,
            Frequency::Yearly => amount / 12.0,
        }
    }

    /// The `n`th date of a schedule anchored at `start` (`n = 0` is `start` itself).
    ///
    /// Counting from the anchor keeps a month-end schedule on the month end:
    /// Jan 31 runs to Feb 28 and then back to Mar 31. `None` once the date
    /// leaves chrono's range.
    pub fn occurrence(&self, start: NaiveDate, n: u32) -> Option<NaiveDate> {
        let n = i64::from(n);
        let months = |step: i64| {
            i32::try_from(n * step)
                .ok()
                .and_then(|months| checked_shift_month(start, months))
        };
        match self {
            Frequency::Weekly => start.checked_add_signed(Duration::days(7 * n)),
            Frequency::Biweekly => start.checked_add_signed(Duration::days(14 * n)),
            Frequency::Monthly => months(1),
            Frequency::Quarterly => months(3),
            Frequency::Yearly => months(12),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Frequency {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "yearly" => Ok(Frequency::Yearly),
            _ => Err(LedgerError::UnknownFrequency(value.to_string())),
        }
    }
}

/// Moves a date by whole months, clamping the day to the target month's length.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    checked_shift_month(date, months).unwrap_or(date)
}

fn checked_shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = (date.year() * 12 + date.month0() as i32).checked_add(months)?;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// First and last day of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = date
        .with_day(days_in_month(date.year(), date.month()))
        .unwrap_or(date);
    (first, last)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|first_next| (first_next - Duration::days(1)).day())
        .unwrap_or(28)
}
