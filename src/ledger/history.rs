//! Append-only account history keyed by the transaction that produced each entry.
//!
//! Entries are looked up and removed by transaction id when a transaction is
//! reversed, so no derived-string matching is needed.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transaction::ContributionType;

/// Common accessors for history entries.
pub trait HistoryEntry {
    fn date(&self) -> NaiveDate;
    fn amount(&self) -> f64;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentEntry {
    pub amount: f64,
    pub principal: f64,
    pub interest: f64,
    pub date: NaiveDate,
    pub balance_before: f64,
    pub balance_after: f64,
}

impl PaymentEntry {
    /// How far the payment actually moved the balance, after flooring at zero.
    pub fn balance_reduction(&self) -> f64 {
        self.balance_before - self.balance_after
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContributionEntry {
    pub amount: f64,
    pub date: NaiveDate,
    pub contrib_type: ContributionType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WithdrawalEntry {
    pub amount: f64,
    pub date: NaiveDate,
}

impl HistoryEntry for PaymentEntry {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn amount(&self) -> f64 {
        self.amount
    }
}

impl HistoryEntry for ContributionEntry {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn amount(&self) -> f64 {
        self.amount
    }
}

impl HistoryEntry for WithdrawalEntry {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn amount(&self) -> f64 {
        self.amount
    }
}

/// An entry plus the order it was recorded in, so same-day entries sort stably.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Slot<T> {
    #[serde(default)]
    seq: u64,
    #[serde(flatten)]
    entry: T,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct HistoryLog<T> {
    entries: BTreeMap<Uuid, Slot<T>>,
}

impl<T> Default for HistoryLog<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: HistoryEntry> HistoryLog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry under its originating transaction id, replacing any stale one.
    pub fn record(&mut self, transaction_id: Uuid, entry: T) -> Option<T> {
        let seq = self
            .entries
            .values()
            .map(|slot| slot.seq + 1)
            .max()
            .unwrap_or(0);
        self.entries
            .insert(transaction_id, Slot { seq, entry })
            .map(|slot| slot.entry)
    }

    pub fn remove(&mut self, transaction_id: Uuid) -> Option<T> {
        self.entries.remove(&transaction_id).map(|slot| slot.entry)
    }

    pub fn get(&self, transaction_id: Uuid) -> Option<&T> {
        self.entries.get(&transaction_id).map(|slot| &slot.entry)
    }

    pub fn contains(&self, transaction_id: Uuid) -> bool {
        self.entries.contains_key(&transaction_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by date, then by the order they were recorded.
    pub fn entries(&self) -> Vec<(Uuid, &T)> {
        let mut ordered: Vec<(Uuid, &Slot<T>)> =
            self.entries.iter().map(|(id, slot)| (*id, slot)).collect();
        ordered.sort_by_key(|(_, slot)| (slot.entry.date(), slot.seq));
        ordered
            .into_iter()
            .map(|(id, slot)| (id, &slot.entry))
            .collect()
    }

    pub fn total(&self) -> f64 {
        self.entries.values().map(|slot| slot.entry.amount()).sum()
    }

    /// Sum of entries dated within `start..=end`.
    pub fn total_between(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        self.entries
            .values()
            .map(|slot| &slot.entry)
            .filter(|entry| entry.date() >= start && entry.date() <= end)
            .map(HistoryEntry::amount)
            .sum()
    }
}
