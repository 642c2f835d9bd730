use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    account::Account, envelope::Envelope, net_worth::NetWorthSnapshot, plan::DebtPayoffPlan,
    recurring::RecurringTemplate, transaction::Transaction,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// In-memory store of accounts, envelopes and transactions handed to every core call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub envelopes: Vec<Envelope>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub recurring: Vec<RecurringTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_plan: Option<DebtPayoffPlan>,
    #[serde(default)]
    pub net_worth_history: Vec<NetWorthSnapshot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            accounts: Vec::new(),
            envelopes: Vec::new(),
            transactions: Vec::new(),
            recurring: Vec::new(),
            debt_plan: None,
            net_worth_history: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_account(&mut self, account: Account) -> Uuid {
        let id = account.id;
        self.accounts.push(account);
        self.touch();
        id
    }

    pub fn add_envelope(&mut self, envelope: Envelope) -> Uuid {
        let id = envelope.id;
        self.envelopes.push(envelope);
        self.touch();
        id
    }

    pub fn account(&self, id: Uuid) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn account_mut(&mut self, id: Uuid) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|account| account.id == id)
    }

    pub fn envelope(&self, id: Uuid) -> Option<&Envelope> {
        self.envelopes.iter().find(|envelope| envelope.id == id)
    }

    pub fn envelope_mut(&mut self, id: Uuid) -> Option<&mut Envelope> {
        self.envelopes.iter_mut().find(|envelope| envelope.id == id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn recurring_template(&self, id: Uuid) -> Option<&RecurringTemplate> {
        self.recurring.iter().find(|template| template.id == id)
    }

    pub fn assets(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter().filter(|account| account.is_asset())
    }

    pub fn liabilities(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter().filter(|account| account.is_liability())
    }

    pub fn total_assets(&self) -> f64 {
        self.assets().map(|account| account.balance).sum()
    }

    pub fn total_liabilities(&self) -> f64 {
        self.liabilities().map(|account| account.balance).sum()
    }

    pub fn net_worth(&self) -> f64 {
        self.total_assets() - self.total_liabilities()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::AccountCategory;

    #[test]
    fn totals_split_by_kind() {
        let mut ledger = Ledger::new("Household");
        ledger.add_account(Account::new("Checking", AccountCategory::Checking, 2847.63));
        ledger.add_account(Account::new("Savings", AccountCategory::Savings, 8500.0));
        ledger.add_account(Account::new("Card", AccountCategory::CreditCard, 1245.80));

        assert!((ledger.total_assets() - 11347.63).abs() < 1e-9);
        assert!((ledger.total_liabilities() - 1245.80).abs() < 1e-9);
        assert!((ledger.net_worth() - 10101.83).abs() < 1e-9);
    }

    #[test]
    fn missing_schema_version_defaults_to_current() {
        let ledger = Ledger::new("Legacy");
        let mut json = serde_json::to_value(&ledger).unwrap();
        let object = json.as_object_mut().unwrap();
        object.remove("schema_version");
        object.remove("recurring");
        let back: Ledger = serde_json::from_value(json).unwrap();
        assert_eq!(back.schema_version, CURRENT_SCHEMA_VERSION);
        assert!(back.recurring.is_empty());
    }
}
