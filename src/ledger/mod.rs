//! Ledger domain models: accounts, envelopes, transactions, recurring templates and the payoff plan.

pub mod account;
pub mod envelope;
pub mod frequency;
pub mod history;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod net_worth;
pub mod plan;
pub mod recurring;
pub mod transaction;

pub use account::{Account, AccountCategory, AccountKind, DebtTerms};
pub use envelope::Envelope;
pub use frequency::Frequency;
pub use history::{ContributionEntry, HistoryEntry, HistoryLog, PaymentEntry, WithdrawalEntry};
pub use ledger::{Ledger, CURRENT_SCHEMA_VERSION};
pub use net_worth::NetWorthSnapshot;
pub use plan::{DebtPayoffPlan, PayoffStrategy};
pub use recurring::RecurringTemplate;
pub use transaction::{ContributionType, Transaction, TransactionKind, TransactionType};
