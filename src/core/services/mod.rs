pub mod effect_service;
pub mod envelope_service;
pub mod net_worth_service;
pub mod payoff_service;
pub mod recurring_service;
pub mod transaction_service;

pub use effect_service::{EffectReport, EffectService, EffectSlot, EnvelopeOverdraft, UnresolvedRef};
pub use envelope_service::{Allocation, AllocationReport, EnvelopeService};
pub use net_worth_service::NetWorthService;
pub use payoff_service::PayoffService;
pub use recurring_service::{RecurringRun, RecurringService, RecurringTotals};
pub use transaction_service::TransactionService;

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Invalid(String),
}
