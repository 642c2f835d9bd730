//! Debt payoff projection: strategy ordering and month-by-month simulation.

pub mod engine;
pub mod order;
pub mod types;

pub use engine::PayoffEngine;
pub use order::{ordered_snapshots, payoff_order, sort_by_strategy};
pub use types::{
    DebtBalance, DebtOutcome, DebtSnapshot, PayoffEstimate, Projection, ProjectionOutcome,
    ProjectionSettings, TimelineEntry, DEFAULT_HORIZON_MONTHS, PAID_OFF_EPSILON,
};
