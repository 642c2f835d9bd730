#![doc(test(attr(deny(warnings))))]

//! Finflow core keeps a personal-finance ledger consistent: it applies and
//! reverses transaction effects on accounts and envelopes, and projects
//! debt payoff under avalanche or snowball strategies.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finflow core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
