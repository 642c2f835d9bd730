pub mod payoff;
pub mod services;
