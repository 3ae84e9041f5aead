//! Option Payoff Functions
//!
//! # Mathematical Definitions
//!
//! - **European call**: max(S_T - K, 0), the right to buy at strike K
//! - **Discounted payoff**: payoff * DF, present value under a fixed
//!   discount factor DF
//!
//! Only the terminal price enters a European payoff, so these functions take
//! `S_T` directly rather than a full path.

/// European call payoff: max(S_T - K, 0)
///
/// A `NaN` terminal price yields 0; infinite prices pass through.
pub fn call_payoff(terminal_price: f64, strike: f64) -> f64 {
    (terminal_price - strike).max(0.0)
}

/// European call payoff scaled by the discount factor
pub fn discounted_call_payoff(terminal_price: f64, strike: f64, discount_factor: f64) -> f64 {
    call_payoff(terminal_price, strike) * discount_factor
}
