// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes formulas for European calls
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model, the underlying asset follows:
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//!
//! The risk-neutral pricing formula gives:
//! ```text
//! V(S,t) = e^(-r(T-t)) * E^Q[payoff(S_T) | S_t = S]
//! ```
//!
//! These closed forms serve as the reference the Monte Carlo estimate
//! converges to.

use crate::math_utils::norm_cdf;

/// Black-Scholes European call option price
///
/// # Formula
/// ```text
/// C(S,K,r,σ,T) = S*Φ(d₁) - K*e^(-rT)*Φ(d₂)
/// ```
///
/// Where:
/// ```text
/// d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T)
/// d₂ = d₁ - σ√T
/// ```
///
/// # Parameters
/// - `s`: Current stock price
/// - `k`: Strike price
/// - `r`: Risk-free rate
/// - `sigma`: Volatility
/// - `t`: Time to expiration
///
/// # Returns
/// Present value of the call option. With `sigma == 0` the terminal price is
/// deterministic and the intrinsic value of the forward is returned.
pub fn bs_call_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    if sigma == 0.0 || t == 0.0 {
        return (s - k * (-r * t).exp()).max(0.0);
    }
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt());
    let d2 = d1 - sigma * t.sqrt();
    s * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2)
}

/// Undiscounted risk-neutral expectation E[max(S_T - K, 0)]
pub fn expected_call_payoff(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    bs_call_price(s, k, r, sigma, t) * (r * t).exp()
}
