//! # gbm-call-mc: Monte Carlo Pricing of European Calls
//!
//! Prices a European call by simulating Geometric Brownian Motion paths and
//! averaging their discounted terminal payoffs.
//!
//! ## Pipeline
//!
//! - **Seeds**: one independent `u64` per path, drawn once up front
//!   ([`rng::SeedTable`])
//! - **Paths**: each seed drives a private random stream through the exact
//!   GBM step ([`models::gbm::Gbm`])
//! - **Reduction**: discounted payoffs land in one slot per path, filled
//!   serially or by a fixed pool of workers owning disjoint contiguous
//!   ranges, then averaged ([`mc::mc_engine`])
//!
//! ## Quick Start
//!
//! ```rust
//! use gbm_call_mc::mc::mc_engine::{price_parallel, price_serial, McConfig};
//! use gbm_call_mc::rng::SeedTable;
//!
//! let config = McConfig {
//!     num_paths: 1_000,
//!     num_steps: 52,
//!     workers: 4,
//!     ..Default::default()
//! };
//!
//! let seeds = SeedTable::seeded(config.num_paths, 42);
//! let serial = price_serial(&config, &seeds).expect("Valid configuration");
//! let parallel = price_parallel(&config, &seeds).expect("Valid configuration");
//! assert_eq!(serial.average_payoff, parallel.average_payoff);
//! ```

pub mod analytics;
pub mod error;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod output;
pub mod rng;

pub use error::{SdeError, SdeResult};
