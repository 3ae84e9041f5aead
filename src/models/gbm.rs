// src/models/gbm.rs
//! Geometric Brownian Motion path simulation
//!
//! Each path evolves from spot with the exact log-normal step
//! ```text
//! S_{t+dt} = S_t * exp((r - σ²/2) dt + σ √dt ε),   ε ~ N(0,1)
//! ```
//! with `dt = 1 / num_steps`. The normal draws come from the path's private
//! stream, so a seed fully determines the trajectory.

use crate::rng;
use tracing::trace;

/// Number of price updates applied per path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepSchedule {
    /// Exactly `num_steps` updates, consistent with `dt = 1 / num_steps`
    #[default]
    Nominal,
    /// `num_steps + 1` updates (loop bound inclusive of `num_steps`)
    Inclusive,
}

impl StepSchedule {
    pub fn updates(self, num_steps: usize) -> usize {
        match self {
            StepSchedule::Nominal => num_steps,
            StepSchedule::Inclusive => num_steps + 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Gbm {
    pub s0: f64,
    pub r: f64,
    pub sigma: f64,
    pub num_steps: usize,
    pub schedule: StepSchedule,
}

/// Simulated trajectory `[S_0, S_1, ..., S_T]`
#[derive(Debug, Clone, PartialEq)]
pub struct PricePath {
    prices: Vec<f64>,
}

impl PricePath {
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Last price of the path
    pub fn terminal(&self) -> f64 {
        // A path always holds at least the spot price.
        self.prices[self.prices.len() - 1]
    }
}

impl Gbm {
    pub fn new(s0: f64, r: f64, sigma: f64, num_steps: usize) -> Self {
        Gbm {
            s0,
            r,
            sigma,
            num_steps,
            schedule: StepSchedule::Nominal,
        }
    }

    pub fn with_schedule(mut self, schedule: StepSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn dt(&self) -> f64 {
        1.0 / self.num_steps as f64
    }

    pub fn exact_step(&self, s_t: f64, dt: f64, normal_draw: f64) -> f64 {
        s_t * ((self.r - 0.5 * self.sigma * self.sigma) * dt
            + self.sigma * dt.sqrt() * normal_draw)
            .exp()
    }

    /// Simulate the full path driven by `seed`
    pub fn simulate_path(&self, seed: u64) -> PricePath {
        let mut rng = rng::path_rng(seed);
        let dt = self.dt();
        let updates = self.schedule.updates(self.num_steps);

        let mut prices = Vec::with_capacity(updates + 1);
        prices.push(self.s0);

        let mut price = self.s0;
        for _ in 0..updates {
            let z = rng::get_normal_draw(&mut rng);
            price = self.exact_step(price, dt, z);
            prices.push(price);
        }

        trace!(seed, terminal = price, updates, "path simulated");
        PricePath { prices }
    }

    /// Terminal price of the path driven by `seed`
    pub fn terminal_price(&self, seed: u64) -> f64 {
        self.simulate_path(seed).terminal()
    }
}
