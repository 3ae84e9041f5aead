// src/mc/mc_engine.rs
//! Monte Carlo engine for European calls
//!
//! Every path writes its discounted payoff into its own slot of one vector,
//! which is then averaged. Two interchangeable strategies fill the vector:
//! - **Serial**: seeds in order on the calling thread
//! - **Parallel**: a [`WorkerPool`] of `workers` threads, each owning one
//!   contiguous range of slots; the scope join is the barrier before the
//!   average is taken
//!
//! [`run_comparison`] times both strategies. The pool is built before the
//! parallel timer starts, so thread start-up is not part of its duration.

use crate::analytics::bs_analytic::expected_call_payoff;
use crate::error::{validation::*, SdeError, SdeResult};
use crate::math_utils::{timed, TimerEvent};
use crate::mc::partition;
use crate::mc::payoffs::discounted_call_payoff;
use crate::models::gbm::{Gbm, StepSchedule};
use crate::rng::SeedTable;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct McConfig {
    pub spot: f64,
    pub risk_free_rate: f64,
    pub volatility: f64,
    pub strike: f64,
    pub num_steps: usize,
    pub num_paths: usize,
    pub discount_factor: f64,
    pub workers: usize,
    pub schedule: StepSchedule,
}

impl McConfig {
    /// Validate the Monte Carlo configuration
    pub fn validate(&self) -> SdeResult<()> {
        validate_steps(self.num_steps)?;
        validate_paths(self.num_paths)?;
        validate_workers(self.num_paths, self.workers)?;
        validate_finite("spot", self.spot)?;
        validate_positive("spot", self.spot)?;
        validate_finite("risk_free_rate", self.risk_free_rate)?;
        validate_finite("volatility", self.volatility)?;
        validate_non_negative("volatility", self.volatility)?;
        validate_finite("strike", self.strike)?;
        validate_non_negative("strike", self.strike)?;
        validate_finite("discount_factor", self.discount_factor)?;
        validate_non_negative("discount_factor", self.discount_factor)?;
        Ok(())
    }

    /// Use the largest worker count that divides `num_paths` and does not
    /// exceed the number of logical CPUs
    pub fn with_available_workers(mut self) -> Self {
        let cap = num_cpus::get().max(1).min(self.num_paths.max(1));
        self.workers = (1..=cap)
            .rev()
            .find(|w| self.num_paths % w == 0)
            .unwrap_or(1);
        self
    }

    pub fn model(&self) -> Gbm {
        Gbm::new(self.spot, self.risk_free_rate, self.volatility, self.num_steps)
            .with_schedule(self.schedule)
    }

    /// Horizon in years covered by one path (1.0 for the nominal schedule)
    pub fn horizon(&self) -> f64 {
        self.schedule.updates(self.num_steps) as f64 / self.num_steps as f64
    }

    /// Closed-form value the average discounted payoff converges to
    pub fn analytic_reference(&self) -> f64 {
        expected_call_payoff(
            self.spot,
            self.strike,
            self.risk_free_rate,
            self.volatility,
            self.horizon(),
        ) * self.discount_factor
    }

    /// Discounted call payoff of the path driven by `seed`
    pub fn discounted_payoff(&self, seed: u64) -> f64 {
        let s_t = self.model().terminal_price(seed);
        discounted_call_payoff(s_t, self.strike, self.discount_factor)
    }
}

impl Default for McConfig {
    fn default() -> Self {
        McConfig {
            spot: 219.0,
            risk_free_rate: 0.05,
            volatility: 0.5,
            strike: 250.0,
            num_steps: 365 * 2,
            num_paths: 100_000,
            discount_factor: 0.9,
            workers: 10,
            schedule: StepSchedule::Nominal,
        }
    }
}

/// Execution strategy for the path reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Serial,
    Parallel,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Serial => write!(f, "serial"),
            Strategy::Parallel => write!(f, "parallel"),
        }
    }
}

/// Result of averaging the discounted payoffs of every path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct McOutcome {
    pub average_payoff: f64,
    /// Sample standard deviation of the discounted payoffs over √paths
    pub standard_error: f64,
    pub paths: usize,
}

/// Fixed-size pool of worker threads for the parallel strategy
pub struct WorkerPool {
    pool: ThreadPool,
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> SdeResult<Self> {
        if workers == 0 {
            return Err(SdeError::InvalidConfiguration {
                field: "workers".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("mc-worker-{}", i))
            .build()
            .map_err(|e| SdeError::InvalidConfiguration {
                field: "workers".to_string(),
                reason: format!("failed to build worker pool: {}", e),
            })?;
        debug!(workers, "worker pool started");
        Ok(WorkerPool { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Fill `out` with `eval(seed)` for every seed
    ///
    /// Worker `w` owns exactly the slots of the `w`-th contiguous range; all
    /// workers are joined before this returns.
    fn fill<F>(&self, out: &mut [f64], seeds: &[u64], eval: F) -> SdeResult<()>
    where
        F: Fn(u64) -> f64 + Sync,
    {
        let paths = out.len();
        validate_paths(paths)?;
        let ranges = partition::partition(paths, self.workers)?;
        let chunk = ranges[0].len();

        debug!(workers = self.workers, chunk, "dispatching workers");
        let eval = &eval;
        let joined = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.scope(|s| {
                for (worker, (slots, range)) in out.chunks_mut(chunk).zip(ranges).enumerate() {
                    let chunk_seeds = &seeds[range];
                    s.spawn(move |_| {
                        for (slot, &seed) in slots.iter_mut().zip(chunk_seeds) {
                            *slot = eval(seed);
                        }
                        debug!(worker, "worker finished");
                    });
                }
            })
        }));

        joined.map_err(|payload| SdeError::MonteCarloError {
            paths,
            reason: format!("worker panicked: {}", panic_message(&*payload)),
        })
    }
}

/// Discounted payoff of every path, one slot per seed
///
/// The parallel strategy builds a [`WorkerPool`] of `cfg.workers` threads for
/// this call; use [`discounted_payoffs_on`] to reuse an existing pool.
///
/// # Errors
///
/// Returns `SdeError` if the configuration is invalid, if `seeds` does not
/// hold exactly `num_paths` entries, or if a parallel worker fails. A failed
/// worker aborts the whole run; partially filled vectors are never returned.
pub fn discounted_payoffs(
    cfg: &McConfig,
    seeds: &SeedTable,
    strategy: Strategy,
) -> SdeResult<Vec<f64>> {
    match strategy {
        Strategy::Serial => fill_payoffs(cfg, seeds, None),
        Strategy::Parallel => {
            cfg.validate()?;
            let pool = WorkerPool::new(cfg.workers)?;
            fill_payoffs(cfg, seeds, Some(&pool))
        }
    }
}

/// Discounted payoff of every path, computed on `pool`
pub fn discounted_payoffs_on(
    pool: &WorkerPool,
    cfg: &McConfig,
    seeds: &SeedTable,
) -> SdeResult<Vec<f64>> {
    fill_payoffs(cfg, seeds, Some(pool))
}

fn fill_payoffs(
    cfg: &McConfig,
    seeds: &SeedTable,
    pool: Option<&WorkerPool>,
) -> SdeResult<Vec<f64>> {
    cfg.validate()?;
    if seeds.len() != cfg.num_paths {
        return Err(SdeError::InvalidConfiguration {
            field: "seeds".to_string(),
            reason: format!(
                "seed table holds {} entries but {} paths are configured",
                seeds.len(),
                cfg.num_paths
            ),
        });
    }

    let model = cfg.model();
    let eval = |seed: u64| {
        discounted_call_payoff(model.terminal_price(seed), cfg.strike, cfg.discount_factor)
    };

    let mut payoffs = vec![0.0; cfg.num_paths];
    match pool {
        None => fill_serial(&mut payoffs, seeds.as_slice(), eval),
        Some(pool) => {
            if pool.workers() != cfg.workers {
                return Err(SdeError::InvalidConfiguration {
                    field: "workers".to_string(),
                    reason: format!(
                        "pool runs {} workers but {} are configured",
                        pool.workers(),
                        cfg.workers
                    ),
                });
            }
            pool.fill(&mut payoffs, seeds.as_slice(), eval)?
        }
    }
    Ok(payoffs)
}

/// Monte Carlo price of a European call: the mean discounted payoff
///
/// # Math Framework
///
/// Each path follows the exact GBM recursion
/// ```text
/// S_{t+dt} = S_t * exp((r - σ²/2)dt + σ√dt * Z),   dt = 1 / num_steps
/// ```
/// and contributes `DF * max(S_T - K, 0)`. The estimate is the arithmetic
/// mean over all paths, summed in path order so that both strategies return
/// identical results for the same seed table.
pub fn price_all_paths(
    cfg: &McConfig,
    seeds: &SeedTable,
    strategy: Strategy,
) -> SdeResult<McOutcome> {
    let payoffs = discounted_payoffs(cfg, seeds, strategy)?;
    Ok(reduce(&payoffs, strategy))
}

pub fn price_serial(cfg: &McConfig, seeds: &SeedTable) -> SdeResult<McOutcome> {
    price_all_paths(cfg, seeds, Strategy::Serial)
}

pub fn price_parallel(cfg: &McConfig, seeds: &SeedTable) -> SdeResult<McOutcome> {
    price_all_paths(cfg, seeds, Strategy::Parallel)
}

/// Parallel strategy on an existing pool
pub fn price_parallel_on(
    pool: &WorkerPool,
    cfg: &McConfig,
    seeds: &SeedTable,
) -> SdeResult<McOutcome> {
    let payoffs = discounted_payoffs_on(pool, cfg, seeds)?;
    Ok(reduce(&payoffs, Strategy::Parallel))
}

fn reduce(payoffs: &[f64], strategy: Strategy) -> McOutcome {
    let outcome = summarize(payoffs);
    debug!(
        %strategy,
        paths = outcome.paths,
        average = outcome.average_payoff,
        std_err = outcome.standard_error,
        "paths reduced"
    );
    outcome
}

/// Outcomes and wall-clock durations of both strategies
#[derive(Debug, Clone, Copy)]
pub struct Comparison {
    pub serial: McOutcome,
    pub serial_elapsed: Duration,
    pub parallel: McOutcome,
    pub parallel_elapsed: Duration,
}

impl Comparison {
    pub fn speedup(&self) -> f64 {
        self.serial_elapsed.as_secs_f64() / self.parallel_elapsed.as_secs_f64()
    }
}

/// Price with the serial and then the parallel strategy, timing each run
///
/// Timer start/finish events are forwarded to `report`. The worker pool is
/// started before either timer runs.
pub fn run_comparison<R>(
    cfg: &McConfig,
    seeds: &SeedTable,
    mut report: R,
) -> SdeResult<Comparison>
where
    R: FnMut(TimerEvent<'_>),
{
    cfg.validate()?;
    let pool = WorkerPool::new(cfg.workers)?;

    let (serial, serial_elapsed) = timed("serial", &mut report, || price_serial(cfg, seeds));
    let serial = serial?;

    let (parallel, parallel_elapsed) =
        timed("parallel", &mut report, || price_parallel_on(&pool, cfg, seeds));
    let parallel = parallel?;

    let comparison = Comparison {
        serial,
        serial_elapsed,
        parallel,
        parallel_elapsed,
    };
    info!(
        workers = cfg.workers,
        speedup = comparison.speedup(),
        "strategy comparison finished"
    );
    Ok(comparison)
}

fn fill_serial<F>(out: &mut [f64], seeds: &[u64], eval: F)
where
    F: Fn(u64) -> f64,
{
    for (slot, &seed) in out.iter_mut().zip(seeds) {
        *slot = eval(seed);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn summarize(payoffs: &[f64]) -> McOutcome {
    let paths = payoffs.len();
    let n = paths as f64;
    let average_payoff = payoffs.iter().sum::<f64>() / n;
    let standard_error = if paths > 1 {
        let variance = payoffs
            .iter()
            .map(|p| (p - average_payoff).powi(2))
            .sum::<f64>()
            / (n - 1.0);
        (variance / n).sqrt()
    } else {
        0.0
    };

    McOutcome {
        average_payoff,
        standard_error,
        paths,
    }
}
