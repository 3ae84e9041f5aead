// scripts/price_european_call.rs
use gbm_call_mc::math_utils::print_timer_event;
use gbm_call_mc::mc::mc_engine::{run_comparison, McConfig};
use gbm_call_mc::output::write_report;
use gbm_call_mc::rng::generate_seeds;
use gbm_call_mc::SdeError;
use std::io;
use std::process;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn run() -> Result<(), SdeError> {
    let config = McConfig::default();
    config.validate()?;
    info!(
        spot = config.spot,
        strike = config.strike,
        rate = config.risk_free_rate,
        vol = config.volatility,
        steps = config.num_steps,
        paths = config.num_paths,
        workers = config.workers,
        "pricing European call"
    );

    let seeds = generate_seeds(config.num_paths)?;
    let comparison = run_comparison(&config, &seeds, print_timer_event)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &[&comparison.serial, &comparison.parallel]).map_err(|e| {
        SdeError::MonteCarloError {
            paths: comparison.serial.paths,
            reason: format!("failed to write result: {}", e),
        }
    })?;

    info!(
        serial_std_err = comparison.serial.standard_error,
        parallel_std_err = comparison.parallel.standard_error,
        analytic = config.analytic_reference(),
        speedup = comparison.speedup(),
        "done"
    );
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
