// tests/pricing_properties.rs
use gbm_call_mc::mc::mc_engine::{discounted_payoffs, McConfig, Strategy};
use gbm_call_mc::mc::payoffs::{call_payoff, discounted_call_payoff};
use gbm_call_mc::models::gbm::Gbm;
use gbm_call_mc::rng::SeedTable;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_same_seed_same_terminal_price(seed in any::<u64>(), sigma in 0.0f64..1.5) {
        let gbm = Gbm::new(219.0, 0.05, sigma, 50);
        prop_assert_eq!(gbm.terminal_price(seed), gbm.terminal_price(seed));
    }

    #[test]
    fn prop_payoff_is_floored(price in -1e6f64..1e6, strike in 0.0f64..1e4, df in 0.0f64..1.0) {
        prop_assert!(call_payoff(price, strike) >= 0.0);
        prop_assert!(discounted_call_payoff(price, strike, df) >= 0.0);
    }

    #[test]
    fn prop_payoff_boundary_at_strike(strike in 0u32..10_000, df in 0.0f64..1.0) {
        let strike = strike as f64;
        prop_assert_eq!(call_payoff(strike, strike), 0.0);
        prop_assert_eq!(discounted_call_payoff(strike + 1.0, strike, df), df);
    }

    #[test]
    fn prop_strategies_match_for_any_seed_table(base in any::<u64>(), workers in 1usize..6) {
        let cfg = McConfig {
            num_steps: 8,
            num_paths: workers * 20,
            workers,
            ..Default::default()
        };
        let seeds = SeedTable::seeded(cfg.num_paths, base);
        let serial = discounted_payoffs(&cfg, &seeds, Strategy::Serial).unwrap();
        let parallel = discounted_payoffs(&cfg, &seeds, Strategy::Parallel).unwrap();
        prop_assert_eq!(serial, parallel);
    }
}

#[test]
fn test_distinct_seeds_give_distinct_paths() {
    let gbm = Gbm::new(219.0, 0.05, 0.5, 100);
    let seeds = SeedTable::seeded(1_000, 3);
    let mut terminals: Vec<u64> = seeds
        .as_slice()
        .iter()
        .map(|&s| gbm.terminal_price(s).to_bits())
        .collect();
    terminals.sort_unstable();
    terminals.dedup();
    assert_eq!(terminals.len(), 1_000);
}
