//! Property tests: fill reaches the configured size, kill removes the
//! rounded fraction, and runs are reproducible from the seed.

use proptest::prelude::*;
use sdevo_engine::{Engine, EngineConfig};
use sdevo_tests::single_row_maximum;

fn engine(size: usize, seed: u64) -> Engine {
    Engine::from_models(
        EngineConfig::default()
            .with_population_size(size)
            .with_random_seed(seed),
        [single_row_maximum()],
    )
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn fill_reaches_population_size(size in 1usize..30, seed in any::<u64>()) {
        let mut engine = engine(size, seed);
        engine.fill();
        prop_assert_eq!(engine.output().len(), size);
    }

    #[test]
    fn kill_then_fill_restores_size(size in 2usize..30, seed in any::<u64>()) {
        let mut engine = engine(size, seed);
        engine.fill();
        engine.kill();
        let expected_kept = size - (size as f64 / 2.0).round() as usize;
        prop_assert_eq!(engine.output().len(), expected_kept);
        engine.fill();
        prop_assert_eq!(engine.output().len(), size);
    }

    #[test]
    fn same_seed_same_run(size in 2usize..16, seed in any::<u64>(), steps in 0usize..4) {
        let mut a = engine(size, seed);
        let mut b = engine(size, seed);
        a.evolve(steps);
        b.evolve(steps);
        prop_assert_eq!(a.output(), b.output());
    }
}
