//! Repeated seeded runs with a fitness report.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::engine::Engine;
use crate::error::EngineResult;

pub const FITNESS_REPORT: &str = "Fitness.txt";
pub const FITNESS_HEADER: &str = "GA Run, GA Steps, Model Index, Fitness Value";

/// Directory a stochastic run's engine is written to.
pub fn run_dir_name(run: usize) -> String {
    format!("engine_run_{run}")
}

impl Engine {
    /// Evolve `runs` independent runs of `steps_per_run` generations.
    ///
    /// Run `r` (from 1) uses random seed `r` and starts from the seed
    /// population. After every generation each model's fitness is appended
    /// to `Fitness.txt` as `run, step, index, fitness` with a 1-based model
    /// index. After every run the engine is written to `engine_run_<r>`.
    pub fn stochastic_run(
        &mut self,
        output_dir: impl AsRef<Path>,
        runs: usize,
        steps_per_run: usize,
    ) -> EngineResult<()> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)?;
        let mut report = BufWriter::new(File::create(output_dir.join(FITNESS_REPORT))?);
        writeln!(report, "{FITNESS_HEADER}")?;

        for run in 1..=runs {
            self.set_random_seed(run as u64);
            self.reset();

            for step in 1..=steps_per_run {
                self.evolve(1);
                for (index, fitness) in self.output().fitness_values().iter().enumerate() {
                    writeln!(report, "{}, {}, {}, {:?}", run, step, index + 1, fitness)?;
                }
                report.flush()?;
            }

            self.write(output_dir.join(run_dir_name(run)))?;
            tracing::info!(run, runs, best_fitness = self.best_fitness(), "stochastic run complete");
        }
        Ok(())
    }
}
