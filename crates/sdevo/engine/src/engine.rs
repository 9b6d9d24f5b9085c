//! The population evolution controller.

use std::fmt;
use std::sync::Arc;

use sdevo_formulation::{FormulationSandbox, InterpreterSandbox};
use sdevo_genome::{Model, Population};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::operators::{cross_over, mutate};
use crate::random::RandomStream;

/// Evolves a copy of a seed population.
///
/// `input` is never modified after construction. `output` is the population
/// being evolved; [`Engine::reset`] replaces it with a fresh copy of `input`
/// and rewinds the random stream.
pub struct Engine {
    config: EngineConfig,
    input: Population,
    output: Population,
    rng: RandomStream,
    sandbox: Arc<dyn FormulationSandbox>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("input", &self.input.len())
            .field("output", &self.output.len())
            .field("seed", &self.rng.seed())
            .finish_non_exhaustive()
    }
}

fn default_sandbox(config: &EngineConfig) -> Arc<dyn FormulationSandbox> {
    Arc::new(InterpreterSandbox {
        scratch_dir: config.scratch_dir.clone(),
    })
}

impl Engine {
    /// An engine seeded with an already-ranked population.
    pub fn new(config: EngineConfig, input: Population) -> EngineResult<Self> {
        config.validate()?;
        if input.is_empty() {
            return Err(EngineError::EmptyPopulation);
        }
        tracing::info!(
            seed = config.random_seed,
            population_size = config.population_size,
            seed_models = input.len(),
            "engine created"
        );
        Ok(Self {
            rng: RandomStream::new(config.random_seed),
            sandbox: default_sandbox(&config),
            output: input.clone(),
            input,
            config,
        })
    }

    /// Validate, evaluate and rank `models`, then seed an engine with them.
    pub fn from_models(
        config: EngineConfig,
        models: impl IntoIterator<Item = Model>,
    ) -> EngineResult<Self> {
        let models: Vec<Model> = models.into_iter().collect();
        for model in &models {
            model.validate()?;
        }
        let sandbox = default_sandbox(&config);
        let input = Population::from_models(models, &*sandbox);
        Self::new(config, input)
    }

    /// Evaluate system-dynamics models with `sandbox` from now on.
    pub fn with_sandbox(mut self, sandbox: Arc<dyn FormulationSandbox>) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn input(&self) -> &Population {
        &self.input
    }

    pub fn output(&self) -> &Population {
        &self.output
    }

    pub fn sandbox(&self) -> &dyn FormulationSandbox {
        &*self.sandbox
    }

    pub fn random_stream(&self) -> &RandomStream {
        &self.rng
    }

    /// Fitness of the best evolved model.
    pub fn best_fitness(&self) -> f64 {
        self.output.fitness()
    }

    /// Use `seed` from now on; the stream restarts from it.
    pub fn set_random_seed(&mut self, seed: u64) {
        self.config.random_seed = seed;
        self.rng.reseed(seed);
    }

    /// Grow `output` back to the configured size from its current members.
    /// An empty population stays empty.
    pub fn fill(&mut self) {
        let competitive = self.output.len();
        if competitive == 0 {
            return;
        }
        while self.output.len() < self.config.population_size {
            let Some(child) = self.offspring(competitive) else {
                break;
            };
            self.output.insert(child, &*self.sandbox);
        }
    }

    fn offspring(&mut self, competitive: usize) -> Option<Model> {
        if self.rng.probability() <= self.config.crossover_probability {
            let first = self.rng.index(competitive);
            let second = self.rng.index(competitive);
            let a = self.output.get(first)?;
            let b = self.output.get(second)?;
            Some(cross_over(a, b, &mut self.rng))
        } else {
            let index = self.rng.index(competitive);
            let mut child = self.output.get(index)?.clone();
            mutate(
                &mut child,
                self.config.mutation_probability_for_cells,
                &self.config.growth,
                &mut self.rng,
            );
            Some(child)
        }
    }

    /// Remove the worst models from the tail.
    pub fn kill(&mut self) {
        for _ in 0..self.config.kill_count(self.output.len()) {
            self.output.pop_worst();
        }
    }

    /// Fill once, then kill and fill `steps` times.
    pub fn evolve(&mut self, steps: usize) {
        tracing::info!(steps, population = self.output.len(), "evolve started");
        self.fill();
        for generation in 1..=steps {
            self.kill();
            self.fill();
            tracing::info!(generation, best_fitness = self.best_fitness(), "generation complete");
        }
        tracing::info!(best_fitness = self.best_fitness(), "evolve finished");
    }

    /// Replace `output` with a copy of `input` and rewind the random stream.
    pub fn reset(&mut self) {
        self.output = self.input.clone();
        self.rng.rewind();
    }

    pub(crate) fn replace_output(&mut self, output: Population) {
        self.output = output;
    }
}
