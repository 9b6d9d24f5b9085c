//! Engine configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};
use crate::telemetry::TelemetryConfig;

/// Operator probabilities for equation growth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Upper bound of the number of terms in one grown sub-expression
    pub maximum_new_term_count: usize,

    pub addition_probability: f64,
    pub subtraction_probability: f64,
    pub multiplication_probability: f64,

    /// Probability of adding a compatible sub-expression to the formula
    pub accumulate_add_probability: f64,

    /// Probability of subtracting a compatible sub-expression from the formula
    pub accumulate_subtract_probability: f64,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            maximum_new_term_count: 5,
            addition_probability: 0.10,
            subtraction_probability: 0.10,
            multiplication_probability: 0.40,
            accumulate_add_probability: 0.33333,
            accumulate_subtract_probability: 0.33333,
        }
    }
}

impl GrowthConfig {
    pub fn with_maximum_new_term_count(mut self, count: usize) -> Self {
        self.maximum_new_term_count = count;
        self
    }

    pub fn with_operator_probabilities(mut self, add: f64, sub: f64, mul: f64) -> Self {
        self.addition_probability = add;
        self.subtraction_probability = sub;
        self.multiplication_probability = mul;
        self
    }

    pub fn with_accumulate_probabilities(mut self, add: f64, sub: f64) -> Self {
        self.accumulate_add_probability = add;
        self.accumulate_subtract_probability = sub;
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.maximum_new_term_count == 0 {
            return Err(EngineError::InvalidConfig(
                "maximum_new_term_count must be at least 1".into(),
            ));
        }
        check_probability("addition_probability", self.addition_probability)?;
        check_probability("subtraction_probability", self.subtraction_probability)?;
        check_probability("multiplication_probability", self.multiplication_probability)?;
        check_probability("accumulate_add_probability", self.accumulate_add_probability)?;
        check_probability(
            "accumulate_subtract_probability",
            self.accumulate_subtract_probability,
        )?;

        let operators =
            self.addition_probability + self.subtraction_probability + self.multiplication_probability;
        if operators > 1.0 {
            return Err(EngineError::InvalidConfig(format!(
                "operator probabilities sum to {operators}, above 1"
            )));
        }
        let accumulate = self.accumulate_add_probability + self.accumulate_subtract_probability;
        if accumulate > 1.0 {
            return Err(EngineError::InvalidConfig(format!(
                "accumulate probabilities sum to {accumulate}, above 1"
            )));
        }
        Ok(())
    }
}

/// Evolution parameters of one engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub random_seed: u64,
    pub population_size: usize,

    /// Share of the population removed from the tail on each kill
    pub kill_fraction: f64,

    pub crossover_probability: f64,
    pub mutation_probability_for_cells: f64,

    /// Where rendered formulations are staged during evaluation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,

    pub growth: GrowthConfig,
    pub telemetry: TelemetryConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            random_seed: 43,
            population_size: 100,
            kill_fraction: 0.5,
            crossover_probability: 0.5,
            mutation_probability_for_cells: 0.1,
            scratch_dir: None,
            growth: GrowthConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_kill_fraction(mut self, fraction: f64) -> Self {
        self.kill_fraction = fraction;
        self
    }

    pub fn with_crossover_probability(mut self, probability: f64) -> Self {
        self.crossover_probability = probability;
        self
    }

    pub fn with_mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability_for_cells = probability;
        self
    }

    pub fn with_growth(mut self, growth: GrowthConfig) -> Self {
        self.growth = growth;
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Number of models one kill removes from a population of `len`.
    pub fn kill_count(&self, len: usize) -> usize {
        ((len as f64 * self.kill_fraction).round() as usize).min(len)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.population_size == 0 {
            return Err(EngineError::InvalidConfig(
                "population_size must be at least 1".into(),
            ));
        }
        if !(self.kill_fraction > 0.0 && self.kill_fraction < 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "kill_fraction must be in (0, 1), got {}",
                self.kill_fraction
            )));
        }
        check_probability("crossover_probability", self.crossover_probability)?;
        check_probability(
            "mutation_probability_for_cells",
            self.mutation_probability_for_cells,
        )?;
        self.growth.validate()
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> EngineResult<Self> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        std::fs::write(path.as_ref(), toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn check_probability(name: &str, value: f64) -> EngineResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::InvalidConfig(format!(
            "{name} must be in [0, 1], got {value}"
        )))
    }
}
