//! Fitness-ordered populations.

use sdevo_formulation::FormulationSandbox;

use crate::model::Model;

/// Models kept sorted best-first by fitness.
///
/// Every insertion evaluates the model's fitness and places it after all
/// models whose fitness is greater than or equal to it, so equal-fitness
/// models keep their insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Population {
    models: Vec<Model>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert every model in order.
    pub fn from_models<S: FormulationSandbox + ?Sized>(
        models: impl IntoIterator<Item = Model>,
        sandbox: &S,
    ) -> Self {
        let mut population = Self::new();
        for model in models {
            population.insert(model, sandbox);
        }
        population
    }

    /// Evaluate `model` and insert it at its rank. Returns the index it landed at.
    pub fn insert<S: FormulationSandbox + ?Sized>(&mut self, mut model: Model, sandbox: &S) -> usize {
        let fitness = model.fitness_with(sandbox);
        // Cached fitness is never NaN, so total_cmp agrees with the usual order.
        let index = self.models.partition_point(|m| {
            let existing = m.cached_fitness().unwrap_or(f64::NEG_INFINITY);
            existing.total_cmp(&fitness).is_ge()
        });
        self.models.insert(index, model);
        index
    }

    /// Remove and return the worst model.
    pub fn pop_worst(&mut self) -> Option<Model> {
        self.models.pop()
    }

    pub fn best(&self) -> Option<&Model> {
        self.models.first()
    }

    /// Fitness of the best model, or negative infinity when empty.
    pub fn fitness(&self) -> f64 {
        self.best()
            .and_then(Model::cached_fitness)
            .unwrap_or(f64::NEG_INFINITY)
    }

    pub fn fitness_values(&self) -> Vec<f64> {
        self.models
            .iter()
            .map(|m| m.cached_fitness().unwrap_or(f64::NEG_INFINITY))
            .collect()
    }

    /// Normalize every model and rebuild the order from the fresh fitness.
    pub fn normalize<S: FormulationSandbox + ?Sized>(&mut self, sandbox: &S) {
        let models = std::mem::take(&mut self.models);
        for mut model in models {
            model.normalize();
            self.insert(model, sandbox);
        }
    }

    pub fn get(&self, index: usize) -> Option<&Model> {
        self.models.get(index)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Model> {
        self.models.iter()
    }

    pub fn into_models(self) -> Vec<Model> {
        self.models
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Model;
    type IntoIter = std::slice::Iter<'a, Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.iter()
    }
}
