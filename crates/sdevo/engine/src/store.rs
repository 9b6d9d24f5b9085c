//! Directory persistence for engines and models.
//!
//! ```text
//! <dir>/engine.toml
//! <dir>/input/model_1.json ... model_<n>.json
//! <dir>/output/model_1.json ... model_<n>.json
//! ```
//!
//! Models are numbered from 1 in rank order.

use std::fs;
use std::path::{Path, PathBuf};

use sdevo_genome::{Model, Population};

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::EngineResult;

pub const CONFIG_FILE: &str = "engine.toml";
pub const INPUT_DIR: &str = "input";
pub const OUTPUT_DIR: &str = "output";

const MODEL_PREFIX: &str = "model_";
const MODEL_EXTENSION: &str = "json";

/// Read and validate one model.
pub fn read_model(path: impl AsRef<Path>) -> EngineResult<Model> {
    let contents = fs::read_to_string(path.as_ref())?;
    let model: Model = serde_json::from_str(&contents)?;
    model.validate()?;
    Ok(model)
}

pub fn write_model(path: impl AsRef<Path>, model: &Model) -> EngineResult<()> {
    fs::write(path.as_ref(), serde_json::to_string_pretty(model)?)?;
    Ok(())
}

/// The model number of a `model_<k>.json` file name.
fn model_number(path: &Path) -> Option<usize> {
    if path.extension()? != MODEL_EXTENSION {
        return None;
    }
    path.file_stem()?
        .to_str()?
        .strip_prefix(MODEL_PREFIX)?
        .parse()
        .ok()
}

fn model_files(dir: &Path) -> EngineResult<Vec<(usize, PathBuf)>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if let Some(number) = model_number(&path) {
            files.push((number, path));
        }
    }
    files.sort_by_key(|(number, _)| *number);
    Ok(files)
}

/// Every model in `dir`, ordered by model number.
pub fn read_models(dir: impl AsRef<Path>) -> EngineResult<Vec<Model>> {
    model_files(dir.as_ref())?
        .into_iter()
        .map(|(_, path)| read_model(path))
        .collect()
}

/// Write `population` in rank order, replacing any models already in `dir`.
pub fn write_population(dir: impl AsRef<Path>, population: &Population) -> EngineResult<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    for (_, stale) in model_files(dir)? {
        fs::remove_file(stale)?;
    }
    for (index, model) in population.iter().enumerate() {
        let name = format!("{MODEL_PREFIX}{}.{MODEL_EXTENSION}", index + 1);
        write_model(dir.join(name), model)?;
    }
    Ok(())
}

impl Engine {
    /// Load the configuration and seed population from `dir`. The evolved
    /// population is loaded too when present, and is otherwise a copy of the
    /// seed population.
    pub fn read(dir: impl AsRef<Path>) -> EngineResult<Self> {
        let dir = dir.as_ref();
        let config = EngineConfig::load(dir.join(CONFIG_FILE))?;
        let mut engine = Engine::from_models(config, read_models(dir.join(INPUT_DIR))?)?;

        let output_dir = dir.join(OUTPUT_DIR);
        if output_dir.is_dir() {
            let models = read_models(&output_dir)?;
            let output = Population::from_models(models, engine.sandbox());
            engine.replace_output(output);
        }
        tracing::info!(dir = %dir.display(), models = engine.input().len(), "engine read");
        Ok(engine)
    }

    /// Write the configuration and both populations under `dir`.
    pub fn write(&self, dir: impl AsRef<Path>) -> EngineResult<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        self.config().save(dir.join(CONFIG_FILE))?;
        write_population(dir.join(INPUT_DIR), self.input())?;
        write_population(dir.join(OUTPUT_DIR), self.output())?;
        tracing::info!(dir = %dir.display(), models = self.output().len(), "engine written");
        Ok(())
    }
}
