use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::FormulationResult;
use crate::formulation::Formulation;
use crate::source::FormulationSource;

/// Trait for formulation build-and-run backends.
///
/// Every evaluation must own its built formulation outright. Nothing built
/// for one model may be visible to the next, so evaluations can be repeated
/// thousands of times per run without accumulating state.
pub trait FormulationSandbox: Send + Sync {
    /// Build a steppable formulation from synthesized source.
    fn build(&self, source: &FormulationSource, step_size: f64) -> FormulationResult<Formulation>;

    /// Build, step `step_count` times and return the fitness.
    fn evaluate(
        &self,
        source: &FormulationSource,
        step_size: f64,
        step_count: usize,
    ) -> FormulationResult<f64> {
        let mut formulation = self.build(source, step_size)?;
        formulation.run(step_count);
        formulation.calculate_fitness()
    }
}

/// The in-process interpreter backend.
///
/// When a scratch directory is configured the rendered program is written to
/// a uniquely named file there for the lifetime of the evaluation, which is
/// handy when inspecting a failing model. The file is removed when the
/// evaluation finishes, whether it succeeded or not.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InterpreterSandbox {
    pub scratch_dir: Option<PathBuf>,
}

impl InterpreterSandbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    fn stage(&self, source: &FormulationSource) -> FormulationResult<Option<NamedTempFile>> {
        let Some(dir) = &self.scratch_dir else {
            return Ok(None);
        };
        std::fs::create_dir_all(dir)?;
        let mut artifact = tempfile::Builder::new()
            .prefix("formulation-")
            .suffix(".sdf")
            .tempfile_in(dir)?;
        write!(artifact, "{}", source)?;
        artifact.flush()?;
        tracing::trace!(path = %artifact.path().display(), "staged formulation artifact");
        Ok(Some(artifact))
    }
}

impl FormulationSandbox for InterpreterSandbox {
    fn build(&self, source: &FormulationSource, step_size: f64) -> FormulationResult<Formulation> {
        let _artifact = self.stage(source)?;
        Formulation::compile(source, step_size)
    }

    fn evaluate(
        &self,
        source: &FormulationSource,
        step_size: f64,
        step_count: usize,
    ) -> FormulationResult<f64> {
        let _artifact = self.stage(source)?;
        let mut formulation = Formulation::compile(source, step_size)?;
        formulation.run(step_count);
        formulation.calculate_fitness()
    }
}
