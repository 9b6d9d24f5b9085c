#![deny(unsafe_code)]
//! # sdevo-engine
//!
//! The population evolution controller.
//!
//! An [`Engine`] owns a seed population, the population being evolved, the
//! evolutionary parameters and one seeded [`RandomStream`]. Every stochastic
//! decision (parent choice, crossover genes, cell mutation, equation growth)
//! draws from that one stream in a fixed order, so two engines built from the
//! same configuration and driven the same way produce identical populations.
//!
//! ```text
//! evolve(n):  fill ─► [kill ─► fill] × n
//! fill:       crossover (p = crossover_probability) or copy + mutate
//! kill:       drop round(len × kill_fraction) models from the tail
//! ```
//!
//! Engines persist to a directory ([`store`]), can be seeded from a JSON
//! [`ModelTemplate`], and can run repeated seeded runs that append to a
//! fitness report ([`Engine::stochastic_run`]).

pub mod config;
pub mod engine;
pub mod error;
pub mod growth;
pub mod operators;
pub mod random;
pub mod stochastic;
pub mod store;
pub mod telemetry;
pub mod template;

pub use config::{EngineConfig, GrowthConfig};
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use growth::grow_equation;
pub use operators::{cross_over, mutate};
pub use random::RandomStream;
pub use telemetry::{init_tracing, TelemetryConfig};
pub use template::{ModelTemplate, NodeType, VariableTemplate};
