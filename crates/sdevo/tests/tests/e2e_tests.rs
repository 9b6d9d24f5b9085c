#[path = "e2e/synthesis_scenarios.rs"]
mod synthesis_scenarios;

#[path = "e2e/formulation_bridge.rs"]
mod formulation_bridge;

#[path = "e2e/evolution_runs.rs"]
mod evolution_runs;

#[path = "e2e/persistence.rs"]
mod persistence;
