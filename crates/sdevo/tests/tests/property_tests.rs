#[path = "property/normalization.rs"]
mod normalization;

#[path = "property/population_order.rs"]
mod population_order;

#[path = "property/crossover_law.rs"]
mod crossover_law;

#[path = "property/fill_size.rs"]
mod fill_size;

#[path = "property/growth_units.rs"]
mod growth_units;
