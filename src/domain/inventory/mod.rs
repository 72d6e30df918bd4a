//! Inventory module - Genetics with clone stock and the seed bank.

mod genetic;
mod seed;

pub use genetic::{Genetic, GeneticDetails};
pub use seed::{Seed, SeedDetails};
