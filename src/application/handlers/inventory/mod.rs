//! Genetics and seed-bank command handlers.

mod add_seed;
mod adjust_clone_stock;
mod delete_genetic;
mod delete_seed;
mod germinate_seeds;
mod save_genetic;

pub use add_seed::{AddSeedCommand, AddSeedError, AddSeedHandler, AddSeedResult};
pub use adjust_clone_stock::{
    AdjustCloneStockCommand, AdjustCloneStockError, AdjustCloneStockHandler,
};
pub use delete_genetic::{DeleteGeneticCommand, DeleteGeneticError, DeleteGeneticHandler};
pub use delete_seed::{DeleteSeedCommand, DeleteSeedError, DeleteSeedHandler};
pub use germinate_seeds::{
    GerminateSeedsCommand, GerminateSeedsError, GerminateSeedsHandler, GerminateSeedsResult,
};
pub use save_genetic::{SaveGeneticCommand, SaveGeneticError, SaveGeneticHandler, SaveGeneticResult};
