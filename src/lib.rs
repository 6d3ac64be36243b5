pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::sqlite::SqliteStore;
pub use crate::core::{
    batch::BatchImporter, prompt::Prompter, session::ConsoleSession, ClassificationLabel,
    ConsumptionTracker, Evaluation,
};
pub use utils::error::{HydroError, Result};
