pub mod batch;
pub mod prompt;
pub mod session;

pub use crate::domain::model::{ClassificationLabel, ConsumptionTracker, Evaluation};
pub use crate::domain::ports::{NeighborhoodStore, SessionSettings, StoreSettings};
pub use crate::utils::error::Result;
