// Slate model - shared data model for the lineup portfolio engine

mod config;
mod error;
mod lineup;
mod pool;
mod roster;
mod types;

pub use config::{ObjectiveField, RelaxationStep, RunConfig};
pub use error::{ConfigError, PoolError};
pub use lineup::{Lineup, LineupSlot};
pub use pool::PlayerPool;
pub use roster::{RosterSlot, RosterTemplate};
pub use types::{ParsePositionError, Player, PlayerId, Position};
