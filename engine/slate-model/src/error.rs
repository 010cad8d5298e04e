//! Error types for the slate model

use crate::PlayerId;
use thiserror::Error;

/// Invalid run configuration. Fatal; reported before any solve is attempted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("lineup_count must be positive")]
    ZeroLineupCount,

    #[error("salary_cap must be positive")]
    ZeroSalaryCap,

    #[error("{field} must be within [0, 1], got {value}")]
    PercentOutOfRange { field: &'static str, value: f64 },

    #[error("roster template has no slots")]
    EmptyRoster,

    #[error("roster slot '{slot}' has an empty eligible position set")]
    EmptyEligibleSet { slot: String },

    #[error("duplicate roster slot name: '{slot}'")]
    DuplicateSlotName { slot: String },

    #[error("max_players_per_team must be positive")]
    ZeroTeamCap,

    #[error(
        "exposure floor is zero: {lineup_count} lineups x {max_exposure_pct} exposure \
         excludes every player from the second lineup onward"
    )]
    ExposureFloorZero {
        lineup_count: u32,
        max_exposure_pct: f64,
    },

    #[error("game stack is enabled but no game is designated")]
    GameStackTeamsMissing,

    #[error("game_stack_min must be at least 2, got {0}")]
    GameStackMinTooSmall(u32),

    #[error("game_stack_min {min} exceeds the {slots}-slot roster")]
    GameStackMinTooLarge { min: u32, slots: usize },
}

/// Invalid player pool. Fatal; reported before any solve is attempted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoolError {
    #[error("player pool is empty")]
    Empty,

    #[error("duplicate player id: {0}")]
    DuplicateId(PlayerId),

    #[error("player {0} has a non-positive salary")]
    NonPositiveSalary(PlayerId),

    #[error("player {0} is both locked and excluded")]
    LockExcludeConflict(PlayerId),
}
