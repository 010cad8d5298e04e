use lineup_solver::InfeasiblePoolError;
use slate_model::{ConfigError, PoolError};
use thiserror::Error;

/// Errors that abort a run before any lineup is attempted. Failures after
/// the first solve never surface here; they end the run partial instead.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid player pool: {0}")]
    Pool(#[from] PoolError),

    #[error(transparent)]
    InfeasiblePool(#[from] InfeasiblePoolError),
}
