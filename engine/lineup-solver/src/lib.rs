// Lineup solver - one 0/1 integer program per lineup, solved exactly by
// deterministic depth-first branch-and-bound over roster slots.

mod constraint;
mod error;
mod preflight;
mod search;
mod stats;

pub use constraint::{ConstraintClass, ConstraintSet, GameStackRule, UniquenessRow};
pub use error::{InfeasiblePoolError, InfeasibleSolveError};
pub use preflight::check_pool;
pub use search::{LineupSolver, SolvedLineup};
pub use stats::SolveStats;
