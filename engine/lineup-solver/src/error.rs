//! Solver error types

use crate::ConstraintClass;
use thiserror::Error;

/// The pool cannot support even one lineup once locks and exclusions are
/// applied. Fatal; raised by the preflight checks before any solve.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("infeasible player pool ({class}): {detail}")]
pub struct InfeasiblePoolError {
    pub class: ConstraintClass,
    pub detail: String,
}

/// A specific iteration cannot produce a lineup under the current
/// exposure/uniqueness state. Recoverable; the portfolio controller decides
/// whether to relax a constraint class and retry.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("infeasible solve ({class}): {detail}")]
pub struct InfeasibleSolveError {
    pub class: ConstraintClass,
    pub detail: String,
}
