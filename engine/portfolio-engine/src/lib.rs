// Portfolio engine - N sequential solves where each new lineup's
// constraints depend on every previously accepted lineup in the run.

mod builder;
mod controller;
mod error;
mod report;
mod stacking;
mod state;

pub use builder::ConstraintBuilder;
pub use controller::{PortfolioController, Relaxation};
pub use error::RunError;
pub use report::{PortfolioReport, RunState};
pub use stacking::game_stack_rule;
pub use state::PortfolioState;
