use crate::ConstraintClass;
use std::fmt;
use std::time::Duration;

/// Statistics collected during one branch-and-bound solve.
///
/// The per-class prune counters double as the infeasibility diagnosis: when
/// the search exhausts without an incumbent, the dominant counter names the
/// implicated constraint class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub nodes: u64,
    pub bound_prunes: u64,
    pub salary_prunes: u64,
    pub team_cap_prunes: u64,
    pub uniqueness_prunes: u64,
    pub lock_prunes: u64,
    pub game_stack_prunes: u64,
    pub team_stack_prunes: u64,
    pub solve_duration: Duration,
}

impl SolveStats {
    /// The constraint class most implicated in an exhausted search.
    /// `bound_prunes` is excluded: bounding is about optimality, not
    /// feasibility.
    pub fn dominant_infeasibility(&self) -> ConstraintClass {
        let counters = [
            (self.salary_prunes, ConstraintClass::Salary),
            (self.team_cap_prunes, ConstraintClass::TeamCap),
            (self.uniqueness_prunes, ConstraintClass::Uniqueness),
            (self.lock_prunes, ConstraintClass::PositionAvailability),
            (self.game_stack_prunes, ConstraintClass::GameStack),
            (self.team_stack_prunes, ConstraintClass::TeamStack),
        ];
        counters
            .iter()
            .max_by_key(|(count, _)| *count)
            .filter(|(count, _)| *count > 0)
            .map(|(_, class)| *class)
            .unwrap_or(ConstraintClass::PositionAvailability)
    }
}

impl fmt::Display for SolveStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solve Statistics:")?;
        writeln!(f, "  Nodes Explored: {}", self.nodes)?;
        writeln!(f, "  Bound Prunes: {}", self.bound_prunes)?;
        writeln!(f, "  Salary Prunes: {}", self.salary_prunes)?;
        writeln!(f, "  Team Cap Prunes: {}", self.team_cap_prunes)?;
        writeln!(f, "  Uniqueness Prunes: {}", self.uniqueness_prunes)?;
        writeln!(f, "  Lock Prunes: {}", self.lock_prunes)?;
        writeln!(f, "  Game Stack Prunes: {}", self.game_stack_prunes)?;
        writeln!(f, "  Team Stack Prunes: {}", self.team_stack_prunes)?;
        writeln!(
            f,
            "  Solve Duration (secs): {:.3}",
            self.solve_duration.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_class_picks_largest_counter() {
        let stats = SolveStats {
            uniqueness_prunes: 40,
            salary_prunes: 3,
            ..Default::default()
        };
        assert_eq!(stats.dominant_infeasibility(), ConstraintClass::Uniqueness);
    }

    #[test]
    fn dominant_class_defaults_to_position_availability() {
        let stats = SolveStats::default();
        assert_eq!(
            stats.dominant_infeasibility(),
            ConstraintClass::PositionAvailability
        );
    }
}
