use slate_model::PlayerId;
use std::collections::HashSet;
use std::fmt;

/// Constraint classes used for infeasibility attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintClass {
    Salary,
    PositionAvailability,
    TeamCap,
    Exposure,
    Uniqueness,
    GameStack,
    TeamStack,
}

impl fmt::Display for ConstraintClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConstraintClass::Salary => "salary",
            ConstraintClass::PositionAvailability => "position availability",
            ConstraintClass::TeamCap => "team cap",
            ConstraintClass::Exposure => "exposure",
            ConstraintClass::Uniqueness => "uniqueness",
            ConstraintClass::GameStack => "game stack",
            ConstraintClass::TeamStack => "team stack",
        };
        f.write_str(s)
    }
}

/// One linear inequality against a previously accepted lineup: the new
/// lineup may select at most `max_shared` of `players`.
#[derive(Debug, Clone)]
pub struct UniquenessRow {
    pub players: HashSet<PlayerId>,
    pub max_shared: usize,
}

/// Require at least `min_players` selected from the two teams of the
/// designated high-total game. The game is resolved externally.
#[derive(Debug, Clone)]
pub struct GameStackRule {
    pub teams: (String, String),
    pub min_players: usize,
}

impl GameStackRule {
    pub fn covers(&self, team: &str) -> bool {
        self.teams.0.eq_ignore_ascii_case(team) || self.teams.1.eq_ignore_ascii_case(team)
    }
}

/// The complete constraint set for one solve, produced by the constraint
/// builder from configuration plus accumulated portfolio state.
///
/// `excluded` holds user exclusions; `exposure_capped` holds players forced
/// out because their appearance count reached the exposure limit. The two
/// are kept apart so infeasibility can name the class that caused it.
#[derive(Debug, Clone)]
pub struct ConstraintSet {
    pub salary_cap: u32,
    pub min_salary: Option<u32>,
    pub max_players_per_team: usize,
    pub locked: HashSet<PlayerId>,
    pub excluded: HashSet<PlayerId>,
    pub exposure_capped: HashSet<PlayerId>,
    pub uniqueness: Vec<UniquenessRow>,
    pub game_stack: Option<GameStackRule>,
    pub qb_stack: bool,
}

impl ConstraintSet {
    pub fn new(salary_cap: u32, max_players_per_team: usize) -> Self {
        Self {
            salary_cap,
            min_salary: None,
            max_players_per_team,
            locked: HashSet::new(),
            excluded: HashSet::new(),
            exposure_capped: HashSet::new(),
            uniqueness: Vec::new(),
            game_stack: None,
            qb_stack: false,
        }
    }

    /// A player may enter the candidate set only if no constraint fixes its
    /// selection to false.
    #[inline]
    pub fn is_selectable(&self, id: &PlayerId) -> bool {
        !self.excluded.contains(id) && !self.exposure_capped.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectable_excludes_both_kinds_of_exclusion() {
        let mut cs = ConstraintSet::new(50_000, 3);
        cs.excluded.insert(PlayerId::new("out"));
        cs.exposure_capped.insert(PlayerId::new("capped"));
        assert!(!cs.is_selectable(&PlayerId::new("out")));
        assert!(!cs.is_selectable(&PlayerId::new("capped")));
        assert!(cs.is_selectable(&PlayerId::new("in")));
    }

    #[test]
    fn game_stack_covers_both_teams_case_insensitively() {
        let rule = GameStackRule { teams: ("SEA".into(), "DET".into()), min_players: 3 };
        assert!(rule.covers("SEA"));
        assert!(rule.covers("det"));
        assert!(!rule.covers("KC"));
    }
}
