use crate::{ConfigError, RosterTemplate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which per-player score the solver maximizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveField {
    SmartValue,
    Projection,
}

/// One constraint class the controller may relax after an infeasible solve.
/// The order of these steps in `RunConfig::relaxation_order` is the
/// documented relaxation precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelaxationStep {
    /// Allow one more shared player against every prior lineup.
    Uniqueness,
    /// Allow one more appearance per player.
    Exposure,
    /// Drop the game-stack minimum for the rest of the run.
    GameStack,
}

impl fmt::Display for RelaxationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RelaxationStep::Uniqueness => "uniqueness",
            RelaxationStep::Exposure => "exposure",
            RelaxationStep::GameStack => "game stack",
        };
        f.write_str(s)
    }
}

fn default_team_cap() -> u32 {
    3
}

fn default_game_stack_min() -> u32 {
    3
}

fn default_max_relaxations() -> u32 {
    3
}

fn default_objective() -> ObjectiveField {
    ObjectiveField::SmartValue
}

fn default_relaxation_order() -> Vec<RelaxationStep> {
    vec![
        RelaxationStep::Uniqueness,
        RelaxationStep::Exposure,
        RelaxationStep::GameStack,
    ]
}

/// Run configuration for one portfolio generation run.
///
/// `validate()` must pass before any solve is attempted; all derived
/// quantities use floor rounding, documented on the accessors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of lineups requested (N).
    pub lineup_count: u32,
    /// Total salary cap per lineup.
    pub salary_cap: u32,
    /// Slot template; fixed for the run.
    #[serde(default = "RosterTemplate::classic_nfl")]
    pub roster: RosterTemplate,
    /// Minimum required difference between lineups, in [0, 1].
    pub uniqueness_pct: f64,
    /// Maximum fraction of lineups any one player may appear in, in [0, 1].
    pub max_exposure_pct: f64,
    /// Cap on selected non-defense players from a single team.
    #[serde(default = "default_team_cap")]
    pub max_players_per_team: u32,
    /// Require a minimum number of players from one designated game.
    #[serde(default)]
    pub enable_game_stack: bool,
    #[serde(default = "default_game_stack_min")]
    pub game_stack_min: u32,
    /// The designated high-total game, resolved externally from market odds.
    #[serde(default)]
    pub game_stack_teams: Option<(String, String)>,
    /// Hard minimum: a selected QB must bring at least one same-team WR/TE.
    #[serde(default)]
    pub qb_stack: bool,
    /// Optional minimum share of the cap that must be spent.
    #[serde(default)]
    pub min_salary_pct: Option<f64>,
    /// Consecutive failed attempts allowed before the run aborts partial.
    #[serde(default = "default_max_relaxations")]
    pub max_relaxations: u32,
    /// Relaxation precedence; one step is consumed per retry.
    #[serde(default = "default_relaxation_order")]
    pub relaxation_order: Vec<RelaxationStep>,
    #[serde(default = "default_objective")]
    pub objective_field: ObjectiveField,
}

impl RunConfig {
    /// Minimal configuration over the classic NFL template.
    pub fn new(lineup_count: u32, salary_cap: u32) -> Self {
        Self {
            lineup_count,
            salary_cap,
            roster: RosterTemplate::classic_nfl(),
            uniqueness_pct: 0.5,
            max_exposure_pct: 1.0,
            max_players_per_team: default_team_cap(),
            enable_game_stack: false,
            game_stack_min: default_game_stack_min(),
            game_stack_teams: None,
            qb_stack: false,
            min_salary_pct: None,
            max_relaxations: default_max_relaxations(),
            relaxation_order: default_relaxation_order(),
            objective_field: default_objective(),
        }
    }

    /// Maximum players a new lineup may share with any prior lineup:
    /// `floor(slot_count * (1 - uniqueness_pct))`.
    pub fn max_shared(&self) -> usize {
        (self.roster.slot_count() as f64 * (1.0 - self.uniqueness_pct)).floor() as usize
    }

    /// Maximum lineups any one player may appear in:
    /// `floor(lineup_count * max_exposure_pct)`.
    pub fn max_appearances(&self) -> u32 {
        (self.lineup_count as f64 * self.max_exposure_pct).floor() as u32
    }

    /// Minimum total salary per lineup, if a floor is configured.
    pub fn min_salary(&self) -> Option<u32> {
        self.min_salary_pct
            .map(|pct| (self.salary_cap as f64 * pct).floor() as u32)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lineup_count == 0 {
            return Err(ConfigError::ZeroLineupCount);
        }
        if self.salary_cap == 0 {
            return Err(ConfigError::ZeroSalaryCap);
        }
        for (field, value) in [
            ("uniqueness_pct", self.uniqueness_pct),
            ("max_exposure_pct", self.max_exposure_pct),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::PercentOutOfRange { field, value });
            }
        }
        if let Some(pct) = self.min_salary_pct {
            if !(0.0..=1.0).contains(&pct) {
                return Err(ConfigError::PercentOutOfRange { field: "min_salary_pct", value: pct });
            }
        }
        self.roster.validate()?;
        if self.max_players_per_team == 0 {
            return Err(ConfigError::ZeroTeamCap);
        }
        if self.max_appearances() == 0 {
            return Err(ConfigError::ExposureFloorZero {
                lineup_count: self.lineup_count,
                max_exposure_pct: self.max_exposure_pct,
            });
        }
        if self.enable_game_stack {
            if self.game_stack_teams.is_none() {
                return Err(ConfigError::GameStackTeamsMissing);
            }
            if self.game_stack_min < 2 {
                return Err(ConfigError::GameStackMinTooSmall(self.game_stack_min));
            }
            if self.game_stack_min as usize > self.roster.slot_count() {
                return Err(ConfigError::GameStackMinTooLarge {
                    min: self.game_stack_min,
                    slots: self.roster.slot_count(),
                });
            }
        }
        Ok(())
    }
}
