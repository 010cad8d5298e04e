//! Sequential portfolio generation loop.
//!
//! Lineups are solved one at a time; each accepted lineup tightens the
//! exposure and uniqueness constraints for every later solve. An infeasible
//! solve consumes one step of the configured relaxation order and retries;
//! relaxations persist for the rest of the run. When the retry budget is
//! exhausted the run stops and returns whatever was generated, which is a
//! warning state rather than an error.

use crate::{ConstraintBuilder, PortfolioReport, PortfolioState, RunError, RunState};
use chrono::Utc;
use lineup_solver::{check_pool, InfeasiblePoolError, LineupSolver};
use slate_model::{Player, PlayerPool, RelaxationStep, RunConfig};
use tracing::{info, warn};

/// Accumulated constraint slack. Starts at zero and only ever loosens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Relaxation {
    pub uniqueness_slack: usize,
    pub exposure_slack: u32,
    pub game_stack_disabled: bool,
}

impl Relaxation {
    fn apply(&mut self, step: RelaxationStep) {
        match step {
            RelaxationStep::Uniqueness => self.uniqueness_slack += 1,
            RelaxationStep::Exposure => self.exposure_slack += 1,
            RelaxationStep::GameStack => self.game_stack_disabled = true,
        }
    }
}

pub struct PortfolioController {
    config: RunConfig,
    pool: PlayerPool,
}

impl PortfolioController {
    /// Validates the configuration and the pool; both must be sound before
    /// any solve is attempted.
    pub fn new(config: RunConfig, players: Vec<Player>) -> Result<Self, RunError> {
        config.validate()?;
        let pool = PlayerPool::new(players)?;
        Ok(Self { config, pool })
    }

    pub fn run(&self) -> Result<PortfolioReport, RunError> {
        let started_at = Utc::now();
        let builder = ConstraintBuilder::new(&self.config);
        let mut state = PortfolioState::new();
        let mut relaxation = Relaxation::default();

        // Preflight on the base constraint set, before the first solve. With
        // no accepted lineups yet, a build failure here is a pool problem.
        let base = builder
            .build(&self.pool, &state, &relaxation)
            .map_err(|e| InfeasiblePoolError { class: e.class, detail: e.detail })?;
        check_pool(&self.pool, &self.config.roster, &base)?;

        let solver =
            LineupSolver::new(&self.pool, &self.config.roster, self.config.objective_field);
        let mut relaxations_applied: Vec<String> = Vec::new();
        let mut failures_in_a_row: u32 = 0;
        let mut next_step: usize = 0;
        let mut abort_reason: Option<String> = None;

        while (state.len() as u32) < self.config.lineup_count {
            let attempt = builder
                .build(&self.pool, &state, &relaxation)
                .and_then(|cs| solver.solve(&cs));
            match attempt {
                Ok(solved) => {
                    failures_in_a_row = 0;
                    info!(
                        lineup = state.len() + 1,
                        salary = solved.lineup.total_salary(),
                        objective = solved.lineup.total_objective(),
                        nodes = solved.stats.nodes,
                        "lineup accepted"
                    );
                    state.accept(solved.lineup);
                }
                Err(err) => {
                    failures_in_a_row += 1;
                    if failures_in_a_row > self.config.max_relaxations {
                        warn!(%err, generated = state.len(), "retry budget exhausted, stopping");
                        abort_reason = Some(format!(
                            "{failures_in_a_row} consecutive infeasible solves, last: {err}"
                        ));
                        break;
                    }
                    match self.config.relaxation_order.get(next_step).copied() {
                        Some(step) => {
                            next_step += 1;
                            relaxation.apply(step);
                            relaxations_applied.push(step.to_string());
                            warn!(%err, %step, "solve infeasible, relaxing and retrying");
                        }
                        None => {
                            warn!(%err, generated = state.len(), "no relaxation steps left, stopping");
                            abort_reason =
                                Some(format!("no relaxation steps remain, last: {err}"));
                            break;
                        }
                    }
                }
            }
        }

        let generated = state.len() as u32;
        let run_state = if generated == self.config.lineup_count {
            RunState::Complete
        } else {
            RunState::Aborted
        };
        Ok(PortfolioReport {
            lineups: state.into_lineups(),
            requested: self.config.lineup_count,
            generated,
            state: run_state,
            abort_reason,
            relaxations: relaxations_applied,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineup_solver::ConstraintClass;
    use slate_model::{Position, RosterSlot, RosterTemplate};
    use std::collections::HashMap;

    fn player(name: &str, team: &str, position: Position, smart_value: f64) -> Player {
        Player::new(name, team, "OPP", position, 5000, smart_value / 2.0, smart_value)
    }

    /// Twenty-player slate: 3 QB, 6 RB, 7 WR, 2 TE, 2 DST, one team each so
    /// the team cap never binds. Flat salaries keep the cap slack.
    fn slate() -> Vec<Player> {
        use Position::*;
        let rows: &[(&str, Position, f64)] = &[
            ("Q1", Qb, 90.0),
            ("Q2", Qb, 80.0),
            ("Q3", Qb, 70.0),
            ("R1", Rb, 88.0),
            ("R2", Rb, 86.0),
            ("R3", Rb, 66.0),
            ("R4", Rb, 64.0),
            ("R5", Rb, 62.0),
            ("R6", Rb, 60.0),
            ("W1", Wr, 87.0),
            ("W2", Wr, 85.0),
            ("W3", Wr, 83.0),
            ("W4", Wr, 65.0),
            ("W5", Wr, 63.0),
            ("W6", Wr, 61.0),
            ("W7", Wr, 59.0),
            ("T1", Te, 84.0),
            ("T2", Te, 58.0),
            ("D1", Dst, 82.0),
            ("D2", Dst, 57.0),
        ];
        rows.iter()
            .enumerate()
            .map(|(i, (name, pos, sv))| player(name, &format!("T{i:02}"), *pos, *sv))
            .collect()
    }

    fn wr_only_roster(slots: usize) -> RosterTemplate {
        RosterTemplate::new(
            (0..slots)
                .map(|i| RosterSlot::new(format!("WR{}", i + 1), &[Position::Wr]))
                .collect(),
        )
    }

    #[test]
    fn generates_full_portfolio_under_exposure_and_uniqueness() {
        let mut cfg = RunConfig::new(5, 50_000);
        cfg.uniqueness_pct = 0.5; // floor(9 * 0.5) = 4 shared players max
        cfg.max_exposure_pct = 0.6; // floor(5 * 0.6) = 3 appearances max

        let report = PortfolioController::new(cfg, slate()).unwrap().run().unwrap();

        assert_eq!(report.state, RunState::Complete);
        assert_eq!(report.generated, 5);
        assert_eq!(report.lineups.len(), 5);
        assert!(!report.is_partial());
        assert!(report.abort_reason.is_none());
        assert!(report.relaxations.is_empty());

        let mut appearances: HashMap<String, u32> = HashMap::new();
        for lineup in &report.lineups {
            assert_eq!(lineup.slots().len(), 9);
            let distinct: std::collections::HashSet<_> = lineup.player_ids().collect();
            assert_eq!(distinct.len(), 9);
            assert!(lineup.total_salary() <= 50_000);
            for id in lineup.player_ids() {
                *appearances.entry(id.to_string()).or_insert(0) += 1;
            }
        }
        for (a, b) in report
            .lineups
            .iter()
            .enumerate()
            .flat_map(|(i, a)| report.lineups[i + 1..].iter().map(move |b| (a, b)))
        {
            assert!(a.overlap(b) <= 4, "overlap {} exceeds 4", a.overlap(b));
        }
        for (id, count) in appearances {
            assert!(count <= 3, "{id} appears {count} times");
        }
    }

    #[test]
    fn relaxes_uniqueness_once_and_completes() {
        let mut cfg = RunConfig::new(2, 50_000);
        cfg.roster = wr_only_roster(3);
        cfg.uniqueness_pct = 0.67; // floor(3 * 0.33) = 0 shared players

        // Five receivers: the first lineup takes the top three, leaving only
        // two for a fully disjoint second lineup.
        let players = (0..5)
            .map(|i| player(&format!("W{i}"), &format!("T{i}"), Position::Wr, 90.0 - i as f64))
            .collect();
        let report = PortfolioController::new(cfg, players).unwrap().run().unwrap();

        assert_eq!(report.state, RunState::Complete);
        assert_eq!(report.generated, 2);
        assert_eq!(report.relaxations, vec!["uniqueness".to_string()]);
        assert_eq!(report.lineups[0].overlap(&report.lineups[1]), 1);
    }

    #[test]
    fn relaxation_follows_the_configured_order() {
        // Four players at one appearance each cover only the first two
        // lineups; the third cannot be built until exposure is relaxed.
        let pool = || -> Vec<Player> {
            (0..4)
                .map(|i| player(&format!("W{i}"), &format!("T{i}"), Position::Wr, 80.0 - i as f64))
                .collect()
        };
        let mut cfg = RunConfig::new(3, 50_000);
        cfg.roster = wr_only_roster(2);
        cfg.uniqueness_pct = 0.0;
        cfg.max_exposure_pct = 0.34; // floor(3 * 0.34) = 1 appearance

        let mut exposure_first = cfg.clone();
        exposure_first.relaxation_order = vec![
            RelaxationStep::Exposure,
            RelaxationStep::Uniqueness,
            RelaxationStep::GameStack,
        ];
        let report = PortfolioController::new(exposure_first, pool()).unwrap().run().unwrap();
        assert_eq!(report.state, RunState::Complete);
        assert_eq!(report.generated, 3);
        assert_eq!(report.relaxations, vec!["exposure".to_string()]);

        // The default order burns a uniqueness step before reaching the
        // one that helps.
        let report = PortfolioController::new(cfg, pool()).unwrap().run().unwrap();
        assert_eq!(report.state, RunState::Complete);
        assert_eq!(
            report.relaxations,
            vec!["uniqueness".to_string(), "exposure".to_string()]
        );
    }

    #[test]
    fn aborts_partial_when_retry_budget_is_exhausted() {
        let mut cfg = RunConfig::new(2, 50_000);
        cfg.roster = wr_only_roster(3);
        cfg.uniqueness_pct = 0.67;

        // Four receivers: even after every relaxation step the second lineup
        // would need two players that do not exist.
        let players = (0..4)
            .map(|i| player(&format!("W{i}"), &format!("T{i}"), Position::Wr, 90.0 - i as f64))
            .collect();
        let report = PortfolioController::new(cfg, players).unwrap().run().unwrap();

        assert_eq!(report.state, RunState::Aborted);
        assert_eq!(report.generated, 1);
        assert!(report.is_partial());
        assert!(report.abort_reason.is_some());
        assert_eq!(report.relaxations.len(), 3);
        assert_eq!(report.lineups.len(), 1);
    }

    #[test]
    fn preflight_rejects_pool_missing_a_position() {
        let cfg = RunConfig::new(2, 50_000);
        // No defenses at all: the DST slot can never be filled.
        let players = slate()
            .into_iter()
            .filter(|p| !p.position.is_defense())
            .collect();
        let err = PortfolioController::new(cfg, players).unwrap().run().unwrap_err();
        match err {
            RunError::InfeasiblePool(e) => {
                assert_eq!(e.class, ConstraintClass::PositionAvailability)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn constructor_rejects_bad_config_and_bad_pool() {
        assert!(matches!(
            PortfolioController::new(RunConfig::new(0, 50_000), slate()),
            Err(RunError::Config(_))
        ));
        let mut players = slate();
        players.push(players[0].clone());
        assert!(matches!(
            PortfolioController::new(RunConfig::new(2, 50_000), players),
            Err(RunError::Pool(_))
        ));
    }
}
