//! Translates configuration plus accumulated portfolio state into the
//! complete constraint set for one solve.

use crate::{stacking, PortfolioState, Relaxation};
use lineup_solver::{ConstraintClass, ConstraintSet, InfeasibleSolveError, UniquenessRow};
use slate_model::{PlayerPool, RunConfig};
use tracing::debug;

pub struct ConstraintBuilder<'a> {
    config: &'a RunConfig,
}

impl<'a> ConstraintBuilder<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    /// Build the constraint set for the next solve. The builder never drops
    /// a constraint on its own: a lock colliding with the exposure cap is a
    /// distinct infeasibility signal for the controller to act on, not
    /// something to silently resolve here.
    pub fn build(
        &self,
        pool: &PlayerPool,
        state: &PortfolioState,
        relaxation: &Relaxation,
    ) -> Result<ConstraintSet, InfeasibleSolveError> {
        let mut cs = ConstraintSet::new(
            self.config.salary_cap,
            self.config.max_players_per_team as usize,
        );
        cs.min_salary = self.config.min_salary();
        cs.qb_stack = self.config.qb_stack;
        if !relaxation.game_stack_disabled {
            cs.game_stack = stacking::game_stack_rule(self.config, pool);
        }

        for p in pool.iter() {
            if p.locked {
                cs.locked.insert(p.id.clone());
            }
            if p.excluded {
                cs.excluded.insert(p.id.clone());
            }
        }

        // Exposure: once a player's appearance count reaches the cap it is
        // force-excluded from every remaining solve in the run.
        let max_appearances = self.config.max_appearances() + relaxation.exposure_slack;
        for p in pool.iter() {
            if state.appearances(&p.id) >= max_appearances {
                if cs.locked.contains(&p.id) {
                    return Err(InfeasibleSolveError {
                        class: ConstraintClass::Exposure,
                        detail: format!(
                            "locked player {} has reached the exposure cap of {max_appearances}",
                            p.id
                        ),
                    });
                }
                cs.exposure_capped.insert(p.id.clone());
            }
        }

        // Uniqueness: one inequality per previously accepted lineup. A
        // relaxed bound at or past the slot count is vacuous and dropped.
        let max_shared = self.config.max_shared() + relaxation.uniqueness_slack;
        if max_shared < self.config.roster.slot_count() {
            for lineup in state.lineups() {
                cs.uniqueness.push(UniquenessRow {
                    players: lineup.player_ids().cloned().collect(),
                    max_shared,
                });
            }
        }

        debug!(
            exposure_capped = cs.exposure_capped.len(),
            uniqueness_rows = cs.uniqueness.len(),
            max_shared,
            max_appearances,
            "constraint set built"
        );
        Ok(cs)
    }
}
