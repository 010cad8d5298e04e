//! Deterministic depth-first branch-and-bound over roster slots.
//!
//! Each solve is an exact 0/1 integer program: one decision per
//! (slot, player) pair, maximizing the configured objective. Candidates are
//! explored in objective order with admissible salary and objective bounds,
//! so the first incumbent that survives to the end of the search is a true
//! optimum. Tie-breaking keeps the first optimum found, which makes the
//! solver deterministic for a fixed pool and constraint set; callers should
//! still treat the choice among equal-objective lineups as unspecified.

use crate::{ConstraintClass, ConstraintSet, InfeasibleSolveError, SolveStats};
use slate_model::{
    Lineup, LineupSlot, ObjectiveField, Player, PlayerPool, Position, RosterTemplate,
};
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

const OBJ_EPS: f64 = 1e-9;

/// A successful solve: the optimal lineup plus search statistics.
#[derive(Debug, Clone)]
pub struct SolvedLineup {
    pub lineup: Lineup,
    pub stats: SolveStats,
}

/// One-lineup solver over an immutable pool and slot template.
pub struct LineupSolver<'a> {
    pool: &'a PlayerPool,
    roster: &'a RosterTemplate,
    objective: ObjectiveField,
}

impl<'a> LineupSolver<'a> {
    pub fn new(pool: &'a PlayerPool, roster: &'a RosterTemplate, objective: ObjectiveField) -> Self {
        Self { pool, roster, objective }
    }

    #[inline]
    fn objective_of(&self, p: &Player) -> f64 {
        match self.objective {
            ObjectiveField::SmartValue => p.smart_value,
            ObjectiveField::Projection => p.projection,
        }
    }

    /// Solve one 0/1 program. Returns the objective-maximizing lineup or an
    /// infeasibility signal naming the implicated constraint class.
    pub fn solve(&self, constraints: &ConstraintSet) -> Result<SolvedLineup, InfeasibleSolveError> {
        let started = Instant::now();
        let players = self.pool.players();
        let slot_count = self.roster.slot_count();

        // Per-slot candidate lists, objective-descending, id as tie-break.
        let mut candidates: Vec<Vec<usize>> = Vec::with_capacity(slot_count);
        let mut exposure_shrunk = false;
        for slot in self.roster.slots() {
            let mut cands: Vec<usize> = (0..players.len())
                .filter(|&i| {
                    slot.accepts(players[i].position) && constraints.is_selectable(&players[i].id)
                })
                .collect();
            if cands.is_empty() {
                let capped_would_fit = players.iter().any(|p| {
                    slot.accepts(p.position) && constraints.exposure_capped.contains(&p.id)
                });
                let class = if capped_would_fit {
                    ConstraintClass::Exposure
                } else {
                    ConstraintClass::PositionAvailability
                };
                return Err(InfeasibleSolveError {
                    class,
                    detail: format!("no selectable players for slot '{}'", slot.name),
                });
            }
            exposure_shrunk |= players.iter().any(|p| {
                slot.accepts(p.position) && constraints.exposure_capped.contains(&p.id)
            });
            cands.sort_by(|&a, &b| {
                self.objective_of(&players[b])
                    .partial_cmp(&self.objective_of(&players[a]))
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| players[a].id.cmp(&players[b].id))
            });
            candidates.push(cands);
        }

        // Locked players must exist and be selectable.
        let mut locked_idxs = Vec::new();
        for id in &constraints.locked {
            let Some(idx) = (0..players.len()).find(|&i| &players[i].id == id) else {
                return Err(InfeasibleSolveError {
                    class: ConstraintClass::PositionAvailability,
                    detail: format!("locked player {id} is not in the pool"),
                });
            };
            if !constraints.is_selectable(id) {
                let class = if constraints.exposure_capped.contains(id) {
                    ConstraintClass::Exposure
                } else {
                    ConstraintClass::PositionAvailability
                };
                return Err(InfeasibleSolveError {
                    class,
                    detail: format!("locked player {id} is excluded from this solve"),
                });
            }
            locked_idxs.push(idx);
        }
        locked_idxs.sort_unstable();

        let search = Search::new(self, constraints, candidates, locked_idxs);
        let (best, mut stats) = search.run();
        stats.solve_duration = started.elapsed();

        match best {
            Some((chosen, objective)) => {
                let slots = self
                    .roster
                    .slots()
                    .iter()
                    .zip(&chosen)
                    .map(|(slot, &idx)| LineupSlot {
                        slot: slot.name.clone(),
                        player: players[idx].id.clone(),
                    })
                    .collect();
                let total_salary = chosen.iter().map(|&i| players[i].salary).sum();
                debug!(objective, total_salary, nodes = stats.nodes, "solve complete");
                Ok(SolvedLineup {
                    lineup: Lineup::new(slots, total_salary, objective),
                    stats,
                })
            }
            None => {
                let class = if stats.uniqueness_prunes == 0
                    && stats.salary_prunes == 0
                    && stats.team_cap_prunes == 0
                    && stats.lock_prunes == 0
                    && stats.game_stack_prunes == 0
                    && stats.team_stack_prunes == 0
                    && exposure_shrunk
                {
                    ConstraintClass::Exposure
                } else {
                    stats.dominant_infeasibility()
                };
                debug!(%class, nodes = stats.nodes, "solve infeasible");
                Err(InfeasibleSolveError {
                    class,
                    detail: format!(
                        "search exhausted after {} nodes (salary {}, team cap {}, \
                         uniqueness {}, locks {}, game stack {}, team stack {} prunes)",
                        stats.nodes,
                        stats.salary_prunes,
                        stats.team_cap_prunes,
                        stats.uniqueness_prunes,
                        stats.lock_prunes,
                        stats.game_stack_prunes,
                        stats.team_stack_prunes,
                    ),
                })
            }
        }
    }
}

struct Search<'a> {
    players: &'a [Player],
    slot_count: usize,
    candidates: Vec<Vec<usize>>,
    /// Slot s has the same candidate list as slot s-1; symmetry is broken by
    /// requiring strictly increasing pool indices within such a group.
    same_as_prev: Vec<bool>,
    min_salary_suffix: Vec<u32>,
    max_salary_suffix: Vec<u32>,
    max_obj_suffix: Vec<f64>,
    /// Slots at or after index s with at least one designated-game candidate.
    game_suffix: Vec<usize>,
    /// Per team: slots with at least one WR/TE candidate, for QB-stack
    /// reachability pruning.
    catcher_slots: HashMap<String, Vec<bool>>,
    obj: Vec<f64>,
    cs: &'a ConstraintSet,
    uniq_members: Vec<Vec<bool>>,
    uniq_limits: Vec<usize>,
    locked_idxs: Vec<usize>,
    is_locked: Vec<bool>,
    locked_last_slot: HashMap<usize, usize>,

    chosen: Vec<usize>,
    used: Vec<bool>,
    salary: u32,
    objective: f64,
    team_counts: HashMap<String, usize>,
    overlaps: Vec<usize>,
    locked_placed: usize,
    game_count: usize,
    best: Option<(Vec<usize>, f64)>,
    stats: SolveStats,
}

impl<'a> Search<'a> {
    fn new(
        solver: &'a LineupSolver<'a>,
        cs: &'a ConstraintSet,
        candidates: Vec<Vec<usize>>,
        locked_idxs: Vec<usize>,
    ) -> Self {
        let players = solver.pool.players();
        let slot_count = candidates.len();
        let obj: Vec<f64> = players.iter().map(|p| solver.objective_of(p)).collect();

        let same_as_prev: Vec<bool> = (0..slot_count)
            .map(|s| s > 0 && candidates[s] == candidates[s - 1])
            .collect();

        let mut min_salary_suffix = vec![0u32; slot_count + 1];
        let mut max_salary_suffix = vec![0u32; slot_count + 1];
        let mut max_obj_suffix = vec![0f64; slot_count + 1];
        let mut game_suffix = vec![0usize; slot_count + 1];
        for s in (0..slot_count).rev() {
            let min_sal = candidates[s].iter().map(|&i| players[i].salary).min().unwrap_or(0);
            let max_sal = candidates[s].iter().map(|&i| players[i].salary).max().unwrap_or(0);
            let max_o = candidates[s]
                .iter()
                .map(|&i| obj[i])
                .fold(f64::NEG_INFINITY, f64::max);
            min_salary_suffix[s] = min_salary_suffix[s + 1] + min_sal;
            max_salary_suffix[s] = max_salary_suffix[s + 1] + max_sal;
            max_obj_suffix[s] = max_obj_suffix[s + 1] + max_o;
            let slot_in_game = cs
                .game_stack
                .as_ref()
                .map(|rule| candidates[s].iter().any(|&i| rule.covers(&players[i].team)))
                .unwrap_or(false);
            game_suffix[s] = game_suffix[s + 1] + usize::from(slot_in_game);
        }

        let mut catcher_slots: HashMap<String, Vec<bool>> = HashMap::new();
        if cs.qb_stack {
            for (s, cands) in candidates.iter().enumerate() {
                for &i in cands {
                    if players[i].position.is_pass_catcher() {
                        catcher_slots
                            .entry(players[i].team.clone())
                            .or_insert_with(|| vec![false; slot_count])[s] = true;
                    }
                }
            }
        }

        let uniq_members: Vec<Vec<bool>> = cs
            .uniqueness
            .iter()
            .map(|row| {
                players
                    .iter()
                    .map(|p| row.players.contains(&p.id))
                    .collect()
            })
            .collect();
        let uniq_limits: Vec<usize> = cs.uniqueness.iter().map(|r| r.max_shared).collect();

        let mut is_locked = vec![false; players.len()];
        let mut locked_last_slot = HashMap::new();
        for &idx in &locked_idxs {
            is_locked[idx] = true;
            let last = candidates
                .iter()
                .enumerate()
                .filter(|(_, cands)| cands.contains(&idx))
                .map(|(s, _)| s)
                .max();
            if let Some(last) = last {
                locked_last_slot.insert(idx, last);
            }
        }

        Self {
            players,
            slot_count,
            candidates,
            same_as_prev,
            min_salary_suffix,
            max_salary_suffix,
            max_obj_suffix,
            game_suffix,
            catcher_slots,
            obj,
            cs,
            uniq_members,
            uniq_limits,
            locked_idxs,
            is_locked,
            locked_last_slot,
            chosen: Vec::with_capacity(slot_count),
            used: vec![false; players.len()],
            salary: 0,
            objective: 0.0,
            team_counts: HashMap::new(),
            overlaps: vec![0; cs.uniqueness.len()],
            locked_placed: 0,
            game_count: 0,
            best: None,
            stats: SolveStats::default(),
        }
    }

    fn run(mut self) -> (Option<(Vec<usize>, f64)>, SolveStats) {
        // A locked player whose every candidate slot is gone can never be
        // placed; fail fast instead of exhausting the tree.
        for &idx in &self.locked_idxs {
            if !self.locked_last_slot.contains_key(&idx) {
                self.stats.lock_prunes += 1;
                return (None, self.stats);
            }
        }
        self.descend(0);
        (self.best, self.stats)
    }

    fn descend(&mut self, s: usize) {
        self.stats.nodes += 1;

        if s == self.slot_count {
            self.visit_leaf();
            return;
        }

        // Node-entry prunes.
        if self.salary + self.min_salary_suffix[s] > self.cs.salary_cap {
            self.stats.salary_prunes += 1;
            return;
        }
        if let Some(floor) = self.cs.min_salary {
            if self.salary + self.max_salary_suffix[s] < floor {
                self.stats.salary_prunes += 1;
                return;
            }
        }
        if let Some((_, best_obj)) = &self.best {
            if self.objective + self.max_obj_suffix[s] <= best_obj + OBJ_EPS {
                self.stats.bound_prunes += 1;
                return;
            }
        }
        let remaining = self.slot_count - s;
        let locked_remaining = self.locked_idxs.len() - self.locked_placed;
        if locked_remaining > remaining {
            self.stats.lock_prunes += 1;
            return;
        }
        for &idx in &self.locked_idxs {
            if !self.used[idx] && self.locked_last_slot[&idx] < s {
                self.stats.lock_prunes += 1;
                return;
            }
        }
        if let Some(rule) = &self.cs.game_stack {
            if self.game_count + self.game_suffix[s] < rule.min_players {
                self.stats.game_stack_prunes += 1;
                return;
            }
        }
        if self.cs.qb_stack && !self.stack_reachable(s) {
            self.stats.team_stack_prunes += 1;
            return;
        }

        let must_place_locked = locked_remaining == remaining;

        for c in 0..self.candidates[s].len() {
            let idx = self.candidates[s][c];
            if self.used[idx] {
                continue;
            }
            if must_place_locked && !self.is_locked[idx] {
                continue;
            }
            if self.same_as_prev[s] && idx <= self.chosen[s - 1] {
                continue;
            }
            let p = &self.players[idx];

            if self.salary + p.salary + self.min_salary_suffix[s + 1] > self.cs.salary_cap {
                self.stats.salary_prunes += 1;
                continue;
            }
            if !p.position.is_defense() {
                let count = self.team_counts.get(p.team.as_str()).copied().unwrap_or(0);
                if count + 1 > self.cs.max_players_per_team {
                    self.stats.team_cap_prunes += 1;
                    continue;
                }
            }
            if (0..self.uniq_members.len())
                .any(|r| self.uniq_members[r][idx] && self.overlaps[r] + 1 > self.uniq_limits[r])
            {
                self.stats.uniqueness_prunes += 1;
                continue;
            }
            if let Some((_, best_obj)) = &self.best {
                // Candidates are objective-descending, so once one cannot
                // beat the incumbent none of the rest can either.
                if self.objective + self.obj[idx] + self.max_obj_suffix[s + 1] <= best_obj + OBJ_EPS
                {
                    self.stats.bound_prunes += 1;
                    break;
                }
            }
            if self.cs.qb_stack && p.position == Position::Qb && !self.qb_can_be_stacked(p, s) {
                self.stats.team_stack_prunes += 1;
                continue;
            }

            self.apply(idx);
            self.descend(s + 1);
            self.unapply(idx);
        }
    }

    fn apply(&mut self, idx: usize) {
        let p = &self.players[idx];
        self.chosen.push(idx);
        self.used[idx] = true;
        self.salary += p.salary;
        self.objective += self.obj[idx];
        if !p.position.is_defense() {
            *self.team_counts.entry(p.team.clone()).or_insert(0) += 1;
        }
        for r in 0..self.uniq_members.len() {
            if self.uniq_members[r][idx] {
                self.overlaps[r] += 1;
            }
        }
        if self.is_locked[idx] {
            self.locked_placed += 1;
        }
        if let Some(rule) = &self.cs.game_stack {
            if rule.covers(&p.team) {
                self.game_count += 1;
            }
        }
    }

    fn unapply(&mut self, idx: usize) {
        let p = &self.players[idx];
        self.chosen.pop();
        self.used[idx] = false;
        self.salary -= p.salary;
        self.objective -= self.obj[idx];
        if !p.position.is_defense() {
            if let Some(count) = self.team_counts.get_mut(p.team.as_str()) {
                *count -= 1;
            }
        }
        for r in 0..self.uniq_members.len() {
            if self.uniq_members[r][idx] {
                self.overlaps[r] -= 1;
            }
        }
        if self.is_locked[idx] {
            self.locked_placed -= 1;
        }
        if let Some(rule) = &self.cs.game_stack {
            if rule.covers(&p.team) {
                self.game_count -= 1;
            }
        }
    }

    fn visit_leaf(&mut self) {
        if self.locked_placed < self.locked_idxs.len() {
            self.stats.lock_prunes += 1;
            return;
        }
        if let Some(floor) = self.cs.min_salary {
            if self.salary < floor {
                self.stats.salary_prunes += 1;
                return;
            }
        }
        if let Some(rule) = &self.cs.game_stack {
            if self.game_count < rule.min_players {
                self.stats.game_stack_prunes += 1;
                return;
            }
        }
        if self.cs.qb_stack && !self.leaf_stacks_ok() {
            self.stats.team_stack_prunes += 1;
            return;
        }
        let improves = match &self.best {
            None => true,
            Some((_, best_obj)) => self.objective > best_obj + OBJ_EPS,
        };
        if improves {
            self.best = Some((self.chosen.clone(), self.objective));
        }
    }

    /// Every selected QB has a selected same-team pass catcher.
    fn leaf_stacks_ok(&self) -> bool {
        self.chosen
            .iter()
            .filter(|&&i| self.players[i].position == Position::Qb)
            .all(|&qb| {
                let team = &self.players[qb].team;
                self.chosen.iter().any(|&i| {
                    self.players[i].position.is_pass_catcher() && &self.players[i].team == team
                })
            })
    }

    /// Every already-selected, still-unstacked QB can still be stacked from
    /// a slot at or after `s`.
    fn stack_reachable(&self, s: usize) -> bool {
        self.chosen
            .iter()
            .filter(|&&i| self.players[i].position == Position::Qb)
            .all(|&qb| {
                let team = &self.players[qb].team;
                let satisfied = self.chosen.iter().any(|&i| {
                    self.players[i].position.is_pass_catcher() && &self.players[i].team == team
                });
                satisfied
                    || self
                        .catcher_slots
                        .get(team)
                        .map(|slots| slots[s..].iter().any(|&b| b))
                        .unwrap_or(false)
            })
    }

    /// Selecting this QB at slot `s`: a same-team catcher must be already
    /// chosen or reachable in a later slot.
    fn qb_can_be_stacked(&self, qb: &Player, s: usize) -> bool {
        let already = self.chosen.iter().any(|&i| {
            self.players[i].position.is_pass_catcher() && self.players[i].team == qb.team
        });
        already
            || self
                .catcher_slots
                .get(&qb.team)
                .map(|slots| slots[s + 1..].iter().any(|&b| b))
                .unwrap_or(false)
    }
}
