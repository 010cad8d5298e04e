//! Pool feasibility checks run before the first solve.
//!
//! These catch pools that cannot support even one lineup, so runs fail fast
//! with `InfeasiblePoolError` instead of burning a solve on a hopeless
//! instance. The checks are conservative: they never flag a feasible pool,
//! and anything they miss is still caught by the solver at solve time.

use crate::{ConstraintClass, ConstraintSet, InfeasiblePoolError};
use slate_model::{PlayerPool, RosterTemplate};
use std::collections::{HashMap, HashSet};

/// Validate that the pool can fill the template at all under locks,
/// exclusions, the salary cap, and the team cap.
pub fn check_pool(
    pool: &PlayerPool,
    roster: &RosterTemplate,
    constraints: &ConstraintSet,
) -> Result<(), InfeasiblePoolError> {
    let candidates = candidate_lists(pool, roster, constraints);

    for (slot_idx, cands) in candidates.iter().enumerate() {
        if cands.is_empty() {
            return Err(InfeasiblePoolError {
                class: ConstraintClass::PositionAvailability,
                detail: format!(
                    "no eligible players for slot '{}' after locks and exclusions",
                    roster.slots()[slot_idx].name
                ),
            });
        }
    }

    check_slot_matching(roster, &candidates)?;
    check_locked(pool, roster, constraints, &candidates)?;
    check_team_only_fill(pool, constraints, &candidates)?;
    Ok(())
}

fn candidate_lists(
    pool: &PlayerPool,
    roster: &RosterTemplate,
    constraints: &ConstraintSet,
) -> Vec<Vec<usize>> {
    roster
        .slots()
        .iter()
        .map(|slot| {
            pool.players()
                .iter()
                .enumerate()
                .filter(|(_, p)| slot.accepts(p.position) && constraints.is_selectable(&p.id))
                .map(|(i, _)| i)
                .collect()
        })
        .collect()
}

/// Every slot must be fillable by a distinct player: bipartite matching of
/// slots to pool indices via augmenting paths.
fn check_slot_matching(
    roster: &RosterTemplate,
    candidates: &[Vec<usize>],
) -> Result<(), InfeasiblePoolError> {
    let mut player_to_slot: HashMap<usize, usize> = HashMap::new();
    let mut matched = 0usize;
    for slot_idx in 0..candidates.len() {
        let mut visited = HashSet::new();
        if augment(slot_idx, candidates, &mut player_to_slot, &mut visited) {
            matched += 1;
        }
    }
    if matched < roster.slot_count() {
        return Err(InfeasiblePoolError {
            class: ConstraintClass::PositionAvailability,
            detail: format!(
                "only {matched} of {} slots can be filled by distinct players",
                roster.slot_count()
            ),
        });
    }
    Ok(())
}

fn augment(
    slot: usize,
    candidates: &[Vec<usize>],
    player_to_slot: &mut HashMap<usize, usize>,
    visited: &mut HashSet<usize>,
) -> bool {
    for &p in &candidates[slot] {
        if !visited.insert(p) {
            continue;
        }
        match player_to_slot.get(&p).copied() {
            None => {
                player_to_slot.insert(p, slot);
                return true;
            }
            Some(other) => {
                if augment(other, candidates, player_to_slot, visited) {
                    player_to_slot.insert(p, slot);
                    return true;
                }
            }
        }
    }
    false
}

/// Locked players must all be rosterable, and what they leave of the cap
/// must still cover the cheapest possible fill of the open slots.
fn check_locked(
    pool: &PlayerPool,
    roster: &RosterTemplate,
    constraints: &ConstraintSet,
    candidates: &[Vec<usize>],
) -> Result<(), InfeasiblePoolError> {
    let locked: Vec<&slate_model::Player> = pool
        .players()
        .iter()
        .filter(|p| constraints.locked.contains(&p.id))
        .collect();
    if locked.is_empty() {
        return Ok(());
    }

    if locked.len() > roster.slot_count() {
        return Err(InfeasiblePoolError {
            class: ConstraintClass::PositionAvailability,
            detail: format!(
                "{} players are locked but the roster has only {} slots",
                locked.len(),
                roster.slot_count()
            ),
        });
    }

    // Locked players must fit distinct eligible slots.
    let locked_candidates: Vec<Vec<usize>> = locked
        .iter()
        .map(|p| roster.eligible_slots(p.position))
        .collect();
    let mut slot_to_locked: HashMap<usize, usize> = HashMap::new();
    for (i, slots) in locked_candidates.iter().enumerate() {
        if slots.is_empty() {
            return Err(InfeasiblePoolError {
                class: ConstraintClass::PositionAvailability,
                detail: format!("locked player {} fits no roster slot", locked[i].id),
            });
        }
        let mut visited = HashSet::new();
        if !augment(i, &locked_candidates, &mut slot_to_locked, &mut visited) {
            return Err(InfeasiblePoolError {
                class: ConstraintClass::PositionAvailability,
                detail: "locked players cannot all be rostered at once".to_string(),
            });
        }
    }

    // Salary lower bound. Locked players occupy some set of L slots; the
    // slots they leave open are a subset of the slots that still have a
    // non-locked candidate, so summing the (n - L) smallest per-slot
    // minimums over those never overestimates the cheapest open-slot fill.
    // Slots fillable only by locked players are skipped: their cost is
    // already counted in locked_salary.
    let locked_ids: HashSet<_> = locked.iter().map(|p| &p.id).collect();
    let locked_salary: u32 = locked.iter().map(|p| p.salary).sum();
    let mut slot_minimums: Vec<u32> = Vec::with_capacity(candidates.len());
    for cands in candidates {
        let min = cands
            .iter()
            .map(|&i| &pool.players()[i])
            .filter(|p| !locked_ids.contains(&p.id))
            .map(|p| p.salary)
            .min();
        if let Some(m) = min {
            slot_minimums.push(m);
        }
    }
    slot_minimums.sort_unstable();
    let open_slots = roster.slot_count() - locked.len();
    let cheapest_fill: u32 = slot_minimums.iter().take(open_slots).sum();
    let lower_bound = locked_salary + cheapest_fill;
    if lower_bound > constraints.salary_cap {
        return Err(InfeasiblePoolError {
            class: ConstraintClass::Salary,
            detail: format!(
                "locked players cost {locked_salary}, leaving {} for {open_slots} open slots, \
                 but the cheapest fill costs {cheapest_fill}",
                constraints.salary_cap.saturating_sub(locked_salary)
            ),
        });
    }
    Ok(())
}

/// If more slots than the team cap allows can only be filled by one team's
/// non-defense players, no lineup can ever satisfy the cap.
fn check_team_only_fill(
    pool: &PlayerPool,
    constraints: &ConstraintSet,
    candidates: &[Vec<usize>],
) -> Result<(), InfeasiblePoolError> {
    let mut forced: HashMap<&str, usize> = HashMap::new();
    for cands in candidates {
        let players: Vec<_> = cands.iter().map(|&i| &pool.players()[i]).collect();
        let Some(first) = players.first() else { continue };
        if first.position.is_defense() {
            continue;
        }
        let team = first.team.as_str();
        if players
            .iter()
            .all(|p| p.team == team && !p.position.is_defense())
        {
            *forced.entry(team).or_insert(0) += 1;
        }
    }
    for (team, count) in forced {
        if count > constraints.max_players_per_team {
            return Err(InfeasiblePoolError {
                class: ConstraintClass::TeamCap,
                detail: format!(
                    "{count} slots can only be filled by non-defense players from {team}, \
                     exceeding the team cap of {}",
                    constraints.max_players_per_team
                ),
            });
        }
    }
    Ok(())
}
