use crate::PlayerId;
use serde::Serialize;

/// One filled roster slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupSlot {
    pub slot: String,
    pub player: PlayerId,
}

/// An accepted lineup: exactly one player per slot, no duplicates, within
/// the salary cap. Immutable once built by a successful solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lineup {
    slots: Vec<LineupSlot>,
    total_salary: u32,
    total_objective: f64,
}

impl Lineup {
    pub fn new(slots: Vec<LineupSlot>, total_salary: u32, total_objective: f64) -> Self {
        Self { slots, total_salary, total_objective }
    }

    #[inline]
    pub fn slots(&self) -> &[LineupSlot] {
        &self.slots
    }

    #[inline]
    pub fn total_salary(&self) -> u32 {
        self.total_salary
    }

    #[inline]
    pub fn total_objective(&self) -> f64 {
        self.total_objective
    }

    pub fn player_ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.slots.iter().map(|s| &s.player)
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.slots.iter().any(|s| &s.player == id)
    }

    /// Number of players shared with another lineup.
    pub fn overlap(&self, other: &Lineup) -> usize {
        self.player_ids().filter(|id| other.contains(id)).count()
    }
}
