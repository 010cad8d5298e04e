use slate_model::{Lineup, PlayerId};
use std::collections::HashMap;

/// Accumulated portfolio state for one run: the ordered accepted lineups
/// and per-player exposure counters.
///
/// `accept` is the only place exposure state is mutated, and it is
/// append-only within a run. State is never shared across runs.
#[derive(Debug, Default)]
pub struct PortfolioState {
    lineups: Vec<Lineup>,
    exposure: HashMap<PlayerId, u32>,
}

impl PortfolioState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an accepted lineup and bump its players' exposure counters.
    pub fn accept(&mut self, lineup: Lineup) {
        for id in lineup.player_ids() {
            *self.exposure.entry(id.clone()).or_insert(0) += 1;
        }
        self.lineups.push(lineup);
    }

    #[inline]
    pub fn lineups(&self) -> &[Lineup] {
        &self.lineups
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lineups.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lineups.is_empty()
    }

    /// Number of accepted lineups the player appears in so far.
    pub fn appearances(&self, id: &PlayerId) -> u32 {
        self.exposure.get(id).copied().unwrap_or(0)
    }

    pub fn into_lineups(self) -> Vec<Lineup> {
        self.lineups
    }
}
