use crate::{ConfigError, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One roster slot: a name and the position set that may fill it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSlot {
    pub name: String,
    pub eligible: Vec<Position>,
}

impl RosterSlot {
    pub fn new(name: impl Into<String>, eligible: &[Position]) -> Self {
        Self { name: name.into(), eligible: eligible.to_vec() }
    }

    #[inline]
    pub fn accepts(&self, position: Position) -> bool {
        self.eligible.contains(&position)
    }
}

/// Fixed ordered slot template for one contest format. The slot count never
/// changes during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterTemplate {
    slots: Vec<RosterSlot>,
}

impl RosterTemplate {
    pub fn new(slots: Vec<RosterSlot>) -> Self {
        Self { slots }
    }

    /// Classic NFL template: QB, RB x2, WR x3, TE, FLEX (RB/WR/TE), DST.
    pub fn classic_nfl() -> Self {
        use Position::*;
        Self::new(vec![
            RosterSlot::new("QB", &[Qb]),
            RosterSlot::new("RB1", &[Rb]),
            RosterSlot::new("RB2", &[Rb]),
            RosterSlot::new("WR1", &[Wr]),
            RosterSlot::new("WR2", &[Wr]),
            RosterSlot::new("WR3", &[Wr]),
            RosterSlot::new("TE", &[Te]),
            RosterSlot::new("FLEX", &[Rb, Wr, Te]),
            RosterSlot::new("DST", &[Dst]),
        ])
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn slots(&self) -> &[RosterSlot] {
        &self.slots
    }

    /// Indices of the slots a player at `position` may fill.
    pub fn eligible_slots(&self, position: Position) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.accepts(position))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slots.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        let mut seen = HashSet::new();
        for slot in &self.slots {
            if slot.eligible.is_empty() {
                return Err(ConfigError::EmptyEligibleSet { slot: slot.name.clone() });
            }
            if !seen.insert(slot.name.as_str()) {
                return Err(ConfigError::DuplicateSlotName { slot: slot.name.clone() });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_template_shape() {
        let t = RosterTemplate::classic_nfl();
        assert_eq!(t.slot_count(), 9);
        assert!(t.validate().is_ok());
        // FLEX accepts RB/WR/TE, never QB or DST
        assert_eq!(t.eligible_slots(Position::Rb), vec![1, 2, 7]);
        assert_eq!(t.eligible_slots(Position::Qb), vec![0]);
        assert_eq!(t.eligible_slots(Position::Dst), vec![8]);
    }

    #[test]
    fn validate_rejects_degenerate_templates() {
        assert_eq!(
            RosterTemplate::new(vec![]).validate(),
            Err(ConfigError::EmptyRoster)
        );
        let empty_set = RosterTemplate::new(vec![RosterSlot::new("X", &[])]);
        assert!(matches!(
            empty_set.validate(),
            Err(ConfigError::EmptyEligibleSet { .. })
        ));
        let dup = RosterTemplate::new(vec![
            RosterSlot::new("WR", &[Position::Wr]),
            RosterSlot::new("WR", &[Position::Wr]),
        ]);
        assert!(matches!(
            dup.validate(),
            Err(ConfigError::DuplicateSlotName { .. })
        ));
    }
}
