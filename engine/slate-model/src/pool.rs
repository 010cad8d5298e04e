use crate::{Player, PlayerId, PoolError};
use std::collections::HashMap;

/// Immutable-for-the-run collection of scored, eligible players.
///
/// Construction validates the pool invariants: non-empty, unique ids,
/// positive salaries, and no player flagged both locked and excluded.
#[derive(Debug, Clone)]
pub struct PlayerPool {
    players: Vec<Player>,
    by_id: HashMap<PlayerId, usize>,
}

impl PlayerPool {
    pub fn new(players: Vec<Player>) -> Result<Self, PoolError> {
        if players.is_empty() {
            return Err(PoolError::Empty);
        }
        let mut by_id = HashMap::with_capacity(players.len());
        for (idx, p) in players.iter().enumerate() {
            if p.salary == 0 {
                return Err(PoolError::NonPositiveSalary(p.id.clone()));
            }
            if p.locked && p.excluded {
                return Err(PoolError::LockExcludeConflict(p.id.clone()));
            }
            if by_id.insert(p.id.clone(), idx).is_some() {
                return Err(PoolError::DuplicateId(p.id.clone()));
            }
        }
        Ok(Self { players, by_id })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    #[inline]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.by_id.get(id).map(|&i| &self.players[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn locked(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.locked)
    }

    pub fn excluded(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.excluded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn player(name: &str, salary: u32) -> Player {
        Player::new(name, "KC", "BUF", Position::Wr, salary, 12.0, 55.0)
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = PlayerPool::new(vec![player("A", 5000), player("A", 6000)]).unwrap_err();
        assert!(matches!(err, PoolError::DuplicateId(_)));
    }

    #[test]
    fn rejects_zero_salary() {
        let err = PlayerPool::new(vec![player("A", 0)]).unwrap_err();
        assert!(matches!(err, PoolError::NonPositiveSalary(_)));
    }

    #[test]
    fn rejects_lock_exclude_conflict() {
        let conflicted = player("A", 5000).locked().excluded();
        let err = PlayerPool::new(vec![conflicted]).unwrap_err();
        assert!(matches!(err, PoolError::LockExcludeConflict(_)));
    }

    #[test]
    fn lookup_by_id() {
        let pool = PlayerPool::new(vec![player("A", 5000), player("B", 6000)]).unwrap();
        let id = PlayerId::from_name_team("B", "KC");
        assert_eq!(pool.get(&id).unwrap().salary, 6000);
        assert_eq!(pool.len(), 2);
    }
}
