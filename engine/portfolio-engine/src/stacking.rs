//! Stacking/correlation rules, expressed as constraint inputs for the
//! builder rather than post-hoc filters on an already-built lineup.

use lineup_solver::GameStackRule;
use slate_model::{PlayerPool, RunConfig};
use tracing::warn;

/// The game-stack minimum over the designated high-total game, if the run
/// enables it. The game itself (and the minimum) are resolved externally,
/// e.g. from market-odds data, and arrive through configuration.
pub fn game_stack_rule(config: &RunConfig, pool: &PlayerPool) -> Option<GameStackRule> {
    if !config.enable_game_stack {
        return None;
    }
    let (home, away) = config.game_stack_teams.clone()?;
    let rule = GameStackRule {
        teams: (home.to_uppercase(), away.to_uppercase()),
        min_players: config.game_stack_min as usize,
    };
    let in_game = pool.iter().filter(|p| rule.covers(&p.team)).count();
    if in_game < rule.min_players {
        warn!(
            game = %format!("{}@{}", rule.teams.0, rule.teams.1),
            available = in_game,
            required = rule.min_players,
            "designated game has fewer pool players than the stack minimum"
        );
    }
    Some(rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slate_model::{Player, Position};

    fn pool() -> PlayerPool {
        PlayerPool::new(vec![
            Player::new("A", "SEA", "DET", Position::Wr, 5000, 10.0, 50.0),
            Player::new("B", "DET", "SEA", Position::Rb, 5000, 10.0, 50.0),
            Player::new("C", "KC", "BUF", Position::Qb, 5000, 10.0, 50.0),
        ])
        .unwrap()
    }

    #[test]
    fn disabled_game_stack_yields_no_rule() {
        let cfg = RunConfig::new(5, 50_000);
        assert!(game_stack_rule(&cfg, &pool()).is_none());
    }

    #[test]
    fn rule_normalizes_team_codes() {
        let mut cfg = RunConfig::new(5, 50_000);
        cfg.enable_game_stack = true;
        cfg.game_stack_min = 2;
        cfg.game_stack_teams = Some(("sea".into(), "det".into()));
        let rule = game_stack_rule(&cfg, &pool()).unwrap();
        assert_eq!(rule.teams, ("SEA".to_string(), "DET".to_string()));
        assert!(rule.covers("SEA"));
        assert_eq!(rule.min_players, 2);
    }
}
