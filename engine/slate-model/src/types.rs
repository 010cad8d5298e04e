use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable player identity key.
///
/// Selection state and exposure counters are keyed by this, never by a row
/// index that can shift under sorting or filtering. Feeds that carry their
/// own id use it verbatim; otherwise a `NAME@TEAM` composite is derived.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Composite key for feeds without an explicit id.
    pub fn from_name_team(name: &str, team: &str) -> Self {
        Self(format!(
            "{}@{}",
            name.trim().to_uppercase().replace(' ', "_"),
            team.trim().to_uppercase()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Roster positions. `DST`, `D/ST` and `DEF` are all accepted spellings
/// for defense/special-teams, which is carved out of the team cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    #[serde(alias = "D/ST", alias = "DEF")]
    Dst,
}

impl Position {
    /// Defense/special-teams does not count toward the per-team player cap.
    #[inline]
    pub fn is_defense(&self) -> bool {
        matches!(self, Position::Dst)
    }

    /// Pass catchers are the stacking partners for a quarterback.
    #[inline]
    pub fn is_pass_catcher(&self) -> bool {
        matches!(self, Position::Wr | Position::Te)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Position::Qb => "QB",
            Position::Rb => "RB",
            Position::Wr => "WR",
            Position::Te => "TE",
            Position::Dst => "DST",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown position: '{0}'")]
pub struct ParsePositionError(pub String);

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Ok(Position::Qb),
            "RB" => Ok(Position::Rb),
            "WR" => Ok(Position::Wr),
            "TE" => Ok(Position::Te),
            "DST" | "D/ST" | "DEF" => Ok(Position::Dst),
            other => Err(ParsePositionError(other.to_string())),
        }
    }
}

/// A scored, eligible player as supplied by the upstream scoring pipeline.
///
/// `smart_value` is computed upstream; this engine only consumes it as an
/// optimization objective. Only the `locked`/`excluded` flags may be set
/// between loading and solving; everything else is immutable for the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team: String,
    pub opponent: String,
    pub position: Position,
    pub salary: u32,
    pub projection: f64,
    pub smart_value: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub excluded: bool,
}

impl Player {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        team: impl Into<String>,
        opponent: impl Into<String>,
        position: Position,
        salary: u32,
        projection: f64,
        smart_value: f64,
    ) -> Self {
        let name = name.into();
        let team = team.into();
        let id = PlayerId::from_name_team(&name, &team);
        Self {
            id,
            name,
            team,
            opponent: opponent.into(),
            position,
            salary,
            projection,
            smart_value,
            locked: false,
            excluded: false,
        }
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }
}
