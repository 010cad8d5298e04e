use chrono::{DateTime, Utc};
use serde::Serialize;
use slate_model::Lineup;
use std::fmt;

/// Terminal state of a run that got past preflight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Every requested lineup was generated.
    Complete,
    /// The run stopped early; `abort_reason` names the cause.
    Aborted,
}

/// Outcome of one portfolio run. A short portfolio is reported here as a
/// warning state, never as an error: whatever was generated is still valid
/// and returned in order of acceptance.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioReport {
    pub lineups: Vec<Lineup>,
    pub requested: u32,
    pub generated: u32,
    pub state: RunState,
    pub abort_reason: Option<String>,
    /// Relaxation steps applied during the run, in order.
    pub relaxations: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PortfolioReport {
    pub fn is_partial(&self) -> bool {
        self.generated < self.requested
    }
}

impl fmt::Display for PortfolioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "portfolio: {}/{} lineups", self.generated, self.requested)?;
        if let Some(reason) = &self.abort_reason {
            writeln!(f, "aborted: {reason}")?;
        }
        for step in &self.relaxations {
            writeln!(f, "relaxed: {step}")?;
        }
        for (i, lineup) in self.lineups.iter().enumerate() {
            writeln!(
                f,
                "#{:<3} salary {:>6}  objective {:>8.2}",
                i + 1,
                lineup.total_salary(),
                lineup.total_objective()
            )?;
            for slot in lineup.slots() {
                writeln!(f, "  {:<5} {}", slot.slot, slot.player)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_means_fewer_generated_than_requested() {
        let report = PortfolioReport {
            lineups: Vec::new(),
            requested: 5,
            generated: 3,
            state: RunState::Aborted,
            abort_reason: Some("gave up".into()),
            relaxations: vec!["uniqueness".into()],
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };
        assert!(report.is_partial());
        let text = report.to_string();
        assert!(text.contains("3/5"));
        assert!(text.contains("aborted: gave up"));
    }
}
