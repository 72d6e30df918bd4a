//! CycleProgress - Day/week position of a cycle within its active phase.

use serde::Serialize;

use crate::domain::progress::Elapsed;
use crate::domain::schedule::PhaseInfo;

use super::CyclePhase;

/// Where a vegetative or flowering cycle stands today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleProgress {
    pub phase: CyclePhase,
    pub day: i64,
    pub week: u32,
    /// Length of the flowering schedule; not tracked for vegetative cycles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_weeks: Option<u32>,
    /// Phase of the current week when the schedule declares it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_phase: Option<PhaseInfo>,
}

impl CycleProgress {
    pub(crate) fn vegetative(elapsed: Elapsed) -> Self {
        Self {
            phase: CyclePhase::Vegetative,
            day: elapsed.day,
            week: elapsed.week,
            total_weeks: None,
            week_phase: None,
        }
    }

    pub(crate) fn flowering(
        elapsed: Elapsed,
        total_weeks: u32,
        week_phase: Option<PhaseInfo>,
    ) -> Self {
        Self {
            phase: CyclePhase::Flowering,
            day: elapsed.day,
            week: elapsed.week,
            total_weeks: Some(total_weeks),
            week_phase,
        }
    }

    /// Status line shown on a cycle card.
    pub fn summary(&self) -> String {
        match self.total_weeks {
            Some(total) => format!("Día {} (Semana {} / {})", self.day, self.week, total),
            None => format!("Día {} (Semana {}) de vegetativo", self.day, self.week),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flowering_summary_includes_total() {
        let progress = CycleProgress::flowering(Elapsed { day: 21, week: 3 }, 10, None);
        assert_eq!(progress.summary(), "Día 21 (Semana 3 / 10)");
    }

    #[test]
    fn vegetative_summary() {
        let progress = CycleProgress::vegetative(Elapsed { day: 14, week: 2 });
        assert_eq!(progress.summary(), "Día 14 (Semana 2) de vegetativo");
    }
}
