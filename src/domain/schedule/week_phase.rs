//! Week-level flowering phases and their display classification.

use serde::Serialize;
use std::fmt;

/// Sub-stage of the flowering schedule, in week order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeekPhase {
    PreFlora,
    Flora,
    Maduracion,
    Lavado,
    Secado,
}

impl WeekPhase {
    /// All phases in schedule order.
    pub const ALL: [WeekPhase; 5] = [
        WeekPhase::PreFlora,
        WeekPhase::Flora,
        WeekPhase::Maduracion,
        WeekPhase::Lavado,
        WeekPhase::Secado,
    ];

    /// The stored label for this phase.
    pub fn label(&self) -> &'static str {
        match self {
            WeekPhase::PreFlora => "PRE-FLORA",
            WeekPhase::Flora => "FLORA",
            WeekPhase::Maduracion => "MADURACION",
            WeekPhase::Lavado => "LAVADO",
            WeekPhase::Secado => "SECADO",
        }
    }

    /// CSS-style class used by views to colour the week.
    pub fn display_class(&self) -> &'static str {
        match self {
            WeekPhase::PreFlora => "pre-flora",
            WeekPhase::Flora => "flora",
            WeekPhase::Maduracion => "maduracion",
            WeekPhase::Lavado => "lavado",
            WeekPhase::Secado => "secado",
        }
    }

    /// Exact match on the stored label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|phase| phase.label() == label)
    }

    /// Phase of a week in the standard 10-week schedule.
    pub fn for_standard_week(week_number: u32) -> Option<Self> {
        match week_number {
            1..=3 => Some(WeekPhase::PreFlora),
            4..=6 => Some(WeekPhase::Flora),
            7..=8 => Some(WeekPhase::Maduracion),
            9 => Some(WeekPhase::Lavado),
            10 => Some(WeekPhase::Secado),
            _ => None,
        }
    }
}

impl fmt::Display for WeekPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display metadata for a week's phase label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseInfo {
    pub name: &'static str,
    pub display_class: &'static str,
}

impl PhaseInfo {
    /// Terminal classification for labels outside the taxonomy.
    pub const FINISHED: PhaseInfo = PhaseInfo {
        name: "Finalizado",
        display_class: "finalizado",
    };

    pub fn is_finished(&self) -> bool {
        *self == Self::FINISHED
    }
}

impl From<WeekPhase> for PhaseInfo {
    fn from(phase: WeekPhase) -> Self {
        PhaseInfo {
            name: phase.label(),
            display_class: phase.display_class(),
        }
    }
}

/// Maps a stored phase label to display metadata.
///
/// Total: unknown or absent labels fall back to [`PhaseInfo::FINISHED`].
pub fn classify(phase_name: Option<&str>) -> PhaseInfo {
    phase_name
        .and_then(WeekPhase::from_label)
        .map(PhaseInfo::from)
        .unwrap_or(PhaseInfo::FINISHED)
}
