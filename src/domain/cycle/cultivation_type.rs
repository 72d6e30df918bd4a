//! Growing medium of a cycle.

use serde::{Deserialize, Serialize};

use crate::domain::log::LogKind;

/// Medium the plants grow in; decides which log kinds are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CultivationType {
    #[default]
    #[serde(rename = "Sustrato")]
    Substrate,
    #[serde(rename = "Hidroponia")]
    Hydroponics,
}

impl CultivationType {
    pub fn label(&self) -> &'static str {
        match self {
            CultivationType::Substrate => "Sustrato",
            CultivationType::Hydroponics => "Hidroponia",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Sustrato" => Some(CultivationType::Substrate),
            "Hidroponia" => Some(CultivationType::Hydroponics),
            _ => None,
        }
    }

    /// Log kinds a form should offer for this medium.
    pub fn offered_log_kinds(&self) -> &'static [LogKind] {
        match self {
            CultivationType::Substrate => {
                &[LogKind::Watering, LogKind::PestControl, LogKind::Pruning]
            }
            CultivationType::Hydroponics => &[
                LogKind::Watering,
                LogKind::SolutionChange,
                LogKind::PestControl,
                LogKind::Pruning,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solution_changes_are_only_offered_for_hydroponics() {
        assert!(!CultivationType::Substrate
            .offered_log_kinds()
            .contains(&LogKind::SolutionChange));
        assert!(CultivationType::Hydroponics
            .offered_log_kinds()
            .contains(&LogKind::SolutionChange));
    }

    #[test]
    fn labels_roundtrip() {
        for ty in [CultivationType::Substrate, CultivationType::Hydroponics] {
            assert_eq!(CultivationType::from_label(ty.label()), Some(ty));
        }
    }
}
