use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a journal entry, stored as its Spanish label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogKind {
    #[serde(rename = "Riego")]
    Watering,
    #[serde(rename = "Cambio de Solución")]
    SolutionChange,
    #[serde(rename = "Control de Plagas")]
    PestControl,
    #[serde(rename = "Podas")]
    Pruning,
}

impl LogKind {
    pub const ALL: [LogKind; 4] = [
        LogKind::Watering,
        LogKind::SolutionChange,
        LogKind::PestControl,
        LogKind::Pruning,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LogKind::Watering => "Riego",
            LogKind::SolutionChange => "Cambio de Solución",
            LogKind::PestControl => "Control de Plagas",
            LogKind::Pruning => "Podas",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
