//! LogEntry - One dated journal record filed under a flowering week.

use serde::Serialize;

use crate::domain::cycle::CultivationType;
use crate::domain::foundation::{CycleId, LogId, Timestamp, ValidationError};

use super::{format_fertilizers, Fertilizers, LogKind};

/// Pruning type that records how many clones were taken.
pub const CLONES_PRUNING: &str = "Clones";

/// Title used for waterings in hydroponic cycles.
const SOLUTION_CHECK_TITLE: &str = "Control de Solución";

/// Measurements shared by waterings and solution changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NutrientReading {
    pub ph: Option<f64>,
    pub ec: Option<f64>,
    pub fertilizers: Option<Fertilizers>,
}

impl NutrientReading {
    pub fn new(ph: Option<f64>, ec: Option<f64>) -> Self {
        Self {
            ph,
            ec,
            fertilizers: None,
        }
    }

    pub fn with_fertilizers(mut self, fertilizers: Fertilizers) -> Self {
        self.fertilizers = Some(fertilizers);
        self
    }

    pub fn fertilizer_summary(&self) -> String {
        format_fertilizers(self.fertilizers.as_ref())
    }
}

/// Type-specific payload of a log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum LogDetails {
    #[serde(rename = "Riego")]
    Watering(NutrientReading),
    #[serde(rename = "Cambio de Solución")]
    SolutionChange {
        #[serde(flatten)]
        reading: NutrientReading,
        litros: Option<f64>,
    },
    #[serde(rename = "Control de Plagas")]
    PestControl { notes: String },
    #[serde(rename = "Podas")]
    Pruning {
        #[serde(rename = "podaType")]
        poda_type: String,
        #[serde(rename = "clonesCount")]
        clones_count: Option<u32>,
    },
}

impl LogDetails {
    /// Pruning record; the clone count is only kept for clone cuts.
    pub fn pruning(poda_type: impl Into<String>, clones_count: Option<u32>) -> Self {
        let poda_type = poda_type.into();
        let clones_count = if poda_type == CLONES_PRUNING {
            Some(clones_count.unwrap_or(0))
        } else {
            None
        };
        LogDetails::Pruning {
            poda_type,
            clones_count,
        }
    }

    pub fn kind(&self) -> LogKind {
        match self {
            LogDetails::Watering(_) => LogKind::Watering,
            LogDetails::SolutionChange { .. } => LogKind::SolutionChange,
            LogDetails::PestControl { .. } => LogKind::PestControl,
            LogDetails::Pruning { .. } => LogKind::Pruning,
        }
    }

    pub fn reading(&self) -> Option<&NutrientReading> {
        match self {
            LogDetails::Watering(reading) | LogDetails::SolutionChange { reading, .. } => {
                Some(reading)
            }
            _ => None,
        }
    }

    /// Trims free text and rejects a pruning without a type.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        match self {
            LogDetails::PestControl { notes } => Ok(LogDetails::PestControl {
                notes: notes.trim().to_string(),
            }),
            LogDetails::Pruning {
                poda_type,
                clones_count,
            } => {
                let poda_type = poda_type.trim();
                if poda_type.is_empty() {
                    return Err(ValidationError::empty_field("poda_type"));
                }
                Ok(LogDetails::pruning(poda_type, clones_count))
            }
            other => Ok(other),
        }
    }
}

/// A log to be written; the store stamps its date.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLog {
    pub week: u32,
    pub details: LogDetails,
}

impl NewLog {
    pub fn new(week: u32, details: LogDetails) -> Self {
        Self { week, details }
    }
}

/// A stored log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: LogId,
    pub cycle_id: CycleId,
    pub week: u32,
    pub date: Timestamp,
    #[serde(flatten)]
    pub details: LogDetails,
}

impl LogEntry {
    pub fn kind(&self) -> LogKind {
        self.details.kind()
    }

    /// Heading for the entry as shown in the cycle journal.
    pub fn title(&self, cultivation_type: CultivationType) -> &'static str {
        match (self.kind(), cultivation_type) {
            (LogKind::Watering, CultivationType::Hydroponics) => SOLUTION_CHECK_TITLE,
            (kind, _) => kind.label(),
        }
    }
}
