//! The flowering schedule attached to a cycle.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::week_phase::{classify, PhaseInfo, WeekPhase};

/// Number of weeks in the standard schedule.
pub const STANDARD_WEEK_COUNT: u32 = 10;

/// One week of a flowering schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloweringWeek {
    pub week_number: u32,
    pub phase_name: String,
}

impl FloweringWeek {
    pub fn phase_info(&self) -> PhaseInfo {
        classify(Some(&self.phase_name))
    }
}

/// Produces the fixed 10-week schedule: weeks 1-3 PRE-FLORA, 4-6 FLORA,
/// 7-8 MADURACION, 9 LAVADO, 10 SECADO.
pub fn generate_standard_weeks() -> Vec<FloweringWeek> {
    (1..=STANDARD_WEEK_COUNT)
        .filter_map(|week_number| {
            WeekPhase::for_standard_week(week_number).map(|phase| FloweringWeek {
                week_number,
                phase_name: phase.label().to_string(),
            })
        })
        .collect()
}

/// Ordered week -> phase mapping of a flowering cycle.
///
/// Generated once when the cycle first enters flowering; afterwards it only
/// grows through [`FloweringSchedule::append_week`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloweringSchedule(Vec<FloweringWeek>);

impl FloweringSchedule {
    pub fn standard() -> Self {
        Self(generate_standard_weeks())
    }

    /// Wraps weeks read back from the store, keeping their stored order.
    pub fn from_weeks(weeks: Vec<FloweringWeek>) -> Self {
        Self(weeks)
    }

    pub fn weeks(&self) -> &[FloweringWeek] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn week_numbers(&self) -> Vec<u32> {
        self.0.iter().map(|w| w.week_number).collect()
    }

    pub fn week(&self, week_number: u32) -> Option<&FloweringWeek> {
        self.0.iter().find(|w| w.week_number == week_number)
    }

    pub fn contains(&self, week_number: u32) -> bool {
        self.week(week_number).is_some()
    }

    /// Appends one extra week after the highest existing week number.
    pub fn append_week(&mut self, phase_name: &str) -> Result<&FloweringWeek, ValidationError> {
        let phase_name = phase_name.trim();
        if phase_name.is_empty() {
            return Err(ValidationError::empty_field("phase_name"));
        }
        let next = self.0.iter().map(|w| w.week_number).max().unwrap_or(0) + 1;
        self.0.push(FloweringWeek {
            week_number: next,
            phase_name: phase_name.to_string(),
        });
        Ok(&self.0[self.0.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_schedule_has_ten_ordered_weeks() {
        let weeks = generate_standard_weeks();
        assert_eq!(weeks.len(), 10);
        let numbers: Vec<u32> = weeks.iter().map(|w| w.week_number).collect();
        assert_eq!(numbers, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn standard_schedule_phase_labels() {
        let labels: Vec<String> = generate_standard_weeks()
            .into_iter()
            .map(|w| w.phase_name)
            .collect();
        assert_eq!(
            labels,
            vec![
                "PRE-FLORA", "PRE-FLORA", "PRE-FLORA", "FLORA", "FLORA", "FLORA",
                "MADURACION", "MADURACION", "LAVADO", "SECADO",
            ]
        );
    }

    #[test]
    fn append_week_continues_numbering() {
        let mut schedule = FloweringSchedule::standard();
        let added = schedule.append_week("FLORA").unwrap().clone();
        assert_eq!(added.week_number, 11);
        assert_eq!(schedule.len(), 11);
        assert!(schedule.contains(11));
    }

    #[test]
    fn append_week_requires_a_label() {
        let mut schedule = FloweringSchedule::standard();
        assert!(schedule.append_week("  ").is_err());
        assert_eq!(schedule.len(), 10);
    }

    #[test]
    fn extra_week_with_custom_label_classifies_as_finished() {
        let mut schedule = FloweringSchedule::standard();
        schedule.append_week("REVEG").unwrap();
        assert!(schedule.week(11).unwrap().phase_info().is_finished());
    }

    #[test]
    fn wire_shape_matches_stored_documents() {
        let json = serde_json::to_value(FloweringSchedule::standard()).unwrap();
        assert_eq!(json[0], serde_json::json!({ "weekNumber": 1, "phaseName": "PRE-FLORA" }));
        let back: FloweringSchedule = serde_json::from_value(json).unwrap();
        assert_eq!(back, FloweringSchedule::standard());
    }
}
