//! Cycle aggregate - one cultivation run inside a room.
//!
//! The cycle owns its flowering schedule. The schedule is generated exactly
//! once, either when the cycle is created already flowering or on the first
//! transition into flowering, and is carried unchanged through every later
//! edit or transition.

use crate::domain::foundation::{
    CalendarDate, CycleId, DomainError, ErrorCode, RoomId, StateMachine, Timestamp,
    ValidationError,
};
use crate::domain::progress::Elapsed;
use crate::domain::schedule::{FloweringSchedule, FloweringWeek, STANDARD_WEEK_COUNT};

use super::{CultivationType, CyclePhase, CycleProgress};

/// Display class for cycles that are not in a flowering week.
pub const VEGETATIVE_DISPLAY_CLASS: &str = "vege";

/// Editable fields of a cycle, as entered in the cycle form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleDetails {
    pub name: String,
    pub room_id: RoomId,
    pub phase: CyclePhase,
    pub cultivation_type: CultivationType,
    pub vegetative_start_date: Option<String>,
    pub flowering_start_date: Option<String>,
    pub notes: String,
}

impl CycleDetails {
    pub fn new(name: impl Into<String>, room_id: RoomId, phase: CyclePhase) -> Self {
        Self {
            name: name.into(),
            room_id,
            phase,
            cultivation_type: CultivationType::default(),
            vegetative_start_date: None,
            flowering_start_date: None,
            notes: String::new(),
        }
    }

    pub fn with_cultivation_type(mut self, cultivation_type: CultivationType) -> Self {
        self.cultivation_type = cultivation_type;
        self
    }

    pub fn with_vegetative_start_date(mut self, date: impl Into<String>) -> Self {
        self.vegetative_start_date = Some(date.into());
        self
    }

    pub fn with_flowering_start_date(mut self, date: impl Into<String>) -> Self {
        self.flowering_start_date = Some(date.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Trims text, drops blank dates and rejects a blank name or a date that
    /// is not `YYYY-MM-DD`.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self {
            name,
            vegetative_start_date: normalize_date(
                "vegetative_start_date",
                self.vegetative_start_date,
            )?,
            flowering_start_date: normalize_date("flowering_start_date", self.flowering_start_date)?,
            notes: self.notes.trim().to_string(),
            ..self
        })
    }
}

fn normalize_date(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, ValidationError> {
    match value.map(|v| v.trim().to_string()) {
        None => Ok(None),
        Some(v) if v.is_empty() => Ok(None),
        Some(v) => {
            CalendarDate::parse(&v)
                .map_err(|_| ValidationError::invalid_format(field, "expected YYYY-MM-DD"))?;
            Ok(Some(v))
        }
    }
}

/// A validated cycle that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCycle {
    details: CycleDetails,
    flowering_weeks: Option<FloweringSchedule>,
}

impl NewCycle {
    /// Validates the details and, for a cycle created already flowering,
    /// attaches the standard schedule.
    pub fn from_details(details: CycleDetails) -> Result<Self, ValidationError> {
        let details = details.normalized()?;
        let flowering_weeks =
            (details.phase == CyclePhase::Flowering).then(FloweringSchedule::standard);
        Ok(Self {
            details,
            flowering_weeks,
        })
    }

    pub fn details(&self) -> &CycleDetails {
        &self.details
    }

    pub fn flowering_weeks(&self) -> Option<&FloweringSchedule> {
        self.flowering_weeks.as_ref()
    }
}

/// Outcome of a phase change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: CyclePhase,
    pub to: CyclePhase,
    /// True only on the call that created the flowering schedule.
    pub schedule_generated: bool,
}

impl PhaseChange {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// The Cycle aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    id: CycleId,
    details: CycleDetails,
    flowering_weeks: Option<FloweringSchedule>,
}

impl Cycle {
    /// Materializes a freshly written cycle under its store-assigned id.
    pub fn from_new(id: CycleId, new_cycle: NewCycle) -> Self {
        Self {
            id,
            details: new_cycle.details,
            flowering_weeks: new_cycle.flowering_weeks,
        }
    }

    /// Reconstitutes a cycle from a stored record without validation.
    pub fn reconstitute(
        id: CycleId,
        details: CycleDetails,
        flowering_weeks: Option<FloweringSchedule>,
    ) -> Self {
        Self {
            id,
            details,
            flowering_weeks,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn id(&self) -> &CycleId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn room_id(&self) -> &RoomId {
        &self.details.room_id
    }

    pub fn phase(&self) -> CyclePhase {
        self.details.phase
    }

    pub fn cultivation_type(&self) -> CultivationType {
        self.details.cultivation_type
    }

    pub fn details(&self) -> &CycleDetails {
        &self.details
    }

    pub fn flowering_weeks(&self) -> Option<&FloweringSchedule> {
        self.flowering_weeks.as_ref()
    }

    /// Declared week numbers, empty until a schedule exists.
    pub fn week_numbers(&self) -> Vec<u32> {
        self.flowering_weeks
            .as_ref()
            .map(FloweringSchedule::week_numbers)
            .unwrap_or_default()
    }

    pub fn declares_week(&self, week_number: u32) -> bool {
        self.flowering_weeks
            .as_ref()
            .is_some_and(|s| s.contains(week_number))
    }

    // ───────────────────────────────────────────────────────────────
    // Lifecycle
    // ───────────────────────────────────────────────────────────────

    /// Moves the cycle forward to `target`.
    ///
    /// Requesting the current phase is a no-op. Entering flowering generates
    /// the standard schedule only when none exists yet.
    pub fn transition_to(&mut self, target: CyclePhase) -> Result<PhaseChange, DomainError> {
        let from = self.details.phase;
        if from != target {
            from.transition_to(target)?;
        }
        Ok(self.enter(target))
    }

    /// Sets the phase without checking the lifecycle order.
    fn enter(&mut self, target: CyclePhase) -> PhaseChange {
        let from = self.details.phase;
        self.details.phase = target;
        let schedule_generated =
            from != target && target == CyclePhase::Flowering && self.ensure_schedule();
        PhaseChange {
            from,
            to: target,
            schedule_generated,
        }
    }

    /// Changes phase and records the start date of the phase being entered.
    pub fn change_phase(
        &mut self,
        target: CyclePhase,
        start_date: Option<String>,
    ) -> Result<PhaseChange, DomainError> {
        let field = match target {
            CyclePhase::Vegetative => "vegetative_start_date",
            _ => "flowering_start_date",
        };
        let start_date = normalize_date(field, start_date)?;
        let change = self.transition_to(target)?;
        if let Some(date) = start_date {
            match target {
                CyclePhase::Vegetative => self.details.vegetative_start_date = Some(date),
                CyclePhase::Flowering => self.details.flowering_start_date = Some(date),
                CyclePhase::Finished => {}
            }
        }
        Ok(change)
    }

    /// Replaces the editable fields, phase included.
    ///
    /// Unlike [`Self::change_phase`], an edit may set any phase, so a cycle
    /// finished by mistake can be reopened. The schedule is kept as is, and is
    /// generated if the edit takes the cycle into flowering without one.
    pub fn apply_details(&mut self, details: CycleDetails) -> Result<PhaseChange, DomainError> {
        let details = details.normalized()?;
        let target = details.phase;
        self.details = CycleDetails {
            phase: self.details.phase,
            ..details
        };
        Ok(self.enter(target))
    }

    /// Reassigns the cycle to another room. Phase and schedule are untouched.
    pub fn move_to_room(&mut self, target: RoomId) -> Result<(), DomainError> {
        if target == self.details.room_id {
            return Err(DomainError::new(
                ErrorCode::InvalidMoveTarget,
                "Cycle is already in the target room",
            )
            .with_detail("room_id", target.to_string()));
        }
        self.details.room_id = target;
        Ok(())
    }

    /// Appends a single extra week to an existing schedule.
    pub fn add_flowering_week(&mut self, phase_name: &str) -> Result<FloweringWeek, DomainError> {
        let schedule = self.flowering_weeks.as_mut().ok_or_else(|| {
            DomainError::new(
                ErrorCode::ScheduleMissing,
                "Cycle has no flowering schedule to extend",
            )
        })?;
        Ok(schedule.append_week(phase_name)?.clone())
    }

    fn ensure_schedule(&mut self) -> bool {
        if self.flowering_weeks.is_some() {
            return false;
        }
        self.flowering_weeks = Some(FloweringSchedule::standard());
        true
    }

    // ───────────────────────────────────────────────────────────────
    // Progress
    // ───────────────────────────────────────────────────────────────

    /// Current day/week of the active phase; `None` for finished cycles and
    /// when the relevant start date is missing, invalid or in the future.
    pub fn progress(&self, now: &Timestamp) -> Option<CycleProgress> {
        match self.details.phase {
            CyclePhase::Vegetative => {
                let elapsed = Elapsed::since(self.details.vegetative_start_date.as_deref(), now)?;
                Some(CycleProgress::vegetative(elapsed))
            }
            CyclePhase::Flowering => {
                let elapsed = Elapsed::since(self.details.flowering_start_date.as_deref(), now)?;
                let total_weeks = self
                    .flowering_weeks
                    .as_ref()
                    .map(|s| s.len() as u32)
                    .unwrap_or(STANDARD_WEEK_COUNT);
                let week_phase = self
                    .flowering_weeks
                    .as_ref()
                    .and_then(|s| s.week(elapsed.week))
                    .map(FloweringWeek::phase_info);
                Some(CycleProgress::flowering(elapsed, total_weeks, week_phase))
            }
            CyclePhase::Finished => None,
        }
    }

    /// Class used to colour the cycle in room overviews.
    pub fn display_class(&self, now: &Timestamp) -> &'static str {
        if self.details.phase != CyclePhase::Flowering || self.flowering_weeks.is_none() {
            return VEGETATIVE_DISPLAY_CLASS;
        }
        self.progress(now)
            .and_then(|p| p.week_phase)
            .map(|info| info.display_class)
            .unwrap_or(VEGETATIVE_DISPLAY_CLASS)
    }
}
