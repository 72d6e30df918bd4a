//! AddFloweringWeekHandler - Appends one extra week to a cycle's schedule.

use std::sync::Arc;

use crate::application::handlers::lookup::load_cycle;
use crate::application::handlers::report;
use crate::application::paths::UserPaths;
use crate::application::records::cycle_schedule_fields;
use crate::domain::foundation::{CommandMetadata, CycleId, DomainError, ErrorCode};
use crate::domain::schedule::FloweringWeek;
use crate::ports::{DocumentStore, Notifier};

#[derive(Debug, Clone)]
pub struct AddFloweringWeekCommand {
    pub cycle_id: CycleId,
    /// Week-level phase label for the new week, e.g. `SECADO`.
    pub phase_name: String,
}

#[derive(Debug, Clone)]
pub struct AddFloweringWeekResult {
    pub week: FloweringWeek,
    pub total_weeks: usize,
}

#[derive(Debug, Clone)]
pub enum AddFloweringWeekError {
    CycleNotFound(CycleId),
    Domain(DomainError),
}

impl std::fmt::Display for AddFloweringWeekError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddFloweringWeekError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            AddFloweringWeekError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AddFloweringWeekError {}

impl From<DomainError> for AddFloweringWeekError {
    fn from(err: DomainError) -> Self {
        AddFloweringWeekError::Domain(err)
    }
}

pub struct AddFloweringWeekHandler {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl AddFloweringWeekHandler {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn handle(
        &self,
        cmd: AddFloweringWeekCommand,
        metadata: CommandMetadata,
    ) -> Result<AddFloweringWeekResult, AddFloweringWeekError> {
        let result = self.execute(cmd, &metadata).await;
        report(self.notifier.as_ref(), &metadata, result, "Week added")
    }

    async fn execute(
        &self,
        cmd: AddFloweringWeekCommand,
        metadata: &CommandMetadata,
    ) -> Result<AddFloweringWeekResult, AddFloweringWeekError> {
        let paths = UserPaths::new(&metadata.user_id);

        let mut cycle = load_cycle(self.store.as_ref(), &paths, &cmd.cycle_id)
            .await?
            .ok_or_else(|| AddFloweringWeekError::CycleNotFound(cmd.cycle_id.clone()))?;

        let week = cycle.add_flowering_week(&cmd.phase_name)?;
        let schedule = cycle.flowering_weeks().ok_or_else(|| {
            DomainError::new(ErrorCode::ScheduleMissing, "Cycle has no flowering schedule")
        })?;
        self.store
            .update(&paths.cycle(&cmd.cycle_id), cycle_schedule_fields(schedule)?)
            .await?;

        tracing::info!(
            user_id = %metadata.user_id,
            cycle_id = %cmd.cycle_id,
            week = week.week_number,
            phase = %week.phase_name,
            "Flowering week added"
        );
        Ok(AddFloweringWeekResult {
            week,
            total_weeks: schedule.len(),
        })
    }
}
