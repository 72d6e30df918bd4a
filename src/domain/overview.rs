//! Read models for the room overview and name search.

use serde::Serialize;

use super::cycle::{Cycle, CyclePhase, CycleProgress};
use super::foundation::{CycleId, Timestamp};
use super::inventory::{Genetic, Seed};
use super::room::Room;

/// Anything that can be searched by name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Room {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Cycle {
    fn name(&self) -> &str {
        Cycle::name(self)
    }
}

impl Named for Genetic {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Seed {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Case-insensitive substring match; a blank filter matches everything.
pub fn name_matches(name: &str, filter: &str) -> bool {
    let filter = filter.trim();
    filter.is_empty() || name.to_lowercase().contains(&filter.to_lowercase())
}

pub fn filter_by_name<'a, T: Named>(items: &'a [T], filter: &str) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| name_matches(item.name(), filter))
        .collect()
}

/// An active cycle as listed on its room card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CyclePreview {
    pub cycle_id: CycleId,
    pub name: String,
    pub phase: CyclePhase,
    pub display_class: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<CycleProgress>,
}

impl CyclePreview {
    pub fn of(cycle: &Cycle, now: &Timestamp) -> Self {
        Self {
            cycle_id: cycle.id().clone(),
            name: cycle.name().to_string(),
            phase: cycle.phase(),
            display_class: cycle.display_class(now),
            progress: cycle.progress(now),
        }
    }

    /// Card status line, e.g. `Día 9 (Semana 2 / 10)`.
    pub fn status(&self) -> Option<String> {
        self.progress.as_ref().map(CycleProgress::summary)
    }
}

/// One room card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOverview {
    pub room: Room,
    pub active_cycles: Vec<CyclePreview>,
}

/// Builds room cards in room order, keeping cycle order within each room.
pub fn room_overviews(
    rooms: &[Room],
    cycles: &[Cycle],
    filter: &str,
    now: &Timestamp,
) -> Vec<RoomOverview> {
    filter_by_name(rooms, filter)
        .into_iter()
        .map(|room| RoomOverview {
            room: room.clone(),
            active_cycles: cycles
                .iter()
                .filter(|c| c.room_id() == &room.id && c.phase().is_active())
                .map(|c| CyclePreview::of(c, now))
                .collect(),
        })
        .collect()
}
