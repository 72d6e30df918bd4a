//! LiveCache - The authoritative in-memory tables of a signed-in user.
//!
//! Each table is replaced wholesale from a store snapshot. Readers take a
//! [`CacheView`], an immutable copy that shares the table allocations, so a
//! derived computation always sees one consistent state.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{CycleId, RoomId};
use crate::domain::inventory::{Genetic, Seed};
use crate::domain::room::Room;

/// The four cached collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Rooms,
    Cycles,
    Genetics,
    Seeds,
}

impl Table {
    pub const ALL: [Table; 4] = [Table::Rooms, Table::Cycles, Table::Genetics, Table::Seeds];
}

/// Read-only view of the cache at one revision.
#[derive(Debug, Clone, Default)]
pub struct CacheView {
    rooms: Arc<Vec<Room>>,
    cycles: Arc<Vec<Cycle>>,
    genetics: Arc<Vec<Genetic>>,
    seeds: Arc<Vec<Seed>>,
    synced: [bool; 4],
    revision: u64,
}

impl CacheView {
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    pub fn genetics(&self) -> &[Genetic] {
        &self.genetics
    }

    pub fn seeds(&self) -> &[Seed] {
        &self.seeds
    }

    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| &r.id == id)
    }

    pub fn cycle(&self, id: &CycleId) -> Option<&Cycle> {
        self.cycles.iter().find(|c| c.id() == id)
    }

    pub fn cycles_in_room<'a>(&'a self, room_id: &'a RoomId) -> impl Iterator<Item = &'a Cycle> {
        self.cycles.iter().filter(move |c| c.room_id() == room_id)
    }

    /// Whether `table` has received its first snapshot.
    pub fn is_synced(&self, table: Table) -> bool {
        self.synced[table as usize]
    }

    pub fn all_synced(&self) -> bool {
        self.synced.iter().all(|s| *s)
    }

    /// Incremented on every table replacement.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Owner of the cached tables.
///
/// Only the snapshot path replaces tables; everything else reads views.
#[derive(Debug, Clone)]
pub struct LiveCache {
    tx: Arc<watch::Sender<CacheView>>,
}

impl LiveCache {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(CacheView::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn view(&self) -> CacheView {
        self.tx.borrow().clone()
    }

    /// Receiver notified after every replacement.
    pub fn changes(&self) -> watch::Receiver<CacheView> {
        self.tx.subscribe()
    }

    pub(crate) fn replace_rooms(&self, rooms: Vec<Room>) {
        self.replace(Table::Rooms, |view| view.rooms = Arc::new(rooms));
    }

    pub(crate) fn replace_cycles(&self, cycles: Vec<Cycle>) {
        self.replace(Table::Cycles, |view| view.cycles = Arc::new(cycles));
    }

    pub(crate) fn replace_genetics(&self, genetics: Vec<Genetic>) {
        self.replace(Table::Genetics, |view| view.genetics = Arc::new(genetics));
    }

    pub(crate) fn replace_seeds(&self, seeds: Vec<Seed>) {
        self.replace(Table::Seeds, |view| view.seeds = Arc::new(seeds));
    }

    fn replace(&self, table: Table, apply: impl FnOnce(&mut CacheView)) {
        self.tx.send_modify(|view| {
            apply(view);
            view.synced[table as usize] = true;
            view.revision += 1;
        });
    }
}

impl Default for LiveCache {
    fn default() -> Self {
        Self::new()
    }
}
