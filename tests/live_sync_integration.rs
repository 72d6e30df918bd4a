//! Integration tests for the realtime workspace.
//!
//! Writes go through the command handlers; the assertions read only from the
//! live cache and log views, which the store's snapshot streams keep current.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::timeout;

use grow_journal::adapters::{FileDocumentStore, FixedClock, InMemoryDocumentStore, RecordingNotifier};
use grow_journal::application::records::log_document;
use grow_journal::application::*;
use grow_journal::domain::cycle::{CycleDetails, CyclePhase};
use grow_journal::domain::foundation::{CommandMetadata, CycleId, RoomId, UserId};
use grow_journal::domain::log::{LogDetails, NewLog, NutrientReading};
use grow_journal::ports::{DocumentStore, Fields, NewDocument};

const WAIT: Duration = Duration::from_secs(2);

/// 2024-03-01T12:00:00Z
const MARCH_FIRST_NOON: i64 = 1_709_294_400_000;

fn user() -> UserId {
    UserId::new("grower-1").unwrap()
}

fn metadata() -> CommandMetadata {
    CommandMetadata::new(user()).with_source("test")
}

fn fields(value: serde_json::Value) -> Fields {
    value.as_object().cloned().unwrap_or_default()
}

struct Fixture {
    store: Arc<InMemoryDocumentStore>,
    notifier: Arc<RecordingNotifier>,
    workspace: Workspace,
}

async fn fixture() -> Fixture {
    let store = Arc::new(InMemoryDocumentStore::new());
    let clock = Arc::new(FixedClock::at_millis(MARCH_FIRST_NOON));
    let workspace = Workspace::open(user(), store.clone(), clock).await.unwrap();
    timeout(WAIT, workspace.synced()).await.unwrap();
    Fixture {
        store,
        notifier: Arc::new(RecordingNotifier::new()),
        workspace,
    }
}

impl Fixture {
    async fn room(&self, name: &str) -> RoomId {
        CreateRoomHandler::new(self.store.clone(), self.notifier.clone())
            .handle(
                CreateRoomCommand {
                    name: name.to_string(),
                },
                metadata(),
            )
            .await
            .unwrap()
            .room
            .id
    }

    async fn flowering_cycle(&self, room_id: &RoomId, name: &str) -> CycleId {
        CreateCycleHandler::new(self.store.clone(), self.notifier.clone())
            .handle(
                CreateCycleCommand {
                    details: CycleDetails::new(name, room_id.clone(), CyclePhase::Flowering)
                        .with_flowering_start_date("2024-02-20"),
                },
                metadata(),
            )
            .await
            .unwrap()
            .cycle
            .id()
            .clone()
    }

    async fn log(&self, cycle_id: &CycleId, week: u32) {
        AddLogHandler::new(self.store.clone(), self.notifier.clone())
            .handle(
                AddLogCommand {
                    cycle_id: cycle_id.clone(),
                    log: NewLog::new(
                        week,
                        LogDetails::Watering(NutrientReading::new(Some(5.8), None)),
                    ),
                },
                metadata(),
            )
            .await
            .unwrap();
    }
}

// =============================================================================
// Live cache
// =============================================================================

#[tokio::test]
async fn handler_writes_reach_the_room_overview() {
    let fx = fixture().await;
    let room = fx.room("Carpa 120").await;
    fx.flowering_cycle(&room, "Lemon Haze").await;

    timeout(WAIT, fx.workspace.wait_until(|v| v.cycles().len() == 1))
        .await
        .unwrap();

    let overview = fx.workspace.room_overview("");
    assert_eq!(overview.len(), 1);
    assert_eq!(overview[0].room.name, "Carpa 120");
    let progress = overview[0].active_cycles[0].progress.unwrap();
    assert_eq!(progress.day, 11);
    assert_eq!(progress.week, 2);
    assert_eq!(progress.total_weeks, Some(10));
}

#[tokio::test]
async fn overview_filter_matches_room_names() {
    let fx = fixture().await;
    let carpa = fx.room("Carpa").await;
    let armario = fx.room("Armario").await;
    fx.flowering_cycle(&carpa, "Lemon Haze").await;
    fx.flowering_cycle(&armario, "Gorilla").await;

    timeout(WAIT, fx.workspace.wait_until(|v| v.cycles().len() == 2))
        .await
        .unwrap();

    let matched = fx.workspace.room_overview("  arma ");
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].room.id, armario);
    assert_eq!(matched[0].active_cycles[0].name, "Gorilla");
    assert!(fx.workspace.room_overview("lemon").is_empty());
    assert_eq!(fx.workspace.room_overview("").len(), 2);
    assert_eq!(fx.workspace.room_overview("CARPA")[0].room.id, carpa);
}

#[tokio::test]
async fn unreadable_cycle_is_skipped() {
    let fx = fixture().await;
    let room = fx.room("Carpa").await;
    // No room reference
    fx.store
        .create(
            &fx.workspace.paths().cycles(),
            NewDocument::new(fields(json!({ "name": "Orphan", "phase": "Floración" }))),
        )
        .await
        .unwrap();
    let kept = fx.flowering_cycle(&room, "Lemon").await;

    let view = timeout(WAIT, fx.workspace.wait_until(|v| v.cycle(&kept).is_some()))
        .await
        .unwrap();

    assert_eq!(view.cycles().len(), 1);
    assert_eq!(fx.store.document_count(&fx.workspace.paths().cycles()), 2);
}

// =============================================================================
// Cycle log views
// =============================================================================

#[tokio::test]
async fn log_view_groups_logs_under_declared_weeks() {
    let fx = fixture().await;
    let room = fx.room("Carpa").await;
    let cycle_id = fx.flowering_cycle(&room, "Lemon").await;
    timeout(WAIT, fx.workspace.wait_until(|v| v.cycle(&cycle_id).is_some()))
        .await
        .unwrap();
    fx.log(&cycle_id, 1).await;
    fx.log(&cycle_id, 3).await;
    fx.log(&cycle_id, 3).await;

    let mut logs = fx.workspace.open_cycle_logs(&cycle_id).await.unwrap();
    let buckets = timeout(WAIT, logs.wait_until(|b| b.total_logs() == 3))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(buckets.week_numbers(), (1..=10).collect::<Vec<_>>());
    let week_three = buckets.get(3).unwrap();
    assert!(week_three[0].date >= week_three[1].date);
    assert_eq!(buckets.get(3).map(<[_]>::len), Some(2));
    assert_eq!(buckets.get(2).map(<[_]>::len), Some(0));
    assert_eq!(buckets.excluded(), 0);
}

#[tokio::test]
async fn added_week_brings_its_logs_into_view() {
    let fx = fixture().await;
    let room = fx.room("Carpa").await;
    let cycle_id = fx.flowering_cycle(&room, "Lemon").await;
    timeout(WAIT, fx.workspace.wait_until(|v| v.cycle(&cycle_id).is_some()))
        .await
        .unwrap();
    fx.log(&cycle_id, 2).await;
    // Filed before week 11 existed
    fx.store
        .create(
            &fx.workspace.paths().cycle_logs(&cycle_id),
            log_document(&NewLog::new(
                11,
                LogDetails::PestControl {
                    notes: "Neem".to_string(),
                },
            ))
            .unwrap(),
        )
        .await
        .unwrap();

    let mut logs = fx.workspace.open_cycle_logs(&cycle_id).await.unwrap();
    let before = timeout(WAIT, logs.wait_until(|b| b.total_logs() == 1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(before.excluded(), 1);
    assert!(before.get(11).is_none());

    AddFloweringWeekHandler::new(fx.store.clone(), fx.notifier.clone())
        .handle(
            AddFloweringWeekCommand {
                cycle_id: cycle_id.clone(),
                phase_name: "SECADO".to_string(),
            },
            metadata(),
        )
        .await
        .unwrap();

    let after = timeout(WAIT, logs.wait_until(|b| b.get(11).is_some()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.week_numbers().last(), Some(&11));
    assert_eq!(after.total_logs(), 2);
    assert_eq!(after.excluded(), 0);
}

#[tokio::test]
async fn opening_second_log_view_releases_the_first() {
    let fx = fixture().await;
    let room = fx.room("Carpa").await;
    let first_id = fx.flowering_cycle(&room, "A").await;
    let second_id = fx.flowering_cycle(&room, "B").await;

    let mut first = fx.workspace.open_cycle_logs(&first_id).await.unwrap();
    let second = fx.workspace.open_cycle_logs(&second_id).await.unwrap();

    let released = timeout(WAIT, first.wait_until(|_| false)).await.unwrap();
    assert!(released.is_none());
    assert!(!first.is_active());
    assert_eq!(second.cycle_id(), &second_id);
    let log_views = fx
        .workspace
        .active_subscriptions()
        .into_iter()
        .filter(|key| *key == QueryKey::CycleLogs)
        .count();
    assert_eq!(log_views, 1);
}

#[tokio::test]
async fn closing_and_signing_out_release_subscriptions() {
    let fx = fixture().await;
    let room = fx.room("Carpa").await;
    let cycle_id = fx.flowering_cycle(&room, "A").await;

    let mut logs = fx.workspace.open_cycle_logs(&cycle_id).await.unwrap();
    assert_eq!(fx.workspace.active_subscriptions().len(), 5);
    fx.workspace.close_cycle_logs();
    assert_eq!(fx.workspace.active_subscriptions().len(), 4);
    assert!(!fx
        .workspace
        .active_subscriptions()
        .contains(&QueryKey::CycleLogs));
    assert!(timeout(WAIT, logs.wait_until(|_| false))
        .await
        .unwrap()
        .is_none());

    let mut reopened = fx.workspace.open_cycle_logs(&cycle_id).await.unwrap();
    fx.workspace.sign_out();
    assert!(timeout(WAIT, reopened.wait_until(|_| false))
        .await
        .unwrap()
        .is_none());
}

// =============================================================================
// File-backed store
// =============================================================================

#[tokio::test]
async fn file_store_workspace_sees_previous_session() {
    let dir = tempfile::tempdir().unwrap();
    let notifier = Arc::new(RecordingNotifier::new());
    {
        let store = Arc::new(FileDocumentStore::open(dir.path(), 16).await.unwrap());
        CreateRoomHandler::new(store, notifier.clone())
            .handle(
                CreateRoomCommand {
                    name: "Carpa".to_string(),
                },
                metadata(),
            )
            .await
            .unwrap();
    }

    let store = Arc::new(FileDocumentStore::open(dir.path(), 16).await.unwrap());
    let clock = Arc::new(FixedClock::at_millis(MARCH_FIRST_NOON));
    let workspace = Workspace::open(user(), store, clock).await.unwrap();
    let view = timeout(WAIT, workspace.synced()).await.unwrap();

    assert_eq!(view.rooms().len(), 1);
    assert_eq!(view.rooms()[0].name, "Carpa");
}
