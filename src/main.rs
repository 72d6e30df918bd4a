//! grow-journal - prints the journal of the configured account as JSON.
//!
//! Loads configuration, opens the file-backed document store, waits for the
//! first snapshot of every collection and writes the room overview together
//! with the inventory to stdout.

use std::process::ExitCode;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use grow_journal::adapters::{FileDocumentStore, SystemClock};
use grow_journal::application::Workspace;
use grow_journal::config::{AppConfig, ConfigError, ValidationError};
use grow_journal::domain::foundation::{DomainError, Timestamp, UserId};
use grow_journal::domain::inventory::{Genetic, Seed};
use grow_journal::domain::overview::{CyclePreview, RoomOverview};
use grow_journal::domain::room::Room;
use grow_journal::ports::Clock;
use grow_journal::telemetry;

#[derive(Debug, Error)]
enum ReportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Failed to initialise logging: {0}")]
    Telemetry(#[from] tracing_subscriber::util::TryInitError),

    #[error(transparent)]
    Store(#[from] DomainError),

    #[error("Failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    user_id: UserId,
    generated_at: Timestamp,
    rooms: Vec<RoomReport>,
    genetics: Vec<Genetic>,
    seeds: Vec<Seed>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoomReport {
    room: Room,
    cycles: Vec<CycleReport>,
}

#[derive(Serialize)]
struct CycleReport {
    #[serde(flatten)]
    preview: CyclePreview,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
}

impl From<RoomOverview> for RoomReport {
    fn from(overview: RoomOverview) -> Self {
        Self {
            room: overview.room,
            cycles: overview
                .active_cycles
                .into_iter()
                .map(|preview| CycleReport {
                    status: preview.status(),
                    preview,
                })
                .collect(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Report failed");
            eprintln!("grow-journal: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ReportError> {
    let config = AppConfig::load()?;
    config.validate()?;
    telemetry::init(&config.telemetry)?;

    let user_id = config.user.id()?;
    let store = Arc::new(
        FileDocumentStore::open(
            &config.store.data_dir,
            config.store.snapshot_channel_capacity,
        )
        .await?,
    );
    let clock = Arc::new(SystemClock);

    let workspace = Workspace::open(user_id.clone(), store, clock.clone()).await?;
    workspace.synced().await;

    let report = Report {
        user_id,
        generated_at: clock.now(),
        rooms: workspace
            .room_overview("")
            .into_iter()
            .map(RoomReport::from)
            .collect(),
        genetics: workspace.genetics_matching(""),
        seeds: workspace.seeds_matching(""),
    };
    workspace.sign_out();

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
