//! Mapping between stored documents and domain entities.
//!
//! Writes use the stored field names (`salaId`, `floweringWeeks`, ...).
//! Reads are tolerant: numbers stored as text are accepted, missing optional
//! fields take defaults, a log without a date reads as `now`. A record that
//! cannot be mapped at all yields a [`RecordError`]; snapshot readers skip
//! it, command handlers report it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::cycle::{CultivationType, Cycle, CycleDetails, CyclePhase};
use crate::domain::foundation::{
    CycleId, DomainError, ErrorCode, GeneticId, LogId, RoomId, SeedId, Timestamp,
    ValidationError,
};
use crate::domain::inventory::{Genetic, GeneticDetails, Seed, SeedDetails};
use crate::domain::log::{
    lenient, Fertilizers, LogDetails, LogEntry, LogKind, NewLog, NutrientReading,
};
use crate::domain::room::Room;
use crate::domain::schedule::{FloweringSchedule, FloweringWeek};
use crate::ports::{Document, Fields, NewDocument};

/// Field stamped by the store when a log is written.
pub const LOG_DATE_FIELD: &str = "date";
pub const ROOM_ID_FIELD: &str = "salaId";
pub const CLONE_STOCK_FIELD: &str = "cloneStock";
pub const SEED_QUANTITY_FIELD: &str = "quantity";

/// Why a stored document could not be mapped.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("invalid document id: {0}")]
    InvalidId(#[from] ValidationError),

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("unknown {field} '{value}'")]
    UnknownValue { field: &'static str, value: String },

    #[error("malformed record: {0}")]
    Malformed(String),
}

impl From<RecordError> for DomainError {
    fn from(err: RecordError) -> Self {
        DomainError::new(ErrorCode::DatabaseError, format!("Stored record unreadable: {}", err))
    }
}

fn to_fields<T: Serialize>(record: &T) -> Result<Fields, DomainError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(DomainError::new(
            ErrorCode::InternalError,
            "Record did not serialize to an object",
        )),
        Err(e) => Err(DomainError::new(
            ErrorCode::InternalError,
            format!("Failed to serialize record: {}", e),
        )),
    }
}

fn parse_record<T: DeserializeOwned>(document: &Document) -> Result<T, RecordError> {
    serde_json::from_value(Value::Object(document.fields.clone()))
        .map_err(|e| RecordError::Malformed(e.to_string()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ───────────────────────────────────────────────────────────────
// Rooms
// ───────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct RoomRecord {
    #[serde(default)]
    name: String,
}

pub fn room_fields(name: &str) -> Result<Fields, DomainError> {
    to_fields(&RoomRecord {
        name: name.to_string(),
    })
}

pub fn decode_room(document: &Document) -> Result<Room, RecordError> {
    let record: RoomRecord = parse_record(document)?;
    Ok(Room::new(RoomId::new(&document.id)?, record.name))
}

// ───────────────────────────────────────────────────────────────
// Cycles
// ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CycleWrite<'a> {
    name: &'a str,
    sala_id: &'a str,
    phase: CyclePhase,
    cultivation_type: CultivationType,
    vegetative_start_date: Option<&'a str>,
    flowering_start_date: Option<&'a str>,
    notes: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    flowering_weeks: Option<&'a [FloweringWeek]>,
}

impl<'a> CycleWrite<'a> {
    fn new(details: &'a CycleDetails, schedule: Option<&'a FloweringSchedule>) -> Self {
        Self {
            name: &details.name,
            sala_id: details.room_id.as_str(),
            phase: details.phase,
            cultivation_type: details.cultivation_type,
            vegetative_start_date: details.vegetative_start_date.as_deref(),
            flowering_start_date: details.flowering_start_date.as_deref(),
            notes: &details.notes,
            flowering_weeks: schedule.map(FloweringSchedule::weeks),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CycleRead {
    #[serde(default)]
    name: String,
    #[serde(default)]
    sala_id: Option<String>,
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    cultivation_type: Option<String>,
    #[serde(default)]
    vegetative_start_date: Option<String>,
    #[serde(default)]
    flowering_start_date: Option<String>,
    #[serde(default)]
    flowering_weeks: Option<Value>,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FloweringWeekRead {
    #[serde(default, deserialize_with = "lenient::count")]
    week_number: Option<u32>,
    #[serde(default)]
    phase_name: Option<String>,
}

/// Full cycle record, schedule included when present.
pub fn cycle_fields(
    details: &CycleDetails,
    schedule: Option<&FloweringSchedule>,
) -> Result<Fields, DomainError> {
    to_fields(&CycleWrite::new(details, schedule))
}

/// Fields touched by a phase change.
pub fn cycle_phase_fields(cycle: &Cycle) -> Result<Fields, DomainError> {
    let mut fields = cycle_fields(cycle.details(), cycle.flowering_weeks())?;
    fields.retain(|key, _| {
        matches!(
            key.as_str(),
            "phase" | "vegetativeStartDate" | "floweringStartDate" | "floweringWeeks"
        )
    });
    Ok(fields)
}

pub fn cycle_schedule_fields(schedule: &FloweringSchedule) -> Result<Fields, DomainError> {
    let mut fields = Fields::new();
    let weeks = serde_json::to_value(schedule.weeks()).map_err(|e| {
        DomainError::new(
            ErrorCode::InternalError,
            format!("Failed to serialize schedule: {}", e),
        )
    })?;
    fields.insert("floweringWeeks".to_string(), weeks);
    Ok(fields)
}

pub fn cycle_room_fields(room_id: &RoomId) -> Fields {
    let mut fields = Fields::new();
    fields.insert(ROOM_ID_FIELD.to_string(), Value::from(room_id.as_str()));
    fields
}

fn decode_schedule(value: Option<Value>) -> Option<FloweringSchedule> {
    let Value::Array(entries) = value? else {
        return None;
    };
    let weeks = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<FloweringWeekRead>(entry).ok())
        .filter_map(|week| {
            Some(FloweringWeek {
                week_number: week.week_number?,
                phase_name: week.phase_name.unwrap_or_default(),
            })
        })
        .collect();
    Some(FloweringSchedule::from_weeks(weeks))
}

pub fn decode_cycle(document: &Document) -> Result<Cycle, RecordError> {
    let record: CycleRead = parse_record(document)?;
    let id = CycleId::new(&document.id)?;
    let room_id = non_blank(record.sala_id).ok_or(RecordError::MissingField(ROOM_ID_FIELD))?;

    let phase = match record.phase.as_deref() {
        None | Some("") => CyclePhase::default(),
        Some(label) => CyclePhase::from_label(label).unwrap_or_else(|| {
            tracing::warn!(cycle_id = %id, phase = label, "Unknown cycle phase; treating as finished");
            CyclePhase::Finished
        }),
    };
    let cultivation_type = record
        .cultivation_type
        .as_deref()
        .and_then(CultivationType::from_label)
        .unwrap_or_default();

    let details = CycleDetails {
        name: record.name,
        room_id: RoomId::new(room_id)?,
        phase,
        cultivation_type,
        vegetative_start_date: non_blank(record.vegetative_start_date),
        flowering_start_date: non_blank(record.flowering_start_date),
        notes: record.notes.unwrap_or_default(),
    };
    Ok(Cycle::reconstitute(
        id,
        details,
        decode_schedule(record.flowering_weeks),
    ))
}

// ───────────────────────────────────────────────────────────────
// Logs
// ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogRead {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    date: Option<Value>,
    #[serde(default, deserialize_with = "lenient::count")]
    week: Option<u32>,
    #[serde(default, deserialize_with = "lenient::number")]
    ph: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    ec: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    litros: Option<f64>,
    #[serde(default)]
    fertilizers: Option<Value>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    poda_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    clones_count: Option<u32>,
}

fn number_value(value: Option<f64>) -> Value {
    value
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn insert_reading(fields: &mut Fields, reading: &NutrientReading) -> Result<(), DomainError> {
    fields.insert("ph".to_string(), number_value(reading.ph));
    fields.insert("ec".to_string(), number_value(reading.ec));
    let fertilizers = match &reading.fertilizers {
        Some(f) => serde_json::to_value(f).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize fertilizers: {}", e),
            )
        })?,
        None => Value::Null,
    };
    fields.insert("fertilizers".to_string(), fertilizers);
    Ok(())
}

/// New log document; the store fills in `date`.
pub fn log_document(log: &NewLog) -> Result<NewDocument, DomainError> {
    let mut fields = Fields::new();
    fields.insert("type".to_string(), Value::from(log.details.kind().label()));
    fields.insert("week".to_string(), Value::from(log.week));
    match &log.details {
        LogDetails::Watering(reading) => insert_reading(&mut fields, reading)?,
        LogDetails::SolutionChange { reading, litros } => {
            insert_reading(&mut fields, reading)?;
            fields.insert("litros".to_string(), number_value(*litros));
        }
        LogDetails::PestControl { notes } => {
            fields.insert("notes".to_string(), Value::from(notes.as_str()));
        }
        LogDetails::Pruning {
            poda_type,
            clones_count,
        } => {
            fields.insert("podaType".to_string(), Value::from(poda_type.as_str()));
            if let Some(count) = clones_count {
                fields.insert("clonesCount".to_string(), Value::from(*count));
            }
        }
    }
    Ok(NewDocument::new(fields).with_server_timestamp(LOG_DATE_FIELD))
}

fn decode_date(value: Option<&Value>) -> Option<Timestamp> {
    match value? {
        Value::String(s) => chrono::DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| Timestamp::from_datetime(dt.with_timezone(&chrono::Utc))),
        Value::Number(n) => n.as_i64().and_then(Timestamp::from_unix_millis),
        _ => None,
    }
}

/// Maps a log document; `now` stands in for a missing or unreadable date.
pub fn decode_log(
    cycle_id: &CycleId,
    document: &Document,
    now: Timestamp,
) -> Result<LogEntry, RecordError> {
    let record: LogRead = parse_record(document)?;
    let label = record.kind.ok_or(RecordError::MissingField("type"))?;
    let kind = LogKind::from_label(&label).ok_or(RecordError::UnknownValue {
        field: "type",
        value: label,
    })?;

    let reading = NutrientReading {
        ph: record.ph,
        ec: record.ec,
        fertilizers: record
            .fertilizers
            .and_then(|v| serde_json::from_value::<Option<Fertilizers>>(v).ok())
            .flatten(),
    };
    let details = match kind {
        LogKind::Watering => LogDetails::Watering(reading),
        LogKind::SolutionChange => LogDetails::SolutionChange {
            reading,
            litros: record.litros,
        },
        LogKind::PestControl => LogDetails::PestControl {
            notes: record.notes.unwrap_or_default(),
        },
        LogKind::Pruning => LogDetails::Pruning {
            poda_type: record.poda_type.unwrap_or_default(),
            clones_count: record.clones_count,
        },
    };

    Ok(LogEntry {
        id: LogId::new(&document.id)?,
        cycle_id: cycle_id.clone(),
        week: record.week.unwrap_or(0),
        date: decode_date(record.date.as_ref()).unwrap_or(now),
        details,
    })
}

// ───────────────────────────────────────────────────────────────
// Inventory
// ───────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneticRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    parents: String,
    #[serde(default)]
    bank: String,
    #[serde(default)]
    owner: String,
    #[serde(default, deserialize_with = "lenient::number")]
    clone_stock: Option<f64>,
}

pub fn genetic_fields(details: &GeneticDetails) -> Result<Fields, DomainError> {
    let mut fields = to_fields(&GeneticRecord {
        name: details.name.clone(),
        parents: details.parents.clone(),
        bank: details.bank.clone(),
        owner: details.owner.clone(),
        clone_stock: None,
    })?;
    fields.insert(CLONE_STOCK_FIELD.to_string(), Value::from(details.clone_stock));
    Ok(fields)
}

pub fn decode_genetic(document: &Document) -> Result<Genetic, RecordError> {
    let record: GeneticRecord = parse_record(document)?;
    let details = GeneticDetails {
        name: record.name,
        parents: record.parents,
        bank: record.bank,
        owner: record.owner,
        clone_stock: record.clone_stock.map(|n| n.trunc() as i64).unwrap_or(0),
    };
    Ok(Genetic::from_details(GeneticId::new(&document.id)?, details))
}

#[derive(Serialize, Deserialize)]
struct SeedRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    bank: String,
    #[serde(default, deserialize_with = "lenient::count")]
    quantity: Option<u32>,
}

pub fn seed_fields(details: &SeedDetails) -> Result<Fields, DomainError> {
    to_fields(&SeedRecord {
        name: details.name.clone(),
        bank: details.bank.clone(),
        quantity: Some(details.quantity),
    })
}

pub fn decode_seed(document: &Document) -> Result<Seed, RecordError> {
    let record: SeedRecord = parse_record(document)?;
    let details = SeedDetails {
        name: record.name,
        bank: record.bank,
        quantity: record.quantity.unwrap_or(0),
    };
    Ok(Seed::from_details(SeedId::new(&document.id)?, details))
}
