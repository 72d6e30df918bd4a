//! Log module - Journal entries of a cycle and their weekly grouping.

mod aggregator;
mod entry;
mod fertilizers;
mod kind;
pub mod lenient;

pub use aggregator::{bucket_and_sort, WeekBucket, WeekBuckets};
pub use entry::{LogDetails, LogEntry, NewLog, NutrientReading, CLONES_PRUNING};
pub use fertilizers::{
    format_fertilizers, FertilizerItem, Fertilizers, StructuredFertilizers, NO_FERTILIZERS,
};
pub use kind::LogKind;
