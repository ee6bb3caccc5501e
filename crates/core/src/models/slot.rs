use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a materialized time slot.
///
/// `Reserved` is a transient holding state some deployments use between
/// selection and confirmation; the generator treats it like `Booked` and
/// never overwrites it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "slot_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Open,
    Blocked,
    Booked,
    Reserved,
}

/// Where a generated slot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "slot_source", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SlotSource {
    Recurring,
    OverrideAdd,
    OverrideBlock,
}

/// A discrete, bookable time interval for one counselor on one date.
///
/// Identity is `(church_id, counselor_id, date, start_time)`; regeneration
/// merges by that key and never silently changes a booked or reserved slot.
/// `appointment_id` is a back-reference set exactly while the slot is
/// booked and cleared when it returns to open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub church_id: Uuid,
    pub counselor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: SlotStatus,
    pub source: SlotSource,
    pub appointment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filter for availability listings, scoped to one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotFilter {
    pub church_id: Uuid,
    pub counselor_id: Option<Uuid>,
    /// Inclusive lower date bound
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub date_to: Option<NaiveDate>,
    pub status: SlotStatus,
}

/// Counters returned by slot generation, for observability.
///
/// `generated` counts newly inserted slots only, so a repeated run over
/// unchanged rules reports `generated = 0`. `skipped` counts candidates
/// whose persisted slot was booked or reserved and therefore left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generated: u32,
    pub blocked: u32,
    pub skipped: u32,
}

impl GenerationReport {
    /// Fold another day's counts into a range-level aggregate.
    pub fn merge(&mut self, other: GenerationReport) {
        self.generated += other.generated;
        self.blocked += other.blocked;
        self.skipped += other.skipped;
    }
}
