use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ScheduleError, ScheduleResult};

/// A weekly-recurring availability window for one counselor.
///
/// Rules are generative: the slot generator slices each active rule's
/// `[start_time, end_time)` window into `slot_length_minutes` slots for the
/// matching weekday. Multiple active rules for the same counselor/day may
/// coexist and all contribute slots; no overlap validation is enforced
/// between them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringRule {
    pub id: Uuid,
    pub church_id: Uuid,
    pub counselor_id: Uuid,
    /// 0 = Monday .. 6 = Sunday
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_length_minutes: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecurringRule {
    pub church_id: Uuid,
    pub counselor_id: Uuid,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_length_minutes: i32,
}

impl NewRecurringRule {
    /// Boundary validation before persisting a rule.
    pub fn validate(&self) -> ScheduleResult<()> {
        if !(0..=6).contains(&self.day_of_week) {
            return Err(ScheduleError::Validation(format!(
                "day_of_week must be between 0 (Monday) and 6 (Sunday), got {}",
                self.day_of_week
            )));
        }
        if self.end_time <= self.start_time {
            return Err(ScheduleError::Validation(
                "end_time must be after start_time".to_string(),
            ));
        }
        if self.slot_length_minutes <= 0 {
            return Err(ScheduleError::Validation(
                "slot_length_minutes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
