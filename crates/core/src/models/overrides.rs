use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ScheduleError, ScheduleResult};

/// What a date override does to generated availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "override_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OverrideAction {
    /// Remove generated availability overlapping the range
    Block,
    /// Inject additional fixed-length slots in the range
    AddExtra,
}

/// A date-specific exception to a counselor's recurring schedule.
///
/// Overrides apply to exactly one date. `Block` marks any generated slot
/// overlapping `[start_time, end_time)` as blocked; `AddExtra` contributes
/// additional slots that block overrides do not filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateOverride {
    pub id: Uuid,
    pub church_id: Uuid,
    pub counselor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub action: OverrideAction,
    pub reason: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOverride {
    pub church_id: Uuid,
    pub counselor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub action: OverrideAction,
    pub reason: Option<String>,
    pub created_by: Uuid,
}

impl NewOverride {
    /// Boundary validation; an override range must be non-empty.
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.end_time <= self.start_time {
            return Err(ScheduleError::Validation(
                "end_time must be after start_time".to_string(),
            ));
        }
        Ok(())
    }
}
