use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use shepherd_core::models::{
    appointment::{Appointment, AppointmentStatus},
    overrides::{DateOverride, OverrideAction},
    rule::RecurringRule,
    slot::{SlotSource, SlotStatus, TimeSlot},
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbRecurringRule {
    pub id: Uuid,
    pub church_id: Uuid,
    pub counselor_id: Uuid,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_length_minutes: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbOverride {
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

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
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

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub church_id: Uuid,
    pub member_id: Uuid,
    pub counselor_id: Uuid,
    pub slot_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub appointment_type: String,
    pub status: AppointmentStatus,
    pub urgency: Option<String>,
    pub topic: Option<String>,
    pub description: Option<String>,
    pub created_by_member: bool,
    pub created_by_staff_id: Option<Uuid>,
    pub approved_by_staff_id: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_reason: Option<String>,
    pub admin_notes: Option<String>,
    pub outcome_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbRecurringRule> for RecurringRule {
    fn from(row: DbRecurringRule) -> Self {
        RecurringRule {
            id: row.id,
            church_id: row.church_id,
            counselor_id: row.counselor_id,
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
            slot_length_minutes: row.slot_length_minutes,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<DbOverride> for DateOverride {
    fn from(row: DbOverride) -> Self {
        DateOverride {
            id: row.id,
            church_id: row.church_id,
            counselor_id: row.counselor_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            action: row.action,
            reason: row.reason,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<DbTimeSlot> for TimeSlot {
    fn from(row: DbTimeSlot) -> Self {
        TimeSlot {
            id: row.id,
            church_id: row.church_id,
            counselor_id: row.counselor_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row.status,
            source: row.source,
            appointment_id: row.appointment_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<DbAppointment> for Appointment {
    fn from(row: DbAppointment) -> Self {
        Appointment {
            id: row.id,
            church_id: row.church_id,
            member_id: row.member_id,
            counselor_id: row.counselor_id,
            slot_id: row.slot_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            appointment_type: row.appointment_type,
            status: row.status,
            urgency: row.urgency,
            topic: row.topic,
            description: row.description,
            created_by_member: row.created_by_member,
            created_by_staff_id: row.created_by_staff_id,
            approved_by_staff_id: row.approved_by_staff_id,
            approved_at: row.approved_at,
            rejected_reason: row.rejected_reason,
            admin_notes: row.admin_notes,
            outcome_notes: row.outcome_notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
