use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an appointment.
///
/// Member-initiated appointments start at `Pending`; staff-initiated ones
/// start at `Approved` (implicitly pre-approved). `Rejected`, `Canceled`,
/// and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Rejected,
    Canceled,
    Completed,
}

impl AppointmentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Canceled | Self::Completed)
    }

    /// Approve and reject both require a still-pending appointment.
    pub fn can_approve(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn can_reject(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Either party may cancel until the appointment reaches a terminal state.
    pub fn can_cancel(&self) -> bool {
        !self.is_terminal()
    }

    /// Only approved appointments can have an outcome recorded.
    pub fn can_complete(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// A booked counseling session bound to exactly one time slot.
///
/// `slot_id` is a non-owning reference; while the appointment holds the
/// slot (`Booked`), the slot's `appointment_id` must agree with this id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
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

/// Request to reserve one open slot and create its appointment.
///
/// `created_by_staff_id = Some(..)` selects the staff path: the appointment
/// is created already approved, with the booking staff member recorded as
/// approver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSlotRequest {
    pub church_id: Uuid,
    pub slot_id: Uuid,
    pub member_id: Uuid,
    pub appointment_type: String,
    pub urgency: Option<String>,
    pub topic: Option<String>,
    pub description: Option<String>,
    pub created_by_staff_id: Option<Uuid>,
}

impl BookSlotRequest {
    /// Initial lifecycle status implied by who is booking.
    pub fn initial_status(&self) -> AppointmentStatus {
        if self.created_by_staff_id.is_some() {
            AppointmentStatus::Approved
        } else {
            AppointmentStatus::Pending
        }
    }
}
