//! # Booking Engine
//!
//! The only writer allowed to move a time slot into or out of `booked`, and
//! the owner of the appointment state machine.
//!
//! Reservation follows a read-then-conditional-write protocol: the slot is
//! read and pre-checked for a fast typed failure, then a single conditional
//! update (`... WHERE status = 'open'`) performs the actual reservation.
//! The database applies that update atomically to one row, so when two
//! requests race for the same slot the second writer's update affects zero
//! rows and is reported as `SlotAlreadyBooked`. The race is not retried
//! internally; the caller re-queries availability and picks another slot.

use chrono::{NaiveDate, Utc};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use shepherd_core::{
    errors::{ScheduleError, ScheduleResult},
    models::{
        appointment::{Appointment, AppointmentStatus, BookSlotRequest},
        slot::{SlotStatus, TimeSlot},
    },
};
use shepherd_db::{
    models::DbAppointment,
    repositories::{appointment, time_slot},
};

use crate::audit::AuditSink;

/// Fast-path pre-check before attempting the reservation write.
pub fn ensure_bookable(slot: &TimeSlot) -> ScheduleResult<()> {
    if slot.status != SlotStatus::Open {
        return Err(ScheduleError::SlotNotAvailable(slot.id));
    }
    Ok(())
}

/// Past appointments keep their slot booked for historical reporting; only
/// same-day or future cancellations free the slot.
pub fn should_release_on_cancel(appointment_date: NaiveDate, today: NaiveDate) -> bool {
    appointment_date >= today
}

/// Reserve one open slot and create its appointment.
///
/// Member-initiated requests produce a `pending` appointment; staff-initiated
/// ones (request carries `created_by_staff_id`) are implicitly pre-approved.
/// The appointment row is only inserted after the conditional update wins,
/// so a lost race leaves no appointment behind.
pub async fn book_slot(
    pool: &PgPool,
    audit: &dyn AuditSink,
    request: &BookSlotRequest,
) -> ScheduleResult<Appointment> {
    let slot: TimeSlot = time_slot::get_slot(pool, request.slot_id, request.church_id)
        .await
        .map_err(ScheduleError::Database)?
        .ok_or(ScheduleError::SlotNotFound(request.slot_id))?
        .into();

    ensure_bookable(&slot)?;

    let appointment_id = Uuid::new_v4();
    let now = Utc::now();
    let status = request.initial_status();

    let appt = DbAppointment {
        id: appointment_id,
        church_id: request.church_id,
        member_id: request.member_id,
        counselor_id: slot.counselor_id,
        slot_id: slot.id,
        date: slot.date,
        start_time: slot.start_time,
        end_time: slot.end_time,
        appointment_type: request.appointment_type.clone(),
        status,
        urgency: request.urgency.clone(),
        topic: request.topic.clone(),
        description: request.description.clone(),
        created_by_member: request.created_by_staff_id.is_none(),
        created_by_staff_id: request.created_by_staff_id,
        approved_by_staff_id: match status {
            AppointmentStatus::Approved => request.created_by_staff_id,
            _ => None,
        },
        approved_at: match status {
            AppointmentStatus::Approved => Some(now),
            _ => None,
        },
        rejected_reason: None,
        admin_notes: None,
        outcome_notes: None,
        created_at: now,
        updated_at: now,
    };

    // The correctness-critical step: succeeds for exactly one concurrent
    // caller per slot.
    let reserved = time_slot::reserve_slot(pool, slot.id, request.church_id, appointment_id)
        .await
        .map_err(ScheduleError::Database)?;

    if !reserved {
        return Err(ScheduleError::SlotAlreadyBooked(slot.id));
    }

    let created = appointment::insert_appointment(pool, &appt)
        .await
        .map_err(ScheduleError::Database)?;

    audit
        .record(
            request.church_id,
            "appointment.booked",
            "Appointment slot reserved",
            json!({
                "appointment_id": created.id,
                "slot_id": slot.id,
                "counselor_id": slot.counselor_id,
                "member_id": request.member_id,
                "date": slot.date,
                "start_time": slot.start_time,
                "status": created.status,
            }),
        )
        .await;

    Ok(created.into())
}

/// Staff approval of a pending appointment. The slot is already booked, so
/// no slot state changes.
pub async fn approve_appointment(
    pool: &PgPool,
    audit: &dyn AuditSink,
    church_id: Uuid,
    appointment_id: Uuid,
    staff_id: Uuid,
    admin_notes: Option<&str>,
) -> ScheduleResult<Appointment> {
    let appt = load_appointment(pool, church_id, appointment_id).await?;

    if !appt.status.can_approve() {
        return Err(ScheduleError::AppointmentAlreadyProcessed(appointment_id));
    }

    let updated = appointment::approve_appointment(pool, appointment_id, staff_id, admin_notes)
        .await
        .map_err(ScheduleError::Database)?;

    audit
        .record(
            church_id,
            "appointment.approved",
            "Appointment approved",
            json!({ "appointment_id": appointment_id, "staff_id": staff_id }),
        )
        .await;

    Ok(updated.into())
}

/// Staff rejection of a pending appointment. The slot is unconditionally
/// released: the appointment's existence proves the slot was exclusively
/// bound to it.
pub async fn reject_appointment(
    pool: &PgPool,
    audit: &dyn AuditSink,
    church_id: Uuid,
    appointment_id: Uuid,
    reason: &str,
) -> ScheduleResult<Appointment> {
    let appt = load_appointment(pool, church_id, appointment_id).await?;

    if !appt.status.can_reject() {
        return Err(ScheduleError::AppointmentAlreadyProcessed(appointment_id));
    }

    let updated = appointment::reject_appointment(pool, appointment_id, reason)
        .await
        .map_err(ScheduleError::Database)?;

    time_slot::release_slot(pool, appt.slot_id)
        .await
        .map_err(ScheduleError::Database)?;

    audit
        .record(
            church_id,
            "appointment.rejected",
            "Appointment rejected, slot released",
            json!({
                "appointment_id": appointment_id,
                "slot_id": appt.slot_id,
                "reason": reason,
            }),
        )
        .await;

    Ok(updated.into())
}

/// Cancellation by either party. The slot is freed only when the
/// appointment date is `today` or later.
pub async fn cancel_appointment(
    pool: &PgPool,
    audit: &dyn AuditSink,
    church_id: Uuid,
    appointment_id: Uuid,
    today: NaiveDate,
) -> ScheduleResult<Appointment> {
    let appt = load_appointment(pool, church_id, appointment_id).await?;

    if !appt.status.can_cancel() {
        return Err(ScheduleError::AppointmentCannotBeCanceled(appointment_id));
    }

    let updated = appointment::cancel_appointment(pool, appointment_id)
        .await
        .map_err(ScheduleError::Database)?;

    let released = should_release_on_cancel(appt.date, today);
    if released {
        time_slot::release_slot(pool, appt.slot_id)
            .await
            .map_err(ScheduleError::Database)?;
    }

    audit
        .record(
            church_id,
            "appointment.canceled",
            "Appointment canceled",
            json!({
                "appointment_id": appointment_id,
                "slot_id": appt.slot_id,
                "slot_released": released,
            }),
        )
        .await;

    Ok(updated.into())
}

/// Record the outcome of an approved appointment. The slot stays booked
/// permanently as history.
pub async fn complete_appointment(
    pool: &PgPool,
    audit: &dyn AuditSink,
    church_id: Uuid,
    appointment_id: Uuid,
    outcome_notes: Option<&str>,
) -> ScheduleResult<Appointment> {
    let appt = load_appointment(pool, church_id, appointment_id).await?;

    if !appt.status.can_complete() {
        return Err(ScheduleError::AppointmentMustBeApprovedFirst(
            appointment_id,
        ));
    }

    let updated = appointment::complete_appointment(pool, appointment_id, outcome_notes)
        .await
        .map_err(ScheduleError::Database)?;

    audit
        .record(
            church_id,
            "appointment.completed",
            "Appointment completed",
            json!({ "appointment_id": appointment_id }),
        )
        .await;

    Ok(updated.into())
}

/// Read-back used by callers, including after a timed-out booking call
/// whose outcome is unknown.
pub async fn get_appointment(
    pool: &PgPool,
    church_id: Uuid,
    appointment_id: Uuid,
) -> ScheduleResult<Appointment> {
    load_appointment(pool, church_id, appointment_id).await
}

pub async fn list_appointments(
    pool: &PgPool,
    church_id: Uuid,
    counselor_id: Option<Uuid>,
    member_id: Option<Uuid>,
    status: Option<AppointmentStatus>,
) -> ScheduleResult<Vec<Appointment>> {
    let appointments =
        appointment::list_appointments(pool, church_id, counselor_id, member_id, status)
            .await
            .map_err(ScheduleError::Database)?;

    Ok(appointments.into_iter().map(Appointment::from).collect())
}

async fn load_appointment(
    pool: &PgPool,
    church_id: Uuid,
    appointment_id: Uuid,
) -> ScheduleResult<Appointment> {
    let appt = appointment::get_appointment(pool, appointment_id, church_id)
        .await
        .map_err(ScheduleError::Database)?
        .ok_or(ScheduleError::AppointmentNotFound(appointment_id))?;

    Ok(appt.into())
}
