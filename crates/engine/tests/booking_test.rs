use chrono::{NaiveDate, NaiveTime, Utc};
use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use shepherd_core::{
    errors::{ScheduleError, ScheduleResult},
    models::{
        appointment::{AppointmentStatus, BookSlotRequest},
        slot::{SlotSource, SlotStatus, TimeSlot},
    },
};
use shepherd_db::{
    mock::{MockAppointmentRepo, MockTimeSlotRepo},
    models::{DbAppointment, DbTimeSlot},
};
use shepherd_engine::booking::{ensure_bookable, should_release_on_cancel};

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn slot_with_status(church_id: Uuid, status: SlotStatus) -> DbTimeSlot {
    let now = Utc::now();
    DbTimeSlot {
        id: Uuid::new_v4(),
        church_id,
        counselor_id: Uuid::new_v4(),
        date: date(2025, 3, 10),
        start_time: time(10, 0),
        end_time: time(11, 0),
        status,
        source: SlotSource::Recurring,
        appointment_id: None,
        created_at: now,
        updated_at: now,
    }
}

fn appointment_with_status(
    church_id: Uuid,
    slot_id: Uuid,
    status: AppointmentStatus,
    day: NaiveDate,
) -> DbAppointment {
    let now = Utc::now();
    DbAppointment {
        id: Uuid::new_v4(),
        church_id,
        member_id: Uuid::new_v4(),
        counselor_id: Uuid::new_v4(),
        slot_id,
        date: day,
        start_time: time(10, 0),
        end_time: time(11, 0),
        appointment_type: "counseling".to_string(),
        status,
        urgency: None,
        topic: None,
        description: None,
        created_by_member: true,
        created_by_staff_id: None,
        approved_by_staff_id: None,
        approved_at: None,
        rejected_reason: None,
        admin_notes: None,
        outcome_notes: None,
        created_at: now,
        updated_at: now,
    }
}

fn book_request(church_id: Uuid, slot_id: Uuid) -> BookSlotRequest {
    BookSlotRequest {
        church_id,
        slot_id,
        member_id: Uuid::new_v4(),
        appointment_type: "counseling".to_string(),
        urgency: Some("normal".to_string()),
        topic: Some("family".to_string()),
        description: None,
        created_by_staff_id: None,
    }
}

// Test wrappers that run the engine's decision logic against mock
// repositories, mirroring the booking flows step for step.

async fn book_slot_wrapper(
    slots: &MockTimeSlotRepo,
    appointments: &MockAppointmentRepo,
    request: &BookSlotRequest,
) -> ScheduleResult<DbAppointment> {
    let slot: TimeSlot = slots
        .get_slot(request.slot_id, request.church_id)
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

    let reserved = slots
        .reserve_slot(slot.id, request.church_id, appointment_id)
        .await
        .map_err(ScheduleError::Database)?;

    if !reserved {
        return Err(ScheduleError::SlotAlreadyBooked(slot.id));
    }

    let created = appointments
        .insert_appointment(appt)
        .await
        .map_err(ScheduleError::Database)?;

    Ok(created)
}

async fn approve_wrapper(
    appointments: &MockAppointmentRepo,
    church_id: Uuid,
    appointment_id: Uuid,
    staff_id: Uuid,
    admin_notes: Option<&'static str>,
) -> ScheduleResult<DbAppointment> {
    let appt = appointments
        .get_appointment(appointment_id, church_id)
        .await
        .map_err(ScheduleError::Database)?
        .ok_or(ScheduleError::AppointmentNotFound(appointment_id))?;

    if !appt.status.can_approve() {
        return Err(ScheduleError::AppointmentAlreadyProcessed(appointment_id));
    }

    let updated = appointments
        .approve_appointment(appointment_id, staff_id, admin_notes)
        .await
        .map_err(ScheduleError::Database)?;

    Ok(updated)
}

async fn reject_wrapper(
    slots: &MockTimeSlotRepo,
    appointments: &MockAppointmentRepo,
    church_id: Uuid,
    appointment_id: Uuid,
    reason: &'static str,
) -> ScheduleResult<DbAppointment> {
    let appt = appointments
        .get_appointment(appointment_id, church_id)
        .await
        .map_err(ScheduleError::Database)?
        .ok_or(ScheduleError::AppointmentNotFound(appointment_id))?;

    if !appt.status.can_reject() {
        return Err(ScheduleError::AppointmentAlreadyProcessed(appointment_id));
    }

    let updated = appointments
        .reject_appointment(appointment_id, reason)
        .await
        .map_err(ScheduleError::Database)?;

    slots
        .release_slot(appt.slot_id)
        .await
        .map_err(ScheduleError::Database)?;

    Ok(updated)
}

async fn cancel_wrapper(
    slots: &MockTimeSlotRepo,
    appointments: &MockAppointmentRepo,
    church_id: Uuid,
    appointment_id: Uuid,
    today: NaiveDate,
) -> ScheduleResult<DbAppointment> {
    let appt = appointments
        .get_appointment(appointment_id, church_id)
        .await
        .map_err(ScheduleError::Database)?
        .ok_or(ScheduleError::AppointmentNotFound(appointment_id))?;

    if !appt.status.can_cancel() {
        return Err(ScheduleError::AppointmentCannotBeCanceled(appointment_id));
    }

    let updated = appointments
        .cancel_appointment(appointment_id)
        .await
        .map_err(ScheduleError::Database)?;

    if should_release_on_cancel(appt.date, today) {
        slots
            .release_slot(appt.slot_id)
            .await
            .map_err(ScheduleError::Database)?;
    }

    Ok(updated)
}

async fn complete_wrapper(
    appointments: &MockAppointmentRepo,
    church_id: Uuid,
    appointment_id: Uuid,
    outcome_notes: Option<&'static str>,
) -> ScheduleResult<DbAppointment> {
    let appt = appointments
        .get_appointment(appointment_id, church_id)
        .await
        .map_err(ScheduleError::Database)?
        .ok_or(ScheduleError::AppointmentNotFound(appointment_id))?;

    if !appt.status.can_complete() {
        return Err(ScheduleError::AppointmentMustBeApprovedFirst(
            appointment_id,
        ));
    }

    let updated = appointments
        .complete_appointment(appointment_id, outcome_notes)
        .await
        .map_err(ScheduleError::Database)?;

    Ok(updated)
}

#[tokio::test]
async fn test_member_booking_creates_pending_appointment() {
    let mut slots = MockTimeSlotRepo::new();
    let mut appointments = MockAppointmentRepo::new();
    let church_id = Uuid::new_v4();
    let slot = slot_with_status(church_id, SlotStatus::Open);
    let slot_id = slot.id;

    slots
        .expect_get_slot()
        .with(predicate::eq(slot_id), predicate::eq(church_id))
        .returning(move |_, _| Ok(Some(slot.clone())));

    slots
        .expect_reserve_slot()
        .with(
            predicate::eq(slot_id),
            predicate::eq(church_id),
            predicate::always(),
        )
        .times(1)
        .returning(|_, _, _| Ok(true));

    appointments
        .expect_insert_appointment()
        .times(1)
        .returning(|appt| Ok(appt));

    let request = book_request(church_id, slot_id);
    let created = book_slot_wrapper(&slots, &appointments, &request)
        .await
        .unwrap();

    assert_eq!(created.status, AppointmentStatus::Pending);
    assert_eq!(created.slot_id, slot_id);
    assert_eq!(created.created_by_member, true);
    assert_eq!(created.approved_by_staff_id, None);
}

#[tokio::test]
async fn test_staff_booking_is_pre_approved() {
    let mut slots = MockTimeSlotRepo::new();
    let mut appointments = MockAppointmentRepo::new();
    let church_id = Uuid::new_v4();
    let staff_id = Uuid::new_v4();
    let slot = slot_with_status(church_id, SlotStatus::Open);
    let slot_id = slot.id;

    slots
        .expect_get_slot()
        .returning(move |_, _| Ok(Some(slot.clone())));
    slots.expect_reserve_slot().returning(|_, _, _| Ok(true));
    appointments
        .expect_insert_appointment()
        .returning(|appt| Ok(appt));

    let mut request = book_request(church_id, slot_id);
    request.created_by_staff_id = Some(staff_id);

    let created = book_slot_wrapper(&slots, &appointments, &request)
        .await
        .unwrap();

    assert_eq!(created.status, AppointmentStatus::Approved);
    assert_eq!(created.created_by_member, false);
    assert_eq!(created.approved_by_staff_id, Some(staff_id));
    assert!(created.approved_at.is_some());
}

#[tokio::test]
async fn test_booking_nonexistent_slot_fails() {
    let mut slots = MockTimeSlotRepo::new();
    let appointments = MockAppointmentRepo::new();
    let church_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();

    slots.expect_get_slot().returning(|_, _| Ok(None));
    slots.expect_reserve_slot().times(0);

    let request = book_request(church_id, slot_id);
    let result = book_slot_wrapper(&slots, &appointments, &request).await;

    match result.unwrap_err() {
        ScheduleError::SlotNotFound(id) => assert_eq!(id, slot_id),
        e => panic!("Expected SlotNotFound, got: {e:?}"),
    }
}

#[tokio::test]
async fn test_booking_non_open_slot_fails_fast() {
    for status in [SlotStatus::Blocked, SlotStatus::Booked, SlotStatus::Reserved] {
        let mut slots = MockTimeSlotRepo::new();
        let appointments = MockAppointmentRepo::new();
        let church_id = Uuid::new_v4();
        let slot = slot_with_status(church_id, status);
        let slot_id = slot.id;

        slots
            .expect_get_slot()
            .returning(move |_, _| Ok(Some(slot.clone())));
        // The pre-check rejects before any write is attempted.
        slots.expect_reserve_slot().times(0);

        let request = book_request(church_id, slot_id);
        let result = book_slot_wrapper(&slots, &appointments, &request).await;

        match result.unwrap_err() {
            ScheduleError::SlotNotAvailable(id) => assert_eq!(id, slot_id),
            e => panic!("Expected SlotNotAvailable, got: {e:?}"),
        }
    }
}

#[tokio::test]
async fn test_lost_reservation_race_creates_no_appointment() {
    let mut slots = MockTimeSlotRepo::new();
    let mut appointments = MockAppointmentRepo::new();
    let church_id = Uuid::new_v4();
    let slot = slot_with_status(church_id, SlotStatus::Open);
    let slot_id = slot.id;

    // The slot still reads as open, but the conditional update loses.
    slots
        .expect_get_slot()
        .returning(move |_, _| Ok(Some(slot.clone())));
    slots.expect_reserve_slot().returning(|_, _, _| Ok(false));
    appointments.expect_insert_appointment().times(0);

    let request = book_request(church_id, slot_id);
    let result = book_slot_wrapper(&slots, &appointments, &request).await;

    match result.unwrap_err() {
        ScheduleError::SlotAlreadyBooked(id) => assert_eq!(id, slot_id),
        e => panic!("Expected SlotAlreadyBooked, got: {e:?}"),
    }
}

#[tokio::test]
async fn test_exactly_one_of_two_racing_bookings_succeeds() {
    let mut slots = MockTimeSlotRepo::new();
    let mut appointments = MockAppointmentRepo::new();
    let church_id = Uuid::new_v4();
    let slot = slot_with_status(church_id, SlotStatus::Open);
    let slot_id = slot.id;

    // Both requests read the slot as open before either writes.
    slots
        .expect_get_slot()
        .times(2)
        .returning(move |_, _| Ok(Some(slot.clone())));

    // The conditional update only succeeds for the first writer.
    let mut reservations = 0;
    slots
        .expect_reserve_slot()
        .times(2)
        .returning(move |_, _, _| {
            reservations += 1;
            Ok(reservations == 1)
        });

    appointments
        .expect_insert_appointment()
        .times(1)
        .returning(|appt| Ok(appt));

    let request = book_request(church_id, slot_id);
    let first = book_slot_wrapper(&slots, &appointments, &request).await;
    let second = book_slot_wrapper(&slots, &appointments, &request).await;

    assert!(first.is_ok());
    assert!(matches!(
        second.unwrap_err(),
        ScheduleError::SlotAlreadyBooked(_)
    ));
}

#[tokio::test]
async fn test_approve_pending_appointment() {
    let mut appointments = MockAppointmentRepo::new();
    let church_id = Uuid::new_v4();
    let staff_id = Uuid::new_v4();
    let appt = appointment_with_status(
        church_id,
        Uuid::new_v4(),
        AppointmentStatus::Pending,
        date(2025, 3, 10),
    );
    let appt_id = appt.id;

    appointments
        .expect_get_appointment()
        .with(predicate::eq(appt_id), predicate::eq(church_id))
        .returning(move |_, _| Ok(Some(appt.clone())));

    appointments
        .expect_approve_appointment()
        .with(
            predicate::eq(appt_id),
            predicate::eq(staff_id),
            predicate::eq(Some("cleared with pastor")),
        )
        .times(1)
        .returning(move |id, staff_id, notes| {
            let mut updated = appointment_with_status(
                church_id,
                Uuid::new_v4(),
                AppointmentStatus::Approved,
                date(2025, 3, 10),
            );
            updated.id = id;
            updated.approved_by_staff_id = Some(staff_id);
            updated.approved_at = Some(Utc::now());
            updated.admin_notes = notes.map(|n| n.to_string());
            Ok(updated)
        });

    let approved = approve_wrapper(
        &appointments,
        church_id,
        appt_id,
        staff_id,
        Some("cleared with pastor"),
    )
    .await
    .unwrap();

    assert_eq!(approved.status, AppointmentStatus::Approved);
    assert_eq!(approved.approved_by_staff_id, Some(staff_id));
    assert_eq!(approved.admin_notes.as_deref(), Some("cleared with pastor"));
}

#[tokio::test]
async fn test_approve_already_processed_appointment_fails() {
    for status in [
        AppointmentStatus::Approved,
        AppointmentStatus::Rejected,
        AppointmentStatus::Canceled,
        AppointmentStatus::Completed,
    ] {
        let mut appointments = MockAppointmentRepo::new();
        let church_id = Uuid::new_v4();
        let appt = appointment_with_status(church_id, Uuid::new_v4(), status, date(2025, 3, 10));
        let appt_id = appt.id;

        appointments
            .expect_get_appointment()
            .returning(move |_, _| Ok(Some(appt.clone())));
        appointments.expect_approve_appointment().times(0);

        let result =
            approve_wrapper(&appointments, church_id, appt_id, Uuid::new_v4(), None).await;

        assert!(matches!(
            result.unwrap_err(),
            ScheduleError::AppointmentAlreadyProcessed(_)
        ));
    }
}

#[tokio::test]
async fn test_reject_releases_the_slot() {
    let mut slots = MockTimeSlotRepo::new();
    let mut appointments = MockAppointmentRepo::new();
    let church_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();
    let appt =
        appointment_with_status(church_id, slot_id, AppointmentStatus::Pending, date(2025, 3, 10));
    let appt_id = appt.id;

    appointments
        .expect_get_appointment()
        .returning(move |_, _| Ok(Some(appt.clone())));

    appointments
        .expect_reject_appointment()
        .with(predicate::eq(appt_id), predicate::eq("schedule conflict"))
        .times(1)
        .returning(move |id, reason| {
            let mut updated = appointment_with_status(
                church_id,
                slot_id,
                AppointmentStatus::Rejected,
                date(2025, 3, 10),
            );
            updated.id = id;
            updated.rejected_reason = Some(reason.to_string());
            Ok(updated)
        });

    // Rejection always frees the slot, whatever the date.
    slots
        .expect_release_slot()
        .with(predicate::eq(slot_id))
        .times(1)
        .returning(|_| Ok(()));

    let rejected = reject_wrapper(&slots, &appointments, church_id, appt_id, "schedule conflict")
        .await
        .unwrap();

    assert_eq!(rejected.status, AppointmentStatus::Rejected);
    assert_eq!(rejected.rejected_reason.as_deref(), Some("schedule conflict"));
}

#[tokio::test]
async fn test_reject_non_pending_appointment_fails() {
    let mut slots = MockTimeSlotRepo::new();
    let mut appointments = MockAppointmentRepo::new();
    let church_id = Uuid::new_v4();
    let appt = appointment_with_status(
        church_id,
        Uuid::new_v4(),
        AppointmentStatus::Approved,
        date(2025, 3, 10),
    );
    let appt_id = appt.id;

    appointments
        .expect_get_appointment()
        .returning(move |_, _| Ok(Some(appt.clone())));
    appointments.expect_reject_appointment().times(0);
    slots.expect_release_slot().times(0);

    let result = reject_wrapper(&slots, &appointments, church_id, appt_id, "too late").await;

    assert!(matches!(
        result.unwrap_err(),
        ScheduleError::AppointmentAlreadyProcessed(_)
    ));
}

#[tokio::test]
async fn test_cancel_future_appointment_frees_the_slot() {
    let mut slots = MockTimeSlotRepo::new();
    let mut appointments = MockAppointmentRepo::new();
    let church_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();
    let today = date(2025, 3, 10);
    let appt =
        appointment_with_status(church_id, slot_id, AppointmentStatus::Approved, today);
    let appt_id = appt.id;

    appointments
        .expect_get_appointment()
        .returning(move |_, _| Ok(Some(appt.clone())));
    appointments
        .expect_cancel_appointment()
        .times(1)
        .returning(move |id| {
            let mut updated =
                appointment_with_status(church_id, slot_id, AppointmentStatus::Canceled, today);
            updated.id = id;
            Ok(updated)
        });

    // Same-day cancellation still frees the slot.
    slots
        .expect_release_slot()
        .with(predicate::eq(slot_id))
        .times(1)
        .returning(|_| Ok(()));

    let canceled = cancel_wrapper(&slots, &appointments, church_id, appt_id, today)
        .await
        .unwrap();

    assert_eq!(canceled.status, AppointmentStatus::Canceled);
}

#[tokio::test]
async fn test_cancel_past_appointment_keeps_the_slot_booked() {
    let mut slots = MockTimeSlotRepo::new();
    let mut appointments = MockAppointmentRepo::new();
    let church_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();
    let appointment_date = date(2025, 3, 3);
    let today = date(2025, 3, 10);
    let appt =
        appointment_with_status(church_id, slot_id, AppointmentStatus::Approved, appointment_date);
    let appt_id = appt.id;

    appointments
        .expect_get_appointment()
        .returning(move |_, _| Ok(Some(appt.clone())));
    appointments
        .expect_cancel_appointment()
        .times(1)
        .returning(move |id| {
            let mut updated = appointment_with_status(
                church_id,
                slot_id,
                AppointmentStatus::Canceled,
                appointment_date,
            );
            updated.id = id;
            Ok(updated)
        });

    // History preserved: the past slot stays booked.
    slots.expect_release_slot().times(0);

    let canceled = cancel_wrapper(&slots, &appointments, church_id, appt_id, today)
        .await
        .unwrap();

    assert_eq!(canceled.status, AppointmentStatus::Canceled);
}

#[tokio::test]
async fn test_cancel_terminal_appointment_fails() {
    for status in [
        AppointmentStatus::Rejected,
        AppointmentStatus::Canceled,
        AppointmentStatus::Completed,
    ] {
        let mut slots = MockTimeSlotRepo::new();
        let mut appointments = MockAppointmentRepo::new();
        let church_id = Uuid::new_v4();
        let appt =
            appointment_with_status(church_id, Uuid::new_v4(), status, date(2025, 3, 10));
        let appt_id = appt.id;

        appointments
            .expect_get_appointment()
            .returning(move |_, _| Ok(Some(appt.clone())));
        appointments.expect_cancel_appointment().times(0);
        slots.expect_release_slot().times(0);

        let result =
            cancel_wrapper(&slots, &appointments, church_id, appt_id, date(2025, 3, 10)).await;

        assert!(matches!(
            result.unwrap_err(),
            ScheduleError::AppointmentCannotBeCanceled(_)
        ));
    }
}

#[tokio::test]
async fn test_complete_approved_appointment() {
    let mut appointments = MockAppointmentRepo::new();
    let church_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();
    let appt =
        appointment_with_status(church_id, slot_id, AppointmentStatus::Approved, date(2025, 3, 10));
    let appt_id = appt.id;

    appointments
        .expect_get_appointment()
        .returning(move |_, _| Ok(Some(appt.clone())));
    appointments
        .expect_complete_appointment()
        .with(predicate::eq(appt_id), predicate::eq(Some("went well")))
        .times(1)
        .returning(move |id, notes| {
            let mut updated = appointment_with_status(
                church_id,
                slot_id,
                AppointmentStatus::Completed,
                date(2025, 3, 10),
            );
            updated.id = id;
            updated.outcome_notes = notes.map(|n| n.to_string());
            Ok(updated)
        });

    let completed = complete_wrapper(&appointments, church_id, appt_id, Some("went well"))
        .await
        .unwrap();

    assert_eq!(completed.status, AppointmentStatus::Completed);
    assert_eq!(completed.outcome_notes.as_deref(), Some("went well"));
}

#[tokio::test]
async fn test_complete_unapproved_appointment_fails() {
    for status in [
        AppointmentStatus::Pending,
        AppointmentStatus::Rejected,
        AppointmentStatus::Canceled,
        AppointmentStatus::Completed,
    ] {
        let mut appointments = MockAppointmentRepo::new();
        let church_id = Uuid::new_v4();
        let appt =
            appointment_with_status(church_id, Uuid::new_v4(), status, date(2025, 3, 10));
        let appt_id = appt.id;

        appointments
            .expect_get_appointment()
            .returning(move |_, _| Ok(Some(appt.clone())));
        appointments.expect_complete_appointment().times(0);

        let result = complete_wrapper(&appointments, church_id, appt_id, None).await;

        assert!(matches!(
            result.unwrap_err(),
            ScheduleError::AppointmentMustBeApprovedFirst(_)
        ));
    }
}

#[tokio::test]
async fn test_appointment_not_found() {
    let mut appointments = MockAppointmentRepo::new();
    let church_id = Uuid::new_v4();
    let missing = Uuid::new_v4();

    appointments
        .expect_get_appointment()
        .returning(|_, _| Ok(None));

    let result = approve_wrapper(&appointments, church_id, missing, Uuid::new_v4(), None).await;

    match result.unwrap_err() {
        ScheduleError::AppointmentNotFound(id) => assert_eq!(id, missing),
        e => panic!("Expected AppointmentNotFound, got: {e:?}"),
    }
}

#[test]
fn test_ensure_bookable_only_accepts_open_slots() {
    let church_id = Uuid::new_v4();

    let open: TimeSlot = slot_with_status(church_id, SlotStatus::Open).into();
    assert!(ensure_bookable(&open).is_ok());

    for status in [SlotStatus::Blocked, SlotStatus::Booked, SlotStatus::Reserved] {
        let slot: TimeSlot = slot_with_status(church_id, status).into();
        assert!(matches!(
            ensure_bookable(&slot).unwrap_err(),
            ScheduleError::SlotNotAvailable(_)
        ));
    }
}

#[test]
fn test_should_release_on_cancel_boundary() {
    let today = date(2025, 3, 10);

    assert!(should_release_on_cancel(date(2025, 3, 10), today)); // same day
    assert!(should_release_on_cancel(date(2025, 3, 11), today)); // future
    assert!(!should_release_on_cancel(date(2025, 3, 9), today)); // past
}

// Full lifecycle over one Monday morning: generation with a partial block,
// a booking that gets rejected, a re-booking of the freed slot, approval,
// and completion. Slot and appointment state live behind the mocks so each
// step observes the previous step's writes.
#[tokio::test]
async fn test_end_to_end_monday_lifecycle() {
    use shepherd_core::models::{
        overrides::{DateOverride, OverrideAction},
        rule::RecurringRule,
    };
    use shepherd_engine::generator::build_candidates;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    let church_id = Uuid::new_v4();
    let counselor_id = Uuid::new_v4();
    let monday = date(2025, 3, 10);
    let now = Utc::now();

    // Recurring Monday 09:00-11:00 with 60-minute slots, plus a block on
    // [09:00, 09:30) for this date.
    let rule = RecurringRule {
        id: Uuid::new_v4(),
        church_id,
        counselor_id,
        day_of_week: 0,
        start_time: time(9, 0),
        end_time: time(11, 0),
        slot_length_minutes: 60,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    let block = DateOverride {
        id: Uuid::new_v4(),
        church_id,
        counselor_id,
        date: monday,
        start_time: time(9, 0),
        end_time: time(9, 30),
        action: OverrideAction::Block,
        reason: None,
        created_by: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
    };

    let candidates = build_candidates(&[rule], &[block], 60);
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].start_time, time(9, 0));
    assert_eq!(candidates[0].status, SlotStatus::Blocked);
    assert_eq!(candidates[1].start_time, time(10, 0));
    assert_eq!(candidates[1].status, SlotStatus::Open);

    // The bookable 10:00 slot, held as shared state behind the mocks.
    let mut ten_oclock = slot_with_status(church_id, SlotStatus::Open);
    ten_oclock.counselor_id = counselor_id;
    ten_oclock.date = monday;
    let slot_id = ten_oclock.id;
    let slot_state = Arc::new(Mutex::new(ten_oclock));
    let appt_state: Arc<Mutex<HashMap<Uuid, DbAppointment>>> =
        Arc::new(Mutex::new(HashMap::new()));

    let mut slots = MockTimeSlotRepo::new();
    let mut appointments = MockAppointmentRepo::new();

    let state = slot_state.clone();
    slots
        .expect_get_slot()
        .returning(move |_, _| Ok(Some(state.lock().unwrap().clone())));

    let state = slot_state.clone();
    slots.expect_reserve_slot().returning(move |_, _, appt_id| {
        let mut slot = state.lock().unwrap();
        if slot.status == SlotStatus::Open {
            slot.status = SlotStatus::Booked;
            slot.appointment_id = Some(appt_id);
            Ok(true)
        } else {
            Ok(false)
        }
    });

    let state = slot_state.clone();
    slots.expect_release_slot().returning(move |_| {
        let mut slot = state.lock().unwrap();
        slot.status = SlotStatus::Open;
        slot.appointment_id = None;
        Ok(())
    });

    let state = appt_state.clone();
    appointments.expect_insert_appointment().returning(move |appt| {
        state.lock().unwrap().insert(appt.id, appt.clone());
        Ok(appt)
    });

    let state = appt_state.clone();
    appointments
        .expect_get_appointment()
        .returning(move |id, _| Ok(state.lock().unwrap().get(&id).cloned()));

    let state = appt_state.clone();
    appointments
        .expect_reject_appointment()
        .returning(move |id, reason| {
            let mut appts = state.lock().unwrap();
            let appt = appts.get_mut(&id).unwrap();
            appt.status = AppointmentStatus::Rejected;
            appt.rejected_reason = Some(reason.to_string());
            Ok(appt.clone())
        });

    let state = appt_state.clone();
    appointments
        .expect_approve_appointment()
        .returning(move |id, staff_id, _| {
            let mut appts = state.lock().unwrap();
            let appt = appts.get_mut(&id).unwrap();
            appt.status = AppointmentStatus::Approved;
            appt.approved_by_staff_id = Some(staff_id);
            appt.approved_at = Some(Utc::now());
            Ok(appt.clone())
        });

    let state = appt_state.clone();
    appointments
        .expect_complete_appointment()
        .returning(move |id, notes| {
            let mut appts = state.lock().unwrap();
            let appt = appts.get_mut(&id).unwrap();
            appt.status = AppointmentStatus::Completed;
            appt.outcome_notes = notes.map(|n| n.to_string());
            Ok(appt.clone())
        });

    // First member books the open 10:00 slot.
    let first = book_slot_wrapper(&slots, &appointments, &book_request(church_id, slot_id))
        .await
        .unwrap();
    assert_eq!(first.status, AppointmentStatus::Pending);
    assert_eq!(slot_state.lock().unwrap().status, SlotStatus::Booked);

    // Staff rejects; the slot returns to open.
    let rejected = reject_wrapper(&slots, &appointments, church_id, first.id, "schedule conflict")
        .await
        .unwrap();
    assert_eq!(rejected.status, AppointmentStatus::Rejected);
    assert_eq!(slot_state.lock().unwrap().status, SlotStatus::Open);
    assert_eq!(slot_state.lock().unwrap().appointment_id, None);

    // A second member books the same slot.
    let second = book_slot_wrapper(&slots, &appointments, &book_request(church_id, slot_id))
        .await
        .unwrap();
    assert_eq!(second.status, AppointmentStatus::Pending);

    // Approve, then complete with outcome notes.
    let approved = approve_wrapper(&appointments, church_id, second.id, Uuid::new_v4(), None)
        .await
        .unwrap();
    assert_eq!(approved.status, AppointmentStatus::Approved);

    let completed = complete_wrapper(&appointments, church_id, second.id, Some("went well"))
        .await
        .unwrap();
    assert_eq!(completed.status, AppointmentStatus::Completed);
    assert_eq!(completed.outcome_notes.as_deref(), Some("went well"));

    // The completed appointment's slot stays booked permanently.
    assert_eq!(slot_state.lock().unwrap().status, SlotStatus::Booked);
    assert_eq!(
        slot_state.lock().unwrap().appointment_id,
        Some(second.id)
    );
}
