use shepherd_core::errors::{ScheduleError, ScheduleResult};
use uuid::Uuid;

#[test]
fn test_schedule_error_display() {
    let id = Uuid::new_v4();

    let slot_not_found = ScheduleError::SlotNotFound(id);
    let slot_not_available = ScheduleError::SlotNotAvailable(id);
    let slot_already_booked = ScheduleError::SlotAlreadyBooked(id);
    let appointment_not_found = ScheduleError::AppointmentNotFound(id);
    let already_processed = ScheduleError::AppointmentAlreadyProcessed(id);
    let cannot_cancel = ScheduleError::AppointmentCannotBeCanceled(id);
    let must_approve = ScheduleError::AppointmentMustBeApprovedFirst(id);
    let validation = ScheduleError::Validation("Invalid input".to_string());
    let database = ScheduleError::Database(eyre::eyre!("Database connection failed"));

    assert_eq!(
        slot_not_found.to_string(),
        format!("Time slot not found: {id}")
    );
    assert_eq!(
        slot_not_available.to_string(),
        format!("Time slot {id} is not available for booking")
    );
    assert_eq!(
        slot_already_booked.to_string(),
        format!("Time slot {id} was booked by a concurrent request")
    );
    assert_eq!(
        appointment_not_found.to_string(),
        format!("Appointment not found: {id}")
    );
    assert_eq!(
        already_processed.to_string(),
        format!("Appointment {id} has already been processed")
    );
    assert_eq!(
        cannot_cancel.to_string(),
        format!("Appointment {id} can no longer be canceled")
    );
    assert_eq!(
        must_approve.to_string(),
        format!("Appointment {id} must be approved before it can be completed")
    );
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert!(database.to_string().contains("Database error:"));
}

#[test]
fn test_schedule_result() {
    let result: ScheduleResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: ScheduleResult<i32> = Err(ScheduleError::SlotNotFound(Uuid::new_v4()));
    assert!(result.is_err());
}

#[test]
fn test_from_eyre_report() {
    let report = eyre::eyre!("connection reset");
    let err: ScheduleError = report.into();

    assert!(matches!(err, ScheduleError::Database(_)));
    assert!(err.to_string().contains("connection reset"));
}
