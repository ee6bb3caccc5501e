use thiserror::Error;
use uuid::Uuid;

/// Domain errors for the scheduling engine.
///
/// Every business-rule violation is a typed variant so callers can map it
/// to their own surface (HTTP status, bot reply, ...) without string
/// matching. `SlotAlreadyBooked` is the expected outcome of losing a
/// concurrent reservation race, not a fault.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Time slot not found: {0}")]
    SlotNotFound(Uuid),

    #[error("Time slot {0} is not available for booking")]
    SlotNotAvailable(Uuid),

    #[error("Time slot {0} was booked by a concurrent request")]
    SlotAlreadyBooked(Uuid),

    #[error("Appointment not found: {0}")]
    AppointmentNotFound(Uuid),

    #[error("Appointment {0} has already been processed")]
    AppointmentAlreadyProcessed(Uuid),

    #[error("Appointment {0} can no longer be canceled")]
    AppointmentCannotBeCanceled(Uuid),

    #[error("Appointment {0} must be approved before it can be completed")]
    AppointmentMustBeApprovedFirst(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
