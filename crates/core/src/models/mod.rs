/// Appointment entity and its lifecycle state machine
pub mod appointment;
/// Date-specific schedule overrides (block / add extra hours)
pub mod overrides;
/// Weekly recurring availability rules
pub mod rule;
/// Materialized bookable time slots
pub mod slot;
