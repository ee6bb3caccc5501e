//! # Shepherd Engine
//!
//! The scheduling core: slot generation from recurring rules and date
//! overrides, availability queries, and the booking/appointment lifecycle
//! with its race-free slot reservation.
//!
//! ## Architecture
//!
//! - **Generator**: materializes discrete time slots for a date by combining
//!   recurring rules with date-specific overrides, then merges them into the
//!   slot repository without ever touching booked or reserved slots.
//! - **Availability**: read-only slot listings used by public availability
//!   views and by booking clients discovering candidates.
//! - **Booking**: the only writer that moves a slot into or out of `booked`.
//!   Reservation is a single conditional update against the slot row, so at
//!   most one of any number of concurrent booking attempts can succeed.
//! - **Schedule**: staff-facing management of recurring rules and date
//!   overrides, validating input before it reaches the stores.
//! - **Audit**: fire-and-forget event sink invoked after each committed
//!   transition; its failures never roll back a booking.
//!
//! The engine is stateless per call. Batch generation is triggered by an
//! external periodic job and is idempotent, so overlapping runs are safe.

/// Fire-and-forget audit event sink contract
pub mod audit;
/// Read-only availability queries over persisted slots
pub mod availability;
/// Booking engine and appointment state machine
pub mod booking;
/// Environment configuration for the batch generation job
pub mod config;
/// Slot generation from rules and overrides
pub mod generator;
/// Management of recurring rules and date overrides
pub mod schedule;
