//! Read-only availability queries. Both the public listing surface and
//! booking clients discovering candidate slots go through this filter; it
//! never mutates slot state.

use sqlx::PgPool;

use shepherd_core::{
    errors::{ScheduleError, ScheduleResult},
    models::slot::{SlotFilter, TimeSlot},
};
use shepherd_db::repositories::time_slot;

/// List persisted slots matching the filter, ordered by `(date, start_time)`
/// ascending.
pub async fn list_slots(pool: &PgPool, filter: &SlotFilter) -> ScheduleResult<Vec<TimeSlot>> {
    let slots = time_slot::list_slots(pool, filter)
        .await
        .map_err(ScheduleError::Database)?;

    Ok(slots.into_iter().map(TimeSlot::from).collect())
}
