use crate::models::DbTimeSlot;
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::Result;
use shepherd_core::models::slot::{SlotFilter, SlotSource, SlotStatus};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const SLOT_COLUMNS: &str = "id, church_id, counselor_id, date, start_time, end_time, \
                            status, source, appointment_id, created_at, updated_at";

#[allow(clippy::too_many_arguments)]
pub async fn insert_slot(
    pool: &Pool<Postgres>,
    church_id: Uuid,
    counselor_id: Uuid,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    status: SlotStatus,
    source: SlotSource,
) -> Result<DbTimeSlot> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        INSERT INTO time_slots
            (id, church_id, counselor_id, date, start_time, end_time,
             status, source, appointment_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NULL, $9, $9)
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(church_id)
    .bind(counselor_id)
    .bind(date)
    .bind(start_time)
    .bind(end_time)
    .bind(status)
    .bind(source)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(slot)
}

/// Look up a slot by its generation identity.
pub async fn find_slot_by_identity(
    pool: &Pool<Postgres>,
    church_id: Uuid,
    counselor_id: Uuid,
    date: NaiveDate,
    start_time: NaiveTime,
) -> Result<Option<DbTimeSlot>> {
    let slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM time_slots
        WHERE church_id = $1 AND counselor_id = $2 AND date = $3 AND start_time = $4
        "#
    ))
    .bind(church_id)
    .bind(counselor_id)
    .bind(date)
    .bind(start_time)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

/// In-place regeneration update for a slot whose identity already exists.
/// Callers must have checked that the persisted slot is neither booked nor
/// reserved; the status guard here is a second line of defence, not the
/// primary one.
pub async fn update_slot_generation(
    pool: &Pool<Postgres>,
    id: Uuid,
    end_time: NaiveTime,
    status: SlotStatus,
    source: SlotSource,
) -> Result<Option<DbTimeSlot>> {
    let slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        UPDATE time_slots
        SET end_time = $2, status = $3, source = $4, updated_at = $5
        WHERE id = $1 AND status NOT IN ('booked', 'reserved')
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(end_time)
    .bind(status)
    .bind(source)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

pub async fn get_slot(
    pool: &Pool<Postgres>,
    id: Uuid,
    church_id: Uuid,
) -> Result<Option<DbTimeSlot>> {
    let slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM time_slots
        WHERE id = $1 AND church_id = $2
        "#
    ))
    .bind(id)
    .bind(church_id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

/// Slots matching the availability filter, ordered by (date, start_time).
pub async fn list_slots(pool: &Pool<Postgres>, filter: &SlotFilter) -> Result<Vec<DbTimeSlot>> {
    let slots = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM time_slots
        WHERE church_id = $1
          AND status = $2
          AND ($3::uuid IS NULL OR counselor_id = $3)
          AND ($4::date IS NULL OR date >= $4)
          AND ($5::date IS NULL OR date <= $5)
        ORDER BY date ASC, start_time ASC
        "#
    ))
    .bind(filter.church_id)
    .bind(filter.status)
    .bind(filter.counselor_id)
    .bind(filter.date_from)
    .bind(filter.date_to)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

/// The atomic reservation: a conditional update that only succeeds while
/// the slot is still open. Exactly one of N concurrent callers observes
/// `true`; the database applies the row update atomically, so no external
/// lock is needed.
pub async fn reserve_slot(
    pool: &Pool<Postgres>,
    id: Uuid,
    church_id: Uuid,
    appointment_id: Uuid,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE time_slots
        SET status = 'booked', appointment_id = $3, updated_at = $4
        WHERE id = $1 AND church_id = $2 AND status = 'open'
        "#,
    )
    .bind(id)
    .bind(church_id)
    .bind(appointment_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Compensating release: return a booked slot to open and clear its
/// appointment back-reference.
pub async fn release_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE time_slots
        SET status = 'open', appointment_id = NULL, updated_at = $2
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}
