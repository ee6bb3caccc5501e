use crate::models::DbOverride;
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::Result;
use shepherd_core::models::overrides::NewOverride;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const OVERRIDE_COLUMNS: &str = "id, church_id, counselor_id, date, start_time, end_time, \
                                action, reason, created_by, created_at, updated_at";

pub async fn create_override(pool: &Pool<Postgres>, ov: &NewOverride) -> Result<DbOverride> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating override: id={}, counselor={}, date={}, action={:?}",
        id,
        ov.counselor_id,
        ov.date,
        ov.action
    );

    let created = sqlx::query_as::<_, DbOverride>(&format!(
        r#"
        INSERT INTO schedule_overrides
            (id, church_id, counselor_id, date, start_time, end_time,
             action, reason, created_by, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
        RETURNING {OVERRIDE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(ov.church_id)
    .bind(ov.counselor_id)
    .bind(ov.date)
    .bind(ov.start_time)
    .bind(ov.end_time)
    .bind(ov.action)
    .bind(&ov.reason)
    .bind(ov.created_by)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

/// Overrides applying to one counselor on one exact date, in creation order.
pub async fn get_overrides_for_date(
    pool: &Pool<Postgres>,
    church_id: Uuid,
    counselor_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<DbOverride>> {
    let overrides = sqlx::query_as::<_, DbOverride>(&format!(
        r#"
        SELECT {OVERRIDE_COLUMNS}
        FROM schedule_overrides
        WHERE church_id = $1 AND counselor_id = $2 AND date = $3
        ORDER BY created_at ASC
        "#
    ))
    .bind(church_id)
    .bind(counselor_id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(overrides)
}

pub async fn list_overrides(
    pool: &Pool<Postgres>,
    church_id: Uuid,
    counselor_id: Uuid,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> Result<Vec<DbOverride>> {
    let overrides = sqlx::query_as::<_, DbOverride>(&format!(
        r#"
        SELECT {OVERRIDE_COLUMNS}
        FROM schedule_overrides
        WHERE church_id = $1 AND counselor_id = $2 AND date BETWEEN $3 AND $4
        ORDER BY date ASC, start_time ASC
        "#
    ))
    .bind(church_id)
    .bind(counselor_id)
    .bind(date_from)
    .bind(date_to)
    .fetch_all(pool)
    .await?;

    Ok(overrides)
}

pub async fn update_override(
    pool: &Pool<Postgres>,
    id: Uuid,
    church_id: Uuid,
    start_time: NaiveTime,
    end_time: NaiveTime,
    reason: Option<&str>,
) -> Result<Option<DbOverride>> {
    let updated = sqlx::query_as::<_, DbOverride>(&format!(
        r#"
        UPDATE schedule_overrides
        SET start_time = $3, end_time = $4, reason = $5, updated_at = $6
        WHERE id = $1 AND church_id = $2
        RETURNING {OVERRIDE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(church_id)
    .bind(start_time)
    .bind(end_time)
    .bind(reason)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(updated)
}

pub async fn delete_override(pool: &Pool<Postgres>, id: Uuid, church_id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM schedule_overrides
        WHERE id = $1 AND church_id = $2
        "#,
    )
    .bind(id)
    .bind(church_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
