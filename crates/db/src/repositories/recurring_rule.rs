use crate::models::DbRecurringRule;
use chrono::Utc;
use eyre::Result;
use shepherd_core::models::rule::NewRecurringRule;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_rule(
    pool: &Pool<Postgres>,
    rule: &NewRecurringRule,
) -> Result<DbRecurringRule> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating recurring rule: id={}, counselor={}, day_of_week={}",
        id,
        rule.counselor_id,
        rule.day_of_week
    );

    let created = sqlx::query_as::<_, DbRecurringRule>(
        r#"
        INSERT INTO recurring_rules
            (id, church_id, counselor_id, day_of_week, start_time, end_time,
             slot_length_minutes, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8, $8)
        RETURNING id, church_id, counselor_id, day_of_week, start_time, end_time,
                  slot_length_minutes, is_active, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(rule.church_id)
    .bind(rule.counselor_id)
    .bind(rule.day_of_week)
    .bind(rule.start_time)
    .bind(rule.end_time)
    .bind(rule.slot_length_minutes)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

/// Active rules contributing slots for one counselor on one weekday,
/// ordered by creation time. The generator processes them in this order,
/// which defines "last processed wins" for colliding start times.
pub async fn get_active_rules_for_day(
    pool: &Pool<Postgres>,
    church_id: Uuid,
    counselor_id: Uuid,
    day_of_week: i16,
) -> Result<Vec<DbRecurringRule>> {
    let rules = sqlx::query_as::<_, DbRecurringRule>(
        r#"
        SELECT id, church_id, counselor_id, day_of_week, start_time, end_time,
               slot_length_minutes, is_active, created_at, updated_at
        FROM recurring_rules
        WHERE church_id = $1 AND counselor_id = $2 AND day_of_week = $3 AND is_active
        ORDER BY created_at ASC
        "#,
    )
    .bind(church_id)
    .bind(counselor_id)
    .bind(day_of_week)
    .fetch_all(pool)
    .await?;

    Ok(rules)
}

pub async fn list_rules_by_counselor(
    pool: &Pool<Postgres>,
    church_id: Uuid,
    counselor_id: Uuid,
) -> Result<Vec<DbRecurringRule>> {
    let rules = sqlx::query_as::<_, DbRecurringRule>(
        r#"
        SELECT id, church_id, counselor_id, day_of_week, start_time, end_time,
               slot_length_minutes, is_active, created_at, updated_at
        FROM recurring_rules
        WHERE church_id = $1 AND counselor_id = $2
        ORDER BY day_of_week ASC, start_time ASC
        "#,
    )
    .bind(church_id)
    .bind(counselor_id)
    .fetch_all(pool)
    .await?;

    Ok(rules)
}

pub async fn set_rule_active(
    pool: &Pool<Postgres>,
    id: Uuid,
    church_id: Uuid,
    is_active: bool,
) -> Result<Option<DbRecurringRule>> {
    let rule = sqlx::query_as::<_, DbRecurringRule>(
        r#"
        UPDATE recurring_rules
        SET is_active = $3, updated_at = $4
        WHERE id = $1 AND church_id = $2
        RETURNING id, church_id, counselor_id, day_of_week, start_time, end_time,
                  slot_length_minutes, is_active, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(church_id)
    .bind(is_active)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(rule)
}

/// Counselors of a church with at least one active rule. Counselor records
/// themselves live outside this core, so the batch generation job derives
/// its working set from the rules.
pub async fn active_counselor_ids(pool: &Pool<Postgres>, church_id: Uuid) -> Result<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT DISTINCT counselor_id
        FROM recurring_rules
        WHERE church_id = $1 AND is_active
        "#,
    )
    .bind(church_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}
