//! Staff-facing management of recurring rules and date overrides. Input
//! validation happens here, before anything touches the database; slot
//! materialization from the resulting rules and overrides is the
//! generator's job.

use chrono::{NaiveDate, NaiveTime};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use shepherd_core::{
    errors::{ScheduleError, ScheduleResult},
    models::{
        overrides::{DateOverride, NewOverride},
        rule::{NewRecurringRule, RecurringRule},
    },
};
use shepherd_db::repositories::{overrides, recurring_rule};

use crate::audit::AuditSink;

pub async fn create_rule(
    pool: &PgPool,
    audit: &dyn AuditSink,
    rule: &NewRecurringRule,
) -> ScheduleResult<RecurringRule> {
    rule.validate()?;

    let created = recurring_rule::create_rule(pool, rule)
        .await
        .map_err(ScheduleError::Database)?;

    audit
        .record(
            rule.church_id,
            "rule.created",
            "Recurring availability rule created",
            json!({
                "rule_id": created.id,
                "counselor_id": rule.counselor_id,
                "day_of_week": rule.day_of_week,
            }),
        )
        .await;

    Ok(created.into())
}

/// Activate or deactivate a rule. Returns `None` when no rule matches the
/// id within the church. Existing slots are untouched; the change only
/// affects future generation runs.
pub async fn set_rule_active(
    pool: &PgPool,
    audit: &dyn AuditSink,
    church_id: Uuid,
    rule_id: Uuid,
    is_active: bool,
) -> ScheduleResult<Option<RecurringRule>> {
    let updated = recurring_rule::set_rule_active(pool, rule_id, church_id, is_active)
        .await
        .map_err(ScheduleError::Database)?;

    if updated.is_some() {
        audit
            .record(
                church_id,
                "rule.active_changed",
                "Recurring rule activation toggled",
                json!({ "rule_id": rule_id, "is_active": is_active }),
            )
            .await;
    }

    Ok(updated.map(RecurringRule::from))
}

pub async fn list_rules(
    pool: &PgPool,
    church_id: Uuid,
    counselor_id: Uuid,
) -> ScheduleResult<Vec<RecurringRule>> {
    let rules = recurring_rule::list_rules_by_counselor(pool, church_id, counselor_id)
        .await
        .map_err(ScheduleError::Database)?;

    Ok(rules.into_iter().map(RecurringRule::from).collect())
}

pub async fn create_override(
    pool: &PgPool,
    audit: &dyn AuditSink,
    ov: &NewOverride,
) -> ScheduleResult<DateOverride> {
    ov.validate()?;

    let created = overrides::create_override(pool, ov)
        .await
        .map_err(ScheduleError::Database)?;

    audit
        .record(
            ov.church_id,
            "override.created",
            "Schedule override created",
            json!({
                "override_id": created.id,
                "counselor_id": ov.counselor_id,
                "date": ov.date,
                "action": ov.action,
            }),
        )
        .await;

    Ok(created.into())
}

pub async fn list_overrides(
    pool: &PgPool,
    church_id: Uuid,
    counselor_id: Uuid,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> ScheduleResult<Vec<DateOverride>> {
    let ovs = overrides::list_overrides(pool, church_id, counselor_id, date_from, date_to)
        .await
        .map_err(ScheduleError::Database)?;

    Ok(ovs.into_iter().map(DateOverride::from).collect())
}

/// Adjust an override's window or reason. Returns `None` when no override
/// matches the id within the church.
pub async fn update_override(
    pool: &PgPool,
    audit: &dyn AuditSink,
    church_id: Uuid,
    override_id: Uuid,
    start_time: NaiveTime,
    end_time: NaiveTime,
    reason: Option<&str>,
) -> ScheduleResult<Option<DateOverride>> {
    if end_time <= start_time {
        return Err(ScheduleError::Validation(
            "Override end time must be after start time".to_string(),
        ));
    }

    let updated = overrides::update_override(pool, override_id, church_id, start_time, end_time, reason)
        .await
        .map_err(ScheduleError::Database)?;

    if updated.is_some() {
        audit
            .record(
                church_id,
                "override.updated",
                "Schedule override updated",
                json!({ "override_id": override_id }),
            )
            .await;
    }

    Ok(updated.map(DateOverride::from))
}

/// Remove an override. Returns whether a row was deleted. Already-generated
/// slots keep their current status until the next generation run
/// reconciles them.
pub async fn delete_override(
    pool: &PgPool,
    audit: &dyn AuditSink,
    church_id: Uuid,
    override_id: Uuid,
) -> ScheduleResult<bool> {
    let deleted = overrides::delete_override(pool, override_id, church_id)
        .await
        .map_err(ScheduleError::Database)?;

    if deleted {
        audit
            .record(
                church_id,
                "override.deleted",
                "Schedule override deleted",
                json!({ "override_id": override_id }),
            )
            .await;
    }

    Ok(deleted)
}
