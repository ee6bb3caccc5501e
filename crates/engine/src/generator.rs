//! # Slot Generator
//!
//! Materializes the bookable time slots for one `(church, counselor, date)`
//! by combining weekly recurring rules with date-specific overrides, then
//! reconciling the result against already-persisted slots.
//!
//! Generation is idempotent: candidates merge by the slot identity
//! `(church_id, counselor_id, date, start_time)`, existing open/blocked
//! slots are updated in place, and booked or reserved slots are never
//! overwritten. Running the same generation twice reports `generated = 0`
//! the second time and changes nothing.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use shepherd_core::{
    errors::{ScheduleError, ScheduleResult},
    models::{
        overrides::{DateOverride, OverrideAction},
        rule::RecurringRule,
        slot::{GenerationReport, SlotSource, SlotStatus},
    },
};
use shepherd_db::repositories::{overrides, recurring_rule, time_slot};
use std::collections::BTreeMap;

/// Tunables for slot generation.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Slot length used for `add_extra` override ranges, which carry no
    /// rule-provided granularity.
    pub extra_slot_minutes: i64,
    /// Days ahead of "today" the church-wide batch job materializes.
    pub look_ahead_days: i64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            extra_slot_minutes: 60,
            look_ahead_days: 30,
        }
    }
}

/// A not-yet-persisted slot produced for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCandidate {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: SlotStatus,
    pub source: SlotSource,
}

/// Advance a time of day without wrapping past midnight.
fn add_minutes(time: NaiveTime, minutes: i64) -> Option<NaiveTime> {
    let (next, wrapped_days) = time.overflowing_add_signed(Duration::minutes(minutes));
    (wrapped_days == 0).then_some(next)
}

/// Slice `[start, end)` into consecutive slots of `slot_minutes`, dropping
/// any trailing remainder shorter than a full slot. A window shorter than
/// one slot yields no slots.
pub fn slice_window(
    start: NaiveTime,
    end: NaiveTime,
    slot_minutes: i64,
) -> Vec<(NaiveTime, NaiveTime)> {
    let mut slots = Vec::new();
    if slot_minutes <= 0 {
        return slots;
    }

    let mut cursor = start;
    while let Some(slot_end) = add_minutes(cursor, slot_minutes) {
        if slot_end > end || slot_end <= cursor {
            break;
        }
        slots.push((cursor, slot_end));
        cursor = slot_end;
    }
    slots
}

/// Half-open interval overlap: `[a_start, a_end)` intersects `[b_start, b_end)`.
pub fn overlaps(a_start: NaiveTime, a_end: NaiveTime, b_start: NaiveTime, b_end: NaiveTime) -> bool {
    !(a_end <= b_start || b_end <= a_start)
}

/// Build the full candidate set for one date from the rules active on its
/// weekday and the overrides pinned to it. Pure; no persistence involved.
///
/// Candidates collapse by start time, and later processing wins: recurring
/// rules contribute in the order given, block overrides mark overlapping
/// recurring slots, and `add_extra` slots land last (blocks do not filter
/// them).
pub fn build_candidates(
    rules: &[RecurringRule],
    overrides: &[DateOverride],
    extra_slot_minutes: i64,
) -> Vec<SlotCandidate> {
    let mut candidates: Vec<SlotCandidate> = Vec::new();

    for rule in rules {
        for (start, end) in slice_window(
            rule.start_time,
            rule.end_time,
            rule.slot_length_minutes as i64,
        ) {
            candidates.push(SlotCandidate {
                start_time: start,
                end_time: end,
                status: SlotStatus::Open,
                source: SlotSource::Recurring,
            });
        }
    }

    for ov in overrides
        .iter()
        .filter(|ov| ov.action == OverrideAction::Block)
    {
        for candidate in candidates.iter_mut() {
            if overlaps(
                candidate.start_time,
                candidate.end_time,
                ov.start_time,
                ov.end_time,
            ) {
                candidate.status = SlotStatus::Blocked;
                candidate.source = SlotSource::OverrideBlock;
            }
        }
    }

    for ov in overrides
        .iter()
        .filter(|ov| ov.action == OverrideAction::AddExtra)
    {
        for (start, end) in slice_window(ov.start_time, ov.end_time, extra_slot_minutes) {
            candidates.push(SlotCandidate {
                start_time: start,
                end_time: end,
                status: SlotStatus::Open,
                source: SlotSource::OverrideAdd,
            });
        }
    }

    // Collapse duplicate start times; identity is the start time, last
    // processed wins.
    let mut by_start: BTreeMap<NaiveTime, SlotCandidate> = BTreeMap::new();
    for candidate in candidates {
        by_start.insert(candidate.start_time, candidate);
    }
    by_start.into_values().collect()
}

/// Generate and persist slots for one counselor on one date.
pub async fn generate_for_date(
    pool: &PgPool,
    config: &GeneratorConfig,
    church_id: Uuid,
    counselor_id: Uuid,
    date: NaiveDate,
) -> ScheduleResult<GenerationReport> {
    let day_of_week = date.weekday().num_days_from_monday() as i16;

    let rules: Vec<RecurringRule> =
        recurring_rule::get_active_rules_for_day(pool, church_id, counselor_id, day_of_week)
            .await
            .map_err(ScheduleError::Database)?
            .into_iter()
            .map(RecurringRule::from)
            .collect();

    let date_overrides: Vec<DateOverride> =
        overrides::get_overrides_for_date(pool, church_id, counselor_id, date)
            .await
            .map_err(ScheduleError::Database)?
            .into_iter()
            .map(DateOverride::from)
            .collect();

    let candidates = build_candidates(&rules, &date_overrides, config.extra_slot_minutes);

    let mut report = GenerationReport::default();
    for candidate in candidates {
        let existing = time_slot::find_slot_by_identity(
            pool,
            church_id,
            counselor_id,
            date,
            candidate.start_time,
        )
        .await
        .map_err(ScheduleError::Database)?;

        match existing {
            None => {
                time_slot::insert_slot(
                    pool,
                    church_id,
                    counselor_id,
                    date,
                    candidate.start_time,
                    candidate.end_time,
                    candidate.status,
                    candidate.source,
                )
                .await
                .map_err(ScheduleError::Database)?;
                report.generated += 1;
                if candidate.status == SlotStatus::Blocked {
                    report.blocked += 1;
                }
            }
            Some(slot)
                if slot.status == SlotStatus::Booked || slot.status == SlotStatus::Reserved =>
            {
                // Booked state always wins over regeneration.
                report.skipped += 1;
            }
            Some(slot) => {
                time_slot::update_slot_generation(
                    pool,
                    slot.id,
                    candidate.end_time,
                    candidate.status,
                    candidate.source,
                )
                .await
                .map_err(ScheduleError::Database)?;
                if candidate.status == SlotStatus::Blocked {
                    report.blocked += 1;
                }
            }
        }
    }

    tracing::debug!(
        "Generated slots for counselor={} date={}: generated={}, blocked={}, skipped={}",
        counselor_id,
        date,
        report.generated,
        report.blocked,
        report.skipped
    );

    Ok(report)
}

/// Generate slots day by day over an inclusive date range, aggregating
/// the per-day reports.
pub async fn generate_for_range(
    pool: &PgPool,
    config: &GeneratorConfig,
    church_id: Uuid,
    counselor_id: Uuid,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> ScheduleResult<GenerationReport> {
    let mut report = GenerationReport::default();

    let mut date = date_from;
    while date <= date_to {
        let day_report = generate_for_date(pool, config, church_id, counselor_id, date).await?;
        report.merge(day_report);
        date = date
            .succ_opt()
            .ok_or_else(|| ScheduleError::Validation(format!("date out of range: {date}")))?;
    }

    Ok(report)
}

/// Entry point for the periodic look-ahead job: generate slots for every
/// counselor of a church that has at least one active recurring rule, from
/// `today` through the configured look-ahead window. Idempotent, so
/// overlapping job runs are safe, merely redundant.
pub async fn generate_for_church(
    pool: &PgPool,
    config: &GeneratorConfig,
    church_id: Uuid,
    today: NaiveDate,
) -> ScheduleResult<GenerationReport> {
    let date_to = today + Duration::days(config.look_ahead_days);

    let counselor_ids = recurring_rule::active_counselor_ids(pool, church_id)
        .await
        .map_err(ScheduleError::Database)?;

    let mut report = GenerationReport::default();
    for counselor_id in counselor_ids {
        let counselor_report =
            generate_for_range(pool, config, church_id, counselor_id, today, date_to).await?;
        report.merge(counselor_report);
    }

    tracing::info!(
        "Church {} look-ahead generation through {}: generated={}, blocked={}, skipped={}",
        church_id,
        date_to,
        report.generated,
        report.blocked,
        report.skipped
    );

    Ok(report)
}
