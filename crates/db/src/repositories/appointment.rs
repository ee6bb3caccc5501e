use crate::models::DbAppointment;
use chrono::Utc;
use eyre::Result;
use shepherd_core::models::appointment::AppointmentStatus;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const APPOINTMENT_COLUMNS: &str =
    "id, church_id, member_id, counselor_id, slot_id, date, start_time, end_time, \
     appointment_type, status, urgency, topic, description, created_by_member, \
     created_by_staff_id, approved_by_staff_id, approved_at, rejected_reason, \
     admin_notes, outcome_notes, created_at, updated_at";

/// Persist a fully-built appointment row. The id is generated by the
/// booking engine before the slot reservation, so the slot's
/// `appointment_id` back-reference and this row always agree.
pub async fn insert_appointment(
    pool: &Pool<Postgres>,
    appt: &DbAppointment,
) -> Result<DbAppointment> {
    let inserted = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments
            (id, church_id, member_id, counselor_id, slot_id, date, start_time, end_time,
             appointment_type, status, urgency, topic, description, created_by_member,
             created_by_staff_id, approved_by_staff_id, approved_at, rejected_reason,
             admin_notes, outcome_notes, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22)
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(appt.id)
    .bind(appt.church_id)
    .bind(appt.member_id)
    .bind(appt.counselor_id)
    .bind(appt.slot_id)
    .bind(appt.date)
    .bind(appt.start_time)
    .bind(appt.end_time)
    .bind(&appt.appointment_type)
    .bind(appt.status)
    .bind(&appt.urgency)
    .bind(&appt.topic)
    .bind(&appt.description)
    .bind(appt.created_by_member)
    .bind(appt.created_by_staff_id)
    .bind(appt.approved_by_staff_id)
    .bind(appt.approved_at)
    .bind(&appt.rejected_reason)
    .bind(&appt.admin_notes)
    .bind(&appt.outcome_notes)
    .bind(appt.created_at)
    .bind(appt.updated_at)
    .fetch_one(pool)
    .await?;

    Ok(inserted)
}

pub async fn get_appointment(
    pool: &Pool<Postgres>,
    id: Uuid,
    church_id: Uuid,
) -> Result<Option<DbAppointment>> {
    let appt = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments
        WHERE id = $1 AND church_id = $2
        "#
    ))
    .bind(id)
    .bind(church_id)
    .fetch_optional(pool)
    .await?;

    Ok(appt)
}

pub async fn approve_appointment(
    pool: &Pool<Postgres>,
    id: Uuid,
    staff_id: Uuid,
    admin_notes: Option<&str>,
) -> Result<DbAppointment> {
    let now = Utc::now();

    let appt = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET status = 'approved', approved_by_staff_id = $2, approved_at = $3,
            admin_notes = COALESCE($4, admin_notes), updated_at = $3
        WHERE id = $1
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(staff_id)
    .bind(now)
    .bind(admin_notes)
    .fetch_one(pool)
    .await?;

    Ok(appt)
}

pub async fn reject_appointment(
    pool: &Pool<Postgres>,
    id: Uuid,
    reason: &str,
) -> Result<DbAppointment> {
    let appt = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET status = 'rejected', rejected_reason = $2, updated_at = $3
        WHERE id = $1
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(reason)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(appt)
}

pub async fn cancel_appointment(pool: &Pool<Postgres>, id: Uuid) -> Result<DbAppointment> {
    let appt = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET status = 'canceled', updated_at = $2
        WHERE id = $1
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(appt)
}

pub async fn complete_appointment(
    pool: &Pool<Postgres>,
    id: Uuid,
    outcome_notes: Option<&str>,
) -> Result<DbAppointment> {
    let appt = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET status = 'completed', outcome_notes = $2, updated_at = $3
        WHERE id = $1
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(outcome_notes)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(appt)
}

pub async fn list_appointments(
    pool: &Pool<Postgres>,
    church_id: Uuid,
    counselor_id: Option<Uuid>,
    member_id: Option<Uuid>,
    status: Option<AppointmentStatus>,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments
        WHERE church_id = $1
          AND ($2::uuid IS NULL OR counselor_id = $2)
          AND ($3::uuid IS NULL OR member_id = $3)
          AND ($4::appointment_status IS NULL OR status = $4)
        ORDER BY date ASC, start_time ASC
        "#
    ))
    .bind(church_id)
    .bind(counselor_id)
    .bind(member_id)
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}
