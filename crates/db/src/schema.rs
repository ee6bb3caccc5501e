use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create enum types (no CREATE TYPE IF NOT EXISTS in Postgres)
    sqlx::query(
        r#"
        DO $$ BEGIN
            CREATE TYPE slot_status AS ENUM ('open', 'blocked', 'booked', 'reserved');
        EXCEPTION WHEN duplicate_object THEN NULL;
        END $$;
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        DO $$ BEGIN
            CREATE TYPE slot_source AS ENUM ('recurring', 'override_add', 'override_block');
        EXCEPTION WHEN duplicate_object THEN NULL;
        END $$;
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        DO $$ BEGIN
            CREATE TYPE override_action AS ENUM ('block', 'add_extra');
        EXCEPTION WHEN duplicate_object THEN NULL;
        END $$;
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        DO $$ BEGIN
            CREATE TYPE appointment_status AS ENUM ('pending', 'approved', 'rejected', 'canceled', 'completed');
        EXCEPTION WHEN duplicate_object THEN NULL;
        END $$;
        "#,
    )
    .execute(pool)
    .await?;

    // Create recurring_rules table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS recurring_rules (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            church_id UUID NOT NULL,
            counselor_id UUID NOT NULL,
            day_of_week SMALLINT NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            slot_length_minutes INTEGER NOT NULL CHECK (slot_length_minutes > 0),
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_rule_window CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create schedule_overrides table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schedule_overrides (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            church_id UUID NOT NULL,
            counselor_id UUID NOT NULL,
            date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            action override_action NOT NULL,
            reason TEXT NULL,
            created_by UUID NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_override_window CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create time_slots table; the unique constraint is the slot identity
    // the generator merges by
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            church_id UUID NOT NULL,
            counselor_id UUID NOT NULL,
            date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            status slot_status NOT NULL DEFAULT 'open',
            source slot_source NOT NULL,
            appointment_id UUID NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_slot_window CHECK (end_time > start_time),
            CONSTRAINT uq_slot_identity UNIQUE (church_id, counselor_id, date, start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            church_id UUID NOT NULL,
            member_id UUID NOT NULL,
            counselor_id UUID NOT NULL,
            slot_id UUID NOT NULL REFERENCES time_slots(id),
            date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            appointment_type VARCHAR(255) NOT NULL,
            status appointment_status NOT NULL,
            urgency VARCHAR(255) NULL,
            topic VARCHAR(255) NULL,
            description TEXT NULL,
            created_by_member BOOLEAN NOT NULL,
            created_by_staff_id UUID NULL,
            approved_by_staff_id UUID NULL,
            approved_at TIMESTAMP WITH TIME ZONE NULL,
            rejected_reason TEXT NULL,
            admin_notes TEXT NULL,
            outcome_notes TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_recurring_rules_lookup ON recurring_rules(church_id, counselor_id, day_of_week);
        CREATE INDEX IF NOT EXISTS idx_schedule_overrides_lookup ON schedule_overrides(church_id, counselor_id, date);
        CREATE INDEX IF NOT EXISTS idx_time_slots_church_date ON time_slots(church_id, date);
        CREATE INDEX IF NOT EXISTS idx_time_slots_counselor_date ON time_slots(church_id, counselor_id, date);
        CREATE INDEX IF NOT EXISTS idx_time_slots_status ON time_slots(status);
        CREATE INDEX IF NOT EXISTS idx_appointments_member ON appointments(church_id, member_id);
        CREATE INDEX IF NOT EXISTS idx_appointments_counselor ON appointments(church_id, counselor_id);
        CREATE INDEX IF NOT EXISTS idx_appointments_slot ON appointments(slot_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
