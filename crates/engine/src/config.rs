//! # Job Configuration
//!
//! Environment-driven configuration for the batch slot-generation job.
//!
//! ## Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `CHURCH_ID`: tenant the job generates slots for (required)
//! - `LOOK_AHEAD_DAYS`: how many days past today to materialize (default: 30)
//! - `EXTRA_SLOT_MINUTES`: slot length for `add_extra` overrides (default: 60)
//! - `LOG_LEVEL`: logging level (default: "info")

use eyre::{Result, WrapErr};
use std::env;
use tracing::Level;
use uuid::Uuid;

use crate::generator::GeneratorConfig;

/// Configuration for the periodic slot-generation job.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// PostgreSQL database connection string
    pub database_url: String,

    /// Tenant to generate slots for
    pub church_id: Uuid,

    /// Days ahead of today to materialize
    pub look_ahead_days: i64,

    /// Slot length used for add_extra override ranges
    pub extra_slot_minutes: i64,

    /// Log level for the job
    pub log_level: Level,
}

impl JobConfig {
    /// Load configuration from environment variables, with defaults where
    /// sensible. `DATABASE_URL` and `CHURCH_ID` are required.
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        let church_id = env::var("CHURCH_ID")
            .wrap_err("CHURCH_ID environment variable must be set")?
            .parse()
            .wrap_err("Invalid CHURCH_ID value, must be a UUID")?;

        let look_ahead_days = env::var("LOOK_AHEAD_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .wrap_err("Invalid LOOK_AHEAD_DAYS value")?;

        let extra_slot_minutes = env::var("EXTRA_SLOT_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .wrap_err("Invalid EXTRA_SLOT_MINUTES value")?;

        let log_level = match env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        Ok(Self {
            database_url,
            church_id,
            look_ahead_days,
            extra_slot_minutes,
            log_level,
        })
    }

    /// Generator tunables carried by this job configuration.
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            extra_slot_minutes: self.extra_slot_minutes,
            look_ahead_days: self.look_ahead_days,
        }
    }
}
