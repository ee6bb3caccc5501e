use chrono::Utc;
use color_eyre::eyre::Result;
use dotenv::dotenv;
use shepherd_engine::{config::JobConfig, generator};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Periodic look-ahead slot generation job. Stateless between runs and
/// idempotent, so overlapping invocations are safe.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = JobConfig::from_env()?;

    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create database connection pool
    let db_pool = shepherd_db::create_pool(&config.database_url).await?;

    // Generate slots for every active counselor of the church
    let today = Utc::now().date_naive();
    let report = generator::generate_for_church(
        &db_pool,
        &config.generator_config(),
        config.church_id,
        today,
    )
    .await?;

    info!(
        "Slot generation finished: generated={}, blocked={}, skipped={}",
        report.generated, report.blocked, report.skipped
    );

    Ok(())
}
