//! Itemsync job runner
//!
//! Loads the expense items of every pending execution unit, then emails the
//! run report.

mod cli;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use itemsync_core::{ReportNotifier, SyncPipeline};
use itemsync_db::{ExecutionUnitRepository, connect};
use itemsync_remote::{HttpTransport, RemoteFetcher};
use itemsync_shared::{AppConfig, EmailService};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "itemsync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let overrides = Cli::parse().into_overrides();
    let config = AppConfig::load_with(&overrides)?;

    // Connect to database
    let db = connect(&config.database).await?;
    info!("Connected to database");

    let store = ExecutionUnitRepository::new(
        db,
        config.database.command_timeout(),
        config.bulk_load.clone(),
    );

    let transport = HttpTransport::new(config.fetch.timeout())?;
    let fetcher = RemoteFetcher::new(transport, config.fetch.max_retries)
        .with_retry_delay(config.fetch.retry_delay());
    info!(
        max_retries = config.fetch.max_retries,
        timeout_secs = config.fetch.timeout_secs,
        "Expense service client configured"
    );

    // Create email service
    let email_service = EmailService::new(config.email.clone());
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        recipients = config.email.recipient_list().len(),
        "Email service configured"
    );
    let notifier = ReportNotifier::new(&email_service, config.report.subject.clone());

    let summary = SyncPipeline::new(&fetcher, &store, notifier).run().await?;
    info!(
        run_id = %summary.run_id,
        status = %summary.status,
        succeeded = summary.succeeded(),
        failed = summary.outcomes.failure_count(),
        report_delivered = summary.report_delivered,
        "Run complete"
    );

    Ok(())
}
