//! P-Plus - a terminal dashboard for crypto prices and signal alerts.
//!
//! Polls the P-Plus price/analysis API for a set of coins, renders live
//! price and multi-timeframe analysis cards, and raises buy/sell alerts.

use anyhow::Context;
use pplus::{App, Config};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The terminal belongs to the UI, so logs go to a daily file
    let log_dir = pplus::config::log_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("pplus")
        .filename_suffix("log")
        .build(&log_dir)
        .context("opening log file")?;
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pplus=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();

    // Load configuration
    let config = Config::load_or_default().context("loading configuration")?;

    // Run the application
    let mut app = App::new(config).await?;
    app.run().await?;

    Ok(())
}
