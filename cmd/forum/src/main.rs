//! # Forum Binary
//!
//! Assembles the forum service over the in-memory store, optionally seeds a
//! demo forum, and prints the resulting status snapshot as JSON.

mod seed;

use std::sync::Arc;

use anyhow::Context;
use configs::{LogFormat, LogSettings, Settings};
use services::{ForumService, Repositories, ServiceOptions};
use storage_adapters::MemoryStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = configs::load_dotenv();
    let settings = Settings::load().context("failed to load settings")?;
    init_tracing(&settings.log);
    if let Some(path) = env_file {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let options = ServiceOptions::with_thread_time_shift_hours(settings.service.thread_time_shift_hours)
        .context("invalid service.thread_time_shift_hours")?;
    let service = ForumService::with_options(Repositories::from_store(Arc::new(MemoryStore::new())), options);
    tracing::info!(?options, "forum service ready");

    if settings.seed.enabled {
        seed::run(&service).await.context("failed to seed demo forum")?;
    }

    let status = service.status().await.context("failed to read status")?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
