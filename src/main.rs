// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity-Cache command line client
//!
//! Loads every activity from the remote API into the cache and logs the
//! date-grouped view.

use activity_cache::config::Config;
use activity_cache::time_utils::format_date;
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        api_url = %config.api_url,
        timeout_secs = config.request_timeout.as_secs(),
        "Starting activity cache"
    );

    let store = activity_cache::connect(&config).context("Failed to build API client")?;

    store
        .load_all()
        .await
        .context("Failed to load activities")?;

    let snapshot = store.snapshot();
    tracing::info!(
        version = snapshot.version,
        count = snapshot.activities.len(),
        "Cache ready"
    );
    for (date, activities) in snapshot.grouped_by_date() {
        tracing::info!(
            date = %format_date(date),
            count = activities.len(),
            titles = ?activities.iter().map(|a| a.title.as_str()).collect::<Vec<_>>(),
            "Activities on date"
        );
    }

    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in ["activity_cache=debug", "info"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry().with(filter).with(format).init();
}
