// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity-Cache: client-side cache for a remote activities API
//!
//! This crate holds the authoritative in-memory copy of all activities,
//! applies create/update/delete only after the remote API confirms them,
//! and publishes date-ordered snapshots plus selection state for the UI.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

use cache::{ActivityStore, CacheOptions};
use config::Config;
use services::{HttpGateway, UuidGenerator};
use std::sync::Arc;

/// Build a store talking to the API described by `config`.
pub fn connect(config: &Config) -> Result<ActivityStore, error::GatewayError> {
    let gateway = HttpGateway::new(config.api_url.clone(), config.request_timeout)?;
    Ok(ActivityStore::new(
        Arc::new(gateway),
        Arc::new(UuidGenerator),
        config.cache_options(),
    ))
}
