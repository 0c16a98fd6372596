// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for the gateway and the activity cache.

use std::fmt;
use std::time::Duration;

/// Failure reported by a [`Gateway`](crate::services::Gateway) call.
///
/// Carries no structured recovery data; the cache treats every variant the
/// same way (nothing is applied).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error (HTTP {status}): {body}")]
    Server { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// Which mutation a [`StoreError::Mutation`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Errors surfaced by the activity cache to the presentation layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The full listing could not be fetched; the previous collection is kept.
    #[error("Failed to load activities: {0}")]
    Fetch(#[source] GatewayError),

    /// The gateway rejected a mutation; the collection is unchanged.
    #[error("Failed to {kind} activity {id}: {source}")]
    Mutation {
        kind: MutationKind,
        id: String,
        #[source]
        source: GatewayError,
    },

    /// An operation referenced an id that is not in the collection.
    #[error("Activity not found locally: {0}")]
    NotFoundLocally(String),

    /// A create was attempted with a draft that cannot be inserted.
    #[error("Invalid draft: {0}")]
    InvalidDraft(String),
}

impl StoreError {
    /// True if the error means the referenced id is unknown to the cache.
    pub fn is_not_found_locally(&self) -> bool {
        matches!(self, StoreError::NotFoundLocally(_))
    }

    /// True if repeating the same call may succeed.
    ///
    /// Gateway failures leave the cache untouched, so retrying them is safe.
    /// Local precondition failures will fail again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Fetch(_) | StoreError::Mutation { .. })
    }
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, StoreError>;
