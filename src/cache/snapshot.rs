// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only state published to the presentation layer.

use crate::cache::selection::FormMode;
use crate::cache::view::group_by_date;
use crate::models::Activity;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Immutable view of the cache after one operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StoreSnapshot {
    /// Bumped on every published change
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub version: u64,
    /// True until the first listing completes, and while a reload runs
    pub loading: bool,
    /// All activities, ascending by date
    pub activities: Arc<Vec<Activity>>,
    /// Current version of the selected activity
    pub selected: Option<Activity>,
    pub mode: FormMode,
    /// Ids with a mutation in flight, sorted
    pub submitting: Vec<String>,
}

impl StoreSnapshot {
    pub fn edit_mode(&self) -> bool {
        matches!(self.mode, FormMode::Creating | FormMode::Editing(_))
    }

    /// Busy indicator for one row.
    pub fn is_submitting(&self, id: &str) -> bool {
        self.submitting.binary_search_by(|s| s.as_str().cmp(id)).is_ok()
    }

    /// True while any create, update or delete is in flight.
    pub fn any_submitting(&self) -> bool {
        !self.submitting.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    /// Activities grouped by calendar date.
    pub fn grouped_by_date(&self) -> BTreeMap<NaiveDate, Vec<&Activity>> {
        group_by_date(self.activities.iter())
    }
}
