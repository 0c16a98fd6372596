// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity model for the cache and the remote API.

use crate::time_utils::truncate_to_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Canonical activity record held by the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Activity {
    /// Unique identifier (client-assigned on create)
    pub id: String,
    pub title: String,
    /// Calendar date, serialized as `YYYY-MM-DD`
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    pub description: String,
    /// Category name, also selects the card image
    pub category: String,
    pub city: String,
    pub venue: String,
}

impl Activity {
    /// Path of the image shown for this activity's category.
    pub fn category_image(&self) -> String {
        format!("/assets/categoryImages/{}.jpg", self.category)
    }
}

/// Activity as received from the remote listing.
///
/// The date may carry a full timestamp; it is truncated when converted
/// into an [`Activity`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub venue: String,
}

impl TryFrom<ActivityRecord> for Activity {
    type Error = chrono::ParseError;

    fn try_from(record: ActivityRecord) -> Result<Self, Self::Error> {
        Ok(Activity {
            date: truncate_to_date(&record.date)?,
            id: record.id,
            title: record.title,
            description: record.description,
            category: record.category,
            city: record.city,
            venue: record.venue,
        })
    }
}

/// Values of the create/edit form.
///
/// `id` is `None` for a new activity and set when editing an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityForm {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub city: String,
    pub venue: String,
}

impl ActivityForm {
    /// Build the stored activity under the given id.
    pub fn into_activity(self, id: String) -> Activity {
        Activity {
            id,
            title: self.title,
            date: self.date,
            description: self.description,
            category: self.category,
            city: self.city,
            venue: self.venue,
        }
    }
}

impl From<&Activity> for ActivityForm {
    fn from(activity: &Activity) -> Self {
        Self {
            id: Some(activity.id.clone()),
            title: activity.title.clone(),
            date: activity.date,
            description: activity.description.clone(),
            category: activity.category.clone(),
            city: activity.city.clone(),
            venue: activity.venue.clone(),
        }
    }
}
