// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Selection and edit-mode state.
//!
//! Selection is held as an id and resolved against the collection on every
//! read, so a selected activity always shows its latest confirmed version.
//! Callers validate ids against the collection before transitioning.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// What the UI is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "id", rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum FormMode {
    /// Nothing selected, no form open
    Browsing,
    /// Details card for the selected activity
    Viewing(String),
    /// Empty form for a new activity
    Creating,
    /// Form pre-filled with the selected activity
    Editing(String),
}

/// Selection plus edit-mode flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<String>,
    edit_mode: bool,
}

impl Selection {
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn mode(&self) -> FormMode {
        match (&self.selected, self.edit_mode) {
            (None, false) => FormMode::Browsing,
            (Some(id), false) => FormMode::Viewing(id.clone()),
            (None, true) => FormMode::Creating,
            (Some(id), true) => FormMode::Editing(id.clone()),
        }
    }

    /// Select an activity. Edit mode is untouched.
    pub fn select(&mut self, id: &str) {
        self.selected = Some(id.to_string());
    }

    /// Clear the selection. Edit mode is untouched.
    pub fn cancel(&mut self) {
        self.selected = None;
    }

    /// Open the form, for editing `id` or for a new activity.
    pub fn open_form(&mut self, id: Option<&str>) {
        match id {
            Some(id) => self.select(id),
            None => self.cancel(),
        }
        self.edit_mode = true;
    }

    /// Close the form, keeping whatever is selected.
    pub fn close_form(&mut self) {
        self.edit_mode = false;
    }

    /// A create or update of `id` was confirmed.
    pub fn saved(&mut self, id: &str) {
        self.selected = Some(id.to_string());
        self.edit_mode = false;
    }

    /// `id` was deleted remotely and removed from the collection.
    pub fn deleted(&mut self, id: &str) {
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
            self.edit_mode = false;
        }
    }
}
