// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory activity cache synchronized with the remote API.
//!
//! The store owns the canonical collection and is the only thing that
//! mutates it. Every mutation follows the same sequence:
//! 1. Wait for any reload to finish, then queue behind any other
//!    mutation of the same id (per-id lock)
//! 2. Check local preconditions (id present / absent)
//! 3. Mark the id as submitting
//! 4. Call the gateway (bounded by the configured timeout)
//! 5. On success, apply the change, update selection and clear the busy
//!    flag in one published step; on failure, only clear the busy flag
//!
//! Nothing is applied before the gateway confirms, so there is never
//! anything to roll back.
//!
//! A reload holds the reload lock exclusively: it waits for in-flight
//! mutations to finish and mutations started meanwhile wait for it, so a
//! listing fetched before a mutation was confirmed is never installed
//! after it.

use crate::cache::selection::{FormMode, Selection};
use crate::cache::snapshot::StoreSnapshot;
use crate::cache::view::project_by_date;
use crate::error::{GatewayError, MutationKind, Result, StoreError};
use crate::models::{Activity, ActivityForm};
use crate::services::{Gateway, IdGenerator};
use dashmap::DashMap;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{watch, RwLock};

/// Tunables for the cache.
#[derive(Debug, Clone, Default)]
pub struct CacheOptions {
    /// Upper bound on every gateway call. `None` waits forever.
    pub call_timeout: Option<Duration>,
}

/// Mutable state, always accessed under one lock.
struct StoreState {
    activities: HashMap<String, Activity>,
    /// Date-ordered copy of `activities`, rebuilt when the collection changes
    ordered: Arc<Vec<Activity>>,
    selection: Selection,
    submitting: HashSet<String>,
    loading: bool,
    version: u64,
}

impl StoreState {
    fn new() -> Self {
        Self {
            activities: HashMap::new(),
            ordered: Arc::new(Vec::new()),
            selection: Selection::default(),
            submitting: HashSet::new(),
            loading: true,
            version: 0,
        }
    }

    fn reorder(&mut self) {
        let ordered = project_by_date(self.activities.values()).to_vec();
        self.ordered = Arc::new(ordered);
    }

    fn snapshot(&self) -> StoreSnapshot {
        let mut submitting: Vec<String> = self.submitting.iter().cloned().collect();
        submitting.sort();

        StoreSnapshot {
            version: self.version,
            loading: self.loading,
            activities: self.ordered.clone(),
            selected: self
                .selection
                .selected_id()
                .and_then(|id| self.activities.get(id))
                .cloned(),
            mode: self.selection.mode(),
            submitting,
        }
    }
}

/// Per-id mutex used to serialize mutations of the same activity.
type RowLocks = DashMap<String, Arc<tokio::sync::Mutex<()>>>;

/// Client-side cache of all activities.
pub struct ActivityStore {
    gateway: Arc<dyn Gateway>,
    ids: Arc<dyn IdGenerator>,
    options: CacheOptions,
    state: Mutex<StoreState>,
    row_locks: RowLocks,
    /// Shared by mutations, exclusive for `load_all`
    reload: RwLock<()>,
    snapshots: watch::Sender<Arc<StoreSnapshot>>,
}

impl ActivityStore {
    /// Create an empty store. Call [`ActivityStore::load_all`] to populate it.
    pub fn new(
        gateway: Arc<dyn Gateway>,
        ids: Arc<dyn IdGenerator>,
        options: CacheOptions,
    ) -> Self {
        let state = StoreState::new();
        let (snapshots, _) = watch::channel(Arc::new(state.snapshot()));

        Self {
            gateway,
            ids,
            options,
            state: Mutex::new(state),
            row_locks: DashMap::new(),
            reload: RwLock::new(()),
            snapshots,
        }
    }

    // ─── Observation ─────────────────────────────────────────────

    /// Receive a new snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<Arc<StoreSnapshot>> {
        self.snapshots.subscribe()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// All activities, ascending by date.
    pub fn activities_by_date(&self) -> Arc<Vec<Activity>> {
        self.lock_state().ordered.clone()
    }

    pub fn get(&self, id: &str) -> Option<Activity> {
        self.lock_state().activities.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock_state().activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_state().activities.is_empty()
    }

    /// The selected activity, resolved against the current collection.
    pub fn selected(&self) -> Option<Activity> {
        let state = self.lock_state();
        state
            .selection
            .selected_id()
            .and_then(|id| state.activities.get(id))
            .cloned()
    }

    pub fn mode(&self) -> FormMode {
        self.lock_state().selection.mode()
    }

    pub fn edit_mode(&self) -> bool {
        self.lock_state().selection.edit_mode()
    }

    pub fn is_loading(&self) -> bool {
        self.lock_state().loading
    }

    /// True while a mutation of `id` is in flight.
    pub fn is_submitting(&self, id: &str) -> bool {
        self.lock_state().submitting.contains(id)
    }

    /// True while any mutation is in flight.
    pub fn submitting(&self) -> bool {
        !self.lock_state().submitting.is_empty()
    }

    // ─── Loading ─────────────────────────────────────────────────

    /// Fetch the full collection and install it in one step.
    ///
    /// On failure the previous collection is kept. Returns the number of
    /// activities installed. Runs alone: in-flight mutations finish first
    /// and new ones wait until the listing is installed.
    pub async fn load_all(&self) -> Result<usize> {
        let _reload = self.reload.write().await;
        tracing::info!("Loading activities");
        self.update_state(|state| state.loading = true);

        let records = match self.call(self.gateway.list()).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load activities");
                self.update_state(|state| state.loading = false);
                return Err(StoreError::Fetch(e));
            }
        };

        let mut activities = HashMap::with_capacity(records.len());
        for record in records {
            let id = record.id.clone();
            let raw_date = record.date.clone();
            let activity = match Activity::try_from(record) {
                Ok(activity) => activity,
                Err(e) => {
                    tracing::warn!(id = %id, date = %raw_date, "Activity has an invalid date");
                    self.update_state(|state| state.loading = false);
                    return Err(StoreError::Fetch(GatewayError::Decode(format!(
                        "activity {} has invalid date {:?}: {}",
                        id, raw_date, e
                    ))));
                }
            };
            if activities.insert(id.clone(), activity).is_some() {
                tracing::warn!(id = %id, "Duplicate activity id in listing, keeping last");
            }
        }

        let count = activities.len();
        self.update_state(|state| {
            state.activities = activities;
            state.reorder();
            if let Some(id) = state.selection.selected_id().map(str::to_string) {
                if !state.activities.contains_key(&id) {
                    state.selection.deleted(&id);
                }
            }
            state.loading = false;
        });

        tracing::info!(count, "Activities loaded");
        Ok(count)
    }

    // ─── Mutations ───────────────────────────────────────────────

    /// Create a new activity from a form without an id.
    ///
    /// The id comes from the id generator. On success the new activity is
    /// selected and the form is closed.
    pub async fn create(&self, draft: ActivityForm) -> Result<Activity> {
        if let Some(id) = &draft.id {
            return Err(StoreError::InvalidDraft(format!(
                "new activity already has id {}",
                id
            )));
        }

        let id = self.ids.next_id();
        if self.lock_state().activities.contains_key(&id) {
            return Err(StoreError::InvalidDraft(format!(
                "generated id {} is already in use",
                id
            )));
        }
        let activity = draft.into_activity(id.clone());

        let lock = self.row_lock(&id);
        let result = {
            let _reload = self.reload.read().await;
            let _row = lock.lock().await;
            self.create_locked(activity).await
        };
        drop(lock);
        self.release_row_lock(&id);
        result
    }

    async fn create_locked(&self, activity: Activity) -> Result<Activity> {
        let id = activity.id.clone();
        tracing::debug!(id = %id, title = %activity.title, "Creating activity");

        let in_flight = self.begin_submit(&id);
        if let Err(e) = self.call(self.gateway.create(&activity)).await {
            tracing::warn!(id = %id, error = %e, "Create rejected");
            return Err(StoreError::Mutation {
                kind: MutationKind::Create,
                id,
                source: e,
            });
        }

        let stored = activity.clone();
        in_flight.finish(|state| {
            state.activities.insert(id.clone(), activity);
            state.reorder();
            state.selection.saved(&id);
        });

        tracing::info!(id = %stored.id, "Activity created");
        Ok(stored)
    }

    /// Replace an existing activity.
    ///
    /// On success the activity is selected and the form is closed.
    pub async fn update(&self, activity: Activity) -> Result<Activity> {
        let id = activity.id.clone();
        let lock = self.row_lock(&id);
        let result = {
            let _reload = self.reload.read().await;
            let _row = lock.lock().await;
            self.update_locked(activity).await
        };
        drop(lock);
        self.release_row_lock(&id);
        result
    }

    async fn update_locked(&self, activity: Activity) -> Result<Activity> {
        let id = activity.id.clone();
        if !self.lock_state().activities.contains_key(&id) {
            return Err(StoreError::NotFoundLocally(id));
        }
        tracing::debug!(id = %id, "Updating activity");

        let in_flight = self.begin_submit(&id);
        if let Err(e) = self.call(self.gateway.update(&activity)).await {
            tracing::warn!(id = %id, error = %e, "Update rejected");
            return Err(StoreError::Mutation {
                kind: MutationKind::Update,
                id,
                source: e,
            });
        }

        let stored = activity.clone();
        in_flight.finish(|state| {
            state.activities.insert(id.clone(), activity);
            state.reorder();
            state.selection.saved(&id);
        });

        tracing::info!(id = %stored.id, "Activity updated");
        Ok(stored)
    }

    /// Delete an activity. Clears the selection if it was selected.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let lock = self.row_lock(id);
        let result = {
            let _reload = self.reload.read().await;
            let _row = lock.lock().await;
            self.delete_locked(id).await
        };
        drop(lock);
        self.release_row_lock(id);
        result
    }

    async fn delete_locked(&self, id: &str) -> Result<()> {
        if !self.lock_state().activities.contains_key(id) {
            return Err(StoreError::NotFoundLocally(id.to_string()));
        }
        tracing::debug!(id, "Deleting activity");

        let in_flight = self.begin_submit(id);
        if let Err(e) = self.call(self.gateway.delete(id)).await {
            tracing::warn!(id, error = %e, "Delete rejected");
            return Err(StoreError::Mutation {
                kind: MutationKind::Delete,
                id: id.to_string(),
                source: e,
            });
        }

        in_flight.finish(|state| {
            state.activities.remove(id);
            state.reorder();
            state.selection.deleted(id);
        });

        tracing::info!(id, "Activity deleted");
        Ok(())
    }

    /// Save the form: update when it carries an id, create otherwise.
    pub async fn submit(&self, mut form: ActivityForm) -> Result<Activity> {
        match form.id.take() {
            Some(id) => self.update(form.into_activity(id)).await,
            None => self.create(form).await,
        }
    }

    // ─── Selection / Edit Mode ───────────────────────────────────

    /// Select an activity. Edit mode is unchanged.
    pub fn select_activity(&self, id: &str) -> Result<()> {
        let mut state = self.lock_state();
        if !state.activities.contains_key(id) {
            return Err(StoreError::NotFoundLocally(id.to_string()));
        }
        state.selection.select(id);
        self.publish(&mut *state);
        Ok(())
    }

    /// Clear the selection. Edit mode is unchanged.
    pub fn cancel_selection(&self) {
        self.update_state(|state| state.selection.cancel());
    }

    /// Open the form to edit `id`, or to create a new activity.
    pub fn open_form(&self, id: Option<&str>) -> Result<()> {
        let mut state = self.lock_state();
        if let Some(id) = id {
            if !state.activities.contains_key(id) {
                return Err(StoreError::NotFoundLocally(id.to_string()));
            }
        }
        state.selection.open_form(id);
        self.publish(&mut *state);
        Ok(())
    }

    /// Close the form. The selection is kept.
    pub fn close_form(&self) {
        self.update_state(|state| state.selection.close_form());
    }

    /// Values to pre-fill the form with while editing.
    ///
    /// `None` when browsing, viewing or creating.
    pub fn form_values(&self) -> Option<ActivityForm> {
        let state = self.lock_state();
        match state.selection.mode() {
            FormMode::Editing(id) => state.activities.get(&id).map(ActivityForm::from),
            _ => None,
        }
    }

    // ─── Internals ───────────────────────────────────────────────

    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bump the version and publish a snapshot of `state`.
    fn publish(&self, state: &mut StoreState) {
        state.version += 1;
        self.snapshots.send_replace(Arc::new(state.snapshot()));
    }

    fn update_state<R>(&self, apply: impl FnOnce(&mut StoreState) -> R) -> R {
        let mut state = self.lock_state();
        let result = apply(&mut *state);
        self.publish(&mut *state);
        result
    }

    /// Run a gateway call under the configured timeout.
    async fn call<T, F>(&self, fut: F) -> std::result::Result<T, GatewayError>
    where
        F: Future<Output = std::result::Result<T, GatewayError>>,
    {
        match self.options.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => Err(GatewayError::Timeout(limit)),
            },
            None => fut.await,
        }
    }

    fn row_lock(&self, id: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.row_locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Drop the per-id lock once nobody else holds or waits on it.
    fn release_row_lock(&self, id: &str) {
        self.row_locks
            .remove_if(id, |_, lock| Arc::strong_count(lock) == 1);
    }

    fn begin_submit(&self, id: &str) -> InFlight<'_> {
        self.update_state(|state| state.submitting.insert(id.to_string()));
        InFlight {
            store: self,
            id: id.to_string(),
            finished: false,
        }
    }
}

/// Busy marker for one id; clears itself when dropped.
struct InFlight<'s> {
    store: &'s ActivityStore,
    id: String,
    finished: bool,
}

impl InFlight<'_> {
    /// Apply a confirmed change and clear the busy flag in one step.
    fn finish(mut self, apply: impl FnOnce(&mut StoreState)) {
        self.finished = true;
        let id = std::mem::take(&mut self.id);
        self.store.update_state(|state| {
            state.submitting.remove(&id);
            apply(state);
        });
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let id = std::mem::take(&mut self.id);
            self.store.update_state(|state| {
                state.submitting.remove(&id);
            });
        }
    }
}
