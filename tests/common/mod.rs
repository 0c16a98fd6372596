// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use activity_cache::cache::{ActivityStore, CacheOptions};
use activity_cache::error::GatewayError;
use activity_cache::models::{Activity, ActivityForm, ActivityRecord};
use activity_cache::services::{Gateway, IdGenerator};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};

/// In-memory stand-in for the remote activities API.
///
/// - `set_failing(true)` makes every call fail with a network error
/// - `hold_calls(true)` parks every call until `release_one()` is called;
///   `wait_entered()` resolves once a call has reached the gateway
pub struct FakeGateway {
    records: Mutex<HashMap<String, ActivityRecord>>,
    failing: AtomicBool,
    hold: AtomicBool,
    entered: Semaphore,
    release: Semaphore,
    calls: std::sync::Mutex<Vec<String>>,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
            hold: AtomicBool::new(false),
            entered: Semaphore::new(0),
            release: Semaphore::new(0),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[allow(dead_code)]
impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ActivityRecord>) -> Self {
        let map = records.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self {
            records: Mutex::new(map),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn hold_calls(&self, hold: bool) {
        self.hold.store(hold, Ordering::SeqCst);
    }

    pub async fn wait_entered(&self) {
        self.entered.acquire().await.expect("semaphore open").forget();
    }

    pub fn release_one(&self) {
        self.release.add_permits(1);
    }

    /// Calls seen so far, as `"op:id"` strings.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Ids currently stored remotely, sorted.
    pub async fn remote_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.records.lock().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    async fn enter(&self, call: String) -> Result<(), GatewayError> {
        self.calls.lock().unwrap().push(call);
        if self.hold.load(Ordering::SeqCst) {
            self.entered.add_permits(1);
            self.release
                .acquire()
                .await
                .map_err(|e| GatewayError::Network(e.to_string()))?
                .forget();
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(GatewayError::Network("simulated network error".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    /// The listing reflects the remote rows when the request arrived,
    /// even if the call is held.
    async fn list(&self) -> Result<Vec<ActivityRecord>, GatewayError> {
        let listing = self.records.lock().await.values().cloned().collect();
        self.enter("list".to_string()).await?;
        Ok(listing)
    }

    async fn create(&self, activity: &Activity) -> Result<(), GatewayError> {
        self.enter(format!("create:{}", activity.id)).await?;
        self.records
            .lock()
            .await
            .insert(activity.id.clone(), to_record(activity));
        Ok(())
    }

    async fn update(&self, activity: &Activity) -> Result<(), GatewayError> {
        self.enter(format!("update:{}", activity.id)).await?;
        self.records
            .lock()
            .await
            .insert(activity.id.clone(), to_record(activity));
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        self.enter(format!("delete:{}", id)).await?;
        self.records.lock().await.remove(id);
        Ok(())
    }
}

/// Remote records carry a full timestamp, like the real API.
fn to_record(activity: &Activity) -> ActivityRecord {
    ActivityRecord {
        id: activity.id.clone(),
        title: activity.title.clone(),
        date: format!("{}T00:00:00", activity.date),
        description: activity.description.clone(),
        category: activity.category.clone(),
        city: activity.city.clone(),
        venue: activity.venue.clone(),
    }
}

/// Ids `new-0`, `new-1`, ...
#[derive(Default)]
pub struct SequentialIds(AtomicUsize);

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        format!("new-{}", self.0.fetch_add(1, Ordering::SeqCst))
    }
}

#[allow(dead_code)]
pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("test date")
}

#[allow(dead_code)]
pub fn record(id: &str, title: &str, date: &str) -> ActivityRecord {
    ActivityRecord {
        id: id.to_string(),
        title: title.to_string(),
        date: date.to_string(),
        description: format!("{} description", title),
        category: "culture".to_string(),
        city: "London".to_string(),
        venue: "British Museum".to_string(),
    }
}

#[allow(dead_code)]
pub fn form(title: &str, on: &str) -> ActivityForm {
    ActivityForm {
        id: None,
        title: title.to_string(),
        date: date(on),
        description: String::new(),
        category: "sport".to_string(),
        city: "Paris".to_string(),
        venue: "Stade de France".to_string(),
    }
}

/// Store over `gateway` with sequential ids and no call timeout.
#[allow(dead_code)]
pub fn test_store(gateway: Arc<FakeGateway>) -> ActivityStore {
    ActivityStore::new(
        gateway,
        Arc::new(SequentialIds::default()),
        CacheOptions::default(),
    )
}

/// Store over `gateway`, already loaded.
#[allow(dead_code)]
pub async fn loaded_store(gateway: Arc<FakeGateway>) -> ActivityStore {
    let store = test_store(gateway);
    store.load_all().await.expect("initial load");
    store
}
