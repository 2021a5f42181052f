use chrono::{DateTime, Duration, Utc};
use leptos::logging::log;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{InsertionHub, RemoteReviewStore, Subscription, SubscriptionId};
use crate::error::StoreError;
use crate::models::review::{NewReview, ReviewId, StoredReview};

/// A review store held in memory.
///
/// Besides backing tests, it can simulate every failure the controllers
/// must survive: failing queries, inserts and subscriptions, a dropped
/// channel, and raw notifications (duplicates, unapproved, backfilled).
#[derive(Debug, Default)]
pub struct MemoryReviewStore {
    records: Mutex<Vec<StoredReview>>,
    hub: InsertionHub,
    fail_queries: AtomicBool,
    fail_inserts: AtomicBool,
    fail_subscribe: AtomicBool,
    queries: AtomicUsize,
    inserts: AtomicUsize,
    next_id: AtomicUsize,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store without notifying subscribers.
    pub fn with_records(records: Vec<StoredReview>) -> Self {
        let store = Self::new();
        *store.records() = records;
        store
    }

    fn records(&self) -> MutexGuard<'_, Vec<StoredReview>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_subscribe(&self, fail: bool) {
        self.fail_subscribe.store(fail, Ordering::SeqCst);
    }

    /// Delivers `record` to subscribers as if the backend had inserted it.
    pub fn push_notification(&self, record: StoredReview) -> usize {
        self.hub.publish(&record)
    }

    /// Closes every open channel as a network drop would.
    pub fn drop_channels(&self) {
        log!("[STORE] Dropping all insertion channels");
        self.hub.close_all();
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn active_subscriptions(&self) -> usize {
        self.hub.active()
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    fn next_timestamp(&self, records: &[StoredReview]) -> DateTime<Utc> {
        let now = Utc::now();
        match records.iter().map(|r| r.created_at).max() {
            Some(latest) if latest >= now => latest + Duration::microseconds(1),
            _ => now,
        }
    }
}

impl RemoteReviewStore for MemoryReviewStore {
    async fn query_approved(&self) -> Result<Vec<StoredReview>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store configured to fail".into()));
        }
        let mut approved: Vec<StoredReview> =
            self.records().iter().filter(|r| r.approved).cloned().collect();
        approved.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(approved)
    }

    async fn insert(&self, record: NewReview) -> Result<StoredReview, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Request("memory store configured to fail".into()));
        }
        let stored = {
            let mut records = self.records();
            let created_at = self.next_timestamp(&records);
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let stored = StoredReview {
                id: ReviewId(format!("mem-{id}")),
                name: record.name,
                position: Some(record.position),
                review: record.review,
                rating: Some(i64::from(record.rating)),
                approved: record.approved,
                created_at,
            };
            records.push(stored.clone());
            stored
        };
        self.hub.publish(&stored);
        Ok(stored)
    }

    fn subscribe_insertions(&self) -> Result<Subscription, StoreError> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("subscriptions disabled".into()));
        }
        Ok(self.hub.subscribe())
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.hub.unsubscribe(id);
    }
}
