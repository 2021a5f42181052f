//! The remote review store seam.
//!
//! Controllers receive a store as an injected `Arc<S: RemoteReviewStore>`.
//! Subscriptions are streams of raw `StoredReview` records; a stream that
//! ends without `unsubscribe` having been called means the channel dropped.

pub mod http;
pub mod memory;

use futures::channel::mpsc::{unbounded, UnboundedSender};
use futures::stream::{LocalBoxStream, Stream, StreamExt};
use leptos::logging::log;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use crate::error::StoreError;
use crate::models::review::{NewReview, StoredReview};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

#[allow(async_fn_in_trait)]
pub trait RemoteReviewStore {
    /// All approved records, newest first.
    async fn query_approved(&self) -> Result<Vec<StoredReview>, StoreError>;

    /// Stores a record; the store assigns id and creation time and echoes
    /// the record back.
    async fn insert(&self, record: NewReview) -> Result<StoredReview, StoreError>;

    /// Opens a channel that yields every record inserted from now on.
    fn subscribe_insertions(&self) -> Result<Subscription, StoreError>;

    /// Releases a channel. Unknown or already released ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// A live insertion channel.
pub struct Subscription {
    id: SubscriptionId,
    events: LocalBoxStream<'static, StoredReview>,
}

impl Subscription {
    pub fn new(id: SubscriptionId, events: LocalBoxStream<'static, StoredReview>) -> Self {
        Self { id, events }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn into_stream(self) -> LocalBoxStream<'static, StoredReview> {
        self.events
    }
}

impl Stream for Subscription {
    type Item = StoredReview;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.poll_next_unpin(cx)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// In-process fan-out of inserted records to every open subscription.
#[derive(Debug, Default)]
pub struct InsertionHub {
    next_id: AtomicU64,
    subscribers: Mutex<HashMap<SubscriptionId, UnboundedSender<StoredReview>>>,
}

impl InsertionHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn subscribers(&self) -> MutexGuard<'_, HashMap<SubscriptionId, UnboundedSender<StoredReview>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let (tx, rx) = unbounded();
        self.subscribers().insert(id, tx);
        log!("[STORE] Subscription {} opened", id.0);
        Subscription::new(id, rx.boxed_local())
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        if let Some(tx) = self.subscribers().remove(&id) {
            tx.close_channel();
            log!("[STORE] Subscription {} released", id.0);
        }
    }

    /// Sends `record` to every subscriber, dropping those whose receiver is gone.
    pub fn publish(&self, record: &StoredReview) -> usize {
        let mut subscribers = self.subscribers();
        subscribers.retain(|id, tx| {
            let delivered = tx.unbounded_send(record.clone()).is_ok();
            if !delivered {
                log!("[STORE] Pruning closed subscription {}", id.0);
            }
            delivered
        });
        subscribers.len()
    }

    /// Closes every channel without marking them released.
    pub fn close_all(&self) {
        let mut subscribers = self.subscribers();
        for tx in subscribers.values() {
            tx.close_channel();
        }
        subscribers.clear();
    }

    pub fn active(&self) -> usize {
        self.subscribers().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::review::ReviewId;
    use chrono::Utc;

    fn record(id: &str) -> StoredReview {
        StoredReview {
            id: ReviewId::from(id),
            name: "Lin".into(),
            position: None,
            review: "Solid".into(),
            rating: Some(4),
            approved: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn published_records_reach_every_subscriber() {
        let hub = InsertionHub::new();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();
        assert_ne!(first.id(), second.id());

        assert_eq!(hub.publish(&record("a")), 2);
        assert_eq!(first.next().await.unwrap().id.as_str(), "a");
        assert_eq!(second.next().await.unwrap().id.as_str(), "a");
    }

    #[tokio::test]
    async fn unsubscribe_ends_the_stream_and_is_idempotent() {
        let hub = InsertionHub::new();
        let mut sub = hub.subscribe();
        hub.unsubscribe(sub.id());
        hub.unsubscribe(sub.id());
        assert!(sub.next().await.is_none());
        assert_eq!(hub.active(), 0);
    }

    #[test]
    fn dropped_receivers_are_pruned_on_publish() {
        let hub = InsertionHub::new();
        let sub = hub.subscribe();
        let _kept = hub.subscribe();
        drop(sub);
        assert_eq!(hub.publish(&record("b")), 1);
    }
}
