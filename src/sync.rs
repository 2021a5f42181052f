//! Keeps the local review list consistent with the remote store.
//!
//! `ReviewList` is the state and knows nothing about I/O, so the browser
//! components can drive it from signals. `SyncController` pairs it with a
//! store and owns the insertion subscription.

use futures::StreamExt;
use leptos::logging::{log, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::StoreError;
use crate::fallback::{self, FallbackReview};
use crate::models::review::{Review, ReviewId, StoredReview};
use crate::store::{RemoteReviewStore, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewSource {
    Remote,
    Fallback,
}

/// Result of an initial load. The error is for diagnostics only; the list
/// is valid either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub source: ReviewSource,
    pub count: usize,
    pub error: Option<StoreError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Inserted { index: usize },
    Duplicate,
    Unapproved,
    Malformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
    #[default]
    Closed,
    Live,
    /// The channel ended without being released.
    Stale,
    Released,
}

/// The authoritative ordered list of approved reviews, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewList {
    reviews: Vec<Review>,
    loading: bool,
    source: Option<ReviewSource>,
    last_error: Option<StoreError>,
    channel: ChannelState,
}

impl ReviewList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn contains(&self, id: &ReviewId) -> bool {
        self.reviews.iter().any(|r| &r.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_stale(&self) -> bool {
        self.channel == ChannelState::Stale
    }

    pub fn channel(&self) -> ChannelState {
        self.channel
    }

    pub fn source(&self) -> Option<ReviewSource> {
        self.source
    }

    pub fn last_error(&self) -> Option<&StoreError> {
        self.last_error.as_ref()
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Replaces the whole list with the outcome of a store query, falling
    /// back to `fallback` when the query failed.
    pub fn apply_load(
        &mut self,
        result: Result<Vec<StoredReview>, StoreError>,
        fallback: &[FallbackReview],
    ) -> LoadReport {
        self.loading = false;
        let report = match result {
            Ok(records) => {
                self.reviews = materialize(records);
                self.last_error = None;
                LoadReport {
                    source: ReviewSource::Remote,
                    count: self.reviews.len(),
                    error: None,
                }
            }
            Err(err) => {
                warn!("[SYNC] Error loading testimonials: {}; using bundled reviews", err);
                self.reviews = fallback::materialize(fallback);
                self.last_error = Some(err.clone());
                LoadReport {
                    source: ReviewSource::Fallback,
                    count: self.reviews.len(),
                    error: Some(err),
                }
            }
        };
        self.source = Some(report.source);
        log!("[SYNC] Loaded {} reviews from {:?}", report.count, report.source);
        report
    }

    /// Merges one record from the insertion channel.
    pub fn apply_insertion(&mut self, record: StoredReview) -> Insertion {
        if !record.approved {
            log!("[SYNC] Ignoring unapproved review {}", record.id);
            return Insertion::Unapproved;
        }
        if self.contains(&record.id) {
            log!("[SYNC] Ignoring duplicate review {}", record.id);
            return Insertion::Duplicate;
        }
        let id = record.id.clone();
        let Some(review) = Review::from_stored(record) else {
            warn!("[SYNC] Dropping malformed review {}", id);
            return Insertion::Malformed;
        };
        let index = self
            .reviews
            .iter()
            .position(|existing| !existing.is_newer_than(&review))
            .unwrap_or(self.reviews.len());
        self.reviews.insert(index, review);
        log!("[SYNC] Inserted review {} at {}", id, index);
        Insertion::Inserted { index }
    }

    pub fn set_channel(&mut self, channel: ChannelState) {
        self.channel = channel;
    }
}

fn materialize(records: Vec<StoredReview>) -> Vec<Review> {
    let mut reviews: Vec<Review> = Vec::with_capacity(records.len());
    for record in records {
        if reviews.iter().any(|r| r.id == record.id) {
            warn!("[SYNC] Store returned review {} twice", record.id);
            continue;
        }
        let id = record.id.clone();
        match Review::from_stored(record) {
            Some(review) => reviews.push(review),
            None => warn!("[SYNC] Skipping unusable review {}", id),
        }
    }
    reviews
}

/// Loads, subscribes and tears down against a `RemoteReviewStore`.
pub struct SyncController<S: RemoteReviewStore> {
    store: Arc<S>,
    fallback: &'static [FallbackReview],
    list: ReviewList,
    subscription: Option<Subscription>,
}

impl<S: RemoteReviewStore> SyncController<S> {
    pub fn new(store: Arc<S>, fallback: &'static [FallbackReview]) -> Self {
        Self {
            store,
            fallback,
            list: ReviewList::new(),
            subscription: None,
        }
    }

    pub fn list(&self) -> &ReviewList {
        &self.list
    }

    pub fn reviews(&self) -> &[Review] {
        self.list.reviews()
    }

    pub async fn load_initial(&mut self) -> LoadReport {
        self.list.begin_load();
        let result = self.store.query_approved().await;
        self.list.apply_load(result, self.fallback)
    }

    /// Opens the insertion channel. Calling it while live is a no-op.
    pub fn subscribe(&mut self) -> Result<(), StoreError> {
        if self.subscription.is_some() {
            return Ok(());
        }
        match self.store.subscribe_insertions() {
            Ok(subscription) => {
                log!("[SYNC] Listening for new reviews on subscription {}", subscription.id().0);
                self.subscription = Some(subscription);
                self.list.set_channel(ChannelState::Live);
                Ok(())
            }
            Err(err) => {
                warn!("[SYNC] Could not subscribe to new reviews: {}", err);
                self.list.set_channel(ChannelState::Stale);
                Err(err)
            }
        }
    }

    /// Waits for the next notification and merges it.
    ///
    /// Returns `None` once there is no live channel; a channel that closes
    /// here without `teardown` leaves the list stale.
    pub async fn next_insertion(&mut self) -> Option<Insertion> {
        let subscription = self.subscription.as_mut()?;
        match subscription.next().await {
            Some(record) => Some(self.list.apply_insertion(record)),
            None => {
                warn!("[SYNC] Review channel closed unexpectedly; list is stale");
                self.subscription = None;
                self.list.set_channel(ChannelState::Stale);
                None
            }
        }
    }

    /// Releases the channel. Safe to call any number of times.
    pub fn teardown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.store.unsubscribe(subscription.id());
            self.list.set_channel(ChannelState::Released);
            log!("[SYNC] Released subscription {}", subscription.id().0);
        }
    }
}

impl<S: RemoteReviewStore> Drop for SyncController<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
