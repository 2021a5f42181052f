use futures::stream::{self, StreamExt};
use gloo_net::eventsource::futures::EventSource;
use gloo_net::eventsource::State;
use gloo_net::http::Request;
use leptos::logging::{log, warn};
use std::cell::Cell;

use super::{RemoteReviewStore, Subscription, SubscriptionId};
use crate::error::StoreError;
use crate::models::review::{NewReview, StoredReview};

/// Talks to the server's `/api/reviews` endpoints from the browser.
#[derive(Debug)]
pub struct HttpReviewStore {
    base: String,
    next_id: Cell<u64>,
}

impl HttpReviewStore {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            next_id: Cell::new(0),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

/// The browser keeps reconnecting while the source is not closed, so only
/// an error on a closed source ends the channel.
fn error_ends_stream(state: State) -> bool {
    state == State::Closed
}

impl RemoteReviewStore for HttpReviewStore {
    async fn query_approved(&self) -> Result<Vec<StoredReview>, StoreError> {
        let response = Request::get(&self.url("/reviews"))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        if !response.ok() {
            return Err(StoreError::Request(format!(
                "GET /reviews returned {}",
                response.status()
            )));
        }
        response
            .json::<Vec<StoredReview>>()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }

    async fn insert(&self, record: NewReview) -> Result<StoredReview, StoreError> {
        let response = Request::post(&self.url("/reviews"))
            .json(&record)
            .map_err(|e| StoreError::Request(e.to_string()))?
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        if !response.ok() {
            return Err(StoreError::Request(format!(
                "POST /reviews returned {}",
                response.status()
            )));
        }
        response
            .json::<StoredReview>()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }

    fn subscribe_insertions(&self) -> Result<Subscription, StoreError> {
        let mut source = EventSource::new(&self.url("/reviews/stream"))
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let events = source
            .subscribe("insert")
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        // The source travels with the stream; dropping the stream closes it.
        let records = stream::unfold((source, events), |(source, mut events)| async move {
            loop {
                match events.next().await {
                    Some(Ok((_, message))) => {
                        let parsed = message
                            .data()
                            .as_string()
                            .map(|data| serde_json::from_str::<StoredReview>(&data));
                        match parsed {
                            Some(Ok(record)) => return Some((record, (source, events))),
                            _ => warn!("[STORE] Skipping unreadable review event"),
                        }
                    }
                    Some(Err(err)) => {
                        if !error_ends_stream(source.state()) {
                            log!("[STORE] Review stream reconnecting after: {}", err);
                            continue;
                        }
                        warn!("[STORE] Review stream failed: {}", err);
                        return None;
                    }
                    None => return None,
                }
            }
        });

        let id = SubscriptionId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        log!("[STORE] Opened review stream {}", id.0);
        Ok(Subscription::new(id, records.boxed_local()))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        // Nothing to release server-side; the stream owns the connection.
        log!("[STORE] Released review stream {}", id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_a_closed_source_ends_the_stream() {
        assert!(!error_ends_stream(State::Connecting));
        assert!(!error_ends_stream(State::Open));
        assert!(error_ends_stream(State::Closed));
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let store = HttpReviewStore::new("https://reviews.site.dev/api/");
        assert_eq!(store.url("/reviews"), "https://reviews.site.dev/api/reviews");
    }
}
