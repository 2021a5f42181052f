use leptos::logging::{error, log};
use std::sync::Arc;

use crate::error::{StoreError, SubmitError};
use crate::models::review::{DraftReview, NewReview, StoredReview};
use crate::store::RemoteReviewStore;

/// Draft state and in-flight bookkeeping for one review form.
///
/// Accepted reviews are never inserted into the local list here: the store
/// echoes them through the insertion channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionState {
    draft: DraftReview,
    submitting: bool,
    last_error: Option<SubmitError>,
}

impl SubmissionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &DraftReview {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: DraftReview) {
        self.draft = draft;
    }

    pub fn update_draft(&mut self, edit: impl FnOnce(&mut DraftReview)) {
        edit(&mut self.draft);
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn last_error(&self) -> Option<&SubmitError> {
        self.last_error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Validates the draft and marks the submission in flight.
    pub fn begin(&mut self) -> Result<NewReview, SubmitError> {
        if self.submitting {
            return Err(SubmitError::InFlight);
        }
        match self.draft.to_new_review() {
            Ok(request) => {
                self.submitting = true;
                self.last_error = None;
                Ok(request)
            }
            Err(invalid) => {
                log!("[SUBMIT] Rejected draft: {}", invalid);
                let err = SubmitError::from(invalid);
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Settles an in-flight submission: a success clears the draft, a
    /// failure keeps it for a retry.
    pub fn finish(
        &mut self,
        result: Result<StoredReview, StoreError>,
    ) -> Result<StoredReview, SubmitError> {
        self.submitting = false;
        match result {
            Ok(stored) => {
                log!("[SUBMIT] Review {} accepted", stored.id);
                self.draft = DraftReview::default();
                Ok(stored)
            }
            Err(err) => {
                error!("[SUBMIT] Error submitting testimonial: {}", err);
                let err = SubmitError::Store(err);
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }
}

pub struct SubmissionController<S: RemoteReviewStore> {
    store: Arc<S>,
    state: SubmissionState,
}

impl<S: RemoteReviewStore> SubmissionController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            state: SubmissionState::new(),
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SubmissionState {
        &mut self.state
    }

    /// Submits the current draft.
    pub async fn submit(&mut self) -> Result<StoredReview, SubmitError> {
        let request = self.state.begin()?;
        let result = self.store.insert(request).await;
        self.state.finish(result)
    }

    /// Replaces the draft with `draft` and submits it.
    pub async fn submit_draft(&mut self, draft: DraftReview) -> Result<StoredReview, SubmitError> {
        self.state.set_draft(draft);
        self.submit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DraftField;
    use crate::store::memory::MemoryReviewStore;

    #[tokio::test]
    async fn blank_name_is_rejected_without_calling_the_store() {
        let store = Arc::new(MemoryReviewStore::new());
        let mut controller = SubmissionController::new(store.clone());

        let err = controller
            .submit_draft(DraftReview::new("", "", "hello world", None))
            .await
            .unwrap_err();
        match err {
            SubmitError::Validation(invalid) => {
                assert_eq!(invalid.fields, vec![DraftField::Name]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.insert_count(), 0);
        assert_eq!(controller.state().draft().review, "hello world");
        assert!(!controller.state().is_submitting());
    }

    #[tokio::test]
    async fn accepted_review_is_forced_approved_and_clears_the_draft() {
        let store = Arc::new(MemoryReviewStore::new());
        let mut controller = SubmissionController::new(store.clone());

        let stored = controller
            .submit_draft(DraftReview::new(" Sam ", "  ", " Fast and friendly ", None))
            .await
            .unwrap();
        assert!(stored.approved);
        assert_eq!(stored.name, "Sam");
        assert_eq!(stored.position.as_deref(), Some("Client"));
        assert_eq!(stored.rating, Some(5));
        assert!(controller.state().draft().is_empty());
        assert!(controller.state().last_error().is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn store_failure_keeps_the_draft_for_retry() {
        let store = Arc::new(MemoryReviewStore::new());
        store.fail_inserts(true);
        let mut controller = SubmissionController::new(store.clone());
        let draft = DraftReview::new("Kim", "PM", "Would hire again", Some(4));

        let err = controller.submit_draft(draft.clone()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Store(_)));
        assert_eq!(controller.state().draft(), &draft);
        assert!(controller.state().last_error().is_some());

        store.fail_inserts(false);
        let stored = controller.submit().await.unwrap();
        assert_eq!(stored.rating, Some(4));
        assert!(controller.state().draft().is_empty());
    }

    #[test]
    fn second_begin_while_in_flight_is_rejected() {
        let mut state = SubmissionState::new();
        state.set_draft(DraftReview::new("Kim", "", "Great", None));
        assert!(state.begin().is_ok());
        assert_eq!(state.begin(), Err(SubmitError::InFlight));
        assert!(state.is_submitting());
    }

    #[test]
    fn dismissing_clears_the_alert() {
        let mut state = SubmissionState::new();
        let _ = state.begin();
        assert!(state.last_error().is_some());
        state.dismiss_error();
        assert!(state.last_error().is_none());
    }
}
