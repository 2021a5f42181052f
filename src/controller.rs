//! Entry points the rendering layer calls: one object per mounted
//! testimonials section, owning sync, paging, gestures and submission.
use std::sync::Arc;

use crate::error::{StoreError, SubmitError};
use crate::fallback::FallbackReview;
use crate::gesture::GestureAdapter;
use crate::models::review::{DraftReview, Review, StoredReview};
use crate::pagination::{Advance, Pagination};
use crate::store::RemoteReviewStore;
use crate::submission::{SubmissionController, SubmissionState};
use crate::sync::{Insertion, LoadReport, SyncController};

pub struct TestimonialsController<S: RemoteReviewStore> {
    sync: SyncController<S>,
    pagination: Pagination,
    gestures: GestureAdapter,
    submission: SubmissionController<S>,
}

impl<S: RemoteReviewStore> TestimonialsController<S> {
    pub fn new(store: Arc<S>, fallback: &'static [FallbackReview]) -> Self {
        Self {
            sync: SyncController::new(store.clone(), fallback),
            pagination: Pagination::new(),
            gestures: GestureAdapter::new(),
            submission: SubmissionController::new(store),
        }
    }

    /// Opens the insertion channel, then loads the initial list.
    ///
    /// Records stored while the query runs stay buffered in the channel;
    /// the ones the query already returned come back as duplicates.
    pub async fn start(&mut self) -> (LoadReport, Result<(), StoreError>) {
        let subscribed = self.sync.subscribe();
        let report = self.load_initial().await;
        (report, subscribed)
    }

    pub async fn load_initial(&mut self) -> LoadReport {
        let report = self.sync.load_initial().await;
        self.list_changed();
        report
    }

    pub fn subscribe(&mut self) -> Result<(), StoreError> {
        self.sync.subscribe()
    }

    /// Handles the next change notification. `None` once the channel is gone.
    pub async fn process_next_notification(&mut self) -> Option<Insertion> {
        let insertion = self.sync.next_insertion().await?;
        if let Insertion::Inserted { .. } = insertion {
            self.list_changed();
        }
        Some(insertion)
    }

    pub fn teardown(&mut self) {
        self.sync.teardown();
        self.gestures.on_touch_end();
    }

    fn list_changed(&mut self) {
        self.pagination.on_list_changed(self.sync.reviews().len());
    }

    pub fn reviews(&self) -> &[Review] {
        self.sync.reviews()
    }

    pub fn visible_slice(&self) -> &[Review] {
        self.pagination.visible_slice(self.sync.reviews())
    }

    pub fn total_groups(&self) -> usize {
        self.pagination.total_groups()
    }

    pub fn current_group(&self) -> usize {
        self.pagination.current_group()
    }

    pub fn cursor(&self) -> usize {
        self.pagination.cursor()
    }

    pub fn controls_hidden(&self) -> bool {
        self.pagination.controls_hidden()
    }

    pub fn is_loading(&self) -> bool {
        self.sync.list().is_loading()
    }

    pub fn is_stale(&self) -> bool {
        self.sync.list().is_stale()
    }

    pub fn load_error(&self) -> Option<&StoreError> {
        self.sync.list().last_error()
    }

    pub fn is_submitting(&self) -> bool {
        self.submission.state().is_submitting()
    }

    pub fn submission(&self) -> &SubmissionState {
        self.submission.state()
    }

    pub fn submission_mut(&mut self) -> &mut SubmissionState {
        self.submission.state_mut()
    }

    pub fn on_wheel(&mut self, delta_y: f64) -> Option<Advance> {
        self.gestures.on_wheel(delta_y, &mut self.pagination)
    }

    pub fn on_touch_start(&mut self, x: f64, y: f64) {
        self.gestures.on_touch_start(x, y, &self.pagination);
    }

    pub fn on_touch_move(&mut self, x: f64, y: f64) -> Option<Advance> {
        self.gestures.on_touch_move(x, y, &mut self.pagination)
    }

    pub fn on_touch_end(&mut self) {
        self.gestures.on_touch_end();
    }

    pub fn on_prev_click(&mut self) -> Option<Advance> {
        self.gestures.on_prev_click(&mut self.pagination)
    }

    pub fn on_next_click(&mut self) -> Option<Advance> {
        self.gestures.on_next_click(&mut self.pagination)
    }

    pub async fn on_submit(&mut self, draft: DraftReview) -> Result<StoredReview, SubmitError> {
        self.submission.submit_draft(draft).await
    }
}
