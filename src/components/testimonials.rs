use leptos::*;
use leptos::ev::{TouchEvent, WheelEvent};
use crate::components::review_card::ReviewCard;
use crate::components::review_form::ReviewForm;
#[cfg(any(feature = "hydrate", feature = "csr"))]
use crate::config::ApiBase;
use crate::gesture::GestureAdapter;
use crate::pagination::{Direction, Pagination};
use crate::submission::SubmissionState;
use crate::sync::ReviewList;

/// Three-at-a-time testimonials carousel with the review form underneath.
#[component]
pub fn Testimonials() -> impl IntoView {
    let list = create_rw_signal({
        let mut list = ReviewList::new();
        list.begin_load();
        list
    });
    let pagination = create_rw_signal(Pagination::new());
    let gestures = store_value(GestureAdapter::new());
    let submission = create_rw_signal(SubmissionState::new());

    #[cfg(any(feature = "hydrate", feature = "csr"))]
    let store = live::connect(ApiBase::current(), list, pagination);

    let on_submit = Callback::new(move |()| {
        #[cfg(any(feature = "hydrate", feature = "csr"))]
        live::submit(store.clone(), submission);
    });

    let on_wheel = move |ev: WheelEvent| {
        let delta = ev.delta_y();
        pagination.update(|p| {
            gestures.update_value(|g| {
                g.on_wheel(delta, p);
            })
        });
    };
    let on_touch_start = move |ev: TouchEvent| {
        if let Some((x, y)) = touch_point(&ev) {
            pagination.with(|p| gestures.update_value(|g| g.on_touch_start(x, y, p)));
        }
    };
    let on_touch_move = move |ev: TouchEvent| {
        if let Some((x, y)) = touch_point(&ev) {
            pagination.update(|p| {
                gestures.update_value(|g| {
                    g.on_touch_move(x, y, p);
                })
            });
        }
    };
    let on_touch_end = move |_: TouchEvent| gestures.update_value(GestureAdapter::on_touch_end);
    let on_prev = move |_| {
        pagination.update(|p| {
            gestures.update_value(|g| {
                g.on_prev_click(p);
            })
        })
    };
    let on_next = move |_| {
        pagination.update(|p| {
            gestures.update_value(|g| {
                g.on_next_click(p);
            })
        })
    };

    let visible = move || {
        list.with(|l| pagination.with(|p| p.visible_slice(l.reviews()).to_vec()))
    };
    let page_label = move || {
        pagination.with(|p| format!("Page {} of {}", p.current_group() + 1, p.total_groups()))
    };
    let at_start = move || !pagination.with(|p| p.can_advance(Direction::Backward));
    let at_end = move || !pagination.with(|p| p.can_advance(Direction::Forward));

    view! {
        <section class="c-space my-20" id="testimonials">
            <h3 class="head-text">"Hear from My Clients"</h3>
            <Show
                when=move || !list.with(ReviewList::is_loading)
                fallback=|| view! { <p class="text-white-500">"Loading testimonials..."</p> }
            >
                <Show when=move || list.with(ReviewList::is_stale)>
                    <p class="text-white-500 text-sm">"Live updates paused. Refresh to see new reviews."</p>
                </Show>
                <div
                    class="client-container"
                    on:wheel=on_wheel
                    on:touchstart=on_touch_start
                    on:touchmove=on_touch_move
                    on:touchend=on_touch_end
                >
                    <For
                        each=visible
                        key=|review| review.id.clone()
                        children=move |review| view! { <ReviewCard review=review /> }
                    />
                </div>
                <Show when=move || !pagination.with(Pagination::controls_hidden)>
                    <div class="flex justify-center items-center gap-4 mt-6">
                        <button class="arrow-btn" aria-label="Previous reviews" on:click=on_prev disabled=at_start>
                            "<"
                        </button>
                        <span class="text-white-500">{page_label}</span>
                        <button class="arrow-btn" aria-label="Next reviews" on:click=on_next disabled=at_end>
                            ">"
                        </button>
                    </div>
                </Show>
            </Show>
            <ReviewForm state=submission on_submit=on_submit />
        </section>
    }
}

fn touch_point(ev: &TouchEvent) -> Option<(f64, f64)> {
    ev.touches()
        .get(0)
        .map(|touch| (f64::from(touch.client_x()), f64::from(touch.client_y())))
}

#[cfg(any(feature = "hydrate", feature = "csr"))]
mod live {
    use futures::channel::oneshot;
    use futures::FutureExt;
    use leptos::logging::log;
    use leptos::*;
    use std::sync::Arc;

    use crate::config::ApiBase;
    use crate::fallback::CLIENT_REVIEWS;
    use crate::pagination::Pagination;
    use crate::store::http::HttpReviewStore;
    use crate::store::RemoteReviewStore;
    use crate::submission::SubmissionState;
    use crate::sync::{ReviewList, SyncController};

    /// Loads the list, then follows the insertion stream until the component
    /// is cleaned up.
    pub fn connect(
        api_base: ApiBase,
        list: RwSignal<ReviewList>,
        pagination: RwSignal<Pagination>,
    ) -> Arc<HttpReviewStore> {
        log!("[TESTIMONIALS] Using review API at {}", api_base.as_str());
        let store = Arc::new(HttpReviewStore::new(api_base.as_str()));
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        on_cleanup(move || {
            let _ = cancel_tx.send(());
        });

        let sync_store = store.clone();
        spawn_local(async move {
            let mut sync = SyncController::new(sync_store, CLIENT_REVIEWS);
            // Subscribe first so reviews stored during the load are buffered.
            if let Err(err) = sync.subscribe() {
                log!("[TESTIMONIALS] Live updates unavailable: {}", err);
            }
            sync.load_initial().await;
            if !publish(&sync, list, pagination) {
                return;
            }

            let mut cancel = cancel_rx.fuse();
            loop {
                let insertion = {
                    let next = sync.next_insertion().fuse();
                    futures::pin_mut!(next);
                    futures::select! {
                        insertion = next => Some(insertion),
                        _ = cancel => None,
                    }
                };
                match insertion {
                    Some(Some(_)) => {
                        if !publish(&sync, list, pagination) {
                            break;
                        }
                    }
                    Some(None) => {
                        publish(&sync, list, pagination);
                        break;
                    }
                    None => break,
                }
            }
            sync.teardown();
        });

        store
    }

    /// Copies the controller's list into the view; false once the view is gone.
    fn publish<S: RemoteReviewStore>(
        sync: &SyncController<S>,
        list: RwSignal<ReviewList>,
        pagination: RwSignal<Pagination>,
    ) -> bool {
        let snapshot = sync.list().clone();
        let len = snapshot.len();
        list.try_set(snapshot).is_none()
            && pagination.try_update(|p| p.on_list_changed(len)).is_some()
    }

    pub fn submit(store: Arc<HttpReviewStore>, state: RwSignal<SubmissionState>) {
        let Some(Ok(request)) = state.try_update(SubmissionState::begin) else {
            return;
        };
        spawn_local(async move {
            let result = store.insert(request).await;
            // The accepted review reaches the list through the stream.
            let _ = state.try_update(|s| s.finish(result));
        });
    }
}
