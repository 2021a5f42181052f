use leptos::*;
use leptos::ev::SubmitEvent;
use crate::models::review::Rating;
use crate::submission::SubmissionState;

/// Form for submitting a new testimonial. The draft lives in `state` so the
/// parent can clear it once the store accepts the review.
#[component]
pub fn ReviewForm(state: RwSignal<SubmissionState>, on_submit: Callback<()>) -> impl IntoView {
    let submitting = move || state.with(SubmissionState::is_submitting);
    let handle_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        on_submit.call(());
    };

    view! {
        <form class="review-form flex flex-col gap-4" on:submit=handle_submit>
            <h3 class="head-text">"Leave a review"</h3>
            <input
                type="text"
                name="name"
                placeholder="Your name"
                class="field-input"
                prop:value=move || state.with(|s| s.draft().name.clone())
                on:input=move |e| {
                    let value = event_target_value(&e);
                    state.update(|s| s.update_draft(|d| d.name = value));
                }
            />
            <input
                type="text"
                name="position"
                placeholder="Your position (optional)"
                class="field-input"
                prop:value=move || state.with(|s| s.draft().position.clone())
                on:input=move |e| {
                    let value = event_target_value(&e);
                    state.update(|s| s.update_draft(|d| d.position = value));
                }
            />
            <textarea
                name="review"
                rows="4"
                placeholder="Your review"
                class="field-input"
                prop:value=move || state.with(|s| s.draft().review.clone())
                on:input=move |e| {
                    let value = event_target_value(&e);
                    state.update(|s| s.update_draft(|d| d.review = value));
                }
            />
            <div class="flex items-center gap-2">
                <span class="text-white-500">"Rating:"</span>
                {(1..=Rating::MAX)
                    .map(|value| {
                        let label = format!("Rate {} out of {}", value, Rating::MAX);
                        let class = move || {
                            if value <= state.with(|s| s.draft().display_rating()) {
                                "w-6 h-6"
                            } else {
                                "w-6 h-6 opacity-30"
                            }
                        };
                        view! {
                            <button
                                type="button"
                                aria-label=label
                                on:click=move |_| state.update(|s| s.update_draft(|d| d.rating = Some(value)))
                            >
                                <img src="/assets/star.png" alt="star" class=class />
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            {move || {
                state.with(|s| s.last_error().map(|err| err.to_string())).map(|message| {
                    view! {
                        <div class="form-alert" role="alert">
                            <span>{message}</span>
                            <button type="button" on:click=move |_| state.update(SubmissionState::dismiss_error)>
                                "Dismiss"
                            </button>
                        </div>
                    }
                })
            }}
            <button type="submit" class="field-btn" disabled=submitting>
                {move || if submitting() { "Submitting..." } else { "Submit Review" }}
            </button>
        </form>
    }
}
