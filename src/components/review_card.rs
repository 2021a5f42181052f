use leptos::*;
use crate::models::review::{Rating, Review};

/// A single testimonial: body, author, position and star rating.
#[component]
pub fn ReviewCard(review: Review) -> impl IntoView {
    let filled = review.rating.stars();
    view! {
        <div class="client-review">
            <p class="text-white-800 font-light">{review.review}</p>
            <div class="client-content">
                <div class="flex flex-col">
                    <p class="font-semibold text-white-800">{review.name}</p>
                    <p class="text-white-500 md:text-base text-sm font-light">{review.position}</p>
                </div>
                <StarRow filled=filled />
            </div>
        </div>
    }
}

#[component]
pub fn StarRow(filled: u8) -> impl IntoView {
    let label = format!("{} out of {} stars", filled, Rating::MAX);
    view! {
        <div class="flex self-end items-center gap-2" aria-label=label>
            {(1..=Rating::MAX)
                .map(|value| {
                    let class = if value <= filled { "w-5 h-5" } else { "w-5 h-5 opacity-30" };
                    view! { <img src="/assets/star.png" alt="star" class=class /> }
                })
                .collect_view()}
        </div>
    }
}
