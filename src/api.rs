#[cfg(feature = "ssr")]
use actix_web::{http::header, web, HttpResponse};
#[cfg(feature = "ssr")]
use futures::StreamExt;
#[cfg(feature = "ssr")]
use leptos::logging::log;

#[cfg(feature = "ssr")]
use crate::config::AppConfig;
#[cfg(feature = "ssr")]
use crate::db::SqliteReviewStore;
#[cfg(feature = "ssr")]
use crate::error::ValidationErrors;
#[cfg(feature = "ssr")]
use crate::models::contact::ContactForm;
#[cfg(feature = "ssr")]
use crate::models::review::{position_or_default, NewReview, Rating};
#[cfg(feature = "ssr")]
use crate::store::RemoteReviewStore;
#[cfg(feature = "ssr")]
use crate::transport::{LogTransport, MessageTransport};

#[cfg(feature = "ssr")]
pub async fn get_reviews(store: web::Data<SqliteReviewStore>) -> HttpResponse {
    match store.query_approved().await {
        Ok(reviews) => {
            log!("[API] Returning {} testimonials", reviews.len());
            HttpResponse::Ok().json(reviews)
        }
        Err(err) => {
            leptos::logging::error!("[API] Failed to fetch testimonials: {}", err);
            HttpResponse::InternalServerError().json(err)
        }
    }
}

#[cfg(feature = "ssr")]
pub async fn create_review(
    store: web::Data<SqliteReviewStore>,
    request: web::Json<NewReview>,
) -> HttpResponse {
    let request = request.into_inner();
    // Clients cannot bypass the trimming and defaults the form applies.
    let request = NewReview {
        name: request.name.trim().to_string(),
        position: position_or_default(Some(&request.position)),
        review: request.review.trim().to_string(),
        rating: Rating::from_raw(Some(i64::from(request.rating))).stars(),
        approved: true,
    };
    let missing = request.missing_fields();
    if !missing.is_empty() {
        log!("[API] Rejected testimonial with missing fields: {:?}", missing);
        return HttpResponse::BadRequest().json(ValidationErrors { fields: missing });
    }

    match store.insert(request).await {
        Ok(stored) => {
            log!("[API] Successfully saved testimonial ID: {}", stored.id);
            HttpResponse::Ok().json(stored)
        }
        Err(err) => {
            leptos::logging::error!("[API] Database error: {}", err);
            HttpResponse::InternalServerError().json(err)
        }
    }
}

/// Server-Sent Events feed of newly stored testimonials.
#[cfg(feature = "ssr")]
pub async fn stream_reviews(store: web::Data<SqliteReviewStore>) -> HttpResponse {
    let subscription = match store.subscribe_insertions() {
        Ok(subscription) => subscription,
        Err(err) => {
            leptos::logging::error!("[API] Could not open testimonial stream: {}", err);
            return HttpResponse::ServiceUnavailable().json(err);
        }
    };
    log!(
        "[API] Streaming testimonials on subscription {} ({} open)",
        subscription.id().0,
        store.subscriber_count()
    );
    let events = subscription
        .into_stream()
        .map(|record| sse_frame(&record).map(web::Bytes::from));

    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/event-stream"))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(events)
}

#[cfg(feature = "ssr")]
pub fn sse_frame<T: serde::Serialize>(record: &T) -> Result<String, serde_json::Error> {
    Ok(format!("event: insert\ndata: {}\n\n", serde_json::to_string(record)?))
}

#[cfg(feature = "ssr")]
pub async fn send_contact(
    config: web::Data<AppConfig>,
    form: web::Json<ContactForm>,
) -> HttpResponse {
    let form = form.into_inner();
    if let Err(errors) = form.validate() {
        log!("[API] Contact form rejected: {}", errors);
        return HttpResponse::BadRequest().json(errors);
    }
    let message = form.into_message(&config.contact_name, &config.contact_email);
    match LogTransport.send(&message).await {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(err) => {
            leptos::logging::error!("[API] Failed to send message: {}", err);
            HttpResponse::BadGateway().body(err.to_string())
        }
    }
}

#[cfg(feature = "ssr")]
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/reviews", web::get().to(get_reviews))
            .route("/reviews", web::post().to(create_review))
            .route("/reviews/stream", web::get().to(stream_reviews))
            .route("/contact", web::post().to(send_contact)),
    );
}
