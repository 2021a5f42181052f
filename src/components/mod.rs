pub mod review_card;
pub mod review_form;
pub mod testimonials;
