/// Reviews bundled with the application, shown when the review store cannot
/// be reached.
use crate::models::review::{position_or_default, Rating, Review, ReviewId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackReview {
    pub name: &'static str,
    pub position: &'static str,
    pub review: &'static str,
    pub rating: Option<u8>,
}

pub const CLIENT_REVIEWS: &[FallbackReview] = &[
    FallbackReview {
        name: "Emily Johnson",
        position: "Marketing Director at GreenLeaf",
        review: "Working with him was a fantastic experience. He transformed our outdated website into a modern, user-friendly platform. Our online presence has never been stronger.",
        rating: Some(5),
    },
    FallbackReview {
        name: "Mark Rogers",
        position: "Founder of TechGear Shop",
        review: "Delivered a seamless e-commerce experience with clean code and great attention to detail. Sales went up within the first month of launch.",
        rating: None,
    },
    FallbackReview {
        name: "John Dohsas",
        position: "Project Manager at UrbanTech",
        review: "Communication was clear throughout the project and every milestone landed on time. Highly recommended for any web development work.",
        rating: Some(4),
    },
    FallbackReview {
        name: "Ether Smith",
        position: "",
        review: "A true professional. The dashboard he built for us is fast, intuitive and easy to maintain.",
        rating: None,
    },
];

impl FallbackReview {
    /// `index` is the position in the bundled list and becomes part of the id.
    pub fn to_review(&self, index: usize) -> Review {
        Review {
            id: ReviewId(format!("fallback-{}", index + 1)),
            name: self.name.to_string(),
            position: position_or_default(Some(self.position)),
            review: self.review.to_string(),
            rating: Rating::from_raw(self.rating.map(i64::from)),
            created_at: None,
        }
    }
}

pub fn materialize(source: &[FallbackReview]) -> Vec<Review> {
    source
        .iter()
        .enumerate()
        .map(|(index, entry)| entry.to_review(index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::review::DEFAULT_POSITION;

    #[test]
    fn bundled_reviews_keep_order_and_get_defaults() {
        let reviews = materialize(CLIENT_REVIEWS);
        assert_eq!(reviews.len(), CLIENT_REVIEWS.len());
        assert_eq!(reviews[0].id.as_str(), "fallback-1");
        assert_eq!(reviews[1].name, "Mark Rogers");
        assert_eq!(reviews[1].rating.stars(), 5);
        assert_eq!(reviews[2].rating.stars(), 4);
        assert_eq!(reviews[3].position, DEFAULT_POSITION);
        assert!(reviews.iter().all(|r| r.created_at.is_none()));
    }
}
