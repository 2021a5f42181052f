// src/models/review.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DraftField, ValidationErrors};

/// Position shown when a reviewer leaves the role/company field empty.
pub const DEFAULT_POSITION: &str = "Client";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ReviewId(pub String);

impl ReviewId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReviewId {
    fn from(value: &str) -> Self {
        ReviewId(value.to_string())
    }
}

/// Star rating, always within 1..=5.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Absent or out-of-range input falls back to five stars.
    pub fn from_raw(raw: Option<i64>) -> Self {
        match raw {
            Some(value) if (Self::MIN as i64..=Self::MAX as i64).contains(&value) => {
                Rating(value as u8)
            }
            _ => Rating::default(),
        }
    }

    pub fn stars(&self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Rating(Self::MAX)
    }
}

impl TryFrom<i64> for Rating {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(format!("rating {value} outside 1..=5"))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A review record as the remote store holds it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoredReview {
    pub id: ReviewId,
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    pub review: String,
    #[serde(default)]
    pub rating: Option<i64>,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

/// A materialized review, ready to display.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub name: String,
    pub position: String,
    pub review: String,
    pub rating: Rating,
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Maps a stored record, applying the position and rating defaults.
    ///
    /// Returns `None` for records that are not approved or whose name or body
    /// is blank.
    pub fn from_stored(record: StoredReview) -> Option<Self> {
        if !record.approved || record.name.trim().is_empty() || record.review.trim().is_empty() {
            return None;
        }
        Some(Review {
            id: record.id,
            name: record.name,
            position: position_or_default(record.position.as_deref()),
            review: record.review,
            rating: Rating::from_raw(record.rating),
            created_at: Some(record.created_at),
        })
    }

    /// True when `self` should be listed ahead of `other`.
    pub fn is_newer_than(&self, other: &Review) -> bool {
        match (self.created_at, other.created_at) {
            (Some(mine), Some(theirs)) => mine > theirs,
            (_, None) => true,
            (None, Some(_)) => false,
        }
    }
}

pub(crate) fn position_or_default(position: Option<&str>) -> String {
    match position.map(str::trim) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => DEFAULT_POSITION.to_string(),
    }
}

/// Insert request sent to the remote store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewReview {
    pub name: String,
    pub position: String,
    pub review: String,
    pub rating: u8,
    pub approved: bool,
}

impl NewReview {
    /// Names the required fields left blank.
    pub fn missing_fields(&self) -> Vec<DraftField> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push(DraftField::Name);
        }
        if self.review.trim().is_empty() {
            missing.push(DraftField::Review);
        }
        missing
    }
}

/// Form state for a review that has not been submitted yet.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftReview {
    pub name: String,
    pub position: String,
    pub review: String,
    pub rating: Option<u8>,
}

impl DraftReview {
    pub fn new(name: &str, position: &str, review: &str, rating: Option<u8>) -> Self {
        DraftReview {
            name: name.to_string(),
            position: position.to_string(),
            review: review.to_string(),
            rating,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == DraftReview::default()
    }

    /// Stars to show in the form; an unset rating shows as five.
    pub fn display_rating(&self) -> u8 {
        Rating::from_raw(self.rating.map(i64::from)).stars()
    }

    /// Builds the insert request, or names the blank required fields.
    pub fn to_new_review(&self) -> Result<NewReview, ValidationErrors> {
        let request = NewReview {
            name: self.name.trim().to_string(),
            position: position_or_default(Some(&self.position)),
            review: self.review.trim().to_string(),
            rating: self.display_rating(),
            approved: true,
        };
        let fields = request.missing_fields();
        if fields.is_empty() {
            Ok(request)
        } else {
            Err(ValidationErrors { fields })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stored(id: &str, rating: Option<i64>, position: Option<&str>) -> StoredReview {
        StoredReview {
            id: ReviewId::from(id),
            name: "Ada".into(),
            position: position.map(String::from),
            review: "Great work".into(),
            rating,
            approved: true,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn rating_defaults_when_absent_or_out_of_range() {
        assert_eq!(Rating::from_raw(None).stars(), 5);
        assert_eq!(Rating::from_raw(Some(0)).stars(), 5);
        assert_eq!(Rating::from_raw(Some(9)).stars(), 5);
        assert_eq!(Rating::from_raw(Some(-2)).stars(), 5);
        assert_eq!(Rating::from_raw(Some(3)).stars(), 3);
    }

    #[test]
    fn stored_review_maps_with_defaults() {
        let review = Review::from_stored(stored("r1", None, Some("   "))).unwrap();
        assert_eq!(review.position, DEFAULT_POSITION);
        assert_eq!(review.rating.stars(), 5);
        assert!(review.created_at.is_some());

        let review = Review::from_stored(stored("r2", Some(2), Some("CTO"))).unwrap();
        assert_eq!(review.position, "CTO");
        assert_eq!(review.rating.stars(), 2);
    }

    #[test]
    fn unapproved_or_blank_records_are_not_materialized() {
        let mut record = stored("r1", Some(4), None);
        record.approved = false;
        assert!(Review::from_stored(record).is_none());

        let mut record = stored("r2", Some(4), None);
        record.review = "  ".into();
        assert!(Review::from_stored(record).is_none());
    }

    #[test]
    fn draft_trims_and_defaults_on_conversion() {
        let draft = DraftReview::new("  Grace ", "", " Superb ", None);
        let request = draft.to_new_review().unwrap();
        assert_eq!(request.name, "Grace");
        assert_eq!(request.position, DEFAULT_POSITION);
        assert_eq!(request.review, "Superb");
        assert_eq!(request.rating, 5);
        assert!(request.approved);
    }

    #[test]
    fn draft_with_blank_fields_is_rejected() {
        let err = DraftReview::new(" ", "", "", Some(3)).to_new_review().unwrap_err();
        assert_eq!(err.fields, vec![DraftField::Name, DraftField::Review]);
    }

    #[test]
    fn rating_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<Rating>("4").is_ok());
        assert!(serde_json::from_str::<Rating>("7").is_err());
    }
}
