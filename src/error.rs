use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failures reported by a `RemoteReviewStore`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum StoreError {
    #[error("review store unavailable: {0}")]
    Unavailable(String),
    #[error("review store request failed: {0}")]
    Request(String),
    #[error("malformed review store response: {0}")]
    Malformed(String),
    #[error("database error: {0}")]
    Database(String),
}

#[cfg(feature = "ssr")]
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Malformed(err.to_string())
    }
}

/// Draft fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftField {
    Name,
    Review,
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Name => "name",
            DraftField::Review => "review",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The empty fields of a rejected draft, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("missing required fields: {}", join_fields(.fields))]
pub struct ValidationErrors {
    pub fields: Vec<DraftField>,
}

impl ValidationErrors {
    pub fn names(&self, field: DraftField) -> bool {
        self.fields.contains(&field)
    }
}

fn join_fields(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(DraftField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("a submission is already in flight")]
    InFlight,
    #[error("failed to submit review: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("message transport rejected the message: {0}")]
    Rejected(String),
    #[error("message transport unreachable: {0}")]
    Unreachable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_every_empty_field() {
        let err = ValidationErrors {
            fields: vec![DraftField::Name, DraftField::Review],
        };
        assert_eq!(err.to_string(), "missing required fields: name, review");
        assert!(err.names(DraftField::Name));
    }

    #[test]
    fn submit_error_wraps_store_error() {
        let err: SubmitError = StoreError::Unavailable("offline".into()).into();
        assert_eq!(
            err.to_string(),
            "failed to submit review: review store unavailable: offline"
        );
    }
}
