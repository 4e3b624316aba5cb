//! Error taxonomy for the data core.
//!
//! Faults propagate as [`DataError`]; expected business outcomes (a blocked
//! progress regression, a forbidden request edit) are plain result enums in
//! their own modules and never travel through this type.

use thiserror::Error;

use crate::taxonomy::RequestType;

/// A document failed field-level validation at a repository boundary.
///
/// Always tagged with the offending field name and the shape that was
/// expected, so the failure is actionable without digging through payloads.
#[derive(Debug, Clone, Error, PartialEq, Eq, serde::Serialize)]
#[error("invalid or missing \"{field}\": expected {expected}")]
pub struct ValidationError {
    /// Name of the offending field.
    pub field: String,
    /// Human-readable description of the expected shape.
    pub expected: String,
}

impl ValidationError {
    /// Build a validation error for `field` with an expected-shape note.
    pub fn new(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
        }
    }
}

/// Failure in the keyed collection store itself.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Durable backend could not be read or written.
    #[error("storage i/o failed for collection \"{key}\": {source}")]
    Io {
        /// Persistence key of the collection involved.
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored bytes were not valid JSON.
    #[error("corrupt collection \"{key}\": {source}")]
    Corrupt {
        /// Persistence key of the collection involved.
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A write was refused by the policy gate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    /// The request type is disabled in the configured jurisdiction.
    #[error("request type \"{request_type}\" is disabled in jurisdiction \"{jurisdiction}\"")]
    RequestTypeDisabled {
        request_type: RequestType,
        jurisdiction: String,
    },

    /// Parental consent is required before the user may submit requests.
    #[error("parental consent is required for under-13 users in jurisdiction \"{jurisdiction}\"")]
    ParentalConsentRequired { jurisdiction: String },
}

/// Application-level error type for the data core.
#[derive(Debug, Error)]
pub enum DataError {
    /// Malformed entity data at a repository boundary.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No authenticated identity for a call that requires one.
    #[error("not signed in")]
    Unauthenticated,

    /// The supplied user id does not match the authenticated identity.
    #[error("caller \"{authenticated}\" may not act on behalf of \"{supplied}\"")]
    OwnershipMismatch {
        /// Uid of the authenticated identity.
        authenticated: String,
        /// Uid the caller tried to act as.
        supplied: String,
    },

    /// A referenced document does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Refused by the policy gate.
    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    /// The collection store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The bootstrap content source could not be loaded.
    #[error("bootstrap content source failed: {0}")]
    Bootstrap(String),
}

/// Result alias for facade and repository operations.
pub type Result<T> = std::result::Result<T, DataError>;
