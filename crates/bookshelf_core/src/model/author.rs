//! Author domain model.
//!
//! # Responsibility
//! - Define the canonical author record shared by read and write paths.
//!
//! # Invariants
//! - `id` is externally assigned, stable, and never reused.
//! - `name` must be non-empty for a persistable author.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable external identifier for an author.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// Identity is assigned by the caller, never generated by storage.
pub type AuthorId = String;

/// Canonical author record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Stable external id used for lookups and upsert reconciliation.
    pub id: AuthorId,
    /// Display name. Mutable, non-empty.
    pub name: String,
    /// Calendar date of birth. Mutable.
    pub birth_date: NaiveDate,
}

impl Author {
    /// Creates an author from caller-supplied identity and fields.
    ///
    /// Does not validate; write paths run [`Author::validate`] before any
    /// SQL mutation.
    pub fn new(id: impl Into<AuthorId>, name: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            birth_date,
        }
    }

    /// Checks persistability invariants.
    pub fn validate(&self) -> Result<(), AuthorValidationError> {
        if self.id.trim().is_empty() {
            return Err(AuthorValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(AuthorValidationError::EmptyName);
        }
        Ok(())
    }
}

/// Validation failure for an author write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorValidationError {
    EmptyId,
    EmptyName,
}

impl Display for AuthorValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "author id must not be empty"),
            Self::EmptyName => write!(f, "author name must not be empty"),
        }
    }
}

impl Error for AuthorValidationError {}
