//! `UserStore`: the async interface to alumni records.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::DatabaseError;
use crate::profile::{Field, FieldValue, UserRecord};
use crate::search::query::SearchFilter;

/// Result of linking an extra email to a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEmailOutcome {
    pub success: bool,
    /// User-facing reason when `success` is false.
    pub error: Option<String>,
}

impl LinkEmailOutcome {
    pub fn linked() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(reason.into()),
        }
    }
}

/// Backend-agnostic store for alumni records.
///
/// Writes return `Ok(false)` when the record does not exist.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert or replace a whole record (registration and imports).
    async fn upsert_user(&self, user: &UserRecord) -> Result<(), DatabaseError>;

    async fn find_by_phone(&self, phone: &str) -> Result<Option<UserRecord>, DatabaseError>;

    /// Set one enhanced-profile field.
    async fn update_field(
        &self,
        phone: &str,
        field: Field,
        value: &FieldValue,
    ) -> Result<bool, DatabaseError>;

    /// Flag the profile as completed.
    async fn mark_completed(&self, phone: &str) -> Result<bool, DatabaseError>;

    /// Attach an extra email, refusing addresses already in use.
    async fn link_additional_email(
        &self,
        phone: &str,
        email: &str,
    ) -> Result<LinkEmailOutcome, DatabaseError>;

    /// Records matching `filter`, projected for search, at most
    /// `filter.limit()` of them, in insertion order.
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<UserRecord>, DatabaseError>;
}

pub(crate) const EMAIL_IN_USE: &str = "This email is already linked to another alumni profile.";
pub(crate) const EMAIL_ALREADY_YOURS: &str = "This email is already linked to your profile.";
