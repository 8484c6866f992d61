//! In-memory `UserStore`, used by tests and local demos.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::DatabaseError;
use crate::profile::{Field, FieldValue, UserRecord};
use crate::search::query::SearchFilter;

use super::traits::{EMAIL_ALREADY_YOURS, EMAIL_IN_USE, LinkEmailOutcome, UserStore};

/// Records kept in insertion order behind a lock.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().collect()),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn upsert_user(&self, user: &UserRecord) -> Result<(), DatabaseError> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.phone == user.phone) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        Ok(())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<UserRecord>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.phone == phone).cloned())
    }

    async fn update_field(
        &self,
        phone: &str,
        field: Field,
        value: &FieldValue,
    ) -> Result<bool, DatabaseError> {
        let mut users = self.users.write().await;
        let Some(user) = users.iter_mut().find(|u| u.phone == phone) else {
            return Ok(false);
        };
        user.enhanced_profile.fields.insert(field, value.clone());
        user.last_active = Some(Utc::now());
        Ok(true)
    }

    async fn mark_completed(&self, phone: &str) -> Result<bool, DatabaseError> {
        let mut users = self.users.write().await;
        let Some(user) = users.iter_mut().find(|u| u.phone == phone) else {
            return Ok(false);
        };
        user.enhanced_profile.completed = true;
        user.enhanced_profile.completed_at = Some(Utc::now());
        Ok(true)
    }

    async fn link_additional_email(
        &self,
        phone: &str,
        email: &str,
    ) -> Result<LinkEmailOutcome, DatabaseError> {
        let email = email.to_lowercase();
        let mut users = self.users.write().await;

        let taken_elsewhere = users.iter().any(|u| {
            u.phone != phone
                && (u.basic_profile.email.eq_ignore_ascii_case(&email)
                    || u.basic_profile.linked_emails.contains(&email))
        });
        if taken_elsewhere {
            return Ok(LinkEmailOutcome::rejected(EMAIL_IN_USE));
        }

        let Some(user) = users.iter_mut().find(|u| u.phone == phone) else {
            return Err(DatabaseError::NotFound {
                entity: "user".to_string(),
                id: phone.to_string(),
            });
        };
        if user.basic_profile.email.eq_ignore_ascii_case(&email)
            || user.basic_profile.linked_emails.contains(&email)
        {
            return Ok(LinkEmailOutcome::rejected(EMAIL_ALREADY_YOURS));
        }

        user.basic_profile.linked_emails.push(email.clone());
        user.enhanced_profile
            .fields
            .insert(Field::AdditionalEmail, FieldValue::Text(email));
        Ok(LinkEmailOutcome::linked())
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<UserRecord>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| filter.matches(u))
            .take(filter.limit())
            .map(UserRecord::search_projection)
            .collect())
    }
}
