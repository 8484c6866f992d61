//! libSQL backend: async `UserStore` implementation.
//!
//! Each member is one row keyed by phone, with the full record kept as a
//! JSON document. Linked emails get their own table so uniqueness is
//! enforced by the database.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::profile::{Field, FieldValue, UserRecord};
use crate::search::query::SearchFilter;
use crate::store::migrations;
use crate::store::traits::{EMAIL_ALREADY_YOURS, EMAIL_IN_USE, LinkEmailOutcome, UserStore};

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlUserStore {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlUserStore {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let store = Self::from_database(db).await?;
        info!(path = %path.display(), "Database opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;
        Self::from_database(db).await
    }

    async fn from_database(db: LibSqlDatabase) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        migrations::run_migrations(&conn).await?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }

    async fn write_document(&self, user: &UserRecord) -> Result<(), DatabaseError> {
        let document =
            serde_json::to_string(user).map_err(|e| DatabaseError::Serialization(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        self.conn()
            .execute(
                "INSERT INTO users (phone, email, document, completed, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT (phone) DO UPDATE SET
                    email = ?2, document = ?3, completed = ?4, updated_at = ?5",
                params![
                    user.phone.as_str(),
                    user.basic_profile.email.to_lowercase(),
                    document,
                    user.enhanced_profile.completed as i64,
                    now
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("write_document: {e}")))?;
        Ok(())
    }

    /// Phone of the member owning `email` as primary or linked address.
    async fn email_owner(&self, email: &str) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT phone FROM users WHERE email = ?1
                 UNION
                 SELECT phone FROM linked_emails WHERE email = ?1
                 LIMIT 1",
                params![email],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("email_owner: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(
                row.get::<String>(0)
                    .map_err(|e| DatabaseError::Query(format!("email_owner: {e}")))?,
            )),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("email_owner: {e}"))),
        }
    }
}

// ── Helper functions ────────────────────────────────────────────────

fn parse_document(raw: &str) -> Result<UserRecord, DatabaseError> {
    serde_json::from_str(raw).map_err(|e| DatabaseError::Serialization(e.to_string()))
}

#[async_trait]
impl UserStore for LibSqlUserStore {
    async fn upsert_user(&self, user: &UserRecord) -> Result<(), DatabaseError> {
        self.write_document(user).await?;
        debug!(phone = %user.phone, "User upserted");
        Ok(())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<UserRecord>, DatabaseError> {
        let mut rows = self
            .conn()
            .query("SELECT document FROM users WHERE phone = ?1", params![phone])
            .await
            .map_err(|e| DatabaseError::Query(format!("find_by_phone: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let raw: String = row
                    .get(0)
                    .map_err(|e| DatabaseError::Query(format!("find_by_phone: {e}")))?;
                parse_document(&raw).map(Some)
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("find_by_phone: {e}"))),
        }
    }

    async fn update_field(
        &self,
        phone: &str,
        field: Field,
        value: &FieldValue,
    ) -> Result<bool, DatabaseError> {
        let Some(mut user) = self.find_by_phone(phone).await? else {
            return Ok(false);
        };
        user.enhanced_profile.fields.insert(field, value.clone());
        user.last_active = Some(Utc::now());
        self.write_document(&user).await?;
        Ok(true)
    }

    async fn mark_completed(&self, phone: &str) -> Result<bool, DatabaseError> {
        let Some(mut user) = self.find_by_phone(phone).await? else {
            return Ok(false);
        };
        user.enhanced_profile.completed = true;
        user.enhanced_profile.completed_at = Some(Utc::now());
        self.write_document(&user).await?;
        Ok(true)
    }

    async fn link_additional_email(
        &self,
        phone: &str,
        email: &str,
    ) -> Result<LinkEmailOutcome, DatabaseError> {
        let email = email.to_lowercase();

        match self.email_owner(&email).await? {
            Some(owner) if owner == phone => {
                return Ok(LinkEmailOutcome::rejected(EMAIL_ALREADY_YOURS));
            }
            Some(_) => return Ok(LinkEmailOutcome::rejected(EMAIL_IN_USE)),
            None => {}
        }

        let Some(mut user) = self.find_by_phone(phone).await? else {
            return Err(DatabaseError::NotFound {
                entity: "user".to_string(),
                id: phone.to_string(),
            });
        };

        self.conn()
            .execute(
                "INSERT INTO linked_emails (email, phone, linked_at) VALUES (?1, ?2, ?3)",
                params![email.as_str(), phone, Utc::now().to_rfc3339()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("link_additional_email: {e}")))?;

        user.basic_profile.linked_emails.push(email.clone());
        user.enhanced_profile
            .fields
            .insert(Field::AdditionalEmail, FieldValue::Text(email));
        self.write_document(&user).await?;
        Ok(LinkEmailOutcome::linked())
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<UserRecord>, DatabaseError> {
        let mut rows = self
            .conn()
            .query("SELECT document FROM users ORDER BY rowid", ())
            .await
            .map_err(|e| DatabaseError::Query(format!("search: {e}")))?;

        let mut found = Vec::new();
        while found.len() < filter.limit() {
            let row = match rows.next().await {
                Ok(Some(row)) => row,
                Ok(None) => break,
                Err(e) => return Err(DatabaseError::Query(format!("search: {e}"))),
            };
            let raw: String = row
                .get(0)
                .map_err(|e| DatabaseError::Query(format!("search: {e}")))?;
            let user = parse_document(&raw)?;
            if filter.matches(&user) {
                found.push(user.search_projection());
            }
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> LibSqlUserStore {
        let store = LibSqlUserStore::new_memory().await.unwrap();
        let mut asha = UserRecord::new("911111111111", "Asha", "Asha@Example.com");
        asha.basic_profile.about = Some("Runs an edtech startup".into());
        store.upsert_user(&asha).await.unwrap();
        store
            .upsert_user(&UserRecord::new("912222222222", "Ravi", "ravi@example.com"))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn find_roundtrips_document() {
        let store = seeded().await;
        let user = store.find_by_phone("911111111111").await.unwrap().unwrap();
        assert_eq!(user.basic_profile.name, "Asha");
        assert!(store.find_by_phone("000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_field_and_mark_completed_persist() {
        let store = seeded().await;
        assert!(store
            .update_field(
                "911111111111",
                Field::CommunityGives,
                &FieldValue::List(vec!["Mentoring".into()]),
            )
            .await
            .unwrap());
        assert!(store.mark_completed("911111111111").await.unwrap());
        assert!(!store.mark_completed("000").await.unwrap());

        let user = store.find_by_phone("911111111111").await.unwrap().unwrap();
        assert_eq!(user.list(Field::CommunityGives), ["Mentoring".to_string()]);
        assert!(user.enhanced_profile.completed);
        assert!(user.enhanced_profile.completed_at.is_some());
    }

    #[tokio::test]
    async fn linked_emails_are_unique() {
        let store = seeded().await;

        let own = store
            .link_additional_email("911111111111", "asha@example.com")
            .await
            .unwrap();
        assert_eq!(own.error.as_deref(), Some(EMAIL_ALREADY_YOURS));

        let linked = store
            .link_additional_email("911111111111", "asha.work@example.com")
            .await
            .unwrap();
        assert!(linked.success);

        let taken = store
            .link_additional_email("912222222222", "ASHA.WORK@example.com")
            .await
            .unwrap();
        assert_eq!(taken.error.as_deref(), Some(EMAIL_IN_USE));

        let user = store.find_by_phone("911111111111").await.unwrap().unwrap();
        assert_eq!(user.basic_profile.linked_emails, vec!["asha.work@example.com"]);
    }

    #[tokio::test]
    async fn search_filters_in_rowid_order() {
        let store = seeded().await;
        let filter = SearchFilter::new(&["edtech".into(), "ravi".into()], "", 50).unwrap();
        let found = store.search(&filter).await.unwrap();
        let phones: Vec<&str> = found.iter().map(|u| u.phone.as_str()).collect();
        assert_eq!(phones, vec!["911111111111", "912222222222"]);

        let capped = SearchFilter::new(&["edtech".into(), "ravi".into()], "", 1).unwrap();
        assert_eq!(store.search(&capped).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alumni.db");
        {
            let store = LibSqlUserStore::new_local(&path).await.unwrap();
            store
                .upsert_user(&UserRecord::new("913333333333", "Meera", "meera@example.com"))
                .await
                .unwrap();
        }
        let reopened = LibSqlUserStore::new_local(&path).await.unwrap();
        assert!(reopened.find_by_phone("913333333333").await.unwrap().is_some());
    }
}
