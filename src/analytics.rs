//! Analytics sink for search queries and user activity.
//!
//! Every method is fire-and-forget: implementations must not fail the
//! caller's reply.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info};

/// Outcome recorded for a search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    AlumniSearch,
    SearchError,
    RateLimited,
}

impl QueryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AlumniSearch => "alumni_search",
            Self::SearchError => "search_error",
            Self::RateLimited => "rate_limited",
        }
    }
}

/// One logged search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryEvent {
    pub phone: String,
    pub query: String,
    pub status: QueryStatus,
    /// Candidates returned by the store.
    pub total_matches: usize,
    /// Profiles selected for the reply.
    pub returned: usize,
}

#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn log_query(&self, event: QueryEvent);

    async fn log_activity(&self, phone: &str, event: &str, details: serde_json::Value);

    async fn log_error(&self, operation: &str, error: &str);
}

/// Sink that writes structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnalytics;

#[async_trait]
impl AnalyticsSink for TracingAnalytics {
    async fn log_query(&self, event: QueryEvent) {
        info!(
            phone = %event.phone,
            query = %event.query,
            status = event.status.as_str(),
            total_matches = event.total_matches,
            returned = event.returned,
            "Search query"
        );
    }

    async fn log_activity(&self, phone: &str, event: &str, details: serde_json::Value) {
        info!(phone, event, details = %details, "User activity");
    }

    async fn log_error(&self, operation: &str, error: &str) {
        error!(operation, error, "Operation failed");
    }
}
