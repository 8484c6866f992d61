//! The alumni search pipeline: quota, keywords, store query, selection,
//! rendering, analytics.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::analytics::{AnalyticsSink, QueryEvent, QueryStatus};
use crate::config::BotConfig;
use crate::error::{LlmError, SearchError};
use crate::llm::AiTextService;
use crate::llm::structured::best_effort;
use crate::profile::UserRecord;
use crate::profile::validation::sanitize_input;
use crate::ratelimit::RateLimiter;
use crate::store::UserStore;

use super::keywords::{dedupe_capped, fallback_keywords};
use super::query::SearchFilter;
use super::ranking::{fallback_rank, select_by_keys, summarize};
use super::render;

/// Matches and the profiles chosen to show.
struct SearchOutcome {
    total_matches: usize,
    selected: Vec<UserRecord>,
}

pub struct SearchService {
    store: Arc<dyn UserStore>,
    ai: Option<Arc<dyn AiTextService>>,
    rate_limiter: Arc<dyn RateLimiter>,
    analytics: Arc<dyn AnalyticsSink>,
    config: BotConfig,
}

impl SearchService {
    pub fn new(
        store: Arc<dyn UserStore>,
        ai: Option<Arc<dyn AiTextService>>,
        rate_limiter: Arc<dyn RateLimiter>,
        analytics: Arc<dyn AnalyticsSink>,
        config: BotConfig,
    ) -> Self {
        Self {
            store,
            ai,
            rate_limiter,
            analytics,
            config,
        }
    }

    /// Run a search for `phone` and return the reply text.
    ///
    /// Never fails: quota exhaustion, empty results and store errors all
    /// become user-facing copy, and each is logged to analytics.
    pub async fn search(&self, query: &str, phone: &str) -> String {
        let query = sanitize_input(query);

        if !self.rate_limiter.check_daily_limit(phone).await {
            self.log(phone, &query, QueryStatus::RateLimited, 0, 0).await;
            return render::rate_limited(self.rate_limiter.daily_limit());
        }

        info!(phone, query = %query, "Alumni search started");
        match self.run(&query, phone).await {
            Ok(outcome) if outcome.selected.is_empty() => {
                self.log(phone, &query, QueryStatus::AlumniSearch, outcome.total_matches, 0)
                    .await;
                render::no_results(&query)
            }
            Ok(outcome) => {
                let shown = outcome.selected.len().min(self.config.display_results);
                self.log(
                    phone,
                    &query,
                    QueryStatus::AlumniSearch,
                    outcome.total_matches,
                    shown,
                )
                .await;
                render::render_results(
                    &outcome.selected,
                    &query,
                    outcome.total_matches,
                    self.config.display_results,
                    self.config.response_char_budget,
                )
            }
            Err(e) => {
                warn!(phone, error = %e, "Alumni search failed");
                self.analytics.log_error("alumni_search", &e.to_string()).await;
                self.log(phone, &query, QueryStatus::SearchError, 0, 0).await;
                render::SEARCH_FAILED.to_string()
            }
        }
    }

    async fn run(&self, query: &str, phone: &str) -> Result<SearchOutcome, SearchError> {
        let keywords = self.keywords(query).await;
        if keywords.is_empty() {
            debug!(query, "No usable keywords");
            return Ok(SearchOutcome {
                total_matches: 0,
                selected: Vec::new(),
            });
        }

        let filter = SearchFilter::new(&keywords, phone, self.config.candidate_limit)?;
        let candidates = self.store.search(&filter).await?;
        info!(
            matches = candidates.len(),
            keywords = keywords.len(),
            "Store search completed"
        );

        let selected = self.select_top(&candidates, query, &keywords).await;
        Ok(SearchOutcome {
            total_matches: candidates.len(),
            selected,
        })
    }

    /// Model keywords when available, otherwise the static expansion.
    async fn keywords(&self, query: &str) -> Vec<String> {
        let Some(ai) = &self.ai else {
            return fallback_keywords(query);
        };

        let attempt = async {
            let keywords = dedupe_capped(ai.extract_keywords(query).await?);
            if keywords.is_empty() {
                return Err(LlmError::InvalidResponse {
                    provider: "keyword_extraction".to_string(),
                    reason: "no keywords returned".to_string(),
                });
            }
            Ok(keywords)
        };
        best_effort("keyword_extraction", self.config.ai_timeout, attempt, || {
            fallback_keywords(query)
        })
        .await
    }

    /// At most `max_search_results` candidates, model-ranked when possible.
    async fn select_top(
        &self,
        candidates: &[UserRecord],
        query: &str,
        keywords: &[String],
    ) -> Vec<UserRecord> {
        let max = self.config.max_search_results;
        if candidates.len() <= max {
            return candidates.to_vec();
        }

        let fallback = || fallback_rank(candidates, keywords, max, Utc::now());
        let Some(ai) = &self.ai else {
            return fallback();
        };

        let attempt = async {
            let keys = ai
                .rank_candidates(&summarize(candidates), query, keywords, max)
                .await?;
            let selected = select_by_keys(candidates, &keys, max);
            if selected.is_empty() {
                return Err(LlmError::InvalidResponse {
                    provider: "result_selection".to_string(),
                    reason: "no ranked key matched a candidate".to_string(),
                });
            }
            Ok(selected)
        };
        best_effort("result_selection", self.config.ai_timeout, attempt, fallback).await
    }

    async fn log(
        &self,
        phone: &str,
        query: &str,
        status: QueryStatus,
        total_matches: usize,
        returned: usize,
    ) {
        self.analytics
            .log_query(QueryEvent {
                phone: phone.to_string(),
                query: query.to_string(),
                status,
                total_matches,
                returned,
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::DatabaseError;
    use crate::profile::geography::{GeoKind, GeoVerdict};
    use crate::profile::{Field, FieldValue};
    use crate::ratelimit::DailyRateLimiter;
    use crate::search::ranking::CandidateSummary;
    use crate::store::{InMemoryUserStore, LinkEmailOutcome};

    #[derive(Default)]
    struct RecordingAnalytics {
        queries: Mutex<Vec<QueryEvent>>,
    }

    #[async_trait]
    impl AnalyticsSink for RecordingAnalytics {
        async fn log_query(&self, event: QueryEvent) {
            self.queries.lock().unwrap().push(event);
        }
        async fn log_activity(&self, _phone: &str, _event: &str, _details: serde_json::Value) {}
        async fn log_error(&self, _operation: &str, _error: &str) {}
    }

    struct ScriptedAi {
        keywords: Result<Vec<String>, ()>,
        ranking: Result<Vec<String>, ()>,
    }

    fn failure() -> LlmError {
        LlmError::RequestFailed {
            provider: "scripted".into(),
            reason: "down".into(),
        }
    }

    #[async_trait]
    impl AiTextService for ScriptedAi {
        async fn extract_keywords(&self, _query: &str) -> Result<Vec<String>, LlmError> {
            self.keywords.clone().map_err(|_| failure())
        }

        async fn rank_candidates(
            &self,
            _candidates: &[CandidateSummary],
            _query: &str,
            _keywords: &[String],
            _max_results: usize,
        ) -> Result<Vec<String>, LlmError> {
            self.ranking.clone().map_err(|_| failure())
        }

        async fn classify_geography(&self, _text: &str, _kind: GeoKind) -> Result<GeoVerdict, LlmError> {
            Err(failure())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl UserStore for BrokenStore {
        async fn upsert_user(&self, _user: &UserRecord) -> Result<(), DatabaseError> {
            Ok(())
        }
        async fn find_by_phone(&self, _phone: &str) -> Result<Option<UserRecord>, DatabaseError> {
            Ok(None)
        }
        async fn update_field(&self, _p: &str, _f: Field, _v: &FieldValue) -> Result<bool, DatabaseError> {
            Ok(false)
        }
        async fn mark_completed(&self, _phone: &str) -> Result<bool, DatabaseError> {
            Ok(false)
        }
        async fn link_additional_email(&self, _p: &str, _e: &str) -> Result<LinkEmailOutcome, DatabaseError> {
            Ok(LinkEmailOutcome::linked())
        }
        async fn search(&self, _filter: &SearchFilter) -> Result<Vec<UserRecord>, DatabaseError> {
            Err(DatabaseError::Query("search: disk I/O error".into()))
        }
    }

    fn fintech_member(i: usize) -> UserRecord {
        let mut user = UserRecord::new(
            format!("9190000000{i:02}"),
            format!("Member {i}"),
            format!("m{i}@example.com"),
        );
        user.enhanced_profile.fields.insert(
            Field::Domain,
            FieldValue::Text("Finance, Banking & FinTech".into()),
        );
        user
    }

    fn service(
        store: Arc<dyn UserStore>,
        ai: Option<Arc<dyn AiTextService>>,
        analytics: Arc<RecordingAnalytics>,
        daily_limit: u32,
    ) -> SearchService {
        SearchService::new(
            store,
            ai,
            Arc::new(DailyRateLimiter::new(daily_limit)),
            analytics,
            BotConfig::default(),
        )
    }

    #[tokio::test]
    async fn zero_matches_logs_zero_pair() {
        let analytics = Arc::new(RecordingAnalytics::default());
        let store = Arc::new(InMemoryUserStore::with_users([fintech_member(1)]));
        let svc = service(store, None, analytics.clone(), 30);

        let reply = svc.search("pottery", "919999999999").await;
        assert_eq!(reply, render::no_results("pottery"));

        let queries = analytics.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].status, QueryStatus::AlumniSearch);
        assert_eq!((queries[0].total_matches, queries[0].returned), (0, 0));
    }

    #[tokio::test]
    async fn failing_ai_still_returns_fallback_ranked_results() {
        let analytics = Arc::new(RecordingAnalytics::default());
        let store = Arc::new(InMemoryUserStore::with_users((1..=8).map(fintech_member)));
        let ai = Arc::new(ScriptedAi {
            keywords: Err(()),
            ranking: Err(()),
        });
        let svc = service(store, Some(ai), analytics.clone(), 30);

        let reply = svc.search("fintech", "919999999999").await;
        assert!(reply.starts_with("🌟 Found 8 experts for \"fintech\""));
        assert!(reply.contains("1. **Member 1**"));

        let queries = analytics.queries.lock().unwrap();
        assert_eq!((queries[0].total_matches, queries[0].returned), (8, 3));
    }

    #[tokio::test]
    async fn ai_ranking_orders_results() {
        let analytics = Arc::new(RecordingAnalytics::default());
        let store = Arc::new(InMemoryUserStore::with_users((1..=8).map(fintech_member)));
        let ai = Arc::new(ScriptedAi {
            keywords: Ok(vec!["fintech".into()]),
            ranking: Ok(vec!["m7@example.com".into(), "m2@example.com".into()]),
        });
        let svc = service(store, Some(ai), analytics, 30);

        let reply = svc.search("fintech", "919999999999").await;
        assert!(reply.contains("1. **Member 7**"));
        assert!(reply.contains("2. **Member 2**"));
    }

    #[tokio::test]
    async fn unmapped_ai_ranking_falls_back_to_scoring() {
        let analytics = Arc::new(RecordingAnalytics::default());
        let store = Arc::new(InMemoryUserStore::with_users((1..=8).map(fintech_member)));
        let ai = Arc::new(ScriptedAi {
            keywords: Ok(vec!["fintech".into()]),
            ranking: Ok(vec!["nobody@example.com".into()]),
        });
        let svc = service(store, Some(ai), analytics, 30);

        let reply = svc.search("fintech", "919999999999").await;
        assert!(reply.contains("1. **Member 1**"));
    }

    #[tokio::test]
    async fn requester_is_excluded() {
        let analytics = Arc::new(RecordingAnalytics::default());
        let store = Arc::new(InMemoryUserStore::with_users([fintech_member(1)]));
        let svc = service(store, None, analytics, 30);

        let reply = svc.search("fintech", "+91 90000000 01").await;
        assert_eq!(reply, render::no_results("fintech"));
    }

    #[tokio::test]
    async fn quota_exhaustion_skips_store() {
        let analytics = Arc::new(RecordingAnalytics::default());
        let svc = service(Arc::new(BrokenStore), None, analytics.clone(), 0);

        let reply = svc.search("fintech", "1").await;
        assert!(reply.contains("You've used all 0 searches"));
        assert_eq!(
            analytics.queries.lock().unwrap()[0].status,
            QueryStatus::RateLimited
        );
    }

    #[tokio::test]
    async fn store_failure_is_logged_as_search_error() {
        let analytics = Arc::new(RecordingAnalytics::default());
        let svc = service(Arc::new(BrokenStore), None, analytics.clone(), 30);

        let reply = svc.search("fintech", "1").await;
        assert_eq!(reply, render::SEARCH_FAILED);
        assert_eq!(
            analytics.queries.lock().unwrap()[0].status,
            QueryStatus::SearchError
        );
    }
}
