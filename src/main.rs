use std::sync::Arc;

use anyhow::Context;

use alumni_assist::analytics::{AnalyticsSink, TracingAnalytics};
use alumni_assist::casual::{CannedResponder, CasualResponder, LlmCasualResponder};
use alumni_assist::config::{BotConfig, ServerConfig};
use alumni_assist::intent::{IntentClassifier, RuleBasedClassifier};
use alumni_assist::llm::{AiTextService, LlmConfig, LlmTextService, create_provider};
use alumni_assist::profile::FieldValidator;
use alumni_assist::ratelimit::{DailyRateLimiter, RateLimiter};
use alumni_assist::routes::{AppState, api_routes};
use alumni_assist::search::SearchService;
use alumni_assist::session::{ConversationController, SessionRegistry};
use alumni_assist::store::{LibSqlUserStore, UserStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let bot_config = BotConfig::from_env().context("invalid bot configuration")?;
    let session_idle_timeout = bot_config.session_idle_timeout;
    let server_config = ServerConfig::from_env().context("invalid server configuration")?;

    eprintln!("🎓 Alumni Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Database: {}", server_config.db_path.display());
    eprintln!("   API: http://0.0.0.0:{}/api/messages", server_config.http_port);

    // ── Database ─────────────────────────────────────────────────────────
    let store: Arc<dyn UserStore> = Arc::new(
        LibSqlUserStore::new_local(&server_config.db_path)
            .await
            .with_context(|| format!("failed to open database at {}", server_config.db_path.display()))?,
    );

    // ── LLM (optional) ───────────────────────────────────────────────────
    let (ai, casual): (Option<Arc<dyn AiTextService>>, Arc<dyn CasualResponder>) =
        match LlmConfig::from_env(bot_config.ai_timeout) {
            Some(llm_config) => {
                let llm = create_provider(&llm_config).context("failed to create LLM provider")?;
                eprintln!("   Model: {}", llm.model_name());
                let ai: Arc<dyn AiTextService> = Arc::new(LlmTextService::new(Arc::clone(&llm)));
                let casual: Arc<dyn CasualResponder> =
                    Arc::new(LlmCasualResponder::new(llm, bot_config.ai_timeout));
                (Some(ai), casual)
            }
            None => {
                tracing::warn!("OPENAI_API_KEY not set; running without AI assistance");
                let casual: Arc<dyn CasualResponder> = Arc::new(CannedResponder);
                (None, casual)
            }
        };

    // ── Conversation ─────────────────────────────────────────────────────
    let analytics: Arc<dyn AnalyticsSink> = Arc::new(TracingAnalytics);
    let rate_limiter: Arc<dyn RateLimiter> =
        Arc::new(DailyRateLimiter::new(bot_config.daily_search_limit));
    let search = Arc::new(SearchService::new(
        Arc::clone(&store),
        ai.clone(),
        rate_limiter,
        Arc::clone(&analytics),
        bot_config.clone(),
    ));
    let controller = Arc::new(ConversationController::new(
        Arc::clone(&store),
        search,
        FieldValidator::new(ai, bot_config.ai_timeout),
        casual,
        analytics,
        bot_config,
    ));
    let classifier: Arc<dyn IntentClassifier> = Arc::new(RuleBasedClassifier::default_rules());
    let registry = Arc::new(SessionRegistry::new(Arc::clone(&store)));

    // Spawn session pruning task
    let pruning_registry = Arc::clone(&registry);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(600)); // Every 10 min
        interval.tick().await; // Skip immediate first tick
        loop {
            interval.tick().await;
            pruning_registry.prune_idle(session_idle_timeout).await;
        }
    });

    let app = api_routes(AppState {
        controller,
        registry,
        classifier,
        store,
    });

    // ── Serve ────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", server_config.http_port))
        .await
        .with_context(|| format!("failed to bind port {}", server_config.http_port))?;
    tracing::info!(port = server_config.http_port, "Alumni Assist API started");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
