mod ai;
mod auth;
mod config;
mod errors;
mod matching;
mod models;
mod notify;
mod profile;
mod routes;
mod scoring;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai::{AiAnalyzer, LlmAnalyzer, LlmClient};
use crate::config::{AiConfig, Config};
use crate::matching::{CandidateRanking, MatchingEngine};
use crate::notify::TracingNotifier;
use crate::routes::build_router;
use crate::scoring::{AiMode, AssistedScorer, CompatibilityScorer, ScoringProfile};
use crate::state::AppState;
use crate::store::{MatchStore, PgMatchStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATSBoost API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let store: Arc<dyn MatchStore> = Arc::new(
        PgMatchStore::connect(&config.database_url, config.database_max_connections).await?,
    );

    // Initialize the optional AI analyzer
    let analyzer = build_analyzer(config.ai.as_ref())?;
    let ai_timeout = config.ai.as_ref().map(|ai| ai.timeout).unwrap_or_default();

    // Premium batch matching asks the analyzer for every sub-score;
    // recruiter ranking only uses it to fill gaps in sparse profiles.
    let batch_scorer = Arc::new(assisted_scorer(
        ScoringProfile::premium(),
        analyzer.clone(),
        AiMode::FullAnalysis,
        ai_timeout,
    ));
    let ranking_scorer = Arc::new(assisted_scorer(
        ScoringProfile::basic(),
        analyzer,
        AiMode::Enrichment,
        ai_timeout,
    ));

    let engine = Arc::new(MatchingEngine::new(
        store.clone(),
        batch_scorer,
        Arc::new(TracingNotifier),
        config.matching,
    ));
    let ranking = Arc::new(CandidateRanking::new(
        store.clone(),
        ranking_scorer,
        config.matching.min_ats_score,
    ));
    info!(
        min_ats_score = config.matching.min_ats_score,
        match_threshold = config.matching.match_threshold,
        concurrency = config.matching.concurrency,
        "Matching configured"
    );

    // Build app state
    let state = AppState {
        store,
        engine,
        ranking,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn assisted_scorer(
    profile: ScoringProfile,
    analyzer: Option<Arc<dyn AiAnalyzer>>,
    mode: AiMode,
    ai_timeout: Duration,
) -> AssistedScorer {
    let scorer = CompatibilityScorer::new(profile);
    match analyzer {
        Some(analyzer) => AssistedScorer::with_analyzer(scorer, analyzer, mode, ai_timeout),
        None => AssistedScorer::deterministic(scorer),
    }
}

/// Constructs the LLM-backed analyzer, or `None` when AI is disabled.
fn build_analyzer(ai: Option<&AiConfig>) -> Result<Option<Arc<dyn AiAnalyzer>>> {
    let Some(ai) = ai else {
        info!("AI assistance disabled; scoring is deterministic");
        return Ok(None);
    };

    let client = LlmClient::new(ai.provider, ai.api_key.clone(), ai.model.clone())?;
    info!(
        "LLM client initialized (provider: {}, model: {})",
        client.provider().as_str(),
        client.model()
    );
    let analyzer: Arc<dyn AiAnalyzer> = Arc::new(LlmAnalyzer(client));
    Ok(Some(analyzer))
}
