use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::Config;
use crate::models::SessionContext;
use crate::services::{
    llm::{LlmClient, OpenRouterClient},
    search::{DuckDuckGoBackend, JsonSearchBackend, SearchBackend, SearchClient},
    Pipeline,
};

const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
    pub pipeline: Arc<Pipeline>,
    /// Parent of every per-request cancellation token
    pub shutdown: CancellationToken,
    /// Idle time after which a session is swept
    pub session_ttl: Duration,
}

/// Inner state that can be modified
pub struct AppStateInner {
    pub sessions: HashMap<Uuid, SessionContext>,
}

impl AppState {
    /// Creates state with no sessions around the given pipeline
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                sessions: HashMap::new(),
            })),
            pipeline: Arc::new(pipeline),
            shutdown: CancellationToken::new(),
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Drops sessions idle for longer than the TTL, returning how many went
    pub async fn sweep_expired_sessions(&self) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(self.session_ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_sub_signed(ttl))
        else {
            return 0;
        };

        let mut inner = self.inner.write().await;
        let before = inner.sessions.len();
        inner.sessions.retain(|_, session| !session.idle_since(cutoff));
        let removed = before - inner.sessions.len();

        if removed > 0 {
            tracing::info!(
                removed,
                remaining = inner.sessions.len(),
                "Swept expired sessions"
            );
        }
        removed
    }

    /// Sweeps expired sessions every `interval` until shutdown
    pub fn spawn_session_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = state.shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        state.sweep_expired_sessions().await;
                    }
                }
            }
        })
    }

    /// Wires the production LLM and search clients from configuration
    pub fn from_config(config: &Config) -> Self {
        let llm: Arc<dyn LlmClient> = Arc::new(OpenRouterClient::new(
            config.openrouter_api_key.clone(),
            config.llm_api_url.clone(),
            config.llm_model.clone(),
            config.llm_temperature,
        ));

        let backend: Arc<dyn SearchBackend> = match config.search_backend.as_str() {
            "json" => Arc::new(JsonSearchBackend::new(
                config.search_api_url.clone(),
                config.search_api_key.clone(),
            )),
            _ => Arc::new(DuckDuckGoBackend::new(config.search_api_url.clone())),
        };

        tracing::info!(
            llm = llm.name(),
            search = backend.name(),
            result_cap = config.search_result_cap,
            max_attempts = config.search_max_attempts,
            "Initialized external clients"
        );

        let search = SearchClient::new(
            backend,
            config.retry_policy(),
            config.search_result_cap,
            config.call_timeout(),
        );

        Self::new(Pipeline::new(
            llm,
            search,
            config.call_timeout(),
            config.fallback_enabled,
        ))
        .with_session_ttl(config.session_ttl())
    }
}
