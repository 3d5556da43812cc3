//! Lazy pipeline construction with degraded-mode reporting
//!
//! States and transitions:
//! - Uninitialized → Ready     (first construction succeeds)
//! - Uninitialized → Degraded  (first construction fails, error text kept)
//! - Degraded      → Ready     (a later attempt succeeds, error cleared)
//! - Degraded      → Degraded  (a later attempt fails, error overwritten)
//! - Ready is terminal; per-call failures never leave it.
//!
//! The lock is held across a construction attempt, so concurrent cold
//! requests share one attempt instead of racing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::{SecretSource, Settings};
use crate::errors::Result;
use crate::rag::{build_contract_pipeline, ContractPipeline};

/// Prefix for answers given while the pipeline cannot be built
pub const UNAVAILABLE_PREFIX: &str = "Service unavailable: ";

/// Prefix for answers whose query failed at runtime
pub const PROCESSING_ERROR_PREFIX: &str = "Error processing the query: ";

/// Fallback when degraded without a recorded reason
const UNKNOWN_INIT_ERROR: &str = "unknown error initializing the pipeline";

/// Produces a ready pipeline or the reason it cannot
#[async_trait]
pub trait PipelineBuilder: Send + Sync {
    async fn build(&self) -> Result<ContractPipeline>;
}

/// Builds the Qdrant + OpenAI pipeline from settings and live secrets
pub struct DefaultPipelineBuilder {
    settings: Settings,
    secrets: Arc<dyn SecretSource>,
}

impl DefaultPipelineBuilder {
    pub fn new(settings: Settings, secrets: Arc<dyn SecretSource>) -> Self {
        Self { settings, secrets }
    }
}

#[async_trait]
impl PipelineBuilder for DefaultPipelineBuilder {
    async fn build(&self) -> Result<ContractPipeline> {
        build_contract_pipeline(&self.settings, self.secrets.as_ref()).await
    }
}

/// Pipeline lifecycle
#[derive(Clone)]
pub enum InitState {
    Uninitialized,
    Ready(Arc<ContractPipeline>),
    Degraded(String),
}

impl InitState {
    fn name(&self) -> &'static str {
        match self {
            InitState::Uninitialized => "uninitialized",
            InitState::Ready(_) => "ready",
            InitState::Degraded(_) => "degraded",
        }
    }
}

impl std::fmt::Debug for InitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitState::Degraded(reason) => f.debug_tuple("Degraded").field(reason).finish(),
            other => f.write_str(other.name()),
        }
    }
}

/// Health probe status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

/// Health probe body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub error: Option<String>,
}

/// Shared service context injected into request handlers
pub struct ServiceState {
    builder: Box<dyn PipelineBuilder>,
    state: Mutex<InitState>,
    attempts: AtomicU64,
    /// Attempts that have completed, success or failure
    finished: AtomicU64,
}

impl ServiceState {
    pub fn new(builder: impl PipelineBuilder + 'static) -> Self {
        Self {
            builder: Box::new(builder),
            state: Mutex::new(InitState::Uninitialized),
            attempts: AtomicU64::new(0),
            finished: AtomicU64::new(0),
        }
    }

    /// Return the cached pipeline, building it if none is cached yet.
    /// On failure the error text is recorded and returned.
    ///
    /// A caller that queued behind an attempt takes that attempt's outcome
    /// instead of starting another one.
    pub async fn ensure_ready(&self) -> std::result::Result<Arc<ContractPipeline>, String> {
        let seen = self.finished.load(Ordering::SeqCst);
        let mut state = self.state.lock().await;

        match &*state {
            InitState::Ready(pipeline) => return Ok(Arc::clone(pipeline)),
            InitState::Degraded(reason) if self.finished.load(Ordering::SeqCst) > seen => {
                return Err(reason.clone());
            }
            _ => {}
        }

        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        info!(attempt, from = state.name(), "Building contract pipeline");

        let outcome = self.builder.build().await;
        self.finished.fetch_add(1, Ordering::SeqCst);

        match outcome {
            Ok(pipeline) => {
                let pipeline = Arc::new(pipeline);
                *state = InitState::Ready(Arc::clone(&pipeline));
                info!(attempt, "Contract pipeline ready");
                Ok(pipeline)
            }
            Err(err) => {
                let reason = err.to_string();
                warn!(attempt, error = %reason, "Contract pipeline unavailable");
                *state = InitState::Degraded(reason.clone());
                Err(reason)
            }
        }
    }

    /// Answer one question. Always yields text: the grounded answer, or a
    /// prefixed message for degraded and runtime-failure cases.
    pub async fn invoke(&self, question: &str) -> String {
        let pipeline = match self.ensure_ready().await {
            Ok(pipeline) => pipeline,
            Err(reason) => {
                let reason = if reason.is_empty() {
                    UNKNOWN_INIT_ERROR.to_string()
                } else {
                    reason
                };
                return format!("{}{}", UNAVAILABLE_PREFIX, reason);
            }
        };

        match pipeline.answer(question).await {
            Ok(answer) => answer,
            Err(err) => {
                error!(error = %err, "Query failed");
                format!("{}{}", PROCESSING_ERROR_PREFIX, err)
            }
        }
    }

    /// Probe: attempts construction like a query, then reports the state
    pub async fn health(&self) -> HealthReport {
        match self.ensure_ready().await {
            Ok(_) => HealthReport {
                status: HealthStatus::Ok,
                error: None,
            },
            Err(reason) => HealthReport {
                status: HealthStatus::Degraded,
                error: Some(reason),
            },
        }
    }

    /// Current lifecycle state
    pub async fn snapshot(&self) -> InitState {
        self.state.lock().await.clone()
    }

    /// Number of construction attempts so far
    pub fn construction_attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }
}
