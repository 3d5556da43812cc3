//! HTTP service boundary
//!
//! Exposes the lazily built pipeline over `POST /rag_chain` (and its JSON
//! envelope at `/rag_chain/invoke`) plus a `GET /health` probe.

pub mod routes;
pub mod state;

pub use routes::{router, serve, InvokeRequest, InvokeResponse, HEALTH_PATH, INVOKE_PATH, QUERY_PATH};
pub use state::{
    DefaultPipelineBuilder, HealthReport, HealthStatus, InitState, PipelineBuilder, ServiceState,
    PROCESSING_ERROR_PREFIX, UNAVAILABLE_PREFIX,
};
