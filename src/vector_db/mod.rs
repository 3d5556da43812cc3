// Vector store access for the pre-indexed contract collection
pub mod manager;

pub use manager::{QueryResult, VectorDBManager, CONTENT_PAYLOAD_KEY, METADATA_PAYLOAD_KEY};

use async_trait::async_trait;

use crate::errors::Result;

/// Read-only similarity search over named collections
#[async_trait]
pub trait VectorSearch: Send + Sync {
    /// Whether the named collection exists
    async fn collection_exists(&self, collection: &str) -> Result<bool>;

    /// Nearest neighbours of `query_embedding`, best first, at most `limit`,
    /// none scoring below `threshold`
    async fn query(
        &self,
        collection: &str,
        query_embedding: &[f32],
        limit: u64,
        threshold: f32,
    ) -> Result<Vec<QueryResult>>;
}
