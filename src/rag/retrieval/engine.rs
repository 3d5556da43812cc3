// Retrieval engine: similarity search over the indexed contract fragments
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::embedding::Embedder;
use crate::errors::{RagError, Result};
use crate::vector_db::{QueryResult, VectorSearch};

/// Search parameters for retrieval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Maximum number of results to retrieve
    pub top_k: u64,
    /// Minimum similarity score, inclusive
    pub threshold: f32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            top_k: 3,
            threshold: 0.1,
        }
    }
}

/// Retrieved document with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub id: String,
    pub content: String,
    pub score: f32,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl RetrievedDocument {
    /// Document with content and metadata only, as produced by fakes and tests
    pub fn new(content: impl Into<String>, metadata: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            id: String::new(),
            content: content.into(),
            score: 1.0,
            metadata,
        }
    }
}

impl From<QueryResult> for RetrievedDocument {
    fn from(result: QueryResult) -> Self {
        Self {
            id: result.id,
            content: result.document,
            score: result.score,
            metadata: result.metadata,
        }
    }
}

/// Given a query, return ranked documents
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedDocument>>;
}

/// Retrieval engine for semantic search
pub struct RetrievalEngine {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorSearch>,
    collection: String,
    params: SearchParams,
}

impl std::fmt::Debug for RetrievalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalEngine")
            .field("collection", &self.collection)
            .field("params", &self.params)
            .finish()
    }
}

impl RetrievalEngine {
    /// Create retrieval engine after checking the collection exists.
    ///
    /// The collection is never created here; a missing one is reported as
    /// [`RagError::CollectionNotFound`].
    pub async fn connect(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorSearch>,
        collection: &str,
        params: SearchParams,
    ) -> Result<Self> {
        if !store.collection_exists(collection).await? {
            return Err(RagError::CollectionNotFound {
                collection: collection.to_string(),
            });
        }

        Ok(Self {
            embedder,
            store,
            collection: collection.to_string(),
            params,
        })
    }

    /// Get search parameters
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Get collection name
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[async_trait]
impl Retriever for RetrievalEngine {
    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedDocument>> {
        let embedding = self.embedder.embed_query(query).await?;

        let results = self
            .store
            .query(&self.collection, &embedding, self.params.top_k, self.params.threshold)
            .await?;

        let documents = rank(results, &self.params);
        debug!(
            collection = %self.collection,
            retrieved = documents.len(),
            "Retrieved documents"
        );
        Ok(documents)
    }
}

/// Order by score descending, drop anything under the threshold and keep top_k
fn rank(results: Vec<QueryResult>, params: &SearchParams) -> Vec<RetrievedDocument> {
    let mut documents: Vec<RetrievedDocument> = results
        .into_iter()
        .filter(|r| r.score >= params.threshold)
        .map(RetrievedDocument::from)
        .collect();

    documents.sort_by(|a, b| b.score.total_cmp(&a.score));
    documents.truncate(params.top_k as usize);
    documents
}
