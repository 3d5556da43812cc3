//! In-process stand-ins for Qdrant, the embeddings API and the chat model

#![allow(dead_code)]

use async_trait::async_trait;
use rag_chain::config::{validate_environment, StaticSecrets};
use rag_chain::config::{OPENAI_API_KEY, QDRANT_API_KEY, QDRANT_URL};
use rag_chain::embedding::Embedder;
use rag_chain::llm::ChatModel;
use rag_chain::rag::{ContractPipeline, RetrievalEngine, SearchParams};
use rag_chain::service::PipelineBuilder;
use rag_chain::vector_db::{QueryResult, VectorSearch};
use rag_chain::{RagError, Result};
use serde_json::{json, Map};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const COLLECTION: &str = "contrato_arriendo_pablo";

pub fn full_secrets() -> StaticSecrets {
    StaticSecrets::new()
        .with(OPENAI_API_KEY, "sk-test")
        .with(QDRANT_URL, "http://localhost:6334")
        .with(QDRANT_API_KEY, "qd-test")
}

pub fn fragment(id: &str, score: f32, content: &str, page: Option<i64>) -> QueryResult {
    let mut metadata = Map::new();
    if let Some(page) = page {
        metadata.insert("page".to_string(), json!(page));
    }
    QueryResult {
        id: id.to_string(),
        score,
        document: content.to_string(),
        metadata,
    }
}

pub struct FakeEmbedder;

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed_query(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![0.25; 512])
    }
}

/// Vector store with a switchable collection and call counters
#[derive(Default)]
pub struct FakeStore {
    pub collection_present: AtomicBool,
    pub results: Mutex<Vec<QueryResult>>,
    pub exists_checks: AtomicUsize,
    pub queries: AtomicUsize,
}

impl FakeStore {
    pub fn with_collection(results: Vec<QueryResult>) -> Arc<Self> {
        let store = FakeStore::default();
        store.collection_present.store(true, Ordering::SeqCst);
        *store.results.lock().unwrap() = results;
        Arc::new(store)
    }

    pub fn without_collection() -> Arc<Self> {
        Arc::new(FakeStore::default())
    }
}

#[async_trait]
impl VectorSearch for FakeStore {
    async fn collection_exists(&self, _collection: &str) -> Result<bool> {
        self.exists_checks.fetch_add(1, Ordering::SeqCst);
        Ok(self.collection_present.load(Ordering::SeqCst))
    }

    async fn query(
        &self,
        _collection: &str,
        _query_embedding: &[f32],
        _limit: u64,
        _threshold: f32,
    ) -> Result<Vec<QueryResult>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.lock().unwrap().clone())
    }
}

/// Chat model that records prompts and can be told to fail
#[derive(Default)]
pub struct FakeModel {
    pub prompts: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

impl FakeModel {
    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for FakeModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(RagError::LlmError("HTTP 503 Service Unavailable: overloaded".to_string()));
        }
        Ok("Según el contrato analizado: la renta mensual es de 15 UF (Página 2).".to_string())
    }
}

/// Production-shaped builder: validates secrets, checks the collection
/// through the real retrieval engine, then wires the fakes together
pub struct FakeBuilder {
    pub secrets: Arc<StaticSecrets>,
    pub store: Arc<FakeStore>,
    pub model: Arc<FakeModel>,
    pub builds: Arc<AtomicUsize>,
    pub delay: Duration,
    pub refuse_on_empty_context: bool,
}

impl FakeBuilder {
    pub fn new(secrets: Arc<StaticSecrets>, store: Arc<FakeStore>, model: Arc<FakeModel>) -> Self {
        Self {
            secrets,
            store,
            model,
            builds: Arc::new(AtomicUsize::new(0)),
            delay: Duration::ZERO,
            refuse_on_empty_context: false,
        }
    }
}

#[async_trait]
impl PipelineBuilder for FakeBuilder {
    async fn build(&self) -> Result<ContractPipeline> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        validate_environment(self.secrets.as_ref())?;

        let retriever = RetrievalEngine::connect(
            Arc::new(FakeEmbedder),
            self.store.clone(),
            COLLECTION,
            SearchParams::default(),
        )
        .await?;

        Ok(ContractPipeline::new(Arc::new(retriever), self.model.clone())
            .refuse_on_empty_context(self.refuse_on_empty_context))
    }
}
