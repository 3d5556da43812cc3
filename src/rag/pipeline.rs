// End-to-end pipeline: retrieve -> format -> prompt -> generate
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{validate_environment, SecretSource, Settings};
use crate::embedding::OpenAIEmbeddings;
use crate::errors::Result;
use crate::llm::{ChatModel, OpenAIChat};
use crate::rag::context::{format_documents, AssembledContext};
use crate::rag::prompt::{render, PromptPayload, REFUSAL_PHRASE};
use crate::rag::retrieval::{RetrievalEngine, Retriever, SearchParams};
use crate::vector_db::VectorDBManager;

/// Fully wired question-answering pipeline
pub struct ContractPipeline {
    retriever: Arc<dyn Retriever>,
    model: Arc<dyn ChatModel>,
    refuse_on_empty_context: bool,
}

impl ContractPipeline {
    /// Assemble from already-built stages
    pub fn new(retriever: Arc<dyn Retriever>, model: Arc<dyn ChatModel>) -> Self {
        Self {
            retriever,
            model,
            refuse_on_empty_context: false,
        }
    }

    /// Answer with the refusal phrase, skipping the model, when retrieval
    /// finds nothing
    pub fn refuse_on_empty_context(mut self, refuse: bool) -> Self {
        self.refuse_on_empty_context = refuse;
        self
    }

    /// Run every stage for one question. Errors from any stage propagate
    /// unchanged; nothing is retried.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let documents = self.retriever.retrieve(question).await?;
        let context = format_documents(&documents);

        if context.is_empty() && self.refuse_on_empty_context {
            debug!("No fragments passed the score threshold, refusing");
            return Ok(REFUSAL_PHRASE.to_string());
        }

        let prompt = build_prompt(&context, question);
        let answer = self.model.complete(&prompt).await?;

        info!(
            question_chars = question.chars().count(),
            fragments = context.document_count,
            answer_chars = answer.chars().count(),
            "Answered query"
        );
        Ok(answer)
    }
}

/// Fill the template from a formatted context and the raw question
pub fn build_prompt(context: &AssembledContext, question: &str) -> String {
    render(&PromptPayload {
        context: context.text.clone(),
        question: question.to_string(),
    })
}

/// Build the production pipeline: validate the environment, connect to
/// Qdrant, verify the collection and create the OpenAI clients.
pub async fn build_contract_pipeline(
    settings: &Settings,
    secrets: &dyn SecretSource,
) -> Result<ContractPipeline> {
    secrets.refresh();
    let credentials = validate_environment(secrets)?;
    settings.validate()?;

    let timeout = Duration::from_secs(settings.request_timeout_secs);

    let embeddings = OpenAIEmbeddings::new(
        &settings.openai_base_url,
        &credentials.openai_api_key,
        &settings.embedding_model,
        settings.embedding_dimensions,
        timeout,
    )?;

    let chat = OpenAIChat::with_config(
        &settings.openai_base_url,
        &credentials.openai_api_key,
        &settings.chat_model,
        settings.temperature,
        timeout,
    )?;

    let store = VectorDBManager::connect(&credentials.qdrant_url, &credentials.qdrant_api_key)?;

    let retriever = RetrievalEngine::connect(
        Arc::new(embeddings),
        Arc::new(store),
        &settings.collection,
        SearchParams {
            top_k: settings.top_k,
            threshold: settings.score_threshold,
        },
    )
    .await?;

    info!(
        collection = %settings.collection,
        chat_model = %settings.chat_model,
        embedding_model = %settings.embedding_model,
        "Contract pipeline assembled"
    );

    Ok(ContractPipeline::new(Arc::new(retriever), Arc::new(chat))
        .refuse_on_empty_context(settings.refuse_on_empty_context))
}
