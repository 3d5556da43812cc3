//! Error types for rag-chain
//!
//! Construction-time failures (configuration, missing collection) and
//! per-request failures (vector store, embeddings, model) share one enum so
//! the service boundary can render any of them as answer text.

use thiserror::Error;

/// Main error type for the retrieval/generation service
#[derive(Error, Debug)]
pub enum RagError {
    /// Required environment variables are missing or empty
    #[error("Missing required environment variables: {}. Configure your .env file.", .missing.join(", "))]
    MissingEnvironment { missing: Vec<String> },

    /// Invalid settings value or settings file
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The indexed collection has not been created yet
    #[error("Collection '{collection}' does not exist in Qdrant. Create and index the documents with the offline indexing step first.")]
    CollectionNotFound { collection: String },

    /// Qdrant request errors
    #[error("Vector store error: {0}")]
    VectorStoreError(String),

    /// Embedding API errors
    #[error("Embedding API error: {0}")]
    EmbeddingError(String),

    /// Chat completion API errors
    #[error("Language model API error: {0}")]
    LlmError(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

impl RagError {
    /// True for failures detected while assembling the pipeline
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RagError::MissingEnvironment { .. }
                | RagError::ConfigError(_)
                | RagError::CollectionNotFound { .. }
        )
    }
}

/// Result type alias for rag-chain operations
pub type Result<T> = std::result::Result<T, RagError>;

/// Convert anyhow errors to RagError
impl From<anyhow::Error> for RagError {
    fn from(err: anyhow::Error) -> Self {
        RagError::Generic(format!("{:#}", err))
    }
}

impl From<qdrant_client::QdrantError> for RagError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        RagError::VectorStoreError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_environment_lists_every_name() {
        let err = RagError::MissingEnvironment {
            missing: vec!["QDRANT_URL".to_string(), "QDRANT_API_KEY".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("QDRANT_URL"));
        assert!(msg.contains("QDRANT_API_KEY"));
        assert!(!msg.contains("OPENAI_API_KEY"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_collection_not_found_message() {
        let err = RagError::CollectionNotFound {
            collection: "contrato_arriendo_pablo".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("contrato_arriendo_pablo"));
        assert!(msg.contains("does not exist"));
        assert!(msg.contains("indexing"));
    }

    #[test]
    fn test_runtime_errors_are_not_configuration() {
        assert!(!RagError::LlmError("timeout".to_string()).is_configuration());
        assert!(!RagError::VectorStoreError("down".to_string()).is_configuration());
    }

    #[test]
    fn test_anyhow_conversion_keeps_context() {
        let err: RagError = anyhow::anyhow!("inner").context("outer").into();
        assert_eq!(err.to_string(), "outer: inner");
    }
}
