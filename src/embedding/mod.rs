//! Query embeddings
//!
//! The collection is indexed offline with a fixed model and dimensionality;
//! queries must be embedded with the same pair or similarity scores are
//! meaningless.

pub mod client;

pub use client::OpenAIEmbeddings;

use async_trait::async_trait;

use crate::errors::Result;

/// Turns query text into a dense vector
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
}
