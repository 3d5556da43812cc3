//! Language model access

pub mod client;

pub use client::OpenAIChat;

use async_trait::async_trait;

use crate::errors::Result;

/// Single-turn text generation
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one user message and return the generated text
    async fn complete(&self, prompt: &str) -> Result<String>;
}
