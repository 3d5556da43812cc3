//! rag-chain - Lease Contract Question Answering
//!
//! Answers natural-language questions about a lease contract using only
//! fragments retrieved from a pre-built Qdrant collection, with an OpenAI
//! chat model writing the grounded answer.
//!
//! # Architecture
//!
//! - **config / errors**: settings, required secrets, error taxonomy
//! - **embedding / vector_db / llm**: clients for the external collaborators
//! - **rag**: retrieve → format → prompt → generate
//! - **service**: lazy construction with degraded mode, HTTP routes

pub mod errors;
pub mod config;
pub mod cli;

// Re-export commonly used types
pub use errors::{RagError, Result};

// External collaborators
pub mod embedding;
pub mod vector_db;
pub mod llm;

// Retrieval-augmented generation
pub mod rag;

// HTTP boundary
pub mod service;
