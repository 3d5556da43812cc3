// RAG (Retrieval-Augmented Generation) pipeline
//
// Answers questions about the lease contract strictly from fragments
// retrieved out of the vector store.
//
// Components:
// - Retrieval Engine: similarity search with fixed top-k and score threshold
// - Context: numbered fragment listing with source pages
// - Prompt: fixed instruction template with context and question slots
// - Pipeline: end-to-end orchestration and production wiring

pub mod retrieval;
pub mod context;
pub mod prompt;
pub mod pipeline;

// Re-export key types
pub use retrieval::{RetrievalEngine, RetrievedDocument, Retriever, SearchParams};
pub use context::{format_documents, AssembledContext};
pub use prompt::{PromptPayload, REFUSAL_PHRASE};
pub use pipeline::{build_contract_pipeline, ContractPipeline};
