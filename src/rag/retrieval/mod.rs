pub mod engine;

pub use engine::{RetrievalEngine, RetrievedDocument, Retriever, SearchParams};
