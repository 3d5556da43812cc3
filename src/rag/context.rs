// Context builder: renders retrieved fragments for the prompt
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rag::retrieval::RetrievedDocument;

/// Marker used when a fragment carries no page metadata
pub const PAGE_NOT_AVAILABLE: &str = "N/A";

/// Metadata key holding the source page
pub const PAGE_METADATA_KEY: &str = "page";

/// Width of the `=` banner preceding the fragment listing
const SEPARATOR_WIDTH: usize = 50;

/// Assembled context for prompt augmentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledContext {
    /// The formatted context text
    pub text: String,
    /// Number of fragment blocks rendered
    pub document_count: usize,
}

impl AssembledContext {
    /// True when no fragment passed retrieval
    pub fn is_empty(&self) -> bool {
        self.document_count == 0
    }
}

/// Render documents in retrieval order, numbered from 1.
///
/// Pure rendering: nothing is reordered, deduplicated or truncated.
pub fn format_documents(documents: &[RetrievedDocument]) -> AssembledContext {
    let blocks: Vec<String> = documents
        .iter()
        .enumerate()
        .map(|(idx, doc)| format_document(idx + 1, doc))
        .collect();

    let text = format!("\n{}\n{}", "=".repeat(SEPARATOR_WIDTH), blocks.join("\n"));

    AssembledContext {
        text,
        document_count: blocks.len(),
    }
}

/// Format a single fragment block
fn format_document(index: usize, doc: &RetrievedDocument) -> String {
    format!(
        "[Fragmento {} - Página {}]\nContenido: {}\n",
        index,
        page_label(doc),
        doc.content
    )
}

/// Page metadata as display text; absent or null falls back to the marker
pub fn page_label(doc: &RetrievedDocument) -> String {
    match doc.metadata.get(PAGE_METADATA_KEY) {
        None | Some(Value::Null) => PAGE_NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
