// Vector Database Manager - remote Qdrant integration
use async_trait::async_trait;
use qdrant_client::{
    qdrant::{value::Kind, PointId, ScoredPoint, SearchPointsBuilder, Value as QdrantValue},
    Qdrant,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::vector_db::VectorSearch;

/// Payload key holding the fragment text
pub const CONTENT_PAYLOAD_KEY: &str = "page_content";

/// Payload key holding the nested metadata object
pub const METADATA_PAYLOAD_KEY: &str = "metadata";

/// Qdrant's HTTP port; the client needs the gRPC one (6334)
const REST_PORT_SUFFIX: &str = ":6333";

/// Vector database manager backed by a remote Qdrant instance
pub struct VectorDBManager {
    client: Qdrant,
    url: String,
}

/// Query result from vector search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub id: String,
    pub score: f32,
    pub document: String,
    pub metadata: Map<String, JsonValue>,
}

impl VectorDBManager {
    /// Connect to Qdrant. No request is made until the first call.
    pub fn connect(url: &str, api_key: &str) -> Result<Self> {
        if looks_like_rest_port(url) {
            warn!(
                url,
                "QDRANT_URL points at the REST port; qdrant-client uses gRPC, usually on 6334"
            );
        }

        let client = Qdrant::from_url(url)
            .api_key(api_key.to_string())
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Get Qdrant URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn looks_like_rest_port(url: &str) -> bool {
    url.trim_end_matches('/').ends_with(REST_PORT_SUFFIX)
}

#[async_trait]
impl VectorSearch for VectorDBManager {
    async fn collection_exists(&self, collection: &str) -> Result<bool> {
        let exists = self.client.collection_exists(collection).await?;
        debug!(collection, exists, "Checked collection");
        Ok(exists)
    }

    async fn query(
        &self,
        collection: &str,
        query_embedding: &[f32],
        limit: u64,
        threshold: f32,
    ) -> Result<Vec<QueryResult>> {
        let search_result = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, query_embedding.to_vec(), limit)
                    .score_threshold(threshold)
                    .with_payload(true),
            )
            .await?;

        Ok(search_result
            .result
            .into_iter()
            .map(scored_point_to_result)
            .collect())
    }
}

/// Split a scored point into text and metadata following the
/// `page_content` / `metadata` payload layout of the indexer
fn scored_point_to_result(point: ScoredPoint) -> QueryResult {
    let payload = point.payload;

    let document = payload
        .get(CONTENT_PAYLOAD_KEY)
        .and_then(qdrant_value_to_string)
        .unwrap_or_default();

    let metadata = match payload.get(METADATA_PAYLOAD_KEY).and_then(qdrant_to_json_value) {
        Some(JsonValue::Object(map)) => map,
        _ => Map::new(),
    };

    QueryResult {
        id: point_id_to_string(&point.id),
        score: point.score,
        document,
        metadata,
    }
}

// Helper functions for type conversions
fn qdrant_to_json_value(value: &QdrantValue) -> Option<JsonValue> {
    value.kind.as_ref().and_then(|kind| match kind {
        Kind::NullValue(_) => Some(JsonValue::Null),
        Kind::StringValue(s) => Some(JsonValue::String(s.clone())),
        Kind::IntegerValue(i) => Some(JsonValue::Number((*i).into())),
        Kind::DoubleValue(f) => serde_json::Number::from_f64(*f).map(JsonValue::Number),
        Kind::BoolValue(b) => Some(JsonValue::Bool(*b)),
        Kind::StructValue(s) => Some(JsonValue::Object(fields_to_json(&s.fields))),
        Kind::ListValue(list) => Some(JsonValue::Array(
            list.values.iter().filter_map(qdrant_to_json_value).collect(),
        )),
    })
}

fn fields_to_json(fields: &HashMap<String, QdrantValue>) -> Map<String, JsonValue> {
    fields
        .iter()
        .filter_map(|(k, v)| qdrant_to_json_value(v).map(|j| (k.clone(), j)))
        .collect()
}

fn qdrant_value_to_string(value: &QdrantValue) -> Option<String> {
    match value.kind.as_ref()? {
        Kind::StringValue(s) => Some(s.clone()),
        _ => None,
    }
}

fn point_id_to_string(point_id: &Option<PointId>) -> String {
    point_id.as_ref().map(|id| {
        use qdrant_client::qdrant::point_id::PointIdOptions;
        match &id.point_id_options {
            Some(PointIdOptions::Num(n)) => n.to_string(),
            Some(PointIdOptions::Uuid(u)) => u.clone(),
            None => "unknown".to_string(),
        }
    }).unwrap_or_else(|| "unknown".to_string())
}
