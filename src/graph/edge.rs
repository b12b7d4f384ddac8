//! Edge implementation for the property graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, EdgeLabel, VertexId};
use serde::{Deserialize, Serialize};

/// Traversal direction along an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Follow edges from source to target
    Out,
    /// Follow edges from target back to source
    In,
}

/// A directed, labeled edge owned by a [`GraphStore`](super::GraphStore)
#[derive(Debug, Clone)]
pub struct Edge {
    /// Optional caller-supplied identifier
    pub id: Option<EdgeId>,

    /// Vertex the edge leaves
    pub source: VertexId,

    /// Vertex the edge points at
    pub target: VertexId,

    pub label: EdgeLabel,

    pub properties: PropertyMap,
}

impl Edge {
    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// The endpoint reached when walking this edge in `direction`
    pub fn far_end(&self, direction: Direction) -> VertexId {
        match direction {
            Direction::Out => self.target,
            Direction::In => self.source,
        }
    }

    pub fn to_record(&self) -> EdgeRecord {
        EdgeRecord {
            id: self.id,
            label: self.label.clone(),
            source: self.source,
            target: self.target,
            properties: self.properties.clone(),
        }
    }
}

/// Snapshot field names an edge property may not use
pub const EDGE_RESERVED_KEYS: &[&str] = &["_id", "_label", "_out", "_in"];

/// Input shape for [`GraphStore::add_edge`](super::GraphStore::add_edge)
///
/// Endpoints are vertex ids, which is also how edges are serialized:
/// `{"_label": "knows", "_out": 1, "_in": 2, ...properties}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EdgeId>,

    #[serde(rename = "_label")]
    pub label: EdgeLabel,

    /// Source vertex (the edge goes out of it)
    #[serde(rename = "_out")]
    pub source: VertexId,

    /// Target vertex (the edge comes in to it)
    #[serde(rename = "_in")]
    pub target: VertexId,

    #[serde(flatten)]
    pub properties: PropertyMap,
}

impl EdgeRecord {
    pub fn new(
        source: impl Into<VertexId>,
        target: impl Into<VertexId>,
        label: impl Into<EdgeLabel>,
    ) -> Self {
        EdgeRecord {
            id: None,
            label: label.into(),
            source: source.into(),
            target: target.into(),
            properties: PropertyMap::new(),
        }
    }

    pub fn id(mut self, id: impl Into<EdgeId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}
