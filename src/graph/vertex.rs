//! Vertex implementation for the property graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeIndex, VertexId};
use serde::{Deserialize, Serialize};

/// A vertex owned by a [`GraphStore`](super::GraphStore)
///
/// Incident edges are kept as arena indices, in insertion order.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// Unique identifier for this vertex
    pub id: VertexId,

    /// Properties associated with this vertex
    pub properties: PropertyMap,

    /// Edges pointing at this vertex
    pub(crate) in_edges: Vec<EdgeIndex>,

    /// Edges leaving this vertex
    pub(crate) out_edges: Vec<EdgeIndex>,
}

impl Vertex {
    pub(crate) fn new(id: VertexId, properties: PropertyMap) -> Self {
        Vertex {
            id,
            properties,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        }
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Incoming edges, oldest first
    pub fn in_edges(&self) -> &[EdgeIndex] {
        &self.in_edges
    }

    /// Outgoing edges, oldest first
    pub fn out_edges(&self) -> &[EdgeIndex] {
        &self.out_edges
    }

    /// Convert back into the record it could be rebuilt from
    pub fn to_record(&self) -> VertexRecord {
        VertexRecord {
            id: Some(self.id),
            properties: self.properties.clone(),
        }
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vertex {}

impl std::hash::Hash for Vertex {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Snapshot field names a vertex property may not use
pub const VERTEX_RESERVED_KEYS: &[&str] = &["_id"];

/// Input shape for [`GraphStore::add_vertex`](super::GraphStore::add_vertex)
///
/// Also the serialized form of a vertex: properties are flattened next to an
/// optional `_id` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    /// Caller-supplied id; the store assigns one when absent
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<VertexId>,

    #[serde(flatten)]
    pub properties: PropertyMap,
}

impl VertexRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: impl Into<VertexId>) -> Self {
        VertexRecord {
            id: Some(id.into()),
            properties: PropertyMap::new(),
        }
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}
