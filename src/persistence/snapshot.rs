//! JSON snapshot codec
//!
//! A snapshot is an object with two arrays, `"V"` holding vertex records and
//! `"E"` holding edge records. Edge endpoints are vertex ids, so the graph
//! is rebuilt by replaying the records in order.

use crate::graph::{EdgeRecord, GraphStore, VertexRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(rename = "V", alias = "v", default)]
    pub vertices: Vec<VertexRecord>,
    #[serde(rename = "E", alias = "e", default)]
    pub edges: Vec<EdgeRecord>,
}

impl GraphSnapshot {
    pub fn capture(graph: &GraphStore) -> Self {
        let (vertices, edges) = graph.to_records();
        GraphSnapshot { vertices, edges }
    }

    /// Rebuild a graph; rejected records are reported and skipped
    pub fn restore(self) -> GraphStore {
        GraphStore::from_records(self.vertices, self.edges)
    }
}

impl GraphStore {
    /// Serialize the whole graph to a JSON snapshot
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&GraphSnapshot::capture(self))
    }

    /// Parse a JSON snapshot back into a graph
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let snapshot: GraphSnapshot = serde_json::from_str(json)?;
        Ok(snapshot.restore())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{PropertyValue, VertexId};

    fn family() -> GraphStore {
        GraphStore::from_records(
            vec![
                VertexRecord::with_id(1).property("name", "kid").property("age", 7i64),
                VertexRecord::with_id(2).property("name", "mum"),
            ],
            vec![EdgeRecord::new(1, 2, "parent").property("since", 2017i64)],
        )
    }

    #[test]
    fn test_snapshot_shape() {
        let json: serde_json::Value = serde_json::from_str(&family().to_json().unwrap()).unwrap();

        assert_eq!(json["V"][0]["_id"], 1);
        assert_eq!(json["V"][0]["name"], "kid");
        assert_eq!(json["E"][0]["_out"], 1);
        assert_eq!(json["E"][0]["_in"], 2);
        assert_eq!(json["E"][0]["_label"], "parent");
        assert_eq!(json["E"][0]["since"], 2017);
    }

    #[test]
    fn test_snapshot_restores_graph() {
        let original = family();
        let restored = GraphStore::from_json(&original.to_json().unwrap()).unwrap();

        assert_eq!(restored.vertex_count(), 2);
        assert_eq!(restored.edge_count(), 1);
        let kid = restored.find_vertex_by_id(VertexId::new(1)).unwrap();
        assert_eq!(kid.get_property("age"), Some(&PropertyValue::Integer(7)));
        assert_eq!(restored.find_out_edges(kid).len(), 1);
        assert_eq!(restored.to_records(), original.to_records());
    }

    #[test]
    fn test_lowercase_keys_and_missing_sections() {
        let graph = GraphStore::from_json(r#"{"v":[{"_id":4,"name":"solo"}]}"#).unwrap();
        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.edge_count(), 0);

        assert!(GraphStore::from_json("not json").is_err());
    }

    #[test]
    fn test_colliding_properties_never_reach_a_snapshot() {
        let mut graph = GraphStore::new();
        let rejected = graph.load(
            vec![
                VertexRecord::with_id(1).property("_id", "legacy"),
                VertexRecord::with_id(2).property("name", "kept"),
                VertexRecord::with_id(3).property("score", f64::NAN),
            ],
            vec![
                EdgeRecord::new(2, 2, "self").property("_label", "x"),
                EdgeRecord::new(2, 2, "self").property("weight", 0.5),
            ],
        );
        assert_eq!(rejected.len(), 3);

        let restored = GraphStore::from_json(&graph.to_json().unwrap()).unwrap();
        assert_eq!(restored.vertex_count(), 1);
        assert_eq!(restored.edge_count(), 1);
        assert_eq!(restored.to_records(), graph.to_records());
    }

    #[test]
    fn test_dangling_edges_are_skipped() {
        let graph = GraphStore::from_json(r#"{"V":[{"_id":1}],"E":[{"_label":"x","_out":1,"_in":9}]}"#).unwrap();
        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }
}
