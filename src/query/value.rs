//! Query results

use super::gremlin::Gremlin;
use crate::graph::{GraphStore, PropertyValue, Vertex, VertexId};
use serde::Serialize;

/// One query result: the vertex a token ended on, or the value it was
/// projected to by a `property` step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value<'g> {
    Vertex(#[serde(serialize_with = "serialize_vertex")] &'g Vertex),
    Property(PropertyValue),
}

fn serialize_vertex<S: serde::Serializer>(vertex: &&Vertex, serializer: S) -> Result<S::Ok, S::Error> {
    vertex.to_record().serialize(serializer)
}

impl<'g> Value<'g> {
    /// Project a finished token. `None` if it sits on a vertex the graph
    /// does not hold.
    pub fn project(graph: &'g GraphStore, gremlin: &Gremlin) -> Option<Self> {
        match gremlin.result() {
            Some(value) => Some(Value::Property(value.clone())),
            None => graph.find_vertex_by_id(gremlin.vertex()).map(Value::Vertex),
        }
    }

    pub fn as_vertex(&self) -> Option<&'g Vertex> {
        match self {
            Value::Vertex(v) => Some(v),
            Value::Property(_) => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyValue> {
        match self {
            Value::Property(p) => Some(p),
            Value::Vertex(_) => None,
        }
    }

    pub fn vertex_id(&self) -> Option<VertexId> {
        self.as_vertex().map(|v| v.id)
    }

    pub fn is_vertex(&self) -> bool {
        matches!(self, Value::Vertex(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::VertexRecord;

    #[test]
    fn test_projection() {
        let graph = GraphStore::from_records(vec![VertexRecord::with_id(1).property("name", "alice")], vec![]);

        let on_vertex = Value::project(&graph, &Gremlin::new(VertexId::new(1))).unwrap();
        assert!(on_vertex.is_vertex());
        assert_eq!(on_vertex.vertex_id(), Some(VertexId::new(1)));

        let mut named = Gremlin::new(VertexId::new(1));
        named.set_result("alice".into());
        let projected = Value::project(&graph, &named).unwrap();
        assert_eq!(projected.as_property(), Some(&PropertyValue::from("alice")));
        assert_eq!(projected.vertex_id(), None);

        assert!(Value::project(&graph, &Gremlin::new(VertexId::new(9))).is_none());
    }

    #[test]
    fn test_serialize() {
        let graph = GraphStore::from_records(vec![VertexRecord::with_id(1).property("name", "alice")], vec![]);
        let value = Value::project(&graph, &Gremlin::new(VertexId::new(1))).unwrap();
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["_id"], 1);
        assert_eq!(json["name"], "alice");

        let json = serde_json::to_value(Value::Property(PropertyValue::Integer(3))).unwrap();
        assert_eq!(json, serde_json::json!(3));
    }
}
