//! In-memory graph storage implementation
//!
//! Vertices live in an insertion-ordered arena keyed by id, edges in a plain
//! arena addressed by [`EdgeIndex`]. Incident edge lists on each vertex hold
//! indices into the edge arena, so there are no reference cycles.

use super::edge::{Edge, EdgeRecord, EDGE_RESERVED_KEYS};
use super::predicate::object_filter;
use super::property::PropertyMap;
use super::types::{EdgeIndex, VertexId};
use super::vertex::{Vertex, VertexRecord, VERTEX_RESERVED_KEYS};
use crate::error::{Endpoint, GraphError, GraphResult, PropertyRejection};
use indexmap::IndexMap;

/// How `find_vertices` picks its vertices
#[derive(Debug, Clone, PartialEq, Default)]
pub enum VertexSelector {
    /// Every vertex, in insertion order
    #[default]
    All,
    /// The listed ids in the requested order; unknown ids are dropped
    Ids(Vec<VertexId>),
    /// Vertices whose properties are a superset of the filter
    Filter(PropertyMap),
}

impl From<u64> for VertexSelector {
    fn from(id: u64) -> Self {
        VertexSelector::Ids(vec![VertexId::new(id)])
    }
}

impl From<VertexId> for VertexSelector {
    fn from(id: VertexId) -> Self {
        VertexSelector::Ids(vec![id])
    }
}

impl From<Vec<u64>> for VertexSelector {
    fn from(ids: Vec<u64>) -> Self {
        VertexSelector::Ids(ids.into_iter().map(VertexId::new).collect())
    }
}

impl<const N: usize> From<[u64; N]> for VertexSelector {
    fn from(ids: [u64; N]) -> Self {
        VertexSelector::Ids(ids.into_iter().map(VertexId::new).collect())
    }
}

impl From<Vec<VertexId>> for VertexSelector {
    fn from(ids: Vec<VertexId>) -> Self {
        VertexSelector::Ids(ids)
    }
}

impl From<PropertyMap> for VertexSelector {
    fn from(filter: PropertyMap) -> Self {
        VertexSelector::Filter(filter)
    }
}

/// In-memory graph storage
#[derive(Debug)]
pub struct GraphStore {
    /// Vertex arena, iteration order is insertion order
    vertices: IndexMap<VertexId, Vertex>,

    /// Edge arena, in insertion order
    edges: Vec<Edge>,

    /// Next candidate for an auto-assigned vertex id
    next_vertex_id: u64,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        GraphStore {
            vertices: IndexMap::new(),
            edges: Vec::new(),
            next_vertex_id: 1,
        }
    }

    /// Build a store from vertex and edge records.
    ///
    /// Rejected elements are reported and skipped; use [`GraphStore::load`]
    /// to inspect them.
    pub fn from_records(
        vertices: impl IntoIterator<Item = VertexRecord>,
        edges: impl IntoIterator<Item = EdgeRecord>,
    ) -> Self {
        let mut store = Self::new();
        store.load(vertices, edges);
        store
    }

    /// Insert vertices then edges, in sequence order.
    ///
    /// A failing element does not stop the remaining insertions. The errors
    /// of all rejected elements are returned in encounter order.
    pub fn load(
        &mut self,
        vertices: impl IntoIterator<Item = VertexRecord>,
        edges: impl IntoIterator<Item = EdgeRecord>,
    ) -> Vec<GraphError> {
        let mut rejected = Vec::new();
        for record in vertices {
            if let Err(e) = self.add_vertex(record) {
                rejected.push(e);
            }
        }
        for record in edges {
            if let Err(e) = self.add_edge(record) {
                rejected.push(e);
            }
        }
        rejected
    }

    /// Add a vertex, assigning an id when the record has none
    pub fn add_vertex(&mut self, record: VertexRecord) -> GraphResult<VertexId> {
        if let Some(id) = record.id.filter(|id| self.has_vertex(*id)) {
            return Err(GraphError::DuplicateVertexId(id).report());
        }
        check_properties(&record.properties, VERTEX_RESERVED_KEYS)?;
        let id = match record.id {
            Some(id) => id,
            None => self.allocate_vertex_id(),
        };

        self.vertices.insert(id, Vertex::new(id, record.properties));
        Ok(id)
    }

    fn allocate_vertex_id(&mut self) -> VertexId {
        // Skip ids already claimed by caller-supplied vertices
        while self.vertices.contains_key(&VertexId::new(self.next_vertex_id)) {
            self.next_vertex_id += 1;
        }
        let id = VertexId::new(self.next_vertex_id);
        self.next_vertex_id += 1;
        id
    }

    /// Add an edge between two existing vertices
    pub fn add_edge(&mut self, record: EdgeRecord) -> GraphResult<EdgeIndex> {
        if !self.has_vertex(record.source) {
            return Err(GraphError::DanglingEdgeEndpoint {
                endpoint: Endpoint::Source,
                id: record.source,
            }
            .report());
        }
        if !self.has_vertex(record.target) {
            return Err(GraphError::DanglingEdgeEndpoint {
                endpoint: Endpoint::Target,
                id: record.target,
            }
            .report());
        }
        check_properties(&record.properties, EDGE_RESERVED_KEYS)?;

        let idx = EdgeIndex(self.edges.len());
        if let Some(source) = self.vertices.get_mut(&record.source) {
            source.out_edges.push(idx);
        }
        if let Some(target) = self.vertices.get_mut(&record.target) {
            target.in_edges.push(idx);
        }

        self.edges.push(Edge {
            id: record.id,
            source: record.source,
            target: record.target,
            label: record.label,
            properties: record.properties,
        });
        Ok(idx)
    }

    pub fn find_vertex_by_id(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    pub fn has_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// Resolve a selector to vertices
    pub fn find_vertices(&self, selector: &VertexSelector) -> Vec<&Vertex> {
        match selector {
            VertexSelector::All => self.vertices.values().collect(),
            VertexSelector::Ids(ids) => self.find_vertices_by_ids(ids),
            VertexSelector::Filter(filter) => self
                .vertices
                .values()
                .filter(|v| object_filter(&v.properties, filter))
                .collect(),
        }
    }

    fn find_vertices_by_ids(&self, ids: &[VertexId]) -> Vec<&Vertex> {
        if let [id] = ids {
            return self.find_vertex_by_id(*id).into_iter().collect();
        }
        ids.iter().filter_map(|id| self.find_vertex_by_id(*id)).collect()
    }

    /// Outgoing edges of a vertex, in insertion order
    pub fn find_out_edges<'a>(&self, vertex: &'a Vertex) -> &'a [EdgeIndex] {
        vertex.out_edges()
    }

    /// Incoming edges of a vertex, in insertion order
    pub fn find_in_edges<'a>(&self, vertex: &'a Vertex) -> &'a [EdgeIndex] {
        vertex.in_edges()
    }

    pub fn edge(&self, idx: EdgeIndex) -> Option<&Edge> {
        self.edges.get(idx.as_usize())
    }

    /// All vertices in insertion order
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// All edges in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Records that rebuild this store when fed to [`GraphStore::from_records`]
    pub fn to_records(&self) -> (Vec<VertexRecord>, Vec<EdgeRecord>) {
        (
            self.vertices.values().map(Vertex::to_record).collect(),
            self.edges.iter().map(Edge::to_record).collect(),
        )
    }
}

/// Refuse keys that would collide with a record's snapshot fields and
/// floats that JSON turns into `null`
fn check_properties(properties: &PropertyMap, reserved: &[&str]) -> GraphResult<()> {
    for (key, value) in properties {
        let reason = if reserved.contains(&key.as_str()) {
            PropertyRejection::ReservedKey
        } else if !value.is_finite() {
            PropertyRejection::NonFiniteFloat
        } else {
            continue;
        };
        return Err(GraphError::InvalidProperty {
            key: key.clone(),
            reason,
        }
        .report());
    }
    Ok(())
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::property::{props, PropertyValue};

    fn people() -> GraphStore {
        GraphStore::from_records(
            vec![
                VertexRecord::with_id(1).property("name", "alice"),
                VertexRecord::with_id(2).property("name", "bob"),
                VertexRecord::with_id(3).property("name", "carol"),
            ],
            vec![EdgeRecord::new(1, 2, "knows"), EdgeRecord::new(2, 3, "knows")],
        )
    }

    #[test]
    fn test_add_and_find_vertex() {
        let mut store = GraphStore::new();
        let id = store.add_vertex(VertexRecord::new().property("name", "alice")).unwrap();

        let vertex = store.find_vertex_by_id(id).unwrap();
        assert_eq!(vertex.id, id);
        assert_eq!(vertex.get_property("name").unwrap().as_string(), Some("alice"));
    }

    #[test]
    fn test_auto_ids_are_monotonic() {
        let mut store = GraphStore::new();
        let a = store.add_vertex(VertexRecord::new()).unwrap();
        let b = store.add_vertex(VertexRecord::new()).unwrap();
        assert_eq!(a, VertexId::new(1));
        assert_eq!(b, VertexId::new(2));
    }

    #[test]
    fn test_auto_ids_skip_claimed_ids() {
        let mut store = GraphStore::new();
        store.add_vertex(VertexRecord::with_id(1)).unwrap();
        store.add_vertex(VertexRecord::with_id(2)).unwrap();

        let auto = store.add_vertex(VertexRecord::new()).unwrap();
        assert_eq!(auto, VertexId::new(3));
        assert_eq!(store.vertex_count(), 3);
    }

    #[test]
    fn test_duplicate_vertex_id() {
        let mut store = GraphStore::new();
        let id = store.add_vertex(VertexRecord::with_id(7).property("name", "first")).unwrap();

        let result = store.add_vertex(VertexRecord::with_id(7).property("name", "second"));
        assert_eq!(result, Err(GraphError::DuplicateVertexId(id)));
        assert_eq!(store.vertex_count(), 1);
        assert_eq!(
            store.find_vertex_by_id(id).unwrap().get_property("name").unwrap().as_string(),
            Some("first")
        );
    }

    #[test]
    fn test_reserved_property_keys_rejected() {
        let mut store = people();

        let result = store.add_vertex(VertexRecord::with_id(9).property("_id", "legacy"));
        assert_eq!(
            result,
            Err(GraphError::InvalidProperty {
                key: "_id".to_string(),
                reason: PropertyRejection::ReservedKey,
            })
        );
        assert!(store.find_vertex_by_id(VertexId::new(9)).is_none());

        // only `_id` is reserved on vertices
        assert!(store.add_vertex(VertexRecord::with_id(9).property("_label", "ok")).is_ok());

        for key in EDGE_RESERVED_KEYS {
            let result = store.add_edge(EdgeRecord::new(1, 3, "knows").property(*key, 1i64));
            assert!(matches!(result, Err(GraphError::InvalidProperty { .. })));
        }
        assert_eq!(store.edge_count(), 2);
        let alice = store.find_vertex_by_id(VertexId::new(1)).unwrap();
        assert_eq!(alice.out_edges().len(), 1);
    }

    #[test]
    fn test_non_finite_floats_rejected() {
        let mut store = people();

        let result = store.add_vertex(VertexRecord::new().property("score", f64::NAN));
        assert_eq!(
            result,
            Err(GraphError::InvalidProperty {
                key: "score".to_string(),
                reason: PropertyRejection::NonFiniteFloat,
            })
        );
        assert_eq!(store.vertex_count(), 3);

        let result = store.add_edge(
            EdgeRecord::new(1, 3, "knows")
                .property("weights", vec![PropertyValue::Float(f64::INFINITY)]),
        );
        assert!(matches!(
            result,
            Err(GraphError::InvalidProperty { reason: PropertyRejection::NonFiniteFloat, .. })
        ));
        assert_eq!(store.edge_count(), 2);

        // a rejected vertex does not use up an auto id
        assert_eq!(store.add_vertex(VertexRecord::new()).unwrap(), VertexId::new(4));
    }

    #[test]
    fn test_edge_incidence() {
        let store = people();
        let alice = store.find_vertex_by_id(VertexId::new(1)).unwrap();
        let bob = store.find_vertex_by_id(VertexId::new(2)).unwrap();
        let carol = store.find_vertex_by_id(VertexId::new(3)).unwrap();

        assert_eq!(store.find_out_edges(alice), &[EdgeIndex(0)]);
        assert!(store.find_in_edges(alice).is_empty());
        assert_eq!(store.find_in_edges(bob), &[EdgeIndex(0)]);
        assert_eq!(store.find_out_edges(bob), &[EdgeIndex(1)]);
        assert_eq!(store.find_in_edges(carol), &[EdgeIndex(1)]);
        assert_eq!(store.edge_count(), 2);

        let edge = store.edge(EdgeIndex(1)).unwrap();
        assert_eq!(edge.source, VertexId::new(2));
        assert_eq!(edge.target, VertexId::new(3));
    }

    #[test]
    fn test_dangling_edge_rejected() {
        let mut store = people();

        let result = store.add_edge(EdgeRecord::new(1, 99, "knows"));
        assert_eq!(
            result,
            Err(GraphError::DanglingEdgeEndpoint {
                endpoint: Endpoint::Target,
                id: VertexId::new(99),
            })
        );

        let result = store.add_edge(EdgeRecord::new(42, 1, "knows"));
        assert_eq!(
            result,
            Err(GraphError::DanglingEdgeEndpoint {
                endpoint: Endpoint::Source,
                id: VertexId::new(42),
            })
        );

        let alice = store.find_vertex_by_id(VertexId::new(1)).unwrap();
        assert_eq!(alice.out_edges().len(), 1);
        assert!(alice.in_edges().is_empty());
        assert_eq!(store.edge_count(), 2);
    }

    #[test]
    fn test_load_continues_after_failures() {
        let mut store = GraphStore::new();
        let rejected = store.load(
            vec![
                VertexRecord::with_id(1),
                VertexRecord::with_id(1),
                VertexRecord::with_id(2),
            ],
            vec![
                EdgeRecord::new(1, 5, "x"),
                EdgeRecord::new(1, 2, "y"),
            ],
        );

        assert_eq!(rejected.len(), 2);
        assert!(rejected.iter().all(GraphError::is_structural));
        assert_eq!(store.vertex_count(), 2);
        assert_eq!(store.edge_count(), 1);
    }

    #[test]
    fn test_find_vertices_all_in_insertion_order() {
        let store = people();
        let ids: Vec<u64> = store
            .find_vertices(&VertexSelector::All)
            .iter()
            .map(|v| v.id.as_u64())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_find_vertices_by_ids() {
        let store = people();

        let ids: Vec<u64> = store
            .find_vertices(&VertexSelector::from(vec![3, 99, 1]))
            .iter()
            .map(|v| v.id.as_u64())
            .collect();
        assert_eq!(ids, vec![3, 1]);

        assert_eq!(store.find_vertices(&VertexSelector::from(2)).len(), 1);
        assert!(store.find_vertices(&VertexSelector::from(99)).is_empty());
    }

    #[test]
    fn test_find_vertices_by_filter() {
        let store = people();
        let found = store.find_vertices(&VertexSelector::Filter(props([("name", "bob".into())])));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, VertexId::new(2));

        let everyone = store.find_vertices(&VertexSelector::Filter(PropertyMap::new()));
        assert_eq!(everyone.len(), 3);
    }

    #[test]
    fn test_to_records_round_trip() {
        let store = people();
        let (vertices, edges) = store.to_records();
        let copy = GraphStore::from_records(vertices, edges);

        assert_eq!(copy.vertex_count(), 3);
        assert_eq!(copy.edge_count(), 2);
        assert_eq!(copy.edges()[0].label.as_str(), "knows");
    }
}
