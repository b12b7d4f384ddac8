//! Core graph store
//!
//! Property graph data model: vertices with open property bags, directed
//! labeled edges with properties, arena storage with index-based adjacency.

pub mod edge;
pub mod predicate;
pub mod property;
pub mod store;
pub mod types;
pub mod vertex;

// Re-export main types
pub use edge::{Direction, Edge, EdgeRecord};
pub use predicate::{object_filter, EdgeFilter};
pub use property::{props, PropertyMap, PropertyValue};
pub use store::{GraphStore, VertexSelector};
pub use types::{EdgeId, EdgeIndex, EdgeLabel, VertexId};
pub use vertex::{Vertex, VertexRecord};
