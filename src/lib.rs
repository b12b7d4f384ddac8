//! Pipegraph
//!
//! An embedded, in-memory property graph with a lazy, Gremlin-style
//! traversal pipeline.
//!
//! # Architecture
//!
//! - [`graph`]: vertex and edge arenas, property values, predicate matching
//! - [`query`]: steps, the step registry, program transformers and aliases,
//!   the pull-based interpreter and the chainable [`Query`] builder
//! - [`persistence`]: JSON snapshots stored in memory or in RocksDB
//! - [`config`]: YAML-loadable settings
//!
//! Queries are evaluated lazily: nothing runs until [`Query::run`], and a
//! `take(n)` at the end of a pipeline stops all upstream work once `n`
//! results are out.
//!
//! ## Example Usage
//!
//! ```rust
//! use pipegraph::graph::{props, EdgeRecord, GraphStore, VertexRecord};
//! use pipegraph::QueryEngine;
//!
//! let graph = GraphStore::from_records(
//!     vec![
//!         VertexRecord::with_id(1).property("name", "alice"),
//!         VertexRecord::with_id(2).property("name", "bob"),
//!         VertexRecord::with_id(3).property("name", "carol"),
//!     ],
//!     vec![
//!         EdgeRecord::new(1, 2, "knows"),
//!         EdgeRecord::new(2, 3, "knows"),
//!     ],
//! );
//!
//! let engine = QueryEngine::new();
//! let names = engine
//!     .v(&graph, props([("name", "alice".into())]))
//!     .out("knows")
//!     .out("knows")
//!     .property("name")
//!     .run();
//!
//! assert_eq!(names.len(), 1);
//! assert_eq!(names[0].as_property().and_then(|p| p.as_string()), Some("carol"));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod graph;
pub mod persistence;
pub mod query;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, DbConfig};
pub use error::{GraphError, GraphResult, PropertyRejection};
pub use graph::{
    Edge, EdgeFilter, EdgeId, EdgeLabel, EdgeRecord, GraphStore, PropertyMap, PropertyValue,
    Vertex, VertexId, VertexRecord, VertexSelector,
};
pub use persistence::{
    GraphSnapshot, KeyValueStore, MemoryStore, PersistenceError, PersistenceManager,
    PersistenceResult, RocksDbStore, StorageError, StorageResult,
};
pub use query::{Arg, Gremlin, Pipetype, Query, QueryEngine, Signal, Step, StepState, Value};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
