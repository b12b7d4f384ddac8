//! Fluent query construction
//!
//! ```
//! use pipegraph::graph::{EdgeRecord, GraphStore, VertexRecord};
//! use pipegraph::query::QueryEngine;
//!
//! let graph = GraphStore::from_records(
//!     vec![
//!         VertexRecord::with_id(1).property("name", "alice"),
//!         VertexRecord::with_id(2).property("name", "bob"),
//!     ],
//!     vec![EdgeRecord::new(1, 2, "knows")],
//! );
//! let engine = QueryEngine::new();
//!
//! let names = engine.v(&graph, 1).out("knows").property("name").run();
//! assert_eq!(names[0].as_property().and_then(|p| p.as_string()), Some("bob"));
//! ```

use super::step::{edge_filter_args, selector_args, Arg, Program, Step, VertexPredicate};
use super::value::Value;
use super::QueryEngine;
use crate::graph::{EdgeFilter, GraphStore, PropertyMap, Vertex, VertexSelector};
use crate::query::gremlin::Gremlin;

/// A program under construction, bound to a graph and an engine.
///
/// Every method appends one step and returns the query for chaining.
/// Nothing is evaluated until [`Query::run`].
#[derive(Debug, Clone)]
pub struct Query<'a> {
    graph: &'a GraphStore,
    engine: &'a QueryEngine,
    program: Program,
}

impl<'a> Query<'a> {
    pub(crate) fn new(graph: &'a GraphStore, engine: &'a QueryEngine) -> Self {
        Query {
            graph,
            engine,
            program: Program::new(),
        }
    }

    /// Append a step by name. Used for user-registered steps and aliases.
    pub fn step(mut self, name: impl Into<String>, args: Vec<Arg>) -> Self {
        self.program.push(Step::new(name, args));
        self
    }

    pub fn vertex(self, selector: impl Into<VertexSelector>) -> Self {
        self.step("vertex", selector_args(selector.into()))
    }

    /// Shorthand for [`vertex`](Self::vertex)
    pub fn v(self, selector: impl Into<VertexSelector>) -> Self {
        self.vertex(selector)
    }

    pub fn out(self, filter: impl Into<EdgeFilter>) -> Self {
        self.step("out", edge_filter_args(filter.into()))
    }

    pub fn in_(self, filter: impl Into<EdgeFilter>) -> Self {
        self.step("in", edge_filter_args(filter.into()))
    }

    pub fn property(self, name: impl Into<String>) -> Self {
        self.step("property", vec![Arg::Name(name.into())])
    }

    pub fn unique(self) -> Self {
        self.step("unique", Vec::new())
    }

    /// Keep tokens whose vertex satisfies `predicate`
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&Vertex, &Gremlin) -> bool + Send + Sync + 'static,
    {
        self.step("filter", vec![Arg::Predicate(VertexPredicate::new(predicate))])
    }

    /// Keep tokens whose vertex properties contain `filter`
    pub fn filter_props(self, filter: PropertyMap) -> Self {
        self.step("filter", vec![Arg::Filter(filter)])
    }

    pub fn take(self, n: usize) -> Self {
        self.step("take", vec![Arg::Count(n)])
    }

    pub fn as_(self, name: impl Into<String>) -> Self {
        self.step("as", vec![Arg::Name(name.into())])
    }

    pub fn merge<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = names.into_iter().map(|n| Arg::Name(n.into())).collect();
        self.step("merge", args)
    }

    pub fn except(self, name: impl Into<String>) -> Self {
        self.step("except", vec![Arg::Name(name.into())])
    }

    pub fn back(self, name: impl Into<String>) -> Self {
        self.step("back", vec![Arg::Name(name.into())])
    }

    /// The steps appended so far, before any transformation
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Transform and execute the program. Can be called repeatedly; every
    /// run starts from scratch and yields the same results.
    pub fn run(&self) -> Vec<Value<'a>> {
        self.engine
            .execute(self.graph, &self.program)
            .iter()
            .filter_map(|gremlin| Value::project(self.graph, gremlin))
            .collect()
    }
}
