//! Query processing module
//!
//! Gremlin-style traversal pipelines:
//! - [`step`]: programs as lists of named steps with arguments
//! - [`pipetype`]: the step library and its per-run state
//! - [`registry`] / [`transform`] / [`alias`]: step lookup and program rewriting
//! - [`interpreter`]: lazy, backtracking execution
//! - [`builder`]: the chainable [`Query`] surface
//!
//! The [`QueryEngine`] owns the step registry and the transformer chain, so
//! several engines with different vocabularies can run over the same graph.

pub mod alias;
pub mod builder;
pub mod gremlin;
pub mod interpreter;
pub mod pipetype;
pub mod registry;
pub mod step;
pub mod transform;
pub mod value;

// Re-export main types
pub use alias::Alias;
pub use builder::Query;
pub use gremlin::Gremlin;
pub use interpreter::Interpreter;
pub use pipetype::{PassThrough, Pipetype, Signal, StepState};
pub use registry::PipetypeRegistry;
pub use step::{Arg, Program, Step, VertexPredicate};
pub use transform::TransformerChain;
pub use value::Value;

use crate::config::DbConfig;
use crate::error::GraphResult;
use crate::graph::{GraphStore, VertexSelector};
use tracing::debug;

/// Query engine - owns the step vocabulary and runs programs
#[derive(Debug, Clone)]
pub struct QueryEngine {
    pipetypes: PipetypeRegistry,
    transformers: TransformerChain,
    aliases: Vec<Alias>,
    alias_priority: i32,
}

impl QueryEngine {
    /// Create an engine with the built-in steps and no aliases
    pub fn new() -> Self {
        Self::with_config(&DbConfig::default())
    }

    pub fn with_config(config: &DbConfig) -> Self {
        QueryEngine {
            pipetypes: PipetypeRegistry::with_builtins(),
            transformers: TransformerChain::new(),
            aliases: Vec::new(),
            alias_priority: config.alias_priority,
        }
    }

    /// Install the family-tree aliases (`parents`, `children`,
    /// `grandparents`, `siblings`, `cousins`)
    pub fn with_kinship_aliases(mut self) -> GraphResult<Self> {
        for (name, expansion) in alias::kinship_aliases() {
            self.add_alias(name, expansion)?;
        }
        Ok(self)
    }

    /// Register a step implementation under `name`, replacing any previous one
    pub fn register_pipetype(&mut self, name: impl Into<String>, pipetype: impl Pipetype + 'static) {
        self.pipetypes.register(name, pipetype);
    }

    /// Add a program rewrite. Higher priority runs first.
    pub fn add_transformer<F>(&mut self, priority: i32, f: F)
    where
        F: Fn(Program) -> Program + Send + Sync + 'static,
    {
        self.transformers.add(priority, f);
    }

    /// Define `name` as shorthand for `expansion`.
    ///
    /// Aliases already defined are expanded inside `expansion` right away, so
    /// later aliases can be built from earlier ones.
    pub fn add_alias(&mut self, name: impl Into<String>, expansion: Vec<Step>) -> GraphResult<()> {
        let expansion = alias::inline_aliases(expansion, &self.aliases);
        let alias = Alias::new(name, expansion)?;
        debug!(alias = alias.name(), steps = alias.expansion().len(), "alias defined");

        let rewrite = alias.clone();
        self.transformers
            .add(self.alias_priority, move |program| rewrite.rewrite(program));
        self.pipetypes.register(alias.name(), PassThrough);
        self.aliases.push(alias);
        Ok(())
    }

    /// Start a query over `graph`
    pub fn query<'a>(&'a self, graph: &'a GraphStore) -> Query<'a> {
        Query::new(graph, self)
    }

    /// Start a query with a `vertex` step
    pub fn v<'a>(&'a self, graph: &'a GraphStore, selector: impl Into<VertexSelector>) -> Query<'a> {
        self.query(graph).vertex(selector)
    }

    /// Transform `program` and run it, returning the raw tokens
    pub fn execute(&self, graph: &GraphStore, program: &Program) -> Vec<Gremlin> {
        let transformed = self.transformers.run(program);
        debug!(
            steps = program.len(),
            transformed = transformed.len(),
            "executing program"
        );
        Interpreter::new(graph, &self.pipetypes).run(&transformed)
    }

    pub fn pipetypes(&self) -> &PipetypeRegistry {
        &self.pipetypes
    }

    pub fn transformers(&self) -> &TransformerChain {
        &self.transformers
    }

    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::graph::{props, EdgeRecord, VertexId, VertexRecord};

    fn people() -> GraphStore {
        GraphStore::from_records(
            vec![
                VertexRecord::with_id(1).property("name", "alice"),
                VertexRecord::with_id(2).property("name", "bob"),
                VertexRecord::with_id(3).property("name", "carol"),
            ],
            vec![
                EdgeRecord::new(1, 2, "knows"),
                EdgeRecord::new(2, 3, "knows"),
            ],
        )
    }

    fn names(values: &[Value]) -> Vec<String> {
        values
            .iter()
            .filter_map(|v| v.as_property().and_then(|p| p.as_string()).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_query_engine_creation() {
        let engine = QueryEngine::new();
        assert!(engine.transformers().is_empty());
        assert!(engine.pipetypes().contains("vertex"));
        assert!(engine.aliases().is_empty());
    }

    #[test]
    fn test_friend_of_friend() {
        let graph = people();
        let engine = QueryEngine::new();

        let alice = props([("name", "alice".into())]);
        let results = engine
            .v(&graph, alice)
            .out("knows")
            .out("knows")
            .property("name")
            .run();
        assert_eq!(names(&results), vec!["carol"]);
    }

    #[test]
    fn test_single_hop_by_id() {
        let graph = people();
        let engine = QueryEngine::new();

        let results = engine.v(&graph, 1).out("knows").run();
        assert!(results.iter().any(|v| v.vertex_id() == Some(VertexId::new(2))));
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_run_is_repeatable() {
        let graph = people();
        let engine = QueryEngine::new();
        let query = engine.v(&graph, VertexSelector::All).out("knows").unique().take(5);

        let first = query.run();
        let second = query.run();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_take_and_unique_bounds() {
        let graph = people();
        let engine = QueryEngine::new();

        assert!(engine.v(&graph, VertexSelector::All).take(0).run().is_empty());
        assert_eq!(engine.v(&graph, VertexSelector::All).take(2).run().len(), 2);

        let results = engine
            .v(&graph, VertexSelector::All)
            .merge(Vec::<String>::new())
            .run();
        assert!(results.is_empty());

        let repeated = engine.v(&graph, vec![1, 1, 2, 1]).unique().run();
        let mut ids: Vec<_> = repeated.iter().filter_map(Value::vertex_id).collect();
        ids.sort();
        assert_eq!(ids, vec![VertexId::new(1), VertexId::new(2)]);
    }

    #[test]
    fn test_grandparents_alias() {
        // parent edges point from child to parent
        let graph = GraphStore::from_records(
            vec![
                VertexRecord::with_id(1).property("name", "kid"),
                VertexRecord::with_id(2).property("name", "mum"),
                VertexRecord::with_id(3).property("name", "grandma"),
            ],
            vec![EdgeRecord::new(1, 2, "parent"), EdgeRecord::new(2, 3, "parent")],
        );
        let engine = QueryEngine::new().with_kinship_aliases().unwrap();

        let results = engine
            .v(&graph, 1)
            .step("grandparents", Vec::new())
            .property("name")
            .run();
        assert_eq!(names(&results), vec!["grandma"]);
    }

    #[test]
    fn test_alias_rejections() {
        let mut engine = QueryEngine::new();
        assert!(matches!(
            engine.add_alias("", vec![Step::named("out")]),
            Err(GraphError::InvalidTransformer(_))
        ));
        assert!(matches!(
            engine.add_alias("nothing", Vec::new()),
            Err(GraphError::InvalidTransformer(_))
        ));
        assert!(engine.transformers().is_empty());
        assert!(!engine.pipetypes().contains("nothing"));
    }

    #[test]
    fn test_custom_pipetype_and_transformer() {
        let graph = people();
        let mut engine = QueryEngine::new();
        engine.register_pipetype("named", |g: &GraphStore, _: &[Arg], input: Option<crate::query::Gremlin>, _: &mut StepState| {
            match input {
                Some(gremlin) => {
                    let named = g
                        .find_vertex_by_id(gremlin.vertex())
                        .is_some_and(|v| v.has_property("name"));
                    if named {
                        Signal::Emit(gremlin)
                    } else {
                        Signal::Pull
                    }
                }
                None => Signal::Pull,
            }
        });
        // drop every `take` step
        engine.add_transformer(10, |program: Program| {
            program.into_iter().filter(|s| s.name != "take").collect()
        });

        let results = engine
            .v(&graph, VertexSelector::All)
            .step("named", Vec::new())
            .take(1)
            .run();
        assert_eq!(results.len(), 3);
    }
}
