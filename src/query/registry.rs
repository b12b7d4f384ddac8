//! Step registry: step name to pipetype

use super::pipetype::{
    AsStep, BackStep, ExceptStep, FilterStep, MergeStep, PassThrough, Pipetype, PropertyStep,
    TakeStep, Traversal, UniqueStep, VertexStep,
};
use crate::error::{GraphError, GraphResult};
use crate::graph::Direction;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// Names of the built-in steps
pub const BUILTIN_STEPS: [&str; 11] = [
    "vertex", "out", "in", "property", "unique", "filter", "take", "as", "merge", "except", "back",
];

/// Maps step names to their implementations.
///
/// Owned by a [`QueryEngine`](super::QueryEngine); there is no process-wide
/// registry, so separate engines can carry different step sets.
#[derive(Clone)]
pub struct PipetypeRegistry {
    pipetypes: FxHashMap<String, Arc<dyn Pipetype>>,
    fallback: Arc<dyn Pipetype>,
}

impl PipetypeRegistry {
    /// An empty registry
    pub fn new() -> Self {
        PipetypeRegistry {
            pipetypes: FxHashMap::default(),
            fallback: Arc::new(PassThrough),
        }
    }

    /// A registry holding the built-in step library
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("vertex", VertexStep);
        registry.register("out", Traversal::new(Direction::Out));
        registry.register("in", Traversal::new(Direction::In));
        registry.register("property", PropertyStep);
        registry.register("unique", UniqueStep);
        registry.register("filter", FilterStep);
        registry.register("take", TakeStep);
        registry.register("as", AsStep);
        registry.register("merge", MergeStep);
        registry.register("except", ExceptStep);
        registry.register("back", BackStep);
        registry
    }

    /// Register a step, replacing any previous one under the same name
    pub fn register(&mut self, name: impl Into<String>, pipetype: impl Pipetype + 'static) {
        self.pipetypes.insert(name.into(), Arc::new(pipetype));
    }

    pub fn get(&self, name: &str) -> GraphResult<Arc<dyn Pipetype>> {
        self.pipetypes
            .get(name)
            .cloned()
            .ok_or_else(|| GraphError::UnknownStep(name.to_string()).report())
    }

    /// Like [`get`](Self::get), but an unknown name degrades to a
    /// pass-through step instead of failing the run
    pub fn resolve(&self, name: &str) -> Arc<dyn Pipetype> {
        self.get(name).unwrap_or_else(|_| Arc::clone(&self.fallback))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pipetypes.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pipetypes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.pipetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipetypes.is_empty()
    }
}

impl Default for PipetypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for PipetypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipetypeRegistry")
            .field("pipetypes", &self.names())
            .finish()
    }
}
