//! Step library
//!
//! A pipetype is a function of the graph, the step's arguments, an optional
//! input token and the step's own scratch state. It answers with a
//! [`Signal`] telling the interpreter what to do next.

use super::gremlin::Gremlin;
use super::step::{edge_filter_from_args, selector_from_args, Arg};
use crate::error::GraphError;
use crate::graph::{Direction, EdgeIndex, GraphStore, VertexId};
use rustc_hash::FxHashSet;
use std::any::Any;

/// What a step produced on one activation
#[derive(Debug)]
pub enum Signal {
    /// A token for the next step
    Emit(Gremlin),
    /// Nothing to offer, ask the upstream step for input
    Pull,
    /// Permanently exhausted for this run
    Done,
    /// No output this time, but not exhausted either
    Nothing,
}

/// Per-position scratch state, created fresh for every run
#[derive(Debug, Default)]
pub enum StepState {
    /// Not visited yet
    #[default]
    Fresh,
    /// Vertices still to emit, with the token whose bindings they inherit
    Candidates {
        vertices: Vec<VertexId>,
        origin: Option<Gremlin>,
    },
    /// Buffered edges still to walk, with the token that reached them
    Edges {
        edges: Vec<EdgeIndex>,
        origin: Gremlin,
    },
    Counter(usize),
    Seen(FxHashSet<VertexId>),
    /// Free-form state for user-registered steps
    Custom(Box<dyn Any>),
}

impl StepState {
    /// The counter slot, created at zero on first use
    pub fn counter(&mut self) -> &mut usize {
        if !matches!(self, StepState::Counter(_)) {
            *self = StepState::Counter(0);
        }
        match self {
            StepState::Counter(n) => n,
            _ => unreachable!("state was just set to a counter"),
        }
    }

    /// The seen-set slot, created empty on first use
    pub fn seen(&mut self) -> &mut FxHashSet<VertexId> {
        if !matches!(self, StepState::Seen(_)) {
            *self = StepState::Seen(FxHashSet::default());
        }
        match self {
            StepState::Seen(set) => set,
            _ => unreachable!("state was just set to a seen-set"),
        }
    }

    /// Typed access to custom state, initialized with `init` on first use
    pub fn custom<T: Any>(&mut self, init: impl FnOnce() -> T) -> &mut T {
        let ready = matches!(self, StepState::Custom(b) if b.is::<T>());
        if !ready {
            *self = StepState::Custom(Box::new(init()));
        }
        match self {
            StepState::Custom(b) => match b.downcast_mut::<T>() {
                Some(value) => value,
                None => unreachable!("custom state was just set to this type"),
            },
            _ => unreachable!("state was just set to custom"),
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, StepState::Fresh)
    }
}

/// A primitive traversal operation the interpreter can execute
pub trait Pipetype: Send + Sync {
    fn step(
        &self,
        graph: &GraphStore,
        args: &[Arg],
        input: Option<Gremlin>,
        state: &mut StepState,
    ) -> Signal;
}

impl<F> Pipetype for F
where
    F: Fn(&GraphStore, &[Arg], Option<Gremlin>, &mut StepState) -> Signal + Send + Sync,
{
    fn step(
        &self,
        graph: &GraphStore,
        args: &[Arg],
        input: Option<Gremlin>,
        state: &mut StepState,
    ) -> Signal {
        self(graph, args, input, state)
    }
}

/// Seed step: `vertex(selector...)`
pub struct VertexStep;

impl Pipetype for VertexStep {
    fn step(&self, graph: &GraphStore, args: &[Arg], input: Option<Gremlin>, state: &mut StepState) -> Signal {
        if state.is_fresh() {
            let vertices = graph
                .find_vertices(&selector_from_args(args))
                .into_iter()
                .map(|v| v.id)
                .collect();
            *state = StepState::Candidates { vertices, origin: None };
        }

        let StepState::Candidates { vertices, .. } = state else {
            return Signal::Done;
        };
        match vertices.pop() {
            Some(id) => Signal::Emit(match &input {
                Some(gremlin) => gremlin.goto(id),
                None => Gremlin::new(id),
            }),
            None => Signal::Done,
        }
    }
}

/// `out(filter?)` and `in(filter?)`
pub struct Traversal {
    direction: Direction,
}

impl Traversal {
    pub fn new(direction: Direction) -> Self {
        Traversal { direction }
    }
}

impl Pipetype for Traversal {
    fn step(&self, graph: &GraphStore, args: &[Arg], input: Option<Gremlin>, state: &mut StepState) -> Signal {
        let drained = match state {
            StepState::Edges { edges, .. } => edges.is_empty(),
            _ => true,
        };

        if drained {
            let Some(gremlin) = input else {
                return Signal::Pull;
            };
            let filter = edge_filter_from_args(args);
            let edges = match graph.find_vertex_by_id(gremlin.vertex()) {
                Some(vertex) => {
                    let incident = match self.direction {
                        Direction::Out => graph.find_out_edges(vertex),
                        Direction::In => graph.find_in_edges(vertex),
                    };
                    incident
                        .iter()
                        .copied()
                        .filter(|idx| graph.edge(*idx).is_some_and(|e| filter.matches(e)))
                        .collect()
                }
                None => Vec::new(),
            };
            *state = StepState::Edges { edges, origin: gremlin };
        }

        let StepState::Edges { edges, origin } = state else {
            return Signal::Pull;
        };
        match edges.pop().and_then(|idx| graph.edge(idx)) {
            Some(edge) => Signal::Emit(origin.goto(edge.far_end(self.direction))),
            None => Signal::Pull,
        }
    }
}

/// `property(name)`: project the token onto one of its vertex's properties
pub struct PropertyStep;

impl Pipetype for PropertyStep {
    fn step(&self, graph: &GraphStore, args: &[Arg], input: Option<Gremlin>, _state: &mut StepState) -> Signal {
        let Some(mut gremlin) = input else {
            return Signal::Pull;
        };
        let Some(name) = args.first().and_then(Arg::as_name) else {
            return Signal::Nothing;
        };

        let value = graph
            .find_vertex_by_id(gremlin.vertex())
            .and_then(|v| v.get_property(name))
            .filter(|value| !value.is_null());
        match value {
            Some(value) => {
                gremlin.set_result(value.clone());
                Signal::Emit(gremlin)
            }
            None => Signal::Nothing,
        }
    }
}

/// `unique()`: first visit of each vertex passes
pub struct UniqueStep;

impl Pipetype for UniqueStep {
    fn step(&self, _graph: &GraphStore, _args: &[Arg], input: Option<Gremlin>, state: &mut StepState) -> Signal {
        let Some(gremlin) = input else {
            return Signal::Pull;
        };
        if state.seen().insert(gremlin.vertex()) {
            Signal::Emit(gremlin)
        } else {
            Signal::Pull
        }
    }
}

/// `filter(predicate)` with a property map or a closure
pub struct FilterStep;

impl Pipetype for FilterStep {
    fn step(&self, graph: &GraphStore, args: &[Arg], input: Option<Gremlin>, _state: &mut StepState) -> Signal {
        let Some(gremlin) = input else {
            return Signal::Pull;
        };

        let passes = match args.first() {
            Some(Arg::Filter(filter)) => graph
                .find_vertex_by_id(gremlin.vertex())
                .is_some_and(|v| crate::graph::object_filter(&v.properties, filter)),
            Some(Arg::Predicate(predicate)) => graph
                .find_vertex_by_id(gremlin.vertex())
                .is_some_and(|v| predicate.test(v, &gremlin)),
            other => {
                let found = other.map_or_else(|| "nothing".to_string(), Arg::describe);
                GraphError::InvalidFilterPredicate(found).report();
                true
            }
        };

        if passes {
            Signal::Emit(gremlin)
        } else {
            Signal::Pull
        }
    }
}

/// `take(n)`: let `n` tokens through, then report exhaustion
pub struct TakeStep;

impl Pipetype for TakeStep {
    fn step(&self, _graph: &GraphStore, args: &[Arg], input: Option<Gremlin>, state: &mut StepState) -> Signal {
        let limit = args.first().and_then(Arg::as_count);
        let taken = state.counter();

        if Some(*taken) == limit {
            *taken = 0;
            return Signal::Done;
        }

        let Some(gremlin) = input else {
            return Signal::Pull;
        };
        *taken += 1;
        Signal::Emit(gremlin)
    }
}

/// `as(name)`: bind the current vertex under `name`
pub struct AsStep;

impl Pipetype for AsStep {
    fn step(&self, _graph: &GraphStore, args: &[Arg], input: Option<Gremlin>, _state: &mut StepState) -> Signal {
        let Some(gremlin) = input else {
            return Signal::Pull;
        };
        if let Some(name) = args.first().and_then(Arg::as_name) {
            gremlin.bind(name, gremlin.vertex());
        }
        Signal::Emit(gremlin)
    }
}

/// `merge(names...)`: fan out to every bound vertex
pub struct MergeStep;

impl Pipetype for MergeStep {
    fn step(&self, _graph: &GraphStore, args: &[Arg], input: Option<Gremlin>, state: &mut StepState) -> Signal {
        if state.is_fresh() && input.is_none() {
            return Signal::Pull;
        }

        let drained = match state {
            StepState::Candidates { vertices, .. } => vertices.is_empty(),
            _ => true,
        };
        if drained {
            let Some(gremlin) = input else {
                return Signal::Pull;
            };
            let vertices = args
                .iter()
                .filter_map(Arg::as_name)
                .filter_map(|name| gremlin.binding(name))
                .collect();
            *state = StepState::Candidates {
                vertices,
                origin: Some(gremlin),
            };
        }

        let StepState::Candidates { vertices, origin } = state else {
            return Signal::Pull;
        };
        match vertices.pop() {
            Some(id) => Signal::Emit(match origin {
                Some(origin) => origin.goto(id),
                None => Gremlin::new(id),
            }),
            None => Signal::Pull,
        }
    }
}

/// `except(name)`: drop tokens sitting on the vertex bound under `name`
pub struct ExceptStep;

impl Pipetype for ExceptStep {
    fn step(&self, _graph: &GraphStore, args: &[Arg], input: Option<Gremlin>, _state: &mut StepState) -> Signal {
        let Some(gremlin) = input else {
            return Signal::Pull;
        };
        let bound = args
            .first()
            .and_then(Arg::as_name)
            .and_then(|name| gremlin.binding(name));
        if bound == Some(gremlin.vertex()) {
            Signal::Pull
        } else {
            Signal::Emit(gremlin)
        }
    }
}

/// `back(name)`: return to the vertex bound under `name`
pub struct BackStep;

impl Pipetype for BackStep {
    fn step(&self, _graph: &GraphStore, args: &[Arg], input: Option<Gremlin>, _state: &mut StepState) -> Signal {
        let Some(gremlin) = input else {
            return Signal::Pull;
        };
        let bound = args
            .first()
            .and_then(Arg::as_name)
            .and_then(|name| gremlin.binding(name));
        match bound {
            Some(vertex) => Signal::Emit(gremlin.goto(vertex)),
            None => {
                tracing::debug!(args = ?args, "back() to an unbound name, dropping token");
                Signal::Pull
            }
        }
    }
}

/// Forwards its input unchanged, pulls without one.
///
/// Stands in for unknown step names and for aliases that were not rewritten.
pub struct PassThrough;

impl Pipetype for PassThrough {
    fn step(&self, _graph: &GraphStore, _args: &[Arg], input: Option<Gremlin>, _state: &mut StepState) -> Signal {
        match input {
            Some(gremlin) => Signal::Emit(gremlin),
            None => Signal::Pull,
        }
    }
}
