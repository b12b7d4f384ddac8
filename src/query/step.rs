//! Program representation: steps and their arguments

use super::gremlin::Gremlin;
use crate::graph::{EdgeFilter, EdgeLabel, PropertyMap, Vertex, VertexId, VertexSelector};
use std::fmt;
use std::sync::Arc;

type PredicateFn = dyn Fn(&Vertex, &Gremlin) -> bool + Send + Sync;

/// Boolean test over a vertex and the token sitting on it
#[derive(Clone)]
pub struct VertexPredicate(Arc<PredicateFn>);

impl VertexPredicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Vertex, &Gremlin) -> bool + Send + Sync + 'static,
    {
        VertexPredicate(Arc::new(f))
    }

    pub fn test(&self, vertex: &Vertex, gremlin: &Gremlin) -> bool {
        (self.0)(vertex, gremlin)
    }
}

impl fmt::Debug for VertexPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VertexPredicate(<fn>)")
    }
}

impl PartialEq for VertexPredicate {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A single step argument
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Id(VertexId),
    Name(String),
    Names(Vec<String>),
    Count(usize),
    Filter(PropertyMap),
    Predicate(VertexPredicate),
}

impl Arg {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Arg::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<usize> {
        match self {
            Arg::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<VertexId> {
        match self {
            Arg::Id(id) => Some(*id),
            _ => None,
        }
    }

    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            Arg::Id(id) => id.to_string(),
            Arg::Name(name) => format!("name {:?}", name),
            Arg::Names(names) => format!("names {:?}", names),
            Arg::Count(n) => format!("count {}", n),
            Arg::Filter(_) => "property filter".to_string(),
            Arg::Predicate(_) => "predicate".to_string(),
        }
    }
}

impl From<&str> for Arg {
    fn from(name: &str) -> Self {
        Arg::Name(name.to_string())
    }
}

impl From<String> for Arg {
    fn from(name: String) -> Self {
        Arg::Name(name)
    }
}

impl From<usize> for Arg {
    fn from(n: usize) -> Self {
        Arg::Count(n)
    }
}

impl From<VertexId> for Arg {
    fn from(id: VertexId) -> Self {
        Arg::Id(id)
    }
}

impl From<PropertyMap> for Arg {
    fn from(filter: PropertyMap) -> Self {
        Arg::Filter(filter)
    }
}

impl From<VertexPredicate> for Arg {
    fn from(predicate: VertexPredicate) -> Self {
        Arg::Predicate(predicate)
    }
}

/// Encode a vertex selector as `vertex` step arguments
pub fn selector_args(selector: VertexSelector) -> Vec<Arg> {
    match selector {
        VertexSelector::All => Vec::new(),
        VertexSelector::Ids(ids) => ids.into_iter().map(Arg::Id).collect(),
        VertexSelector::Filter(filter) => vec![Arg::Filter(filter)],
    }
}

/// Decode `vertex` step arguments: a leading property filter wins, otherwise
/// every id argument is collected; no arguments select everything.
pub fn selector_from_args(args: &[Arg]) -> VertexSelector {
    match args.first() {
        None => VertexSelector::All,
        Some(Arg::Filter(filter)) => VertexSelector::Filter(filter.clone()),
        Some(_) => VertexSelector::Ids(args.iter().filter_map(Arg::as_id).collect()),
    }
}

/// Encode an edge filter as traversal step arguments
pub fn edge_filter_args(filter: EdgeFilter) -> Vec<Arg> {
    match filter {
        EdgeFilter::Any => Vec::new(),
        EdgeFilter::Label(label) => vec![Arg::Name(label.as_str().to_string())],
        EdgeFilter::Labels(labels) => vec![Arg::Names(
            labels.iter().map(|l| l.as_str().to_string()).collect(),
        )],
        EdgeFilter::Properties(filter) => vec![Arg::Filter(filter)],
    }
}

/// Decode traversal step arguments into an edge filter
pub fn edge_filter_from_args(args: &[Arg]) -> EdgeFilter {
    match args.first() {
        Some(Arg::Name(label)) => EdgeFilter::Label(EdgeLabel::new(label.as_str())),
        Some(Arg::Names(labels)) => {
            EdgeFilter::Labels(labels.iter().map(|l| EdgeLabel::new(l.as_str())).collect())
        }
        Some(Arg::Filter(filter)) => EdgeFilter::Properties(filter.clone()),
        _ => EdgeFilter::Any,
    }
}

/// One program entry: a step name and its arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub name: String,
    pub args: Vec<Arg>,
}

impl Step {
    pub fn new(name: impl Into<String>, args: Vec<Arg>) -> Self {
        Step {
            name: name.into(),
            args,
        }
    }

    /// A step with no arguments
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }
}

/// An ordered list of steps
pub type Program = Vec<Step>;
