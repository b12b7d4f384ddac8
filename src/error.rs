//! Error kinds shared by the graph store and the query layer
//!
//! Every failure is routed through [`GraphError::report`] before it is
//! returned, so callers get a well-formed `Err` and the log gets one line.

use crate::graph::VertexId;
use std::fmt;
use thiserror::Error;

/// Which end of an edge failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Target,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Source => write!(f, "source"),
            Endpoint::Target => write!(f, "target"),
        }
    }
}

/// Why a property was refused on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyRejection {
    /// The key is one of the record's own snapshot fields
    ReservedKey,
    /// NaN or an infinity, which JSON cannot carry
    NonFiniteFloat,
}

impl fmt::Display for PropertyRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyRejection::ReservedKey => write!(f, "reserved key"),
            PropertyRejection::NonFiniteFloat => write!(f, "non-finite float"),
        }
    }
}

/// Errors raised while building graphs, programs and registries
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("a vertex with id {0} already exists")]
    DuplicateVertexId(VertexId),

    #[error("edge {endpoint} vertex {id} not found")]
    DanglingEdgeEndpoint { endpoint: Endpoint, id: VertexId },

    #[error("property {key:?} rejected: {reason}")]
    InvalidProperty { key: String, reason: PropertyRejection },

    #[error("unrecognized pipetype: {0}")]
    UnknownStep(String),

    #[error("filter is neither a property map nor a predicate: {0}")]
    InvalidFilterPredicate(String),

    #[error("invalid transformer: {0}")]
    InvalidTransformer(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

impl GraphError {
    /// Log the error and hand it back for returning.
    ///
    /// Structural errors (duplicate ids, dangling edges, bad properties) reject a single
    /// element; configuration errors (unknown steps, bad filters) degrade a
    /// step to a no-op. Neither aborts the surrounding load or run.
    pub fn report(self) -> Self {
        match &self {
            GraphError::DuplicateVertexId(_)
            | GraphError::DanglingEdgeEndpoint { .. }
            | GraphError::InvalidProperty { .. } => {
                tracing::error!(error = %self, "graph construction rejected an element");
            }
            GraphError::UnknownStep(_)
            | GraphError::InvalidFilterPredicate(_)
            | GraphError::InvalidTransformer(_) => {
                tracing::warn!(error = %self, "query configuration error");
            }
        }
        self
    }

    /// True for errors that reject an element of the graph itself
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            GraphError::DuplicateVertexId(_)
                | GraphError::DanglingEdgeEndpoint { .. }
                | GraphError::InvalidProperty { .. }
        )
    }
}
