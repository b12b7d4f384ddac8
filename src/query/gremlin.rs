//! Traversal tokens flowing through the pipeline

use crate::graph::{PropertyValue, VertexId};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Named vertex bindings established by `as` steps
pub type Bindings = FxHashMap<String, VertexId>;

/// A traversal token.
///
/// The vertex a gremlin sits on never changes: moving produces a new token
/// through [`Gremlin::goto`]. Bindings are shared by reference with every
/// token derived from this one, so descendants see what ancestors bound.
#[derive(Debug, Clone)]
pub struct Gremlin {
    vertex: VertexId,
    bindings: Rc<RefCell<Bindings>>,
    result: Option<PropertyValue>,
}

impl Gremlin {
    /// A fresh token on `vertex` with no bindings
    pub fn new(vertex: VertexId) -> Self {
        Gremlin {
            vertex,
            bindings: Rc::new(RefCell::new(Bindings::default())),
            result: None,
        }
    }

    /// A new token on `vertex` sharing this token's bindings
    pub fn goto(&self, vertex: VertexId) -> Gremlin {
        Gremlin {
            vertex,
            bindings: Rc::clone(&self.bindings),
            result: None,
        }
    }

    pub fn vertex(&self) -> VertexId {
        self.vertex
    }

    /// Bind `vertex` under `name`, visible to every token sharing the bindings
    pub fn bind(&self, name: impl Into<String>, vertex: VertexId) {
        self.bindings.borrow_mut().insert(name.into(), vertex);
    }

    pub fn binding(&self, name: &str) -> Option<VertexId> {
        self.bindings.borrow().get(name).copied()
    }

    /// The value this token projects to instead of its vertex
    pub fn result(&self) -> Option<&PropertyValue> {
        self.result.as_ref()
    }

    pub fn set_result(&mut self, value: PropertyValue) {
        self.result = Some(value);
    }

    pub fn shares_bindings_with(&self, other: &Gremlin) -> bool {
        Rc::ptr_eq(&self.bindings, &other.bindings)
    }
}
