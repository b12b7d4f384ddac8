//! Program rewriting before execution

use super::step::Program;
use std::fmt;
use std::sync::Arc;

type TransformFn = dyn Fn(Program) -> Program + Send + Sync;

struct Transformer {
    priority: i32,
    apply: Arc<TransformFn>,
}

/// Ordered list of program rewrites.
///
/// Higher priority runs first. Transformers registered with equal priority
/// run in registration order.
#[derive(Default, Clone)]
pub struct TransformerChain {
    transformers: Vec<Arc<Transformer>>,
}

impl TransformerChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&mut self, priority: i32, f: F)
    where
        F: Fn(Program) -> Program + Send + Sync + 'static,
    {
        let position = self
            .transformers
            .iter()
            .position(|t| t.priority < priority)
            .unwrap_or(self.transformers.len());
        self.transformers.insert(
            position,
            Arc::new(Transformer {
                priority,
                apply: Arc::new(f),
            }),
        );
    }

    /// Rewrite a copy of `program` through every transformer in order
    pub fn run(&self, program: &Program) -> Program {
        self.transformers
            .iter()
            .fold(program.clone(), |program, t| (t.apply)(program))
    }

    /// Priorities in execution order
    pub fn priorities(&self) -> Vec<i32> {
        self.transformers.iter().map(|t| t.priority).collect()
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

impl fmt::Debug for TransformerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerChain")
            .field("priorities", &self.priorities())
            .finish()
    }
}
