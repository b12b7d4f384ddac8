//! Pipeline interpreter
//!
//! Runs a program lazily with a single program counter. Steps are activated
//! one at a time: a step that has nothing to offer sends control upstream, a
//! step that produced a token hands it downstream. A step that is exhausted
//! marks everything up to and including itself as done, and the run ends
//! when the last step is done.
//!
//! No intermediate result list is ever built, so a `take(n)` at the end of a
//! long pipeline only does the work needed for `n` results.

use super::gremlin::Gremlin;
use super::pipetype::{Signal, StepState};
use super::registry::PipetypeRegistry;
use super::step::Step;
use crate::graph::GraphStore;
use tracing::{debug, trace};

/// Control-flow decision taken after one step activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    /// Move upstream to ask for input
    Pulling,
    /// Hand the carried token (if any) downstream
    Advancing,
    /// Last step produced: collect the carried token
    Emitting,
    /// The step at pc is finished for good
    Exhausted,
}

pub struct Interpreter<'a> {
    graph: &'a GraphStore,
    pipetypes: &'a PipetypeRegistry,
}

impl<'a> Interpreter<'a> {
    pub fn new(graph: &'a GraphStore, pipetypes: &'a PipetypeRegistry) -> Self {
        Interpreter { graph, pipetypes }
    }

    /// Run `program` to completion, returning the tokens that left the last
    /// step in order. Each call starts from fresh step state.
    pub fn run(&self, program: &[Step]) -> Vec<Gremlin> {
        let Some(max) = program.len().checked_sub(1) else {
            return Vec::new();
        };

        let steps: Vec<_> = program
            .iter()
            .map(|step| self.pipetypes.resolve(&step.name))
            .collect();
        let mut states: Vec<StepState> = program.iter().map(|_| StepState::default()).collect();

        let mut results = Vec::new();
        let mut pc = max;
        // Every position at or below `done` is exhausted
        let mut done: Option<usize> = None;
        let mut carried: Option<Gremlin> = None;
        let mut activations = 0usize;

        while done.map_or(true, |d| d < max) {
            activations += 1;
            let signal = steps[pc].step(self.graph, &program[pc].args, carried.take(), &mut states[pc]);
            let lowest_live = done.map_or(0, |d| d + 1);

            let transition = match signal {
                Signal::Pull if pc > lowest_live => Transition::Pulling,
                Signal::Pull | Signal::Done => Transition::Exhausted,
                Signal::Emit(gremlin) => {
                    carried = Some(gremlin);
                    if pc == max {
                        Transition::Emitting
                    } else {
                        Transition::Advancing
                    }
                }
                Signal::Nothing if pc == max => Transition::Emitting,
                Signal::Nothing => Transition::Advancing,
            };
            trace!(pc, step = %program[pc].name, ?transition, "activation");

            match transition {
                Transition::Pulling => pc -= 1,
                Transition::Advancing => pc += 1,
                Transition::Emitting => results.extend(carried.take()),
                Transition::Exhausted => {
                    done = Some(pc);
                    if pc < max {
                        pc += 1;
                    }
                }
            }
        }

        debug!(steps = program.len(), activations, results = results.len(), "program finished");
        results
    }
}
