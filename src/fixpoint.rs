//! A minimal consumer loop: pop an instance, evaluate it, feed the resulting
//! facts back, until the queue drains or the evaluation budget runs out.
//!
//! This is the outer loop in its simplest form, with no search and no
//! prioritization. It exists to exercise the engine end to end.

use crate::atom::Atom;
use crate::instantiate::Instantiator;
use crate::object::ObjectStore;
use crate::optimistic::OptimisticEvaluator;
use crate::stats::InstantiationStats;
use crate::stream::{Stream, StreamDecl, StreamError, StreamInstance};

#[cfg(feature = "tracing")]
use crate::trace::{debug, info};

/// Something that turns a stream instance into facts.
pub trait Evaluator {
    fn evaluate(&mut self, instance: &StreamInstance, decl: &StreamDecl) -> Vec<Atom>;
}

impl<F> Evaluator for F
where
    F: FnMut(&StreamInstance, &StreamDecl) -> Vec<Atom>,
{
    fn evaluate(&mut self, instance: &StreamInstance, decl: &StreamDecl) -> Vec<Atom> {
        self(instance, decl)
    }
}

impl Evaluator for OptimisticEvaluator<'_> {
    fn evaluate(&mut self, instance: &StreamInstance, decl: &StreamDecl) -> Vec<Atom> {
        OptimisticEvaluator::evaluate(self, decl, &instance.inputs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixpointConfig {
    /// Stop after this many evaluations even if instances remain.
    pub max_evaluations: usize,
    /// Deepest placeholder the optimistic evaluator may mint.
    pub max_level: u32,
}

impl Default for FixpointConfig {
    fn default() -> Self {
        Self {
            max_evaluations: 1_000,
            max_level: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The queue drained: every enabled instance was evaluated.
    Exhausted,
    /// `max_evaluations` was reached with instances still pending.
    BudgetExhausted,
}

#[derive(Debug, Clone)]
pub struct FixpointReport {
    pub outcome: Outcome,
    /// Instances in evaluation order.
    pub evaluated: Vec<StreamInstance>,
    /// Facts that were new to the engine.
    pub new_facts: usize,
    pub stats: InstantiationStats,
}

/// Drive `engine` with `evaluator` for at most `max_evaluations` instances.
pub fn run_fixpoint<S, E>(
    engine: &mut Instantiator<S>,
    evaluator: &mut E,
    max_evaluations: usize,
) -> FixpointReport
where
    S: Stream<Instance = StreamInstance>,
    E: Evaluator + ?Sized,
{
    let mut evaluated = Vec::new();
    let mut new_facts = 0;

    let outcome = loop {
        if evaluated.len() >= max_evaluations {
            if engine.is_empty() {
                break Outcome::Exhausted;
            }
            break Outcome::BudgetExhausted;
        }
        let Some(instance) = engine.pop() else {
            break Outcome::Exhausted;
        };

        let facts = evaluator.evaluate(&instance, engine.stream(instance.stream).decl());
        #[cfg(feature = "tracing")]
        debug!(stream = instance.stream.0, facts = facts.len(), "evaluated");
        new_facts += engine.submit_all(facts);
        evaluated.push(instance);
    };

    #[cfg(feature = "tracing")]
    info!(
        evaluated = evaluated.len(),
        new_facts,
        pending = engine.len(),
        "fixpoint_done"
    );

    FixpointReport {
        outcome,
        evaluated,
        new_facts,
        stats: engine.stats().clone(),
    }
}

/// Build an engine over `streams` and `init`, then run it to an optimistic
/// fixpoint under `config`.
pub fn solve_optimistic(
    streams: Vec<StreamDecl>,
    init: impl IntoIterator<Item = Atom>,
    objects: &ObjectStore,
    config: &FixpointConfig,
) -> Result<(Instantiator, FixpointReport), StreamError> {
    let mut engine = Instantiator::new(streams, init)?;
    let mut evaluator = OptimisticEvaluator::new(objects).with_max_level(config.max_level);
    let report = run_fixpoint(&mut engine, &mut evaluator, config.max_evaluations);
    Ok((engine, report))
}

#[cfg(test)]
#[path = "tests/fixpoint.rs"]
mod tests;
