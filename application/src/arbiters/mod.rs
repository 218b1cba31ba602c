//! Arbiter construction

pub mod deliberative;

pub use deliberative::DeliberativeArbiter;

use crate::ports::generation::GenerationBackend;
use debate_domain::{Arbiter, ArbiterKind, DebatePrompts, TallyArbiter};
use std::sync::Arc;
use std::time::Duration;

/// Build the arbiter for `kind`
pub fn build_arbiter(
    kind: ArbiterKind,
    backend: Arc<dyn GenerationBackend>,
    prompts: Arc<DebatePrompts>,
    judge_model: &str,
    deadline: Option<Duration>,
) -> Arc<dyn Arbiter> {
    match kind {
        ArbiterKind::Deliberative => Arc::new(
            DeliberativeArbiter::new(backend, prompts, judge_model).with_deadline(deadline),
        ),
        ArbiterKind::Tally => Arc::new(TallyArbiter::new()),
    }
}
