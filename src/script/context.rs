use crate::script::script_model::AssertionResult;
use crate::ui::controller::ActionOutcome;

/// Tracks progress and results of a running script.
#[derive(Debug, Clone)]
pub struct ScriptContext {
    /// Current step index (0-based)
    pub current_step: usize,

    /// All assertion results collected during execution
    pub assertion_results: Vec<AssertionResult>,

    /// Outcome of every action step, in order
    pub outcomes: Vec<(usize, ActionOutcome)>,
}

impl ScriptContext {
    pub fn new() -> Self {
        ScriptContext {
            current_step: 0,
            assertion_results: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    pub fn record_assertions(&mut self, results: Vec<AssertionResult>) {
        self.assertion_results.extend(results);
    }

    pub fn record_outcome(&mut self, outcome: ActionOutcome) {
        self.outcomes.push((self.current_step, outcome));
    }

    pub fn all_passed(&self) -> bool {
        self.assertion_results.iter().all(|r| r.passed)
    }

    pub fn aborted_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == ActionOutcome::Aborted)
            .count()
    }

    pub fn fail_count(&self) -> usize {
        self.assertion_results.iter().filter(|r| !r.passed).count()
    }
}

impl Default for ScriptContext {
    fn default() -> Self {
        Self::new()
    }
}
