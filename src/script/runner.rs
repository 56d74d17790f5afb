use crate::dom::form::named_items;
use crate::script::context::ScriptContext;
use crate::script::script_model::{AssertionResult, AssertionSpec, ScriptResult, ScriptStep, SessionScript};
use crate::transport::Transport;
use crate::ui::controller::UiController;
use crate::ui::error::ClientError;
use crate::ui::ui_state::LOCKED_FORM_NAME;

/// Executes a `SessionScript` step-by-step against a controller.
pub struct ScriptRunner;

impl ScriptRunner {
    /// Run a complete script.
    ///
    /// A step that returns an error stops the run; the result then carries
    /// the error and the number of steps attempted.
    pub fn run<T: Transport>(script: &SessionScript, controller: &mut UiController<T>) -> ScriptResult {
        let mut ctx = ScriptContext::new();

        for (i, step) in script.steps.iter().enumerate() {
            ctx.current_step = i;
            tracing::debug!(step = i, "running {:?}", step);

            if let Err(e) = Self::execute_step(step, i, controller, &mut ctx) {
                return ScriptResult {
                    script_name: script.name.clone(),
                    passed: false,
                    steps_run: i + 1,
                    assertion_results: ctx.assertion_results,
                    error: Some(format!("Step {} failed: {}", i, e)),
                };
            }
        }

        tracing::info!(
            aborted = ctx.aborted_count(),
            failed = ctx.fail_count(),
            "script '{}' finished",
            script.name
        );

        ScriptResult {
            script_name: script.name.clone(),
            passed: ctx.all_passed(),
            steps_run: script.steps.len(),
            assertion_results: ctx.assertion_results,
            error: None,
        }
    }

    fn execute_step<T: Transport>(
        step: &ScriptStep,
        step_index: usize,
        controller: &mut UiController<T>,
        ctx: &mut ScriptContext,
    ) -> Result<(), ClientError> {
        let outcome = match step {
            ScriptStep::OpenForm => controller.fetch_form()?,
            ScriptStep::Fill { values } => {
                for (field, value) in values {
                    controller.fill_field(field, &value.to_values())?;
                }
                return Ok(());
            }
            ScriptStep::Submit => controller.submit_form()?,
            ScriptStep::Analyze => controller.analyze()?,
            ScriptStep::Review => controller.view_input()?,
            ScriptStep::Profile => controller.view_profile()?,
            ScriptStep::Press { panel } => controller.press(*panel)?,
            ScriptStep::Close { panel } => {
                controller.close(*panel);
                return Ok(());
            }
            ScriptStep::Home => controller.return_home()?,
            ScriptStep::Assert { assertions } => {
                let results = assertions
                    .iter()
                    .map(|spec| Self::evaluate_one(spec, step_index, controller))
                    .collect();
                ctx.record_assertions(results);
                return Ok(());
            }
        };
        ctx.record_outcome(outcome);
        Ok(())
    }

    /// Evaluate a single assertion against the controller's current state.
    fn evaluate_one<T: Transport>(
        spec: &AssertionSpec,
        step_index: usize,
        controller: &UiController<T>,
    ) -> AssertionResult {
        let state = controller.state();

        let (passed, actual, message) = match spec {
            AssertionSpec::TextPresent { expected } => {
                let text = state.target_text();
                let passed = text.contains(expected.as_str());
                let msg = if passed {
                    None
                } else {
                    Some(format!("Text '{}' not found on page", expected))
                };
                (passed, Some(format!("(page text, {} chars)", text.len())), msg)
            }

            AssertionSpec::TextAbsent { expected } => {
                let text = state.target_text();
                let passed = !text.contains(expected.as_str());
                let msg = if passed {
                    None
                } else {
                    Some(format!("Text '{}' should not be on page", expected))
                };
                (passed, Some(format!("(page text, {} chars)", text.len())), msg)
            }

            AssertionSpec::MessageEquals { expected } => {
                let actual = state.message();
                let passed = actual.as_deref() == Some(expected.as_str());
                let msg = if passed {
                    None
                } else {
                    Some(format!(
                        "Expected message '{}', got {}",
                        expected,
                        actual
                            .as_deref()
                            .map(|m| format!("'{}'", m))
                            .unwrap_or_else(|| "no message".into())
                    ))
                };
                (passed, actual, msg)
            }

            AssertionSpec::PanelActive { panel } => {
                let active = state.active_panel();
                let passed = active == Some(*panel);
                let actual = active.map(|p| p.to_string());
                let msg = if passed {
                    None
                } else {
                    Some(format!(
                        "Expected panel '{}' open, found {}",
                        panel,
                        actual.as_deref().unwrap_or("none")
                    ))
                };
                (passed, actual, msg)
            }

            AssertionSpec::NoPanelActive => {
                let active = state.active_panel();
                let actual = active.map(|p| p.to_string());
                let msg = actual
                    .as_ref()
                    .map(|p| format!("Expected no open panel, found '{}'", p));
                (active.is_none(), actual, msg)
            }

            AssertionSpec::FieldDisabled { field } => {
                let doc = state.document();
                let form = state.form().or_else(|| doc.find_form(LOCKED_FORM_NAME));
                let items = form.map(|f| named_items(doc, f, field)).unwrap_or_default();
                let disabled = items
                    .iter()
                    .filter(|id| doc.element(**id).map(|e| e.disabled).unwrap_or(false))
                    .count();
                let passed = !items.is_empty() && disabled == items.len();
                let msg = if passed {
                    None
                } else if items.is_empty() {
                    Some(format!("Field '{}' not found", field))
                } else {
                    Some(format!("Field '{}' is not fully disabled", field))
                };
                (passed, Some(format!("{}/{} disabled", disabled, items.len())), msg)
            }
        };

        AssertionResult {
            step_index,
            spec: spec.clone(),
            passed,
            actual,
            message,
        }
    }
}
