use crate::report::report_model::RunReport;
use crate::script::script_model::AssertionSpec;

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a run report for terminal output.
///
/// Produces output like:
/// ```text
/// === Session Run: walkthrough.yaml ===
///
/// ✓ PASS  Full walkthrough (7 steps, 3 assertions)
/// ✗ FAIL  Review before submit (2 steps, 1 assertions)
///     [FAIL] Step 1: PanelActive - Expected panel 'input' open, found none
///
/// === Results: 1 passed, 1 failed (2 total) ===
/// ```
pub fn format_console_report(report: &RunReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Session Run: {} ===\n\n", report.suite_name));

    for result in &report.script_results {
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} ({} steps, {} assertions)\n",
            marker,
            result.script_name,
            result.steps_run,
            result.assertion_results.len()
        ));

        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }

        for ar in result.assertion_results.iter().filter(|ar| !ar.passed) {
            let detail = ar.message.as_deref().unwrap_or("assertion failed");
            out.push_str(&format!(
                "    [FAIL] Step {}: {} - {}\n",
                ar.step_index,
                assertion_name(&ar.spec),
                detail
            ));
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total)",
        report.passed, report.failed, report.total
    ));

    if let Some(ms) = report.duration_ms {
        out.push_str(&format!(" in {:.1}s", ms as f64 / 1000.0));
    }

    out.push_str(" ===\n");
    out
}

fn assertion_name(spec: &AssertionSpec) -> &'static str {
    match spec {
        AssertionSpec::TextPresent { .. } => "TextPresent",
        AssertionSpec::TextAbsent { .. } => "TextAbsent",
        AssertionSpec::MessageEquals { .. } => "MessageEquals",
        AssertionSpec::PanelActive { .. } => "PanelActive",
        AssertionSpec::NoPanelActive => "NoPanelActive",
        AssertionSpec::FieldDisabled { .. } => "FieldDisabled",
    }
}
